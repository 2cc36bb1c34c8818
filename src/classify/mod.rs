//! Classification form controller.
//!
//! One submission walks `Idle → Submitting → (Success | Failure) → Idle`
//! inside a single call to [`FormController::submit`]. The submit control is
//! disabled before any request is issued and re-enabled on every exit path.
//! `submit` takes `&mut self`, so a second submission cannot start while one
//! is outstanding.

mod terminal;

use serde::Serialize;

use crate::api::{ApiError, PredictionResult, Predictor};
use crate::models::format_percent;

pub use terminal::TerminalForm;

/// Alert shown when the input is blank.
pub const EMPTY_TEXT_MESSAGE: &str = "Please enter some text to classify";

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Form lifecycle.
///
/// Only `Idle` is observable between calls to [`FormController::submit`];
/// the other states are reported to the view through
/// [`FormView::state_changed`] as the submission passes through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Submitting,
    Success,
    Failure,
}

/// What happened to one call to [`FormController::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The prediction was rendered.
    Success(ResultView),
    /// The request failed; `message` was shown to the user.
    Failure { message: String },
    /// Blank input; nothing was sent.
    EmptyText,
}

// ---------------------------------------------------------------------------
// Result formatting
// ---------------------------------------------------------------------------

/// Confidence section of the result card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidenceView {
    /// e.g. `87.00%`
    pub text: String,
    /// Bar width as a percentage of the track, `0..=100`.
    pub bar_width_pct: f64,
}

/// One line of the ranked alternatives list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    /// e.g. `1. Person`
    pub label: String,
    /// e.g. `87.00%`
    pub confidence: String,
}

/// The result card, fully formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub category: String,
    pub model_name: String,
    pub word_count: String,
    /// `None` hides the confidence section.
    pub confidence: Option<ConfidenceView>,
    /// Empty hides the top-predictions section.
    pub top_predictions: Vec<RankedEntry>,
}

impl ResultView {
    pub fn from_prediction(prediction: &PredictionResult) -> Self {
        let confidence = prediction.confidence.map(|c| ConfidenceView {
            text: format_percent(c),
            bar_width_pct: (c * 100.0 * 100.0).round() / 100.0,
        });

        let top_predictions = prediction
            .top_predictions
            .iter()
            .enumerate()
            .map(|(i, p)| RankedEntry {
                label: format!("{}. {}", i + 1, p.category),
                confidence: format_percent(p.confidence),
            })
            .collect();

        Self {
            category: prediction.category.clone(),
            model_name: prediction.model_name.clone(),
            word_count: prediction.word_count.to_string(),
            confidence,
            top_predictions,
        }
    }
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// The form's rendering surface.
pub trait FormView {
    fn set_submit_enabled(&mut self, enabled: bool);
    /// `true` swaps the button label for the loading indicator.
    fn set_loading(&mut self, loading: bool);
    fn hide_result(&mut self);
    fn show_result(&mut self, result: &ResultView);
    /// Bring the result card into view after [`FormView::show_result`].
    fn reveal_result(&mut self) {}
    /// Blocking user-facing message.
    fn alert(&mut self, message: &str);
    /// Called on every lifecycle transition. Default: nothing.
    fn state_changed(&mut self, _state: FormState) {}
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

pub struct FormController<P, V> {
    predictor: P,
    view: V,
    state: FormState,
}

impl<P: Predictor, V: FormView> FormController<P, V> {
    pub fn new(predictor: P, view: V) -> Self {
        Self {
            predictor,
            view,
            state: FormState::Idle,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// Handle one form submission.
    pub fn submit(&mut self, text: &str) -> SubmitOutcome {
        let text = text.trim();
        if text.is_empty() {
            self.view.alert(EMPTY_TEXT_MESSAGE);
            return SubmitOutcome::EmptyText;
        }

        let mut submission = Submission::begin(&mut self.view, &mut self.state);
        match self.predictor.predict(text) {
            Ok(prediction) => submission.succeed(&prediction),
            Err(err) => submission.fail(&err),
        }
    }
}

/// One in-flight submission. Dropping it restores the idle form, so cleanup
/// runs on every exit path, including a panicking predictor.
struct Submission<'a, V: FormView> {
    view: &'a mut V,
    state: &'a mut FormState,
}

impl<'a, V: FormView> Submission<'a, V> {
    /// Idle → Submitting. Runs before any request is issued.
    fn begin(view: &'a mut V, state: &'a mut FormState) -> Self {
        let mut submission = Self { view, state };
        submission.enter(FormState::Submitting);
        submission.view.set_submit_enabled(false);
        submission.view.set_loading(true);
        submission.view.hide_result();
        submission
    }

    fn enter(&mut self, state: FormState) {
        *self.state = state;
        self.view.state_changed(state);
    }

    fn succeed(&mut self, prediction: &PredictionResult) -> SubmitOutcome {
        self.enter(FormState::Success);
        let result = ResultView::from_prediction(prediction);
        self.view.show_result(&result);
        self.view.reveal_result();
        SubmitOutcome::Success(result)
    }

    fn fail(&mut self, err: &ApiError) -> SubmitOutcome {
        self.enter(FormState::Failure);
        eprintln!("[textclass] prediction failed: {err}");
        let message = err.user_message();
        self.view.alert(&message);
        SubmitOutcome::Failure { message }
    }
}

impl<V: FormView> Drop for Submission<'_, V> {
    /// Terminal outcome → Idle.
    fn drop(&mut self) {
        self.view.set_submit_enabled(true);
        self.view.set_loading(false);
        self.enter(FormState::Idle);
    }
}

// ---------------------------------------------------------------------------
// Sample texts
// ---------------------------------------------------------------------------

/// Canned inputs for quick demos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SampleText {
    Person,
    Place,
    Company,
}

impl SampleText {
    pub fn text(self) -> &'static str {
        match self {
            Self::Person => {
                "Albert Einstein was a German-born theoretical physicist who developed the theory of relativity..."
            }
            Self::Place => "Paris is the capital and most populous city of France...",
            Self::Company => "Apple Inc. is an American multinational technology company...",
        }
    }
}

/// Character count shown under the input box.
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TopPrediction;

    fn prediction(confidence: Option<f64>) -> PredictionResult {
        PredictionResult {
            category: "Person".to_string(),
            model_name: "SVM".to_string(),
            word_count: 12,
            confidence,
            top_predictions: vec![
                TopPrediction {
                    category: "Person".to_string(),
                    confidence: 0.87,
                },
                TopPrediction {
                    category: "Place".to_string(),
                    confidence: 0.09,
                },
            ],
        }
    }

    #[test]
    fn result_view_formats_confidence_and_ranks() {
        let view = ResultView::from_prediction(&prediction(Some(0.87)));
        assert_eq!(view.category, "Person");
        assert_eq!(view.model_name, "SVM");
        assert_eq!(view.word_count, "12");

        let confidence = view.confidence.unwrap();
        assert_eq!(confidence.text, "87.00%");
        assert_eq!(confidence.bar_width_pct, 87.0);

        assert_eq!(view.top_predictions.len(), 2);
        assert_eq!(view.top_predictions[0].label, "1. Person");
        assert_eq!(view.top_predictions[0].confidence, "87.00%");
        assert_eq!(view.top_predictions[1].label, "2. Place");
        assert_eq!(view.top_predictions[1].confidence, "9.00%");
    }

    #[test]
    fn result_view_hides_missing_sections() {
        let mut p = prediction(None);
        p.top_predictions.clear();
        let view = ResultView::from_prediction(&p);
        assert!(view.confidence.is_none());
        assert!(view.top_predictions.is_empty());
    }

    #[test]
    fn sample_texts_are_nonblank() {
        for sample in [SampleText::Person, SampleText::Place, SampleText::Company] {
            assert!(!sample.text().trim().is_empty());
        }
        assert!(SampleText::Place.text().starts_with("Paris"));
    }

    #[test]
    fn char_count_counts_characters() {
        assert_eq!(char_count(""), 0);
        assert_eq!(char_count("héllo"), 5);
    }
}

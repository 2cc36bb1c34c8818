/// Classification form controller tests.
///
/// Drive [`FormController`] with an in-memory predictor and a recording view
/// and check the state machine: blank input, success rendering, failure
/// alerts, and cleanup after every terminal outcome.
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use textclass::api::{ApiError, PredictionResult, Predictor, TopPrediction};
use textclass::classify::{
    EMPTY_TEXT_MESSAGE, FormController, FormState, FormView, ResultView, SubmitOutcome,
};

type Journal = Rc<RefCell<Vec<String>>>;

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

struct FakePredictor {
    response: Result<PredictionResult, Failure>,
    calls: Rc<Cell<usize>>,
    journal: Journal,
}

impl Predictor for FakePredictor {
    fn predict(&self, text: &str) -> Result<PredictionResult, ApiError> {
        self.calls.set(self.calls.get() + 1);
        self.journal.borrow_mut().push(format!("predict:{text}"));
        match &self.response {
            Ok(result) => Ok(result.clone()),
            Err(failure) => Err(failure.to_error()),
        }
    }
}

#[derive(Default)]
struct RecordingView {
    journal: Journal,
    submit_enabled: bool,
    loading: bool,
    result_visible: bool,
    revealed: bool,
    shown: Option<ResultView>,
    alerts: Vec<String>,
}

impl FormView for RecordingView {
    fn set_submit_enabled(&mut self, enabled: bool) {
        self.submit_enabled = enabled;
        self.journal.borrow_mut().push(format!("submit_enabled:{enabled}"));
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.journal.borrow_mut().push(format!("loading:{loading}"));
    }

    fn hide_result(&mut self) {
        self.result_visible = false;
        self.journal.borrow_mut().push("hide_result".to_string());
    }

    fn show_result(&mut self, result: &ResultView) {
        self.result_visible = true;
        self.shown = Some(result.clone());
        self.journal.borrow_mut().push("show_result".to_string());
    }

    fn reveal_result(&mut self) {
        self.revealed = true;
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
        self.journal.borrow_mut().push(format!("alert:{message}"));
    }

    fn state_changed(&mut self, state: FormState) {
        self.journal.borrow_mut().push(format!("state:{state:?}"));
    }
}

fn person_prediction(confidence: Option<f64>) -> PredictionResult {
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

fn controller(
    response: Result<PredictionResult, Failure>,
) -> (FormController<FakePredictor, RecordingView>, Rc<Cell<usize>>, Journal) {
    let calls = Rc::new(Cell::new(0));
    let journal: Journal = Rc::default();
    let predictor = FakePredictor {
        response,
        calls: Rc::clone(&calls),
        journal: Rc::clone(&journal),
    };
    let view = RecordingView {
        journal: Rc::clone(&journal),
        submit_enabled: true,
        ..RecordingView::default()
    };
    (FormController::new(predictor, view), calls, journal)
}

/// The ways a fake prediction can fail.
#[derive(Debug, Clone, Copy)]
enum Failure {
    ModelNotLoaded,
    Refused,
    TimedOut,
    Malformed,
}

impl Failure {
    fn to_error(self) -> ApiError {
        match self {
            Self::ModelNotLoaded => ApiError::Status {
                status: 500,
                message: Some("model not loaded".to_string()),
            },
            Self::Refused => ApiError::Transport("connection refused".to_string()),
            Self::TimedOut => ApiError::Timeout(Duration::from_millis(100)),
            Self::Malformed => ApiError::Malformed("missing category".to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Blank input
// ---------------------------------------------------------------------------

#[test]
fn blank_text_never_reaches_the_network() {
    for text in ["", "   ", "\n\t  \n"] {
        let (mut form, calls, _) = controller(Ok(person_prediction(Some(0.87))));

        assert_eq!(form.submit(text), SubmitOutcome::EmptyText);
        assert_eq!(calls.get(), 0);
        assert_eq!(form.state(), FormState::Idle);
        assert_eq!(form.view().alerts, vec![EMPTY_TEXT_MESSAGE]);
        assert!(form.view().submit_enabled);
    }
}

// ---------------------------------------------------------------------------
// Success
// ---------------------------------------------------------------------------

#[test]
fn success_renders_full_result() {
    let (mut form, calls, _) = controller(Ok(person_prediction(Some(0.87))));

    let outcome = form.submit("  Albert Einstein was a physicist.  ");
    assert!(matches!(outcome, SubmitOutcome::Success(_)));
    assert_eq!(calls.get(), 1);

    let view = form.view();
    let shown = view.shown.as_ref().unwrap();
    assert_eq!(shown.category, "Person");
    assert_eq!(shown.model_name, "SVM");
    assert_eq!(shown.word_count, "12");

    let confidence = shown.confidence.as_ref().unwrap();
    assert_eq!(confidence.text, "87.00%");
    assert_eq!(confidence.bar_width_pct, 87.0);

    let labels: Vec<_> = shown.top_predictions.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["1. Person", "2. Place"]);

    assert!(view.result_visible);
    assert!(view.revealed);
    assert!(view.alerts.is_empty());
}

#[test]
fn text_is_trimmed_before_sending() {
    let (mut form, _, journal) = controller(Ok(person_prediction(Some(0.5))));
    form.submit("  Paris  ");
    assert!(journal.borrow().contains(&"predict:Paris".to_string()));
}

#[test]
fn null_confidence_hides_section() {
    let (mut form, _, _) = controller(Ok(person_prediction(None)));
    form.submit("text");

    let shown = form.view().shown.as_ref().unwrap();
    assert!(shown.confidence.is_none());
    assert_eq!(shown.top_predictions.len(), 2);
}

#[test]
fn empty_top_predictions_hides_list() {
    let mut prediction = person_prediction(Some(0.9));
    prediction.top_predictions.clear();
    let (mut form, _, _) = controller(Ok(prediction));
    form.submit("text");

    assert!(form.view().shown.as_ref().unwrap().top_predictions.is_empty());
}

// ---------------------------------------------------------------------------
// Failure
// ---------------------------------------------------------------------------

#[test]
fn server_error_message_is_shown_verbatim() {
    let (mut form, _, _) = controller(Err(Failure::ModelNotLoaded));

    let outcome = form.submit("text");
    assert_eq!(
        outcome,
        SubmitOutcome::Failure {
            message: "Error: model not loaded".to_string()
        }
    );
    assert_eq!(form.view().alerts, vec!["Error: model not loaded"]);
    assert!(form.view().submit_enabled);
    assert!(!form.view().result_visible);
}

#[test]
fn failure_kinds_map_to_generic_messages() {
    let cases = [
        (Failure::Refused, "Error: Failed to connect to the server"),
        (Failure::TimedOut, "Error: Request timed out"),
        (Failure::Malformed, "Error: Failed to classify text"),
    ];
    for (failure, expected) in cases {
        let (mut form, _, _) = controller(Err(failure));
        form.submit("text");
        assert_eq!(form.view().alerts, vec![expected]);
    }
}

// ---------------------------------------------------------------------------
// Cleanup and ordering
// ---------------------------------------------------------------------------

#[test]
fn every_outcome_returns_to_idle() {
    let responses: Vec<Result<PredictionResult, Failure>> = vec![
        Ok(person_prediction(Some(0.87))),
        Err(Failure::ModelNotLoaded),
        Err(Failure::Refused),
        Err(Failure::TimedOut),
    ];
    for response in responses {
        let (mut form, _, _) = controller(response);
        form.submit("text");

        assert_eq!(form.state(), FormState::Idle);
        assert!(form.view().submit_enabled);
        assert!(!form.view().loading);
    }
}

#[test]
fn submit_is_disabled_before_the_request() {
    let (mut form, _, journal) = controller(Ok(person_prediction(Some(0.87))));
    form.submit("text");

    let journal = journal.borrow();
    let position = |entry: &str| journal.iter().position(|e| e == entry).unwrap();
    assert!(position("submit_enabled:false") < position("predict:text"));
    assert!(position("loading:true") < position("predict:text"));
    assert!(position("hide_result") < position("predict:text"));
    assert!(position("show_result") < position("submit_enabled:true"));
    assert!(position("state:Submitting") < position("predict:text"));
    assert_eq!(journal.last().map(String::as_str), Some("state:Idle"));
}

#[test]
fn view_sees_every_lifecycle_state() {
    let cases: [(Result<PredictionResult, Failure>, &str); 2] = [
        (Ok(person_prediction(Some(0.87))), "state:Success"),
        (Err(Failure::Refused), "state:Failure"),
    ];
    for (response, terminal) in cases {
        let (mut form, _, journal) = controller(response);
        form.submit("text");

        let states: Vec<String> = journal
            .borrow()
            .iter()
            .filter(|e| e.starts_with("state:"))
            .cloned()
            .collect();
        assert_eq!(states, vec!["state:Submitting", terminal, "state:Idle"]);
    }
}

#[test]
fn blank_text_leaves_state_untouched() {
    let (mut form, _, journal) = controller(Ok(person_prediction(Some(0.87))));
    form.submit("   ");
    assert!(!journal.borrow().iter().any(|e| e.starts_with("state:")));
}

#[test]
fn second_submission_replaces_previous_result() {
    let (mut form, calls, _) = controller(Ok(person_prediction(Some(0.87))));
    form.submit("first");
    form.submit("second");

    assert_eq!(calls.get(), 2);
    assert_eq!(form.state(), FormState::Idle);
    assert!(form.view().result_visible);
}

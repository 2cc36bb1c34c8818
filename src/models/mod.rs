//! Model-comparison records and the helpers that rank and format them.
//!
//! Records arrive from `GET /api/models` using the comparison endpoint's
//! column names (`Model`, `F1-Score (Macro)`, ...). Every view of the data
//! (charts and table alike) is derived from [`sorted_by_f1_macro`] so that
//! labels, bars and rank badges always agree.

mod sample;

use serde::{Deserialize, Serialize};

pub use sample::sample_records;

// ---------------------------------------------------------------------------
// Record type
// ---------------------------------------------------------------------------

/// Evaluation metrics for one trained classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    #[serde(rename = "Model")]
    pub name: String,
    #[serde(rename = "F1-Score (Macro)")]
    pub f1_macro: f64,
    #[serde(rename = "F1-Score (Weighted)")]
    pub f1_weighted: f64,
    #[serde(rename = "Accuracy")]
    pub accuracy: f64,
    #[serde(rename = "Training Time (s)")]
    pub training_time_secs: f64,
}

impl ModelRecord {
    pub fn new(
        name: impl Into<String>,
        f1_macro: f64,
        f1_weighted: f64,
        accuracy: f64,
        training_time_secs: f64,
    ) -> Self {
        Self {
            name: name.into(),
            f1_macro,
            f1_weighted,
            accuracy,
            training_time_secs,
        }
    }

    /// Check the record invariants: scores in `[0, 1]`, training time `>= 0`,
    /// a non-blank name.
    ///
    /// Returns a short description of the first violation.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("record has a blank model name".to_string());
        }

        let scores = [
            ("F1-Score (Macro)", self.f1_macro),
            ("F1-Score (Weighted)", self.f1_weighted),
            ("Accuracy", self.accuracy),
        ];
        for (field, value) in scores {
            if !is_unit_interval(value) {
                return Err(format!("{}: {field} out of range ({value})", self.name));
            }
        }

        if !self.training_time_secs.is_finite() || self.training_time_secs < 0.0 {
            return Err(format!(
                "{}: Training Time (s) out of range ({})",
                self.name, self.training_time_secs
            ));
        }

        Ok(())
    }
}

/// `true` if `value` is a finite number in `[0, 1]`.
pub fn is_unit_interval(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Return a copy of `records` sorted by macro F1, best first.
///
/// The sort is stable: records with equal scores keep their source order.
/// The input slice is never reordered.
pub fn sorted_by_f1_macro(records: &[ModelRecord]) -> Vec<ModelRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| b.f1_macro.total_cmp(&a.f1_macro));
    sorted
}

/// Badge text for a zero-based rank: `1st`, `2nd`, `3rd`, then plain ordinals.
pub fn rank_badge(index: usize) -> String {
    match index {
        0 => "1st".to_string(),
        1 => "2nd".to_string(),
        2 => "3rd".to_string(),
        n => (n + 1).to_string(),
    }
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Score cell: four decimal places.
pub fn format_score(value: f64) -> String {
    format!("{value:.4}")
}

/// Training-time cell: two decimal places with a seconds suffix.
pub fn format_seconds(value: f64) -> String {
    format!("{value:.2}s")
}

/// Fraction rendered as a percentage with two decimals (`0.87` → `87.00%`).
pub fn format_percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use super::ModelRecord;

/// The built-in comparison data shown whenever `/api/models` is unusable.
///
/// Ten DBpedia classifiers, in their published order (not ranked).
pub fn sample_records() -> Vec<ModelRecord> {
    vec![
        ModelRecord::new("Passive Aggressive", 0.8115, 0.8632, 0.8705, 1.65),
        ModelRecord::new("Linear SVM", 0.7961, 0.8586, 0.8700, 1.48),
        ModelRecord::new("SGD Classifier", 0.7793, 0.8524, 0.8665, 1.24),
        ModelRecord::new("K-Nearest Neighbors", 0.7098, 0.7783, 0.7905, 3.54),
        ModelRecord::new("Random Forest", 0.6897, 0.7942, 0.8145, 7.81),
        ModelRecord::new("Logistic Regression", 0.6293, 0.7859, 0.8165, 13.05),
        ModelRecord::new("Decision Tree", 0.6273, 0.7161, 0.7165, 23.27),
        ModelRecord::new("Multinomial Naive Bayes", 0.4429, 0.6322, 0.6930, 0.15),
        ModelRecord::new("Bernoulli Naive Bayes", 0.3107, 0.4783, 0.5000, 0.18),
        ModelRecord::new("Extra Trees", 0.7234, 0.8012, 0.8234, 8.92),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_set_has_ten_valid_records() {
        let records = sample_records();
        assert_eq!(records.len(), 10);
        for record in &records {
            assert!(record.validate().is_ok(), "{}", record.name);
        }
    }

    #[test]
    fn passive_aggressive_ranks_first() {
        let sorted = super::super::sorted_by_f1_macro(&sample_records());
        assert_eq!(sorted[0].name, "Passive Aggressive");
        assert_eq!(sorted[3].name, "Extra Trees");
        assert_eq!(sorted[9].name, "Bernoulli Naive Bayes");
    }
}

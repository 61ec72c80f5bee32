//! Common-wrong-answer analysis
//!
//! For each question most models got wrong, determines whether the incorrect
//! models converged on the same wrong answer. Extraction failures count
//! against consistency: the model was wrong, but what it guessed is unknown,
//! so it stays in the denominator and never in the numerator.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::dataset::{EvaluationRecord, QuestionKey};

/// Thresholds for the analysis
#[derive(Debug, Clone, Copy)]
pub struct WrongAnswerOptions {
    /// Minimum incorrect rate for a question to be considered
    pub min_incorrect_rate: f64,
    /// Minimum number of incorrect records for a question to be considered
    pub min_incorrect_count: usize,
}

impl Default for WrongAnswerOptions {
    fn default() -> Self {
        Self {
            min_incorrect_rate: 0.5,
            min_incorrect_count: 2,
        }
    }
}

/// One reported question: how consistently the wrong models agreed
#[derive(Debug, Clone, Serialize)]
pub struct WrongAnswerPattern {
    /// Question identity
    pub key: QuestionKey,
    /// Fraction of models that answered incorrectly
    pub incorrect_rate: f64,
    /// The most common wrong answer
    pub modal_wrong_answer: String,
    /// How many incorrect records chose the modal answer
    pub modal_count: usize,
    /// Incorrect models, extraction failures included
    pub total_incorrect: usize,
    /// `modal_count / total_incorrect`, clamped to 1.0
    pub consistency_ratio: f64,
    /// Models that chose the modal wrong answer, sorted
    pub models: Vec<String>,
    /// True when the raw ratio exceeded 1.0 and was clamped
    pub flagged: bool,
}

impl WrongAnswerPattern {
    /// True when every counted incorrect model agreed on the modal answer
    pub fn is_complete(&self) -> bool {
        self.consistency_ratio >= 1.0
    }
}

/// Find questions where the incorrect models agree on the same wrong answer.
///
/// Rows are ordered by incorrect rate descending, ties by question key, so a
/// rerun over the same input produces byte-identical output.
pub fn analyze_wrong_answers(
    records: &[EvaluationRecord],
    options: &WrongAnswerOptions,
) -> Vec<WrongAnswerPattern> {
    let mut by_question: BTreeMap<&QuestionKey, Vec<&EvaluationRecord>> = BTreeMap::new();
    for record in records {
        by_question.entry(&record.key).or_default().push(record);
    }

    let mut rows = Vec::new();
    for (key, group) in by_question {
        if let Some(row) = analyze_question(key, &group, options) {
            rows.push(row);
        }
    }

    rows.sort_by(|a, b| {
        b.incorrect_rate
            .partial_cmp(&a.incorrect_rate)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.key.cmp(&b.key))
    });
    rows
}

fn analyze_question(
    key: &QuestionKey,
    group: &[&EvaluationRecord],
    options: &WrongAnswerOptions,
) -> Option<WrongAnswerPattern> {
    // Aggregate counts are per model; several runs of one model on the same
    // question collapse here, while the answer tally below counts records.
    // That divergence is exactly what the ratio clamp guards against.
    let mut model_correct: BTreeMap<&str, bool> = BTreeMap::new();
    for record in group {
        let entry = model_correct.entry(record.model.as_str()).or_insert(false);
        *entry = *entry || record.is_correct;
    }
    let total_count = model_correct.len();
    let correct_count = model_correct.values().filter(|c| **c).count();
    let total_incorrect = total_count - correct_count;

    let incorrect_records: Vec<&&EvaluationRecord> =
        group.iter().filter(|r| !r.is_correct).collect();

    if total_count == 0 || incorrect_records.len() < options.min_incorrect_count {
        return None;
    }

    let incorrect_rate = 1.0 - correct_count as f64 / total_count as f64;
    if incorrect_rate < options.min_incorrect_rate {
        return None;
    }

    // Tally usable wrong answers; extraction failures stay out of the tally
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in &incorrect_records {
        if let Some(answer) = record.predicted_answer.as_deref() {
            *counts.entry(answer).or_insert(0) += 1;
        }
    }

    let mut modal: Option<(&str, usize)> = None;
    for (answer, count) in counts {
        if modal.map_or(true, |(_, best)| count > best) {
            modal = Some((answer, count));
        }
    }
    let (modal_wrong_answer, modal_count) = modal?;

    if total_incorrect == 0 {
        return None;
    }
    let raw_ratio = modal_count as f64 / total_incorrect as f64;
    let flagged = raw_ratio > 1.0;
    if flagged {
        warn!(
            question = %key,
            modal_count,
            total_incorrect,
            "consistency ratio exceeded 1.0; clamping - check for duplicate runs"
        );
    }
    let consistency_ratio = raw_ratio.min(1.0);

    if consistency_ratio < 0.5 {
        return None;
    }

    let mut models: Vec<String> = incorrect_records
        .iter()
        .filter(|r| r.predicted_answer.as_deref() == Some(modal_wrong_answer))
        .map(|r| r.model.clone())
        .collect();
    models.sort();
    models.dedup();

    Some(WrongAnswerPattern {
        key: key.clone(),
        incorrect_rate,
        modal_wrong_answer: modal_wrong_answer.to_string(),
        modal_count,
        total_incorrect,
        consistency_ratio,
        models,
        flagged,
    })
}

/// Partition rows into the complete-agreement and partial-agreement buckets
pub fn partition_by_completeness(
    rows: Vec<WrongAnswerPattern>,
) -> (Vec<WrongAnswerPattern>, Vec<WrongAnswerPattern>) {
    rows.into_iter().partition(|row| row.is_complete())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::testutil::record;

    fn ten_models_question(
        number: u32,
        wrong: &[(&str, Option<&str>)],
    ) -> Vec<EvaluationRecord> {
        let mut records = Vec::new();
        for (model, answer) in wrong {
            records.push(record("T", number, model, *answer, "A"));
        }
        let wrong_count = wrong.len();
        for i in wrong_count..10 {
            records.push(record("T", number, &format!("OK{}", i), Some("A"), "A"));
        }
        records
    }

    #[test]
    fn test_scenario_partial_agreement_with_failures() {
        // 10 models, 6 incorrect; 4 chose "C", 2 are extraction failures
        let records = ten_models_question(
            3,
            &[
                ("W1", Some("C")),
                ("W2", Some("C")),
                ("W3", Some("C")),
                ("W4", Some("C")),
                ("W5", None),
                ("W6", None),
            ],
        );
        let rows = analyze_wrong_answers(&records, &WrongAnswerOptions::default());
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.total_incorrect, 6);
        assert_eq!(row.modal_count, 4);
        assert!((row.consistency_ratio - 4.0 / 6.0).abs() < 1e-9);
        assert_eq!(row.modal_wrong_answer, "C");
        assert!(!row.is_complete());
        assert!(!row.flagged);
    }

    #[test]
    fn test_scenario_boundary_ratio_is_reported() {
        // 10 models, 4 incorrect: 2 chose "B", 2 chose "D" -> ratio 0.5
        let records = ten_models_question(
            4,
            &[
                ("W1", Some("B")),
                ("W2", Some("B")),
                ("W3", Some("D")),
                ("W4", Some("D")),
            ],
        );
        // incorrect_rate 0.4 is below the default threshold; lower it
        let options = WrongAnswerOptions {
            min_incorrect_rate: 0.4,
            min_incorrect_count: 2,
        };
        let rows = analyze_wrong_answers(&records, &options);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.modal_count, 2);
        assert!((row.consistency_ratio - 0.5).abs() < 1e-9);
        // Lexical tie-break between "B" and "D"
        assert_eq!(row.modal_wrong_answer, "B");
    }

    #[test]
    fn test_below_rate_threshold_is_excluded() {
        // 10 models, 3 incorrect and agreeing -> rate 0.3, excluded
        let records = ten_models_question(
            5,
            &[("W1", Some("B")), ("W2", Some("B")), ("W3", Some("B"))],
        );
        let rows = analyze_wrong_answers(&records, &WrongAnswerOptions::default());
        assert!(rows.is_empty());
    }

    #[test]
    fn test_low_consistency_is_excluded() {
        // 6 of 10 incorrect but split three ways -> ratio 2/6 < 0.5
        let records = ten_models_question(
            6,
            &[
                ("W1", Some("B")),
                ("W2", Some("B")),
                ("W3", Some("C")),
                ("W4", Some("C")),
                ("W5", Some("D")),
                ("W6", Some("D")),
            ],
        );
        let rows = analyze_wrong_answers(&records, &WrongAnswerOptions::default());
        assert!(rows.is_empty());
    }

    #[test]
    fn test_complete_agreement_bucket() {
        let records = ten_models_question(
            7,
            &[
                ("W1", Some("B")),
                ("W2", Some("B")),
                ("W3", Some("B")),
                ("W4", Some("B")),
                ("W5", Some("B")),
                ("W6", Some("B")),
            ],
        );
        let rows = analyze_wrong_answers(&records, &WrongAnswerOptions::default());
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_complete());
        assert_eq!(rows[0].models.len(), 6);

        let (complete, partial) = partition_by_completeness(rows);
        assert_eq!(complete.len(), 1);
        assert!(partial.is_empty());
    }

    #[test]
    fn test_duplicate_runs_clamp_and_flag() {
        // One model wrong twice with the same answer plus another wrong once:
        // 2 distinct incorrect models but 3 modal records -> raw ratio 1.5
        let mut records = vec![
            record("T", 8, "W1", Some("B"), "A"),
            record("T", 8, "W1", Some("B"), "A"),
            record("T", 8, "W2", Some("B"), "A"),
        ];
        records.push(record("T", 8, "OK1", Some("A"), "A"));

        let options = WrongAnswerOptions {
            min_incorrect_rate: 0.5,
            min_incorrect_count: 2,
        };
        let rows = analyze_wrong_answers(&records, &options);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.total_incorrect, 2);
        assert_eq!(row.modal_count, 3);
        assert!((row.consistency_ratio - 1.0).abs() < 1e-9);
        assert!(row.flagged);
    }

    #[test]
    fn test_ratio_bounds_always_hold() {
        let records = ten_models_question(
            9,
            &[
                ("W1", Some("B")),
                ("W2", Some("B")),
                ("W3", Some("B")),
                ("W4", None),
                ("W5", None),
                ("W6", None),
            ],
        );
        let rows = analyze_wrong_answers(&records, &WrongAnswerOptions::default());
        for row in &rows {
            assert!(row.consistency_ratio >= 0.5);
            assert!(row.consistency_ratio <= 1.0);
        }
    }

    #[test]
    fn test_ordering_and_idempotence() {
        let mut records = ten_models_question(
            1,
            &[
                ("W1", Some("B")),
                ("W2", Some("B")),
                ("W3", Some("B")),
                ("W4", Some("B")),
                ("W5", Some("B")),
                ("W6", Some("B")),
            ],
        );
        // Question 2: higher incorrect rate, should sort first
        for model in ["W1", "W2", "W3", "W4", "W5", "W6", "OK6", "OK7"] {
            records.push(record("T", 2, model, Some("D"), "A"));
        }

        let first = analyze_wrong_answers(&records, &WrongAnswerOptions::default());
        let second = analyze_wrong_answers(&records, &WrongAnswerOptions::default());

        assert_eq!(first.len(), 2);
        assert_eq!(first[0].key.number, 2);
        assert_eq!(first[1].key.number, 1);

        let a = serde_json::to_string(&first).unwrap();
        let b = serde_json::to_string(&second).unwrap();
        assert_eq!(a, b);
    }
}

//! Dataset model for benchmark runs
//!
//! The CSV families on disk are loosely typed; everything past the ingestion
//! boundary works with the explicit record types in this module. A question
//! number is only unique within a test set - `QuestionKey` carries the full
//! (test, year, session, number) identity.

pub mod filter;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BenchError;

/// Detail level of a result file, encoded in its filename
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    /// Full per-question reasoning dump
    Detailed,
    /// Condensed answer-only dump
    Summary,
}

impl fmt::Display for DetailLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetailLevel::Detailed => write!(f, "detailed"),
            DetailLevel::Summary => write!(f, "summary"),
        }
    }
}

impl FromStr for DetailLevel {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "detailed" => Ok(DetailLevel::Detailed),
            "summary" => Ok(DetailLevel::Summary),
            other => Err(BenchError::invalid_value("detail level", other)),
        }
    }
}

/// Unique identity of a question across all loaded test sets.
///
/// Ordering is lexicographic over (test, year, session, number), which gives
/// every report a stable, deterministic row order.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct QuestionKey {
    /// Test set name (e.g. "CPA-2023")
    pub test: String,
    /// Exam year, when the test set provides one
    pub year: Option<i32>,
    /// Exam session, when the test set provides one
    pub session: Option<String>,
    /// Question number within the test set
    pub number: u32,
}

impl fmt::Display for QuestionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.test)?;
        if let Some(year) = self.year {
            write!(f, "/{}", year)?;
        }
        if let Some(session) = &self.session {
            write!(f, "/{}", session)?;
        }
        write!(f, "/Q{}", self.number)
    }
}

/// One row of a test-set CSV: a question with its metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestQuestion {
    /// Question number within the test set
    pub number: u32,
    /// Subject classification
    pub subject: Option<String>,
    /// Exam year
    pub year: Option<i32>,
    /// Exam session
    pub session: Option<String>,
    /// Whether this is a statutory-law question (`law` column == "O")
    pub is_law: Option<bool>,
    /// Ground-truth answer, when the test set carries one
    pub answer: Option<String>,
}

/// A loaded test set: a named collection of questions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSet {
    /// Test set name, from the `testset_<name>.csv` filename
    pub name: String,
    /// Questions in file order
    pub questions: Vec<TestQuestion>,
}

impl TestSet {
    /// Number of law-classified questions
    pub fn law_count(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| q.is_law == Some(true))
            .count()
    }

    /// Distinct subjects present in this test set
    pub fn subjects(&self) -> BTreeSet<&str> {
        self.questions
            .iter()
            .filter_map(|q| q.subject.as_deref())
            .collect()
    }

    /// Look up a question by number
    pub fn question(&self, number: u32) -> Option<&TestQuestion> {
        self.questions.iter().find(|q| q.number == number)
    }
}

/// One evaluation row: a single model's answer to a single question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRecord {
    /// Question identity
    pub key: QuestionKey,
    /// Normalized model display name
    pub model: String,
    /// Detail level of the source file
    pub detail: DetailLevel,
    /// Prompting method component of the source filename
    pub method: String,
    /// The option the model selected; `None` is an extraction failure
    pub predicted_answer: Option<String>,
    /// Ground-truth option
    pub correct_answer: Option<String>,
    /// Derived: predicted == correct, both present
    pub is_correct: bool,
    /// Subject, joined from the test set
    pub subject: Option<String>,
    /// Law classification, joined from the test set
    pub is_law: Option<bool>,
    /// Prompt tokens consumed
    pub input_tokens: Option<u64>,
    /// Completion tokens produced
    pub output_tokens: Option<u64>,
    /// Wall-clock response time in seconds
    pub response_time_secs: Option<f64>,
}

impl EvaluationRecord {
    /// Derive correctness from predicted and ground-truth answers.
    ///
    /// Invariant: never true when the predicted answer is missing.
    pub fn derive_correct(predicted: Option<&str>, correct: Option<&str>) -> bool {
        match (predicted, correct) {
            (Some(p), Some(c)) => p == c,
            _ => false,
        }
    }

    /// True when the model's answer could not be extracted
    pub fn is_extraction_failure(&self) -> bool {
        self.predicted_answer.is_none()
    }
}

/// A file skipped during loading, with the reason
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    /// Path of the skipped file
    pub path: PathBuf,
    /// Why it was skipped
    pub reason: String,
}

/// Summary of a load pass over the data directory
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    /// Number of test-set files loaded
    pub testset_files: usize,
    /// Number of result files loaded
    pub result_files: usize,
    /// Files skipped, with reasons
    pub skipped: Vec<SkippedFile>,
}

/// The full in-memory dataset, immutable after load
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Test sets keyed by name
    pub test_sets: BTreeMap<String, TestSet>,
    /// All evaluation records
    pub records: Vec<EvaluationRecord>,
    /// What happened during the load
    pub load_report: LoadReport,
    /// When the load completed
    pub loaded_at: DateTime<Utc>,
}

impl Dataset {
    /// Distinct model names, sorted
    pub fn models(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.model.as_str()).collect()
    }

    /// Distinct prompting methods, sorted
    pub fn methods(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.method.as_str()).collect()
    }

    /// Records for a single model
    pub fn records_for<'a, 'b>(&'a self, model: &'b str) -> impl Iterator<Item = &'a EvaluationRecord> + use<'a, 'b> {
        self.records.iter().filter(move |r| r.model == model)
    }

    /// Overall accuracy of a model across all its records.
    ///
    /// Returns `None` when the model has no records.
    pub fn accuracy_of(&self, model: &str) -> Option<f64> {
        let mut total = 0usize;
        let mut correct = 0usize;
        for record in self.records_for(model) {
            total += 1;
            if record.is_correct {
                correct += 1;
            }
        }
        if total == 0 {
            None
        } else {
            Some(correct as f64 / total as f64)
        }
    }

    /// True when no records were loaded at all
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;

    /// Build a minimal record for analysis tests.
    pub fn record(
        test: &str,
        number: u32,
        model: &str,
        predicted: Option<&str>,
        correct: &str,
    ) -> EvaluationRecord {
        let predicted_answer = predicted.map(|s| s.to_string());
        let is_correct = EvaluationRecord::derive_correct(predicted, Some(correct));
        EvaluationRecord {
            key: QuestionKey {
                test: test.to_string(),
                year: None,
                session: None,
                number,
            },
            model: model.to_string(),
            detail: DetailLevel::Detailed,
            method: "cot".to_string(),
            predicted_answer,
            correct_answer: Some(correct.to_string()),
            is_correct,
            subject: None,
            is_law: None,
            input_tokens: None,
            output_tokens: None,
            response_time_secs: None,
        }
    }
}

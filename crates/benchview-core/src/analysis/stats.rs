//! Descriptive statistics over evaluation records
//!
//! Every function here is a pure aggregation: records in, report rows out,
//! sorted so repeated runs print identically.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::config::Config;
use crate::dataset::{DetailLevel, EvaluationRecord};
use crate::error::BenchError;

/// Per-model aggregate over all of its records
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    /// Model display name
    pub model: String,
    /// Number of distinct runs (test, detail, method combinations)
    pub runs: usize,
    /// Total questions answered
    pub questions: usize,
    /// Correct answers
    pub correct: usize,
    /// Overall accuracy
    pub accuracy: f64,
    /// Mean per-run accuracy
    pub run_accuracy_mean: f64,
    /// Best per-run accuracy
    pub run_accuracy_max: f64,
    /// Worst per-run accuracy
    pub run_accuracy_min: f64,
    /// Extraction failures (missing predicted answer)
    pub extraction_failures: usize,
}

/// Compute per-model summaries, sorted by model name.
pub fn model_summaries(records: &[EvaluationRecord]) -> Vec<ModelSummary> {
    struct Acc {
        runs: BTreeMap<(String, DetailLevel, String), (usize, usize)>,
        questions: usize,
        correct: usize,
        failures: usize,
    }

    let mut by_model: BTreeMap<&str, Acc> = BTreeMap::new();
    for record in records {
        let acc = by_model.entry(record.model.as_str()).or_insert(Acc {
            runs: BTreeMap::new(),
            questions: 0,
            correct: 0,
            failures: 0,
        });
        acc.questions += 1;
        if record.is_correct {
            acc.correct += 1;
        }
        if record.is_extraction_failure() {
            acc.failures += 1;
        }
        let run_key = (
            record.key.test.clone(),
            record.detail,
            record.method.clone(),
        );
        let run = acc.runs.entry(run_key).or_insert((0, 0));
        run.0 += 1;
        if record.is_correct {
            run.1 += 1;
        }
    }

    by_model
        .into_iter()
        .map(|(model, acc)| {
            let run_accuracies: Vec<f64> = acc
                .runs
                .values()
                .map(|(total, correct)| *correct as f64 / *total as f64)
                .collect();
            let mean = run_accuracies.iter().sum::<f64>() / run_accuracies.len() as f64;
            let max = run_accuracies.iter().cloned().fold(f64::MIN, f64::max);
            let min = run_accuracies.iter().cloned().fold(f64::MAX, f64::min);
            ModelSummary {
                model: model.to_string(),
                runs: acc.runs.len(),
                questions: acc.questions,
                correct: acc.correct,
                accuracy: acc.correct as f64 / acc.questions as f64,
                run_accuracy_mean: mean,
                run_accuracy_max: max,
                run_accuracy_min: min,
                extraction_failures: acc.failures,
            }
        })
        .collect()
}

/// Analytical dimension for accuracy breakdowns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    /// Subject classification from the test set
    Subject,
    /// Exam year
    Year,
    /// Exam session
    Session,
    /// Law vs non-law classification
    Law,
    /// Result file detail level
    Detail,
    /// Prompting method
    Method,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::Subject => "subject",
            Dimension::Year => "year",
            Dimension::Session => "session",
            Dimension::Law => "law",
            Dimension::Detail => "detail",
            Dimension::Method => "method",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Dimension {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "subject" => Ok(Dimension::Subject),
            "year" => Ok(Dimension::Year),
            "session" => Ok(Dimension::Session),
            "law" => Ok(Dimension::Law),
            "detail" => Ok(Dimension::Detail),
            "method" => Ok(Dimension::Method),
            other => Err(BenchError::invalid_value("dimension", other)),
        }
    }
}

impl Dimension {
    /// The row label a record contributes to under this dimension
    fn label_of(&self, record: &EvaluationRecord) -> String {
        match self {
            Dimension::Subject => record
                .subject
                .clone()
                .unwrap_or_else(|| "(unknown)".to_string()),
            Dimension::Year => record
                .key
                .year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "(unknown)".to_string()),
            Dimension::Session => record
                .key
                .session
                .clone()
                .unwrap_or_else(|| "(unknown)".to_string()),
            Dimension::Law => match record.is_law {
                Some(true) => "law".to_string(),
                Some(false) => "non-law".to_string(),
                None => "(unknown)".to_string(),
            },
            Dimension::Detail => record.detail.to_string(),
            Dimension::Method => record.method.clone(),
        }
    }
}

/// One cell of an accuracy pivot
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PivotCell {
    /// Questions counted into this cell
    pub questions: usize,
    /// Correct answers in this cell
    pub correct: usize,
    /// Cell accuracy
    pub accuracy: f64,
}

/// One row of an accuracy pivot: a dimension value across all models
#[derive(Debug, Clone, Serialize)]
pub struct PivotRow {
    /// Dimension value label
    pub label: String,
    /// One cell per model, in the pivot's model order
    pub cells: Vec<Option<PivotCell>>,
}

/// Accuracy pivot: rows = dimension values, columns = models
#[derive(Debug, Clone, Serialize)]
pub struct AccuracyPivot {
    /// The dimension rows are grouped by
    pub dimension: Dimension,
    /// Column order
    pub models: Vec<String>,
    /// Rows sorted by label
    pub rows: Vec<PivotRow>,
}

/// Break accuracy down by a dimension, one column per model.
pub fn accuracy_pivot(records: &[EvaluationRecord], dimension: Dimension) -> AccuracyPivot {
    let models: Vec<String> = records
        .iter()
        .map(|r| r.model.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut cells: BTreeMap<String, BTreeMap<&str, (usize, usize)>> = BTreeMap::new();
    for record in records {
        let label = dimension.label_of(record);
        let cell = cells
            .entry(label)
            .or_default()
            .entry(record.model.as_str())
            .or_insert((0, 0));
        cell.0 += 1;
        if record.is_correct {
            cell.1 += 1;
        }
    }

    let rows = cells
        .into_iter()
        .map(|(label, by_model)| PivotRow {
            cells: models
                .iter()
                .map(|model| {
                    by_model.get(model.as_str()).map(|(total, correct)| PivotCell {
                        questions: *total,
                        correct: *correct,
                        accuracy: *correct as f64 / *total as f64,
                    })
                })
                .collect(),
            label,
        })
        .collect();

    AccuracyPivot {
        dimension,
        models,
        rows,
    }
}

/// Token usage and estimated cost for one model
#[derive(Debug, Clone, Serialize)]
pub struct TokenUsage {
    /// Model display name
    pub model: String,
    /// Records carrying token counts
    pub records_with_tokens: usize,
    /// Total prompt tokens
    pub total_input_tokens: u64,
    /// Total completion tokens
    pub total_output_tokens: u64,
    /// Mean prompt tokens per record
    pub mean_input_tokens: f64,
    /// Mean completion tokens per record
    pub mean_output_tokens: f64,
    /// Estimated cost in USD, when pricing is configured for the model
    pub estimated_cost_usd: Option<f64>,
}

/// Aggregate token usage per model, sorted by model name.
pub fn token_usage(records: &[EvaluationRecord], config: &Config) -> Vec<TokenUsage> {
    let mut by_model: BTreeMap<&str, (usize, u64, u64)> = BTreeMap::new();
    for record in records {
        let (Some(input), Some(output)) = (record.input_tokens, record.output_tokens) else {
            continue;
        };
        let acc = by_model.entry(record.model.as_str()).or_insert((0, 0, 0));
        acc.0 += 1;
        acc.1 += input;
        acc.2 += output;
    }

    by_model
        .into_iter()
        .map(|(model, (count, input, output))| TokenUsage {
            model: model.to_string(),
            records_with_tokens: count,
            total_input_tokens: input,
            total_output_tokens: output,
            mean_input_tokens: input as f64 / count as f64,
            mean_output_tokens: output as f64 / count as f64,
            estimated_cost_usd: config.pricing_for(model).map(|p| p.cost(input, output)),
        })
        .collect()
}

/// Response-time aggregate for one model
#[derive(Debug, Clone, Serialize)]
pub struct TimingSummary {
    /// Model display name
    pub model: String,
    /// Records carrying a response time
    pub records_with_time: usize,
    /// Mean response time in seconds
    pub mean_secs: f64,
    /// Fastest response
    pub min_secs: f64,
    /// Slowest response
    pub max_secs: f64,
}

/// Aggregate response times per model, sorted by model name.
pub fn timing_summaries(records: &[EvaluationRecord]) -> Vec<TimingSummary> {
    let mut by_model: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for record in records {
        if let Some(secs) = record.response_time_secs {
            by_model.entry(record.model.as_str()).or_default().push(secs);
        }
    }

    by_model
        .into_iter()
        .map(|(model, times)| TimingSummary {
            model: model.to_string(),
            records_with_time: times.len(),
            mean_secs: times.iter().sum::<f64>() / times.len() as f64,
            min_secs: times.iter().cloned().fold(f64::MAX, f64::min),
            max_secs: times.iter().cloned().fold(f64::MIN, f64::max),
        })
        .collect()
}

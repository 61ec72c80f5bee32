//! Ensemble builder
//!
//! Combines the predictions of two or more real models into a synthetic
//! "ensemble model", restricted to the questions every constituent answered.
//! A question covered by only a subset of the constituents is dropped
//! entirely rather than credited to a partial ensemble.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dataset::{EvaluationRecord, QuestionKey};
use crate::error::{BenchError, Result};

/// How constituent votes are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VotingMethod {
    /// Most common answer wins
    Majority,
    /// Votes weighted by each constituent's overall accuracy
    Weighted,
}

impl fmt::Display for VotingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VotingMethod::Majority => write!(f, "majority"),
            VotingMethod::Weighted => write!(f, "weighted"),
        }
    }
}

impl FromStr for VotingMethod {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "majority" => Ok(VotingMethod::Majority),
            "weighted" => Ok(VotingMethod::Weighted),
            other => Err(BenchError::invalid_value("voting method", other)),
        }
    }
}

/// Definition of an ensemble: constituents plus a voting method
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleSpec {
    /// Display name for the synthetic model
    pub name: String,
    /// Constituent model names (two or more)
    pub constituents: Vec<String>,
    /// Vote combination method
    pub method: VotingMethod,
}

impl EnsembleSpec {
    /// Create a spec with a derived display name
    pub fn new(constituents: Vec<String>, method: VotingMethod, name: Option<String>) -> Self {
        let name = name.unwrap_or_else(|| format!("Ensemble-{}", method));
        Self {
            name,
            constituents,
            method,
        }
    }

    fn validate(&self) -> Result<()> {
        let distinct: BTreeSet<&str> = self.constituents.iter().map(String::as_str).collect();
        if distinct.len() < 2 {
            return Err(BenchError::InvalidEnsemble {
                reason: format!(
                    "needs at least 2 distinct constituent models, got {}",
                    distinct.len()
                ),
            });
        }
        Ok(())
    }
}

/// Build the synthetic records of an ensemble over a base record set.
///
/// Returns one record per question answered by every constituent; an empty
/// eligible set yields an empty result. The base set is untouched.
///
/// Ties are broken deterministically: among answers tied on count (majority)
/// or summed weight (weighted), the lexically smallest value wins.
pub fn build_ensemble(
    records: &[EvaluationRecord],
    spec: &EnsembleSpec,
) -> Result<Vec<EvaluationRecord>> {
    spec.validate()?;

    let constituents: BTreeSet<&str> = spec.constituents.iter().map(String::as_str).collect();

    // Accuracy weights over the whole base set, computed once up front
    let weights = match spec.method {
        VotingMethod::Majority => BTreeMap::new(),
        VotingMethod::Weighted => accuracy_weights(records, &constituents),
    };

    // One record per (question, model); a model's first record for a
    // question wins when several runs are loaded at once.
    let mut by_question: BTreeMap<&QuestionKey, BTreeMap<&str, &EvaluationRecord>> =
        BTreeMap::new();
    for record in records {
        if !constituents.contains(record.model.as_str()) {
            continue;
        }
        by_question
            .entry(&record.key)
            .or_default()
            .entry(record.model.as_str())
            .or_insert(record);
    }

    let mut out = Vec::new();
    for (key, votes) in by_question {
        // Intersection rule: every constituent must have answered
        if votes.len() != constituents.len() {
            continue;
        }

        let chosen = match spec.method {
            VotingMethod::Majority => majority_answer(&votes),
            VotingMethod::Weighted => weighted_answer(&votes, &weights),
        };

        let Some(sample) = votes.values().next() else {
            continue;
        };
        let is_correct = EvaluationRecord::derive_correct(
            chosen.as_deref(),
            sample.correct_answer.as_deref(),
        );

        out.push(EvaluationRecord {
            key: key.clone(),
            model: spec.name.clone(),
            detail: sample.detail,
            method: spec.method.to_string(),
            predicted_answer: chosen,
            correct_answer: sample.correct_answer.clone(),
            is_correct,
            subject: sample.subject.clone(),
            is_law: sample.is_law,
            input_tokens: None,
            output_tokens: None,
            response_time_secs: None,
        });
    }

    Ok(out)
}

/// Overall accuracy per constituent across all of its records in the base set
fn accuracy_weights<'a>(
    records: &'a [EvaluationRecord],
    constituents: &BTreeSet<&str>,
) -> BTreeMap<&'a str, f64> {
    let mut totals: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for record in records {
        if !constituents.contains(record.model.as_str()) {
            continue;
        }
        let entry = totals.entry(record.model.as_str()).or_insert((0, 0));
        entry.0 += 1;
        if record.is_correct {
            entry.1 += 1;
        }
    }
    totals
        .into_iter()
        .map(|(model, (total, correct))| (model, correct as f64 / total as f64))
        .collect()
}

fn majority_answer(votes: &BTreeMap<&str, &EvaluationRecord>) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in votes.values() {
        if let Some(answer) = record.predicted_answer.as_deref() {
            *counts.entry(answer).or_insert(0) += 1;
        }
    }
    // BTreeMap iterates answers in lexical order, so a strict comparison
    // leaves the smallest value in place on ties.
    let mut best: Option<(&str, usize)> = None;
    for (answer, count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((answer, count));
        }
    }
    best.map(|(answer, _)| answer.to_string())
}

fn weighted_answer(
    votes: &BTreeMap<&str, &EvaluationRecord>,
    weights: &BTreeMap<&str, f64>,
) -> Option<String> {
    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for (model, record) in votes {
        if let Some(answer) = record.predicted_answer.as_deref() {
            let weight = weights.get(model).copied().unwrap_or(0.0);
            *sums.entry(answer).or_insert(0.0) += weight;
        }
    }
    let mut best: Option<(&str, f64)> = None;
    for (answer, sum) in sums {
        if best.map_or(true, |(_, best_sum)| sum > best_sum) {
            best = Some((answer, sum));
        }
    }
    best.map(|(answer, _)| answer.to_string())
}

//! `benchview ensemble` - combine selected models into a synthetic ensemble
//!
//! Constituents come from repeated `--model` flags; the ensemble is built
//! over whatever records survive the other filters, so `--test` or `--year`
//! restrictions shape the base set the votes are drawn from.

use serde_json::json;

use benchview_core::analysis::ensemble::{build_ensemble, EnsembleSpec, VotingMethod};
use benchview_core::dataset::{Dataset, EvaluationRecord};
use benchview_core::error::{BenchError, Result};
use benchview_core::format::format_pct;

use crate::cli::{Cli, FilterArgs, OutputFormat};

use super::helpers::{filtered_records, require_records, Table};

pub fn execute(
    cli: &Cli,
    dataset: &Dataset,
    method: VotingMethod,
    name: Option<String>,
    show_records: bool,
    filter: &FilterArgs,
) -> Result<()> {
    require_records(cli, dataset)?;

    // Unknown constituent names are a data error before any voting happens
    let known = dataset.models();
    for model in &filter.model {
        if !known.contains(model.as_str()) {
            return Err(BenchError::not_found("model", model));
        }
    }

    let records = filtered_records(dataset, filter);
    let spec = EnsembleSpec::new(filter.model.clone(), method, name);
    let out = build_ensemble(&records, &spec)?;

    let correct = out.iter().filter(|r| r.is_correct).count();

    match cli.format {
        OutputFormat::Json => output_json(&spec, &out, correct, show_records)?,
        OutputFormat::Human => output_human(cli, dataset, &spec, &out, correct, show_records),
        OutputFormat::Records => output_records(&spec, &out, correct, show_records),
    }

    Ok(())
}

fn output_human(
    cli: &Cli,
    dataset: &Dataset,
    spec: &EnsembleSpec,
    out: &[EvaluationRecord],
    correct: usize,
    show_records: bool,
) {
    println!(
        "{} ({} vote of {})",
        spec.name,
        spec.method,
        spec.constituents.join(", ")
    );

    if out.is_empty() {
        if !cli.quiet {
            println!("No questions were answered by every constituent");
        }
        return;
    }

    println!(
        "questions: {}  correct: {}  accuracy: {}",
        out.len(),
        correct,
        format_pct(correct as f64 / out.len() as f64)
    );

    println!();
    println!("constituents:");
    for model in &spec.constituents {
        match dataset.accuracy_of(model) {
            Some(accuracy) => println!("  {} ({})", model, format_pct(accuracy)),
            None => println!("  {}", model),
        }
    }

    if show_records {
        println!();
        let mut table = Table::new(&["question", "predicted", "answer", "result"]);
        for record in out {
            table.row(vec![
                record.key.to_string(),
                record
                    .predicted_answer
                    .clone()
                    .unwrap_or_else(|| "-".to_string()),
                record
                    .correct_answer
                    .clone()
                    .unwrap_or_else(|| "-".to_string()),
                if record.is_correct { "ok" } else { "wrong" }.to_string(),
            ]);
        }
        table.print();
    }
}

fn output_json(
    spec: &EnsembleSpec,
    out: &[EvaluationRecord],
    correct: usize,
    show_records: bool,
) -> Result<()> {
    let accuracy = if out.is_empty() {
        None
    } else {
        Some(correct as f64 / out.len() as f64)
    };
    let mut value = json!({
        "ensemble": {
            "name": spec.name,
            "method": spec.method,
            "constituents": spec.constituents,
            "questions": out.len(),
            "correct": correct,
            "accuracy": accuracy,
        }
    });
    if show_records {
        value["records"] = json!(out);
    }
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn output_records(
    spec: &EnsembleSpec,
    out: &[EvaluationRecord],
    correct: usize,
    show_records: bool,
) {
    println!(
        "E {} method={} constituents={} questions={} correct={}",
        spec.name,
        spec.method,
        spec.constituents.join(","),
        out.len(),
        correct
    );
    if show_records {
        for record in out {
            println!(
                "Q {} predicted={} answer={} ok={}",
                record.key,
                record.predicted_answer.as_deref().unwrap_or("-"),
                record.correct_answer.as_deref().unwrap_or("-"),
                record.is_correct
            );
        }
    }
}

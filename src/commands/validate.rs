//! `benchview validate` - check the data directory and print a load summary
//!
//! The one-off sanity pass over the CSV layout: which test sets loaded, how
//! many questions each carries, and per-model result-file statistics.
//! Missing files are warnings, not errors.

use serde_json::json;

use benchview_core::analysis::stats::{model_summaries, ModelSummary};
use benchview_core::dataset::Dataset;
use benchview_core::error::Result;
use benchview_core::format::format_pct;

use crate::cli::{Cli, OutputFormat};

use super::helpers::Table;

pub fn execute(cli: &Cli, dataset: &Dataset) -> Result<()> {
    let summaries = model_summaries(&dataset.records);

    match cli.format {
        OutputFormat::Json => output_json(cli, dataset, &summaries)?,
        OutputFormat::Human => output_human(cli, dataset, &summaries),
        OutputFormat::Records => output_records(dataset, &summaries),
    }

    Ok(())
}

fn output_human(cli: &Cli, dataset: &Dataset, summaries: &[ModelSummary]) {
    if !cli.quiet {
        println!("Benchmark data validation: {}", cli.data_dir.display());
        println!();
    }

    println!("Test sets:");
    if dataset.test_sets.is_empty() {
        println!("  warning: no testset files found");
    }
    for test_set in dataset.test_sets.values() {
        let total = test_set.questions.len();
        let law = test_set.law_count();
        let law_pct = if total > 0 {
            law as f64 / total as f64
        } else {
            0.0
        };
        println!(
            "  {}: {} questions (law: {} / {}; subjects: {})",
            test_set.name,
            total,
            law,
            format_pct(law_pct),
            test_set.subjects().len()
        );
    }
    println!();

    println!("Results:");
    if summaries.is_empty() {
        println!("  warning: no result files found");
    } else {
        let mut table = Table::new(&[
            "model", "runs", "questions", "correct", "mean", "max", "min",
        ]);
        for s in summaries {
            table.row(vec![
                s.model.clone(),
                s.runs.to_string(),
                s.questions.to_string(),
                s.correct.to_string(),
                format_pct(s.run_accuracy_mean),
                format_pct(s.run_accuracy_max),
                format_pct(s.run_accuracy_min),
            ]);
        }
        table.print();
    }

    if !dataset.load_report.skipped.is_empty() {
        println!();
        println!("Skipped files:");
        for skipped in &dataset.load_report.skipped {
            println!("  {}: {}", skipped.path.display(), skipped.reason);
        }
    }
}

fn output_json(cli: &Cli, dataset: &Dataset, summaries: &[ModelSummary]) -> Result<()> {
    let test_sets: Vec<_> = dataset
        .test_sets
        .values()
        .map(|ts| {
            json!({
                "name": ts.name,
                "questions": ts.questions.len(),
                "law_questions": ts.law_count(),
                "subjects": ts.subjects().len(),
            })
        })
        .collect();

    let value = json!({
        "data_dir": cli.data_dir.display().to_string(),
        "test_sets": test_sets,
        "models": summaries,
        "skipped": dataset.load_report.skipped,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn output_records(dataset: &Dataset, summaries: &[ModelSummary]) {
    for test_set in dataset.test_sets.values() {
        println!(
            "T {} questions={} law={} subjects={}",
            test_set.name,
            test_set.questions.len(),
            test_set.law_count(),
            test_set.subjects().len()
        );
    }
    for s in summaries {
        println!(
            "M {} runs={} questions={} correct={} accuracy={:.4}",
            s.model, s.runs, s.questions, s.correct, s.accuracy
        );
    }
    for skipped in &dataset.load_report.skipped {
        println!("W {} {}", skipped.path.display(), skipped.reason);
    }
}

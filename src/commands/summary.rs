//! `benchview summary` - per-model accuracy summary

use serde_json::json;

use benchview_core::analysis::stats::{model_summaries, ModelSummary};
use benchview_core::dataset::Dataset;
use benchview_core::error::Result;
use benchview_core::format::format_pct;

use crate::cli::{Cli, FilterArgs, OutputFormat};

use super::helpers::{filtered_records, note_if_no_matches, require_records, Table};

pub fn execute(cli: &Cli, dataset: &Dataset, filter: &FilterArgs) -> Result<()> {
    require_records(cli, dataset)?;
    let records = filtered_records(dataset, filter);
    if note_if_no_matches(cli, &records) {
        return Ok(());
    }

    let summaries = model_summaries(&records);

    match cli.format {
        OutputFormat::Json => {
            let value = json!({ "models": summaries });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Human => output_human(&summaries),
        OutputFormat::Records => output_records(&summaries),
    }

    Ok(())
}

fn output_human(summaries: &[ModelSummary]) {
    let mut table = Table::new(&[
        "model",
        "runs",
        "questions",
        "correct",
        "accuracy",
        "failures",
    ]);
    for s in summaries {
        table.row(vec![
            s.model.clone(),
            s.runs.to_string(),
            s.questions.to_string(),
            s.correct.to_string(),
            format_pct(s.accuracy),
            s.extraction_failures.to_string(),
        ]);
    }
    table.print();
}

fn output_records(summaries: &[ModelSummary]) {
    for s in summaries {
        println!(
            "M {} runs={} questions={} correct={} accuracy={:.4} failures={}",
            s.model, s.runs, s.questions, s.correct, s.accuracy, s.extraction_failures
        );
    }
}

//! `benchview wrong-answers` - questions where wrong models agree
//!
//! A question is reported when enough models got it wrong and at least half
//! of the wrong ones picked the same wrong answer. Complete agreement
//! (ratio 1.0) and partial agreement are the two buckets of the same report.

use serde_json::json;

use benchview_core::analysis::wrong_answers::{
    analyze_wrong_answers, WrongAnswerOptions, WrongAnswerPattern,
};
use benchview_core::dataset::Dataset;
use benchview_core::error::Result;
use benchview_core::format::format_pct;

use crate::cli::{Cli, FilterArgs, OutputFormat};

use super::helpers::{filtered_records, note_if_no_matches, require_records, Table};

#[allow(clippy::too_many_arguments)]
pub fn execute(
    cli: &Cli,
    dataset: &Dataset,
    min_incorrect_rate: f64,
    min_incorrect_count: usize,
    complete_only: bool,
    partial_only: bool,
    filter: &FilterArgs,
) -> Result<()> {
    require_records(cli, dataset)?;
    let records = filtered_records(dataset, filter);
    if note_if_no_matches(cli, &records) {
        return Ok(());
    }

    let options = WrongAnswerOptions {
        min_incorrect_rate,
        min_incorrect_count,
    };
    let mut rows = analyze_wrong_answers(&records, &options);
    if complete_only {
        rows.retain(|r| r.is_complete());
    } else if partial_only {
        rows.retain(|r| !r.is_complete());
    }

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "patterns": rows }))?);
        }
        OutputFormat::Human => output_human(cli, &rows),
        OutputFormat::Records => output_records(&rows),
    }

    Ok(())
}

fn output_human(cli: &Cli, rows: &[WrongAnswerPattern]) {
    if rows.is_empty() {
        if !cli.quiet {
            println!("No common wrong-answer patterns found");
        }
        return;
    }

    let complete = rows.iter().filter(|r| r.is_complete()).count();
    println!(
        "{} patterns ({} complete, {} partial)",
        rows.len(),
        complete,
        rows.len() - complete
    );
    println!();

    let mut table = Table::new(&[
        "question",
        "incorrect",
        "answer",
        "agreement",
        "ratio",
        "models",
    ]);
    for row in rows {
        let mut ratio = format!("{:.2}", row.consistency_ratio);
        if row.flagged {
            ratio.push_str(" (!)");
        }
        table.row(vec![
            row.key.to_string(),
            format_pct(row.incorrect_rate),
            row.modal_wrong_answer.clone(),
            format!("{}/{}", row.modal_count, row.total_incorrect),
            ratio,
            row.models.join(", "),
        ]);
    }
    table.print();

    if rows.iter().any(|r| r.flagged) {
        println!();
        println!("(!) ratio clamped to 1.0; check the data for duplicate runs");
    }
}

fn output_records(rows: &[WrongAnswerPattern]) {
    for row in rows {
        println!(
            "P {} rate={:.4} answer={} agreement={}/{} ratio={:.4} models={}{}",
            row.key,
            row.incorrect_rate,
            row.modal_wrong_answer,
            row.modal_count,
            row.total_incorrect,
            row.consistency_ratio,
            row.models.join(","),
            if row.flagged { " flagged" } else { "" }
        );
    }
}

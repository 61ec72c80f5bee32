//! `benchview timing` - response-time summary per model

use serde_json::json;

use benchview_core::analysis::stats::{timing_summaries, TimingSummary};
use benchview_core::dataset::Dataset;
use benchview_core::error::Result;

use crate::cli::{Cli, FilterArgs, OutputFormat};

use super::helpers::{filtered_records, note_if_no_matches, require_records, Table};

pub fn execute(cli: &Cli, dataset: &Dataset, filter: &FilterArgs) -> Result<()> {
    require_records(cli, dataset)?;
    let records = filtered_records(dataset, filter);
    if note_if_no_matches(cli, &records) {
        return Ok(());
    }

    let timing = timing_summaries(&records);
    if timing.is_empty() {
        if !cli.quiet {
            println!("No records carry response times");
        }
        return Ok(());
    }

    match cli.format {
        OutputFormat::Json => {
            let value = json!({ "models": timing });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Human => output_human(&timing),
        OutputFormat::Records => output_records(&timing),
    }

    Ok(())
}

fn output_human(timing: &[TimingSummary]) {
    let mut table = Table::new(&["model", "records", "mean (s)", "min (s)", "max (s)"]);
    for t in timing {
        table.row(vec![
            t.model.clone(),
            t.records_with_time.to_string(),
            format!("{:.2}", t.mean_secs),
            format!("{:.2}", t.min_secs),
            format!("{:.2}", t.max_secs),
        ]);
    }
    table.print();
}

fn output_records(timing: &[TimingSummary]) {
    for t in timing {
        println!(
            "R {} records={} mean={:.3} min={:.3} max={:.3}",
            t.model, t.records_with_time, t.mean_secs, t.min_secs, t.max_secs
        );
    }
}

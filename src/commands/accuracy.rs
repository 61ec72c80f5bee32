//! `benchview accuracy` - accuracy broken down by an analytical dimension

use serde_json::json;

use benchview_core::analysis::stats::{accuracy_pivot, AccuracyPivot, Dimension};
use benchview_core::dataset::Dataset;
use benchview_core::error::Result;
use benchview_core::format::format_pct;

use crate::cli::{Cli, FilterArgs, OutputFormat};

use super::helpers::{filtered_records, note_if_no_matches, require_records, Table};

pub fn execute(cli: &Cli, dataset: &Dataset, by: Dimension, filter: &FilterArgs) -> Result<()> {
    require_records(cli, dataset)?;
    let records = filtered_records(dataset, filter);
    if note_if_no_matches(cli, &records) {
        return Ok(());
    }

    let pivot = accuracy_pivot(&records, by);

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!(pivot))?);
        }
        OutputFormat::Human => output_human(&pivot),
        OutputFormat::Records => output_records(&pivot),
    }

    Ok(())
}

fn output_human(pivot: &AccuracyPivot) {
    let mut headers: Vec<&str> = vec![];
    let dimension = pivot.dimension.to_string();
    headers.push(&dimension);
    for model in &pivot.models {
        headers.push(model);
    }
    let mut table = Table::new(&headers);

    for row in &pivot.rows {
        let mut cells = vec![row.label.clone()];
        for cell in &row.cells {
            cells.push(match cell {
                Some(c) => format!("{} ({}/{})", format_pct(c.accuracy), c.correct, c.questions),
                None => "-".to_string(),
            });
        }
        table.row(cells);
    }
    table.print();
}

fn output_records(pivot: &AccuracyPivot) {
    for row in &pivot.rows {
        for (model, cell) in pivot.models.iter().zip(&row.cells) {
            if let Some(c) = cell {
                println!(
                    "A {} {} \"{}\" questions={} correct={} accuracy={:.4}",
                    pivot.dimension,
                    model,
                    benchview_core::format::escape_quotes(&row.label),
                    c.questions,
                    c.correct,
                    c.accuracy
                );
            }
        }
    }
}

//! Shared helpers for command implementations

use benchview_core::dataset::{Dataset, EvaluationRecord};
use benchview_core::error::{BenchError, Result};

use crate::cli::{Cli, FilterArgs};

/// Apply CLI filters to the dataset, cloning the surviving records.
pub fn filtered_records(dataset: &Dataset, filter: &FilterArgs) -> Vec<EvaluationRecord> {
    let spec = filter.to_spec();
    dataset
        .records
        .iter()
        .filter(|r| spec.matches(r))
        .cloned()
        .collect()
}

/// Fail with a data error when the load produced no records at all.
pub fn require_records(cli: &Cli, dataset: &Dataset) -> Result<()> {
    if dataset.is_empty() {
        return Err(BenchError::EmptyDataDir {
            path: cli.data_dir.clone(),
        });
    }
    Ok(())
}

/// Print a note when filters matched nothing; returns true if empty.
pub fn note_if_no_matches(cli: &Cli, records: &[EvaluationRecord]) -> bool {
    if records.is_empty() {
        if !cli.quiet {
            println!("No records match the current filters");
        }
        return true;
    }
    false
}

/// Plain-text table with aligned columns for human output
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn print(&self) {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }

        let header_line: Vec<String> = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{:<width$}", h, width = widths[i]))
            .collect();
        println!("{}", header_line.join("  "));

        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        println!("{}", rule.join("  "));

        for row in &self.rows {
            let line: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    let width = widths.get(i).copied().unwrap_or(0);
                    format!("{:<width$}", cell, width = width)
                })
                .collect();
            println!("{}", line.join("  ").trim_end());
        }
    }
}

//! `benchview tokens` - token usage and estimated cost per model

use serde_json::json;

use benchview_core::analysis::stats::{token_usage, TokenUsage};
use benchview_core::config::Config;
use benchview_core::dataset::Dataset;
use benchview_core::error::Result;

use crate::cli::{Cli, FilterArgs, OutputFormat};

use super::helpers::{filtered_records, note_if_no_matches, require_records, Table};

pub fn execute(cli: &Cli, dataset: &Dataset, config: &Config, filter: &FilterArgs) -> Result<()> {
    require_records(cli, dataset)?;
    let records = filtered_records(dataset, filter);
    if note_if_no_matches(cli, &records) {
        return Ok(());
    }

    let usage = token_usage(&records, config);
    if usage.is_empty() {
        if !cli.quiet {
            println!("No records carry token counts");
        }
        return Ok(());
    }

    match cli.format {
        OutputFormat::Json => {
            let value = json!({ "models": usage });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Human => output_human(&usage),
        OutputFormat::Records => output_records(&usage),
    }

    Ok(())
}

fn output_human(usage: &[TokenUsage]) {
    let mut table = Table::new(&[
        "model",
        "records",
        "input",
        "output",
        "mean in",
        "mean out",
        "est. cost",
    ]);
    for u in usage {
        let cost = match u.estimated_cost_usd {
            Some(c) => format!("${:.2}", c),
            None => "-".to_string(),
        };
        table.row(vec![
            u.model.clone(),
            u.records_with_tokens.to_string(),
            u.total_input_tokens.to_string(),
            u.total_output_tokens.to_string(),
            format!("{:.0}", u.mean_input_tokens),
            format!("{:.0}", u.mean_output_tokens),
            cost,
        ]);
    }
    table.print();
}

fn output_records(usage: &[TokenUsage]) {
    for u in usage {
        let cost = match u.estimated_cost_usd {
            Some(c) => format!(" cost={:.4}", c),
            None => String::new(),
        };
        println!(
            "K {} records={} input={} output={}{}",
            u.model, u.records_with_tokens, u.total_input_tokens, u.total_output_tokens, cost
        );
    }
}

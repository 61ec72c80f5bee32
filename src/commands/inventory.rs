//! `benchview models` / `benchview tests` - inventory listings

use serde_json::json;

use benchview_core::dataset::Dataset;
use benchview_core::error::Result;
use benchview_core::format::format_pct;

use crate::cli::{Cli, OutputFormat};

pub fn execute_models(cli: &Cli, dataset: &Dataset) -> Result<()> {
    let models: Vec<&str> = dataset.models().into_iter().collect();

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "models": models }))?);
        }
        OutputFormat::Human => {
            if models.is_empty() {
                if !cli.quiet {
                    println!("No models loaded");
                }
                return Ok(());
            }
            for model in models {
                match dataset.accuracy_of(model) {
                    Some(accuracy) => println!("{} ({})", model, format_pct(accuracy)),
                    None => println!("{}", model),
                }
            }
        }
        OutputFormat::Records => {
            for model in models {
                println!("M {}", model);
            }
        }
    }

    Ok(())
}

pub fn execute_tests(cli: &Cli, dataset: &Dataset) -> Result<()> {
    match cli.format {
        OutputFormat::Json => {
            let tests: Vec<_> = dataset
                .test_sets
                .values()
                .map(|ts| {
                    json!({
                        "name": ts.name,
                        "questions": ts.questions.len(),
                        "law_questions": ts.law_count(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&json!({ "tests": tests }))?);
        }
        OutputFormat::Human => {
            if dataset.test_sets.is_empty() {
                if !cli.quiet {
                    println!("No test sets loaded");
                }
                return Ok(());
            }
            for test_set in dataset.test_sets.values() {
                println!(
                    "{} ({} questions, {} law)",
                    test_set.name,
                    test_set.questions.len(),
                    test_set.law_count()
                );
            }
        }
        OutputFormat::Records => {
            for test_set in dataset.test_sets.values() {
                println!(
                    "T {} questions={} law={}",
                    test_set.name,
                    test_set.questions.len(),
                    test_set.law_count()
                );
            }
        }
    }

    Ok(())
}

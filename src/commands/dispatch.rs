//! Command dispatch logic for benchview

use std::time::Instant;

use tracing::debug;

use benchview_core::config::Config;
use benchview_core::error::Result;
use benchview_core::ingest;

use crate::cli::{Cli, Commands};

use super::{
    accuracy, ensemble, inventory, summary, timing, tokens, validate, wrong_answers,
};

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let config = Config::resolve(cli.config.as_deref(), &cli.data_dir)?;
    debug!(elapsed = ?start.elapsed(), "resolve_config");

    let dataset = ingest::load_dataset(&cli.data_dir, &config)?;
    debug!(
        elapsed = ?start.elapsed(),
        records = dataset.records.len(),
        test_sets = dataset.test_sets.len(),
        "load_dataset"
    );

    match &cli.command {
        Commands::Validate => validate::execute(cli, &dataset),
        Commands::Summary { filter } => summary::execute(cli, &dataset, filter),
        Commands::Accuracy { by, filter } => accuracy::execute(cli, &dataset, *by, filter),
        Commands::Tokens { filter } => tokens::execute(cli, &dataset, &config, filter),
        Commands::Timing { filter } => timing::execute(cli, &dataset, filter),
        Commands::Models => inventory::execute_models(cli, &dataset),
        Commands::Tests => inventory::execute_tests(cli, &dataset),
        Commands::Ensemble {
            method,
            name,
            records,
            filter,
        } => ensemble::execute(cli, &dataset, *method, name.clone(), *records, filter),
        Commands::WrongAnswers {
            min_incorrect_rate,
            min_incorrect_count,
            complete_only,
            partial_only,
            filter,
        } => wrong_answers::execute(
            cli,
            &dataset,
            *min_incorrect_rate,
            *min_incorrect_count,
            *complete_only,
            *partial_only,
            filter,
        ),
    }
}

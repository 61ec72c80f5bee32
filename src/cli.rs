//! CLI argument parsing for benchview
//!
//! Supports global flags: --data-dir, --config, --format, --quiet, --verbose

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub use benchview_core::format::OutputFormat;

use benchview_core::analysis::ensemble::VotingMethod;
use benchview_core::analysis::stats::Dimension;
use benchview_core::dataset::filter::FilterSpec;
use benchview_core::dataset::DetailLevel;

/// Benchview - LLM benchmark result analyzer
#[derive(Parser, Debug)]
#[command(name = "benchview")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory containing testset and result CSV files
    #[arg(long, global = true, default_value = ".")]
    pub data_dir: PathBuf,

    /// Explicit configuration file path (default: <data-dir>/benchview.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (human, json, or records)
    #[arg(long, global = true, value_parser = parse_format, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Report timing for major phases
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Explicit log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check the data directory and print a load summary
    Validate,

    /// Per-model accuracy summary
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Accuracy broken down by an analytical dimension
    Accuracy {
        /// Dimension to group by (subject, year, session, law, detail, method)
        #[arg(long, value_parser = parse_dimension)]
        by: Dimension,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Token usage and estimated cost per model
    Tokens {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Response-time summary per model
    Timing {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// List loaded models
    Models,

    /// List loaded test sets
    Tests,

    /// Combine selected models into a synthetic ensemble
    Ensemble {
        /// Voting method
        #[arg(long, value_parser = parse_method, default_value = "majority")]
        method: VotingMethod,

        /// Display name for the ensemble
        #[arg(long)]
        name: Option<String>,

        /// Print the per-question ensemble records
        #[arg(long)]
        records: bool,

        /// Constituents are selected with repeated --model flags
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Questions where the wrong models agree on the same wrong answer
    WrongAnswers {
        /// Minimum incorrect rate for a question to be reported
        #[arg(long, default_value_t = 0.5)]
        min_incorrect_rate: f64,

        /// Minimum number of incorrect records for a question to be reported
        #[arg(long, default_value_t = 2)]
        min_incorrect_count: usize,

        /// Only questions where every wrong model agreed
        #[arg(long, conflicts_with = "partial_only")]
        complete_only: bool,

        /// Only questions with partial agreement
        #[arg(long)]
        partial_only: bool,

        #[command(flatten)]
        filter: FilterArgs,
    },
}

/// Record filters shared by the reporting commands
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Restrict to a test set (can be specified multiple times)
    #[arg(long, action = clap::ArgAction::Append)]
    pub test: Vec<String>,

    /// Restrict to a model (can be specified multiple times)
    #[arg(long, action = clap::ArgAction::Append)]
    pub model: Vec<String>,

    /// Restrict to a subject (can be specified multiple times)
    #[arg(long, action = clap::ArgAction::Append)]
    pub subject: Vec<String>,

    /// Restrict to an exam year (can be specified multiple times)
    #[arg(long, action = clap::ArgAction::Append)]
    pub year: Vec<i32>,

    /// Restrict to an exam session (can be specified multiple times)
    #[arg(long, action = clap::ArgAction::Append)]
    pub session: Vec<String>,

    /// Restrict to a prompting method (can be specified multiple times)
    #[arg(long, action = clap::ArgAction::Append)]
    pub method: Vec<String>,

    /// Restrict to a detail level (detailed or summary)
    #[arg(long, value_parser = parse_detail)]
    pub detail: Option<DetailLevel>,

    /// Only law-classified questions
    #[arg(long, conflicts_with = "non_law")]
    pub law: bool,

    /// Only non-law questions
    #[arg(long)]
    pub non_law: bool,
}

impl FilterArgs {
    /// Convert CLI filter flags into an explicit filter value
    pub fn to_spec(&self) -> FilterSpec {
        let law = match (self.law, self.non_law) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        FilterSpec::new()
            .with_tests(self.test.clone())
            .with_models(self.model.clone())
            .with_subjects(self.subject.clone())
            .with_years(self.year.clone())
            .with_sessions(self.session.clone())
            .with_methods(self.method.clone())
            .with_detail(self.detail)
            .with_law(law)
    }
}

/// Parse a dimension from string
fn parse_dimension(s: &str) -> Result<Dimension, String> {
    s.parse::<Dimension>().map_err(|e| e.to_string())
}

/// Parse a voting method from string
fn parse_method(s: &str) -> Result<VotingMethod, String> {
    s.parse::<VotingMethod>().map_err(|e| e.to_string())
}

/// Parse a detail level from string
fn parse_detail(s: &str) -> Result<DetailLevel, String> {
    s.parse::<DetailLevel>().map_err(|e| e.to_string())
}

/// Parse an output format from string
fn parse_format(s: &str) -> Result<OutputFormat, String> {
    s.parse::<OutputFormat>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cli_help() {
        let result = Cli::try_parse_from(["benchview", "--help"]);
        assert!(result.is_err()); // --help exits
    }

    #[test]
    fn test_parse_validate() {
        let cli = Cli::try_parse_from(["benchview", "validate"]).unwrap();
        assert!(matches!(cli.command, Commands::Validate));
    }

    #[test]
    fn test_parse_summary_with_filters() {
        let cli = Cli::try_parse_from([
            "benchview",
            "summary",
            "--model",
            "GPT-4o",
            "--model",
            "Claude-3.5-Sonnet",
            "--law",
        ])
        .unwrap();
        if let Commands::Summary { filter } = cli.command {
            assert_eq!(filter.model, vec!["GPT-4o", "Claude-3.5-Sonnet"]);
            let spec = filter.to_spec();
            assert_eq!(spec.law, Some(true));
        } else {
            panic!("Expected Summary command");
        }
    }

    #[test]
    fn test_parse_accuracy_dimension() {
        let cli = Cli::try_parse_from(["benchview", "accuracy", "--by", "subject"]).unwrap();
        if let Commands::Accuracy { by, .. } = cli.command {
            assert_eq!(by, Dimension::Subject);
        } else {
            panic!("Expected Accuracy command");
        }
    }

    #[test]
    fn test_parse_accuracy_rejects_unknown_dimension() {
        let result = Cli::try_parse_from(["benchview", "accuracy", "--by", "difficulty"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_ensemble() {
        let cli = Cli::try_parse_from([
            "benchview",
            "ensemble",
            "--model",
            "M1",
            "--model",
            "M2",
            "--method",
            "weighted",
        ])
        .unwrap();
        if let Commands::Ensemble { method, filter, .. } = cli.command {
            assert_eq!(method, VotingMethod::Weighted);
            assert_eq!(filter.model.len(), 2);
        } else {
            panic!("Expected Ensemble command");
        }
    }

    #[test]
    fn test_parse_wrong_answers_defaults() {
        let cli = Cli::try_parse_from(["benchview", "wrong-answers"]).unwrap();
        if let Commands::WrongAnswers {
            min_incorrect_rate,
            min_incorrect_count,
            ..
        } = cli.command
        {
            assert!((min_incorrect_rate - 0.5).abs() < 1e-9);
            assert_eq!(min_incorrect_count, 2);
        } else {
            panic!("Expected WrongAnswers command");
        }
    }

    #[test]
    fn test_law_conflicts_with_non_law() {
        let result = Cli::try_parse_from(["benchview", "summary", "--law", "--non-law"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_format() {
        let cli = Cli::try_parse_from(["benchview", "--format", "json", "models"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
    }
}

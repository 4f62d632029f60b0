//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for run results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every model's answer, then the aggregated answer
    Full,
    /// Only the aggregated (or merged) answer
    Aggregated,
    /// JSON output
    Json,
}

impl From<OutputFormat> for moa_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => moa_domain::OutputFormat::Full,
            OutputFormat::Aggregated => moa_domain::OutputFormat::Aggregated,
            OutputFormat::Json => moa_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for moa
#[derive(Parser, Debug)]
#[command(name = "moa")]
#[command(author, version, about = "Mixture of Agents - fan a prompt out to several models and combine the answers")]
#[command(long_about = r#"
moa sends one prompt to several configured models and combines their answers.

Strategies:
  parallel     every model answers the same prompt concurrently
  sequential   each model refines the previous model's answer
  voting       a parallel run judged by an aggregator model (ad-hoc configs)
  specialized  each role answers with its own instructions (ad-hoc configs)

Saved scenarios support parallel and sequential, with optional aggregation.

Configuration files are loaded from (in priority order):
1. MOA_* environment variables
2. --config <path>             Explicit config file
3. ./moa.toml                  Project-level config
4. ~/.config/moa/config.toml   Global config

Example:
  moa new "Code Review"
  moa run "Code Review" "Review this function for bugs: ..."
  moa run-file voting.json "Which sorting algorithm fits nearly sorted data?"
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format (defaults to [output] format from config, else full)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a saved scenario
    Run {
        /// Scenario name
        scenario: String,
        /// Prompt sent to the models
        prompt: String,
    },

    /// Run an ad-hoc MOA config (any strategy) from a JSON file
    RunFile {
        /// Path to an ad-hoc config JSON document
        path: PathBuf,
        /// Prompt sent to the models
        prompt: String,
    },

    /// Run several saved scenarios one after another
    RunMany {
        /// Prompt sent to every scenario
        prompt: String,
        /// Scenario names (at least one)
        #[arg(required = true, num_args = 1..)]
        scenarios: Vec<String>,
    },

    /// List saved scenarios
    List,

    /// Show a saved scenario
    Show {
        name: String,
    },

    /// Create a scenario from the default template
    New {
        name: String,
    },

    /// Validate a scenario JSON file without saving it
    Validate {
        path: PathBuf,
    },

    /// Import a scenario JSON file
    Import {
        path: PathBuf,
    },

    /// Export a saved scenario as JSON
    Export {
        name: String,
        /// Output file (defaults to the suggested file name; "-" for stdout)
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },

    /// Delete a saved scenario
    Delete {
        name: String,
    },

    /// Run a scenario and compare the answers heuristically
    Compare {
        scenario: String,
        prompt: String,
    },

    /// Show configuration sources and warnings
    Config,
}

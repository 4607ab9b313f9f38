// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! exportbench CLI
//!
//! Benchmarks a document export tool in two export modes and reports the
//! difference in CPU time and peak memory.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use exportbench_core::{
    BenchConfig, BenchResult, ConfigLoader, ConfigOverrides, DEFAULT_CONFIG_FILE,
};

mod commands;

/// exportbench - resource usage comparison of document export modes
#[derive(Parser)]
#[command(name = "exportbench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path [default: exportbench.yaml if present]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the benchmark and write the reports
    Run {
        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// List the documents a run would benchmark
    List {
        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// Validate the configuration and print the effective settings
    Validate {
        #[command(flatten)]
        overrides: OverrideArgs,
    },
}

/// Settings that take precedence over the configuration file.
#[derive(Args, Default)]
pub struct OverrideArgs {
    /// Directory containing the documents
    #[arg(long)]
    pub docs: Option<PathBuf>,

    /// Directory for results.csv and summary.json
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to the export tool
    #[arg(long)]
    pub tool: Option<PathBuf>,

    /// Runs per document and mode
    #[arg(short, long)]
    pub repeats: Option<u32>,

    /// Filename suffix of documents
    #[arg(long)]
    pub extension: Option<String>,

    /// Kill an export after this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Command interpreter for the export command line
    #[arg(long)]
    pub shell: Option<PathBuf>,

    /// Skip writing summary.json
    #[arg(long)]
    pub no_summary: bool,
}

impl From<OverrideArgs> for ConfigOverrides {
    fn from(args: OverrideArgs) -> Self {
        Self {
            documents_dir: args.docs,
            output_dir: args.output,
            extension: args.extension,
            tool_path: args.tool,
            shell: args.shell,
            repeats: args.repeats,
            timeout_secs: args.timeout_secs,
            disable_summary: args.no_summary,
        }
    }
}

/// Load the effective configuration.
///
/// An explicit `--config` must exist; the default file is optional.
fn load_config(path: Option<&Path>, overrides: OverrideArgs) -> BenchResult<BenchConfig> {
    let overrides = ConfigOverrides::from(overrides);
    let default_path = Path::new(DEFAULT_CONFIG_FILE);

    let path = match path {
        Some(path) => Some(path),
        None if default_path.exists() => Some(default_path),
        None => None,
    };

    ConfigLoader::resolve(path, &overrides)
}

fn dispatch(cli: Cli) -> BenchResult<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Run { overrides } => {
            let config = load_config(config_path, overrides)?;
            commands::run::execute(&config)
        }
        Commands::List { overrides } => {
            let config = load_config(config_path, overrides)?;
            commands::list::execute(&config)
        }
        Commands::Validate { overrides } => {
            let config = load_config(config_path, overrides)?;
            commands::validate::execute(&config)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    match dispatch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Benchmark aborted");
            eprintln!("✗ {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_overrides_parse() {
        let cli = Cli::try_parse_from([
            "exportbench",
            "run",
            "--docs",
            "corpus",
            "--repeats",
            "3",
            "--no-summary",
        ])
        .unwrap();

        let Commands::Run { overrides } = cli.command else {
            panic!("expected run");
        };
        let overrides = ConfigOverrides::from(overrides);
        assert_eq!(overrides.documents_dir, Some(PathBuf::from("corpus")));
        assert_eq!(overrides.repeats, Some(3));
        assert!(overrides.disable_summary);
    }

    #[test]
    fn test_explicit_missing_config_is_config_error() {
        let result = load_config(
            Some(Path::new("/nonexistent/exportbench.yaml")),
            OverrideArgs::default(),
        );
        let err = result.unwrap_err();
        assert_eq!(err.exit_code(), exportbench_core::error::EXIT_CONFIG);
    }

    #[test]
    fn test_invalid_override_is_config_error() {
        let overrides = OverrideArgs {
            repeats: Some(0),
            ..Default::default()
        };
        let err = load_config(None, overrides).unwrap_err();
        assert_eq!(err.exit_code(), exportbench_core::error::EXIT_CONFIG);
    }
}

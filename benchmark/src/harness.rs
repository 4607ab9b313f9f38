// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Benchmark driver.
//!
//! For each document and each export mode, runs the export tool a fixed number
//! of times, every run writing into its own temporary output directory.
//! Everything is sequential: one tool invocation at a time.

use std::path::{Path, PathBuf};

use exportbench_core::{
    list_documents, BenchConfig, BenchResult, CommandLine, ExportMode, Measurement,
    ProcessRunner,
};

use crate::metrics::{ResultTable, RunSet};

/// Prefix of the per-run temporary output directories.
pub const TEMP_DIR_PREFIX: &str = "load_test-";

/// Drives repeated exports through a [`ProcessRunner`].
pub struct BenchmarkHarness<R> {
    runner: R,
    tool: PathBuf,
    modes: Vec<ExportMode>,
    iterations: u32,
    temp_root: PathBuf,
}

impl<R: ProcessRunner> BenchmarkHarness<R> {
    /// Create a harness for `tool` with the baseline and candidate modes of
    /// `config`.
    pub fn new(runner: R, config: &BenchConfig) -> Self {
        Self {
            runner,
            tool: config.tool_path.clone(),
            modes: config.modes().into_iter().cloned().collect(),
            iterations: config.repeats.value(),
            temp_root: std::env::temp_dir(),
        }
    }

    /// Set the number of runs per (document, mode) pair.
    pub fn iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Create temporary output directories under `dir` instead of the
    /// system temp directory.
    pub fn temp_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_root = dir.into();
        self
    }

    /// Benchmark every document, in the given order.
    pub fn run(&self, documents: &[PathBuf]) -> ResultTable {
        let mut table = ResultTable::new();

        for document in documents {
            tracing::info!(document = %document.display(), "Benchmarking document");
            table.insert(document.clone(), self.run_document(document));
        }

        table
    }

    /// All modes for one document, baseline first.
    pub fn run_document(&self, document: &Path) -> Vec<RunSet> {
        self.modes
            .iter()
            .map(|mode| self.run_mode(document, mode))
            .collect()
    }

    /// Every repeat of one mode for one document.
    pub fn run_mode(&self, document: &Path, mode: &ExportMode) -> RunSet {
        let measurements = (0..self.iterations)
            .map(|_| self.run_once(document, mode))
            .collect();

        RunSet::new(mode.label.clone(), measurements)
    }

    /// A single export into a fresh temporary directory.
    ///
    /// Always yields a measurement; problems are printed and recorded in its
    /// outcome. The directory is removed afterwards, ignoring failures.
    pub fn run_once(&self, document: &Path, mode: &ExportMode) -> Measurement {
        let output_dir = match tempfile::Builder::new()
            .prefix(TEMP_DIR_PREFIX)
            .tempdir_in(&self.temp_root)
        {
            Ok(dir) => dir,
            Err(e) => {
                println!("Failed to create temp dir: {}", e);
                return Measurement::launch_failed(format!("cannot create temp dir: {}", e));
            }
        };

        let command = match CommandLine::build(&self.tool, mode, document, output_dir.path()) {
            Ok(command) => command,
            Err(e) => {
                println!("Failed: {}", e);
                let _ = output_dir.close();
                return Measurement::launch_failed(e.to_string());
            }
        };

        println!("Executing: {}", command);
        let measurement = self.runner.run(&command);
        if !measurement.succeeded() {
            println!("Failed: {}", measurement.outcome);
        }

        let _ = output_dir.close();
        measurement
    }
}

/// List the configured documents and benchmark all of them.
///
/// Only an unreadable documents directory is an error.
pub fn run_benchmark<R: ProcessRunner>(
    config: &BenchConfig,
    runner: R,
) -> BenchResult<ResultTable> {
    let documents = list_documents(&config.documents_dir, &config.extension)?;
    let harness = BenchmarkHarness::new(runner, config);
    Ok(harness.run(&documents))
}

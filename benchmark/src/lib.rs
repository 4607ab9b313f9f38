// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! exportbench benchmarking
//!
//! Runs an external export tool over a corpus of documents in two export
//! modes and compares what each mode costs.
//!
//! # Pipeline
//!
//! - **Harness**: lists documents, runs every (document, mode) pair a fixed
//!   number of times and collects a [`ResultTable`]
//! - **Metrics**: truncating averages per mode and percentage deltas of the
//!   candidate mode against the baseline
//! - **Reporter**: console table, raw CSV and JSON summary
//!
//! # Data Output
//!
//! `results.csv` holds one row per raw measurement; `summary.json` holds the
//! averages, comparisons and failure counts.

pub mod harness;
pub mod metrics;
pub mod reporter;

pub use harness::{run_benchmark, BenchmarkHarness};
pub use metrics::{
    summarize, Average, BenchmarkSummary, Comparison, ComparisonError, DocumentSummary,
    ResultTable, RunSet, SystemInfo,
};
pub use reporter::{print_report, CsvReporter, JsonReporter, ReporterError};

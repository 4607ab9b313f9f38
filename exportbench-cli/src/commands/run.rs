// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `exportbench run` command - Benchmark both export modes over the corpus.
//!
//! The console table is printed before any file is written, so a failing
//! output directory never costs the comparison.

use exportbench_benchmark::{
    print_report, run_benchmark, summarize, BenchmarkSummary, CsvReporter, JsonReporter,
};
use exportbench_core::{BenchConfig, BenchResult, RusageRunner};

pub fn execute(config: &BenchConfig) -> BenchResult<()> {
    tracing::info!(
        documents = %config.documents_dir.display(),
        tool = %config.tool_path.display(),
        repeats = config.repeats.value(),
        baseline = %config.baseline.label,
        candidate = %config.candidate.label,
        "Starting benchmark"
    );

    let runner = RusageRunner::new(&config.shell).timeout(config.timeout);
    let table = run_benchmark(config, runner)?;

    let summaries = summarize(&table, &config.baseline.label, &config.candidate.label);
    for summary in &summaries {
        if let Err(e) = &summary.comparison {
            tracing::warn!(document = %summary.document.display(), error = %e, "No comparison");
        }
    }

    print_report(&summaries);

    match CsvReporter::new(&config.output_dir).write(&table) {
        Ok(path) => tracing::info!(path = %path.display(), "Results written"),
        Err(e) => println!("Failed to create output file {}", e),
    }

    if config.write_summary {
        let summary = BenchmarkSummary::new(config, &summaries);
        match JsonReporter::new(&config.output_dir).save(&summary) {
            Ok(path) => tracing::info!(path = %path.display(), "Summary written"),
            Err(e) => println!("Failed to write summary {}", e),
        }
    }

    Ok(())
}

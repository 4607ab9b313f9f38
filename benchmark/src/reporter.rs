// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Report generation for benchmark results.
//!
//! Three outputs: the comparison table printed to the console, a CSV of every
//! raw measurement, and a JSON summary of averages and comparisons.

use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::metrics::{BenchmarkSummary, DocumentSummary, ResultTable};

/// Name of the raw measurement dump inside the output directory.
pub const CSV_FILE_NAME: &str = "results.csv";
/// Name of the JSON summary inside the output directory.
pub const SUMMARY_FILE_NAME: &str = "summary.json";

/// Header row of the raw measurement dump.
pub const CSV_HEADER: [&str; 5] = [
    "document",
    "operation",
    "user_time_ms",
    "system_time_ms",
    "memory_mb",
];

/// Errors that can occur while writing reports.
#[derive(Debug, Error)]
pub enum ReporterError {
    #[error("Failed to write report file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to serialize summary: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Render the comparison table, one row per document.
///
/// Rows read `<user>%\t<mem>%\t<path>`. A document without a defined
/// comparison gets the error message in place of the two percentages.
pub fn render_table(summaries: &[DocumentSummary]) -> String {
    let mut out = String::from("\n\nRESULTS\n=======\n");
    out.push_str("User\tMem\tFile\n");

    for summary in summaries {
        let path = summary.document.display();
        let _ = match &summary.comparison {
            Ok(c) => writeln!(out, "{}%\t{}%\t{}", c.user_time_diff_pct, c.memory_diff_pct, path),
            Err(e) => writeln!(out, "{}\t{}", e, path),
        };
    }

    out
}

/// Render the failed-run section, or `None` when every run succeeded.
pub fn render_failures(summaries: &[DocumentSummary]) -> Option<String> {
    if !summaries.iter().any(DocumentSummary::has_failures) {
        return None;
    }

    let mut out = String::from("\nFAILED RUNS\n===========\n");
    for summary in summaries {
        for failures in summary.failures.iter().filter(|f| f.failed > 0) {
            let _ = writeln!(
                out,
                "{}/{}\t{}\t{}",
                failures.failed,
                failures.total,
                failures.mode,
                summary.document.display()
            );
        }
    }

    Some(out)
}

/// Print the comparison table and, if any run failed, the failure section.
pub fn print_report(summaries: &[DocumentSummary]) {
    print!("{}", render_table(summaries));
    if let Some(failures) = render_failures(summaries) {
        print!("{}", failures);
    }
}

/// Writes the raw measurements as CSV.
pub struct CsvReporter {
    output_dir: PathBuf,
}

impl CsvReporter {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// Path the CSV is written to.
    pub fn path(&self) -> PathBuf {
        self.output_dir.join(CSV_FILE_NAME)
    }

    /// Write one row per measurement, truncating any previous file.
    pub fn write(&self, table: &ResultTable) -> Result<PathBuf, ReporterError> {
        fs::create_dir_all(&self.output_dir)?;

        let path = self.path();
        let file = File::create(&path)?;
        let mut writer = csv::Writer::from_writer(BufWriter::new(file));

        writer.write_record(CSV_HEADER)?;
        for results in table.iter() {
            let document = results.document.to_string_lossy();
            for set in &results.run_sets {
                for m in &set.measurements {
                    let user = m.user_ms.to_string();
                    let system = m.system_ms.to_string();
                    let memory = m.memory_mb.to_string();
                    writer.write_record([
                        &*document,
                        set.mode.as_str(),
                        user.as_str(),
                        system.as_str(),
                        memory.as_str(),
                    ])?;
                }
            }
        }
        writer.flush()?;

        tracing::debug!(
            path = %path.display(),
            rows = table.measurement_count(),
            "Wrote CSV results"
        );
        Ok(path)
    }
}

/// Writes the JSON summary.
pub struct JsonReporter {
    output_dir: PathBuf,
}

impl JsonReporter {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// Save the summary, returning the path written.
    pub fn save(&self, summary: &BenchmarkSummary) -> Result<PathBuf, ReporterError> {
        fs::create_dir_all(&self.output_dir)?;

        let path = self.output_dir.join(SUMMARY_FILE_NAME);
        let writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(writer, summary)?;

        Ok(path)
    }

    /// Load a previously saved summary.
    pub fn load(path: impl AsRef<Path>) -> Result<BenchmarkSummary, ReporterError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }
}

// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Result table, averaging and mode comparison.
//!
//! All arithmetic is integer and truncating: averages are the floor of the
//! true mean and percentage deltas follow
//! `(baseline - candidate) * 100 / baseline`.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use exportbench_core::{BenchConfig, ExportMode, Measurement, ModeLabel};
use serde::{Deserialize, Serialize};
use sysinfo::System;
use thiserror::Error;

/// Repeated measurements for one (document, mode) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSet {
    pub mode: ModeLabel,
    pub measurements: Vec<Measurement>,
}

impl RunSet {
    pub fn new(mode: ModeLabel, measurements: Vec<Measurement>) -> Self {
        Self { mode, measurements }
    }

    /// Truncating mean of every measurement, failed runs included.
    pub fn average(&self) -> Average {
        Average::of(&self.measurements)
    }

    /// Number of runs whose outcome was not a success.
    pub fn failures(&self) -> usize {
        self.measurements.iter().filter(|m| !m.succeeded()).count()
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }
}

/// Everything measured for one document, in mode evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentResults {
    pub document: PathBuf,
    pub run_sets: Vec<RunSet>,
}

impl DocumentResults {
    pub fn run_set(&self, mode: &ModeLabel) -> Option<&RunSet> {
        self.run_sets.iter().find(|set| &set.mode == mode)
    }
}

/// Results for every benchmarked document, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultTable {
    documents: Vec<DocumentResults>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the run sets of `document`. Re-inserting a document replaces
    /// its run sets in place.
    pub fn insert(&mut self, document: impl Into<PathBuf>, run_sets: Vec<RunSet>) {
        let document = document.into();
        match self.documents.iter_mut().find(|d| d.document == document) {
            Some(existing) => existing.run_sets = run_sets,
            None => self.documents.push(DocumentResults { document, run_sets }),
        }
    }

    pub fn get(&self, document: &Path) -> Option<&DocumentResults> {
        self.documents.iter().find(|d| d.document == document)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocumentResults> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Total number of raw measurements across all documents and modes.
    pub fn measurement_count(&self) -> usize {
        self.documents
            .iter()
            .flat_map(|d| &d.run_sets)
            .map(RunSet::len)
            .sum()
    }
}

/// Per-mode mean of a run set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Average {
    pub user_ms: u64,
    pub system_ms: u64,
    pub memory_mb: u64,
}

impl Average {
    /// Truncating mean. An empty slice averages to zero.
    pub fn of(measurements: &[Measurement]) -> Self {
        let count = measurements.len() as u64;
        if count == 0 {
            return Self::default();
        }

        let (user, system, memory) = measurements.iter().fold((0u64, 0u64, 0u64), |acc, m| {
            (acc.0 + m.user_ms, acc.1 + m.system_ms, acc.2 + m.memory_mb)
        });

        Self {
            user_ms: user / count,
            system_ms: system / count,
            memory_mb: memory / count,
        }
    }
}

/// Metrics that take part in the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    UserTime,
    Memory,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::UserTime => write!(f, "user time"),
            Metric::Memory => write!(f, "memory"),
        }
    }
}

/// Why a document has no percentage deltas.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComparisonError {
    #[error("undefined comparison: baseline {metric} is zero")]
    ZeroBaseline { metric: Metric },

    #[error("no '{mode}' results recorded")]
    MissingRunSet { mode: ModeLabel },
}

/// Percentage change from `baseline` to `candidate`, truncated toward zero.
///
/// Positive means the candidate used less. Not symmetric: 100→80 is 20 but
/// 80→100 is -25.
pub fn percent_diff(
    baseline: u64,
    candidate: u64,
    metric: Metric,
) -> Result<i64, ComparisonError> {
    if baseline == 0 {
        return Err(ComparisonError::ZeroBaseline { metric });
    }

    let baseline = baseline as i64;
    let candidate = candidate as i64;
    Ok((baseline - candidate) * 100 / baseline)
}

/// Percentage deltas of the candidate against the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub user_time_diff_pct: i64,
    pub memory_diff_pct: i64,
}

impl Comparison {
    pub fn between(baseline: &Average, candidate: &Average) -> Result<Self, ComparisonError> {
        Ok(Self {
            user_time_diff_pct: percent_diff(
                baseline.user_ms,
                candidate.user_ms,
                Metric::UserTime,
            )?,
            memory_diff_pct: percent_diff(
                baseline.memory_mb,
                candidate.memory_mb,
                Metric::Memory,
            )?,
        })
    }
}

/// Failure count of one mode for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeFailures {
    pub mode: ModeLabel,
    pub failed: usize,
    pub total: usize,
}

/// Aggregated view of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSummary {
    pub document: PathBuf,
    pub baseline: Option<Average>,
    pub candidate: Option<Average>,
    pub comparison: Result<Comparison, ComparisonError>,
    /// One entry per mode, in evaluation order
    pub failures: Vec<ModeFailures>,
}

impl DocumentSummary {
    /// Average both modes of `results` and compare candidate to baseline.
    pub fn from_results(
        results: &DocumentResults,
        baseline: &ModeLabel,
        candidate: &ModeLabel,
    ) -> Self {
        let baseline_set = results.run_set(baseline);
        let candidate_set = results.run_set(candidate);

        let baseline_avg = baseline_set.map(RunSet::average);
        let candidate_avg = candidate_set.map(RunSet::average);

        let comparison = match (&baseline_avg, &candidate_avg) {
            (Some(b), Some(c)) => Comparison::between(b, c),
            (None, _) => Err(ComparisonError::MissingRunSet {
                mode: baseline.clone(),
            }),
            (_, None) => Err(ComparisonError::MissingRunSet {
                mode: candidate.clone(),
            }),
        };

        let failures = results
            .run_sets
            .iter()
            .map(|set| ModeFailures {
                mode: set.mode.clone(),
                failed: set.failures(),
                total: set.len(),
            })
            .collect();

        Self {
            document: results.document.clone(),
            baseline: baseline_avg,
            candidate: candidate_avg,
            comparison,
            failures,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failures.iter().any(|f| f.failed > 0)
    }
}

/// Summaries for every document of the table, in table order.
pub fn summarize(
    table: &ResultTable,
    baseline: &ModeLabel,
    candidate: &ModeLabel,
) -> Vec<DocumentSummary> {
    table
        .iter()
        .map(|results| DocumentSummary::from_results(results, baseline, candidate))
        .collect()
}

/// System information captured at benchmark time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os: String,
    pub os_version: String,
    pub kernel_version: Option<String>,
    pub cpu_model: String,
    pub cpu_cores: usize,
    /// Total system memory in bytes
    pub memory_bytes: u64,
    pub hostname: String,
}

impl SystemInfo {
    /// Collect current system information.
    pub fn collect() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu();
        sys.refresh_memory();

        Self {
            os: System::name().unwrap_or_else(|| "Unknown".to_string()),
            os_version: System::os_version().unwrap_or_else(|| "Unknown".to_string()),
            kernel_version: System::kernel_version(),
            cpu_model: sys
                .cpus()
                .first()
                .map(|cpu| cpu.brand().to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
            cpu_cores: sys.cpus().len(),
            memory_bytes: sys.total_memory(),
            hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

/// Settings echoed into the summary so a report explains itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSettings {
    pub tool_path: PathBuf,
    pub extension: String,
    pub repeats: u32,
    pub baseline: ExportMode,
    pub candidate: ExportMode,
}

impl From<&BenchConfig> for RunSettings {
    fn from(config: &BenchConfig) -> Self {
        Self {
            tool_path: config.tool_path.clone(),
            extension: config.extension.clone(),
            repeats: config.repeats.value(),
            baseline: config.baseline.clone(),
            candidate: config.candidate.clone(),
        }
    }
}

/// Serialized form of a [`DocumentSummary`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub document: PathBuf,
    pub baseline: Option<Average>,
    pub candidate: Option<Average>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<Comparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison_error: Option<String>,
    pub failures: Vec<ModeFailures>,
}

impl From<&DocumentSummary> for DocumentRecord {
    fn from(summary: &DocumentSummary) -> Self {
        let (comparison, comparison_error) = match &summary.comparison {
            Ok(c) => (Some(*c), None),
            Err(e) => (None, Some(e.to_string())),
        };

        Self {
            document: summary.document.clone(),
            baseline: summary.baseline,
            candidate: summary.candidate,
            comparison,
            comparison_error,
            failures: summary.failures.clone(),
        }
    }
}

/// Complete run summary written next to the CSV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkSummary {
    pub benchmark_suite: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub system_info: SystemInfo,
    pub settings: RunSettings,
    pub documents: Vec<DocumentRecord>,
}

impl BenchmarkSummary {
    pub fn new(config: &BenchConfig, summaries: &[DocumentSummary]) -> Self {
        Self {
            benchmark_suite: "exportbench".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            system_info: SystemInfo::collect(),
            settings: RunSettings::from(config),
            documents: summaries.iter().map(DocumentRecord::from).collect(),
        }
    }
}

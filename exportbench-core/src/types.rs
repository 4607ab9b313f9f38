// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Newtype wrappers for validated inputs and the per-run measurement.
//!
//! All validated types check their invariants at creation time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigValidationError;

/// Upper bound on repeats per (document, mode) pair.
const MAX_REPEATS: u32 = 10_000;

/// Validated export mode label.
/// Must be non-empty, at most 64 chars, without whitespace or commas.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModeLabel(String);

impl ModeLabel {
    /// Create a new ModeLabel with validation.
    pub fn new(label: impl Into<String>) -> Result<Self, ConfigValidationError> {
        let label = label.into();

        if label.is_empty() {
            return Err(ConfigValidationError::InvalidFieldValue {
                field: "label",
                value: label,
                reason: "Mode label cannot be empty".to_string(),
            });
        }

        if label.len() > 64 {
            return Err(ConfigValidationError::InvalidFieldValue {
                field: "label",
                value: label.clone(),
                reason: format!("Mode label too long: {} chars (max 64)", label.len()),
            });
        }

        if label.chars().any(|c| c.is_whitespace() || c.is_control() || c == ',') {
            return Err(ConfigValidationError::InvalidFieldValue {
                field: "label",
                value: label,
                reason: "Mode label must not contain whitespace, control characters or commas"
                    .to_string(),
            });
        }

        Ok(Self(label))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ModeLabel {
    type Error = ConfigValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ModeLabel> for String {
    fn from(label: ModeLabel) -> Self {
        label.0
    }
}

/// Validated number of runs per (document, mode) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct RepeatCount(u32);

impl RepeatCount {
    /// Create a new RepeatCount with bounds validation.
    pub fn new(count: u32) -> Result<Self, ConfigValidationError> {
        if count == 0 || count > MAX_REPEATS {
            return Err(ConfigValidationError::InvalidFieldValue {
                field: "repeats",
                value: count.to_string(),
                reason: format!("Must be between 1 and {}", MAX_REPEATS),
            });
        }
        Ok(Self(count))
    }

    /// Get the inner count.
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl Default for RepeatCount {
    fn default() -> Self {
        Self(5)
    }
}

impl fmt::Display for RepeatCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for RepeatCount {
    type Error = ConfigValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RepeatCount> for u32 {
    fn from(count: RepeatCount) -> Self {
        count.0
    }
}

/// One way of exporting a document.
///
/// `subcommand` is handed to the shell verbatim, so it may hold several
/// words and flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportMode {
    pub label: ModeLabel,
    pub subcommand: String,
}

impl ExportMode {
    pub fn new(label: ModeLabel, subcommand: impl Into<String>) -> Self {
        Self {
            label,
            subcommand: subcommand.into(),
        }
    }
}

impl fmt::Display for ExportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.subcommand)
    }
}

/// How a single tool invocation ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum RunOutcome {
    /// Exited with status 0
    Success,
    /// Exited with a non-zero status
    Failed { code: i32 },
    /// Terminated by a signal
    Signaled { signal: String },
    /// Never started, or its output directory could not be prepared
    LaunchFailed { reason: String },
    /// Killed after exceeding the configured timeout
    TimedOut,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Success)
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Success => write!(f, "success"),
            RunOutcome::Failed { code } => write!(f, "exit status {}", code),
            RunOutcome::Signaled { signal } => write!(f, "terminated by {}", signal),
            RunOutcome::LaunchFailed { reason } => write!(f, "launch failed: {}", reason),
            RunOutcome::TimedOut => write!(f, "timed out"),
        }
    }
}

/// Resource usage of one tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    /// User CPU time in whole milliseconds
    pub user_ms: u64,
    /// System CPU time in whole milliseconds
    pub system_ms: u64,
    /// Peak resident set size in whole megabytes
    pub memory_mb: u64,
    pub outcome: RunOutcome,
}

impl Measurement {
    pub fn new(user_ms: u64, system_ms: u64, memory_mb: u64, outcome: RunOutcome) -> Self {
        Self {
            user_ms,
            system_ms,
            memory_mb,
            outcome,
        }
    }

    /// All-zero measurement for an invocation that never ran.
    pub fn launch_failed(reason: impl Into<String>) -> Self {
        Self::new(
            0,
            0,
            0,
            RunOutcome::LaunchFailed {
                reason: reason.into(),
            },
        )
    }

    pub fn succeeded(&self) -> bool {
        self.outcome.is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_label_valid() {
        assert!(ModeLabel::new("list").is_ok());
        assert!(ModeLabel::new("marina-v2").is_ok());
        assert!(ModeLabel::new("formats=list").is_ok());
    }

    #[test]
    fn test_mode_label_invalid() {
        assert!(ModeLabel::new("").is_err());
        assert!(ModeLabel::new("a".repeat(65)).is_err());
        assert!(ModeLabel::new("two words").is_err());
        assert!(ModeLabel::new("a,b").is_err());
    }

    #[test]
    fn test_repeat_count_bounds() {
        assert!(RepeatCount::new(0).is_err());
        assert!(RepeatCount::new(1).is_ok());
        assert!(RepeatCount::new(MAX_REPEATS).is_ok());
        assert!(RepeatCount::new(MAX_REPEATS + 1).is_err());
        assert_eq!(RepeatCount::default().value(), 5);
    }

    #[test]
    fn test_launch_failed_is_zero() {
        let m = Measurement::launch_failed("no such shell");
        assert_eq!((m.user_ms, m.system_ms, m.memory_mb), (0, 0, 0));
        assert!(!m.succeeded());
        assert!(m.outcome.to_string().contains("no such shell"));
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(RunOutcome::Success.to_string(), "success");
        assert_eq!(RunOutcome::Failed { code: 3 }.to_string(), "exit status 3");
        assert_eq!(RunOutcome::TimedOut.to_string(), "timed out");
    }
}

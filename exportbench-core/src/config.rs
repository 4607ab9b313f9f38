// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! YAML configuration parser with strict validation.
//!
//! Every setting has a default, so an empty document (or no file at all) is a
//! valid configuration. Command-line overrides are applied to the raw values
//! before validation, so they go through the same checks as the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{BenchError, BenchResult, ConfigValidationError};
use crate::types::{ExportMode, ModeLabel, RepeatCount};

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "exportbench.yaml";

/// Raw export mode as parsed from YAML.
#[derive(Debug, Clone, Deserialize)]
struct RawExportMode {
    label: String,
    subcommand: String,
}

/// Raw export modes.
#[derive(Debug, Clone, Deserialize)]
struct RawModes {
    #[serde(default = "default_baseline")]
    baseline: RawExportMode,
    #[serde(default = "default_candidate")]
    candidate: RawExportMode,
}

impl Default for RawModes {
    fn default() -> Self {
        Self {
            baseline: default_baseline(),
            candidate: default_candidate(),
        }
    }
}

fn default_baseline() -> RawExportMode {
    RawExportMode {
        label: "list".to_string(),
        subcommand: "export presentation --formats=list".to_string(),
    }
}

fn default_candidate() -> RawExportMode {
    RawExportMode {
        label: "marina".to_string(),
        subcommand: "export presentation --formats=marina".to_string(),
    }
}

/// Raw root configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default = "default_documents_dir")]
    documents_dir: String,
    #[serde(default = "default_output_dir")]
    output_dir: String,
    #[serde(default = "default_extension")]
    extension: String,
    #[serde(default = "default_tool_path")]
    tool_path: String,
    #[serde(default = "default_shell")]
    shell: String,
    #[serde(default = "default_repeats")]
    repeats: u32,
    #[serde(default)]
    timeout_secs: Option<u64>,
    #[serde(default = "default_write_summary")]
    write_summary: bool,
    #[serde(default)]
    modes: RawModes,
}

fn default_documents_dir() -> String {
    "docs".to_string()
}

fn default_output_dir() -> String {
    "data".to_string()
}

fn default_extension() -> String {
    ".sketch".to_string()
}

fn default_tool_path() -> String {
    "/Applications/Sketch Experimental.app/Contents/MacOS/sketchtool".to_string()
}

fn default_shell() -> String {
    "sh".to_string()
}

fn default_repeats() -> u32 {
    5
}

fn default_write_summary() -> bool {
    true
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            documents_dir: default_documents_dir(),
            output_dir: default_output_dir(),
            extension: default_extension(),
            tool_path: default_tool_path(),
            shell: default_shell(),
            repeats: default_repeats(),
            timeout_secs: None,
            write_summary: default_write_summary(),
            modes: RawModes::default(),
        }
    }
}

/// Validated benchmark configuration.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Directory scanned for documents
    pub documents_dir: PathBuf,
    /// Directory receiving `results.csv` and `summary.json`
    pub output_dir: PathBuf,
    /// Filename suffix a document must end with
    pub extension: String,
    /// Export tool executable
    pub tool_path: PathBuf,
    /// Command interpreter used to run the command line
    pub shell: PathBuf,
    pub repeats: RepeatCount,
    /// Per-invocation limit; `None` waits forever
    pub timeout: Option<Duration>,
    pub write_summary: bool,
    /// Reference mode for percentage deltas
    pub baseline: ExportMode,
    pub candidate: ExportMode,
}

impl BenchConfig {
    /// Both modes in evaluation order, baseline first.
    pub fn modes(&self) -> [&ExportMode; 2] {
        [&self.baseline, &self.candidate]
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        ConfigLoader::validate(RawConfig::default())
            .unwrap_or_else(|e| unreachable!("built-in defaults are valid: {}", e))
    }
}

/// Values given on the command line, taking precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub documents_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub extension: Option<String>,
    pub tool_path: Option<PathBuf>,
    pub shell: Option<PathBuf>,
    pub repeats: Option<u32>,
    pub timeout_secs: Option<u64>,
    pub disable_summary: bool,
}

impl ConfigOverrides {
    fn apply(&self, raw: &mut RawConfig) {
        if let Some(dir) = &self.documents_dir {
            raw.documents_dir = dir.to_string_lossy().into_owned();
        }
        if let Some(dir) = &self.output_dir {
            raw.output_dir = dir.to_string_lossy().into_owned();
        }
        if let Some(ext) = &self.extension {
            raw.extension = ext.clone();
        }
        if let Some(tool) = &self.tool_path {
            raw.tool_path = tool.to_string_lossy().into_owned();
        }
        if let Some(shell) = &self.shell {
            raw.shell = shell.to_string_lossy().into_owned();
        }
        if let Some(repeats) = self.repeats {
            raw.repeats = repeats;
        }
        if let Some(secs) = self.timeout_secs {
            raw.timeout_secs = Some(secs);
        }
        if self.disable_summary {
            raw.write_summary = false;
        }
    }
}

/// Configuration loader with strict validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> BenchResult<BenchConfig> {
        Self::resolve(Some(path.as_ref()), &ConfigOverrides::default())
    }

    /// Load and validate configuration from a YAML string.
    pub fn load_string(content: &str) -> BenchResult<BenchConfig> {
        Self::validate(Self::parse(content)?)
    }

    /// Build the effective configuration.
    ///
    /// With `path = None` the built-in defaults are the base. A given path
    /// must exist. Overrides are applied before validation.
    pub fn resolve(path: Option<&Path>, overrides: &ConfigOverrides) -> BenchResult<BenchConfig> {
        let mut raw = match path {
            Some(path) => Self::read(path)?,
            None => RawConfig::default(),
        };

        overrides.apply(&mut raw);
        Self::validate(raw)
    }

    fn read(path: &Path) -> BenchResult<RawConfig> {
        if !path.exists() {
            return Err(BenchError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| BenchError::Io {
            context: "reading config file",
            source: e,
        })?;

        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Self::parse(&content)
    }

    fn parse(content: &str) -> BenchResult<RawConfig> {
        // An empty document deserializes to unit, not to a map.
        if content.trim().is_empty() {
            return Ok(RawConfig::default());
        }

        serde_yaml::from_str(content).map_err(|e| BenchError::ConfigParse {
            message: format!("YAML parse error: {}", e),
        })
    }

    /// Validate raw configuration and convert to validated types.
    fn validate(raw: RawConfig) -> BenchResult<BenchConfig> {
        let documents_dir = Self::non_empty_path("documents_dir", &raw.documents_dir)?;
        let output_dir = Self::non_empty_path("output_dir", &raw.output_dir)?;
        let tool_path = Self::non_empty_path("tool_path", &raw.tool_path)?;
        let shell = Self::non_empty_path("shell", &raw.shell)?;

        if raw.extension.is_empty() {
            return Err(ConfigValidationError::InvalidFieldValue {
                field: "extension",
                value: String::new(),
                reason: "Extension cannot be empty".to_string(),
            }
            .into());
        }

        let repeats = RepeatCount::new(raw.repeats)?;

        let timeout = match raw.timeout_secs {
            Some(0) => {
                return Err(ConfigValidationError::InvalidFieldValue {
                    field: "timeout_secs",
                    value: "0".to_string(),
                    reason: "Timeout must be greater than 0; omit it to wait forever".to_string(),
                }
                .into());
            }
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        let baseline = Self::validate_mode(raw.modes.baseline, "baseline mode")?;
        let candidate = Self::validate_mode(raw.modes.candidate, "candidate mode")?;

        if baseline.label == candidate.label {
            return Err(ConfigValidationError::DuplicateModeLabel {
                label: baseline.label.to_string(),
            }
            .into());
        }

        Ok(BenchConfig {
            documents_dir,
            output_dir,
            extension: raw.extension,
            tool_path,
            shell,
            repeats,
            timeout,
            write_summary: raw.write_summary,
            baseline,
            candidate,
        })
    }

    fn validate_mode(raw: RawExportMode, context: &str) -> BenchResult<ExportMode> {
        let label = ModeLabel::new(raw.label)?;

        if raw.subcommand.trim().is_empty() {
            return Err(ConfigValidationError::MissingRequiredField {
                field: "subcommand",
                context: context.to_string(),
            }
            .into());
        }

        Ok(ExportMode::new(label, raw.subcommand))
    }

    fn non_empty_path(field: &'static str, value: &str) -> BenchResult<PathBuf> {
        if value.trim().is_empty() {
            return Err(ConfigValidationError::MissingRequiredField {
                field,
                context: "configuration root".to_string(),
            }
            .into());
        }
        Ok(PathBuf::from(value))
    }
}

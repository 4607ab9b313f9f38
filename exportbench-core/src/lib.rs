//! exportbench core library
//!
//! Configuration, document discovery and process accounting for benchmarking
//! an external document export tool.

pub mod config;
pub mod error;
pub mod lister;
pub mod process;
pub mod types;

// Re-export commonly used types
pub use config::{BenchConfig, ConfigLoader, ConfigOverrides, DEFAULT_CONFIG_FILE};
pub use error::{BenchError, BenchResult, CommandLineError, ConfigValidationError};
pub use lister::list_documents;
pub use process::{CommandLine, ProcessRunner, RusageRunner};
pub use types::{ExportMode, Measurement, ModeLabel, RepeatCount, RunOutcome};

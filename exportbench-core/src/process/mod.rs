// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Running the export tool and accounting for its resource usage.
//!
//! [`ProcessRunner`] is the only seam that touches OS process accounting.
//! [`RusageRunner`] is the production implementation; tests substitute
//! their own.

mod command;
mod rusage;

pub use command::CommandLine;
pub use rusage::{RusageRunner, MAXRSS_UNITS_PER_MB};

use crate::types::Measurement;

/// Runs one command line to completion and reports what it cost.
///
/// Implementations never fail: a command that cannot be started or exits
/// unsuccessfully still produces a [`Measurement`], with the problem recorded
/// in its outcome.
pub trait ProcessRunner {
    fn run(&self, command: &CommandLine) -> Measurement;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &R {
    fn run(&self, command: &CommandLine) -> Measurement {
        (**self).run(command)
    }
}

// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `exportbench validate` command - Print the effective configuration.

use exportbench_core::{BenchConfig, BenchResult};

pub fn execute(config: &BenchConfig) -> BenchResult<()> {
    tracing::info!("Configuration validated");

    println!("✓ Configuration is valid");
    println!();
    println!("Benchmark Settings:");
    println!("  Documents:   {}", config.documents_dir.display());
    println!("  Extension:   {}", config.extension);
    println!("  Output:      {}", config.output_dir.display());
    println!("  Tool:        {}", config.tool_path.display());
    println!("  Shell:       {}", config.shell.display());
    println!("  Repeats:     {}", config.repeats);
    match config.timeout {
        Some(timeout) => println!("  Timeout:     {}s", timeout.as_secs()),
        None => println!("  Timeout:     none"),
    }
    println!("  Summary:     {}", if config.write_summary { "yes" } else { "no" });
    println!();
    println!("Modes:");
    println!("  baseline:  {}", config.baseline);
    println!("  candidate: {}", config.candidate);

    Ok(())
}

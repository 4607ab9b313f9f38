// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Integration tests for exportbench-core.
//!
//! These run real processes through `sh`, so they are Unix-only.

use std::path::Path;
use std::time::{Duration, Instant};

use exportbench_core::{
    list_documents, CommandLine, ConfigLoader, ExportMode, ModeLabel, ProcessRunner,
    RunOutcome, RusageRunner,
};
use tempfile::TempDir;

/// Write an executable shell script into `dir`.
fn write_script(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("Failed to write script");
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

/// Test a successful command reports success
#[test]
fn test_runner_success() {
    let runner = RusageRunner::new("sh");
    let m = runner.run(&CommandLine::raw("true"));
    assert_eq!(m.outcome, RunOutcome::Success);
}

/// Test a non-zero exit is recorded, not fatal
#[test]
fn test_runner_reports_exit_code() {
    let runner = RusageRunner::new("sh");
    let m = runner.run(&CommandLine::raw("exit 3"));
    assert_eq!(m.outcome, RunOutcome::Failed { code: 3 });
}

/// Test a missing tool surfaces as the shell's "not found" status
#[test]
fn test_runner_missing_tool() {
    let runner = RusageRunner::new("sh");
    let m = runner.run(&CommandLine::raw("/nonexistent/sketchtool export"));
    assert_eq!(m.outcome, RunOutcome::Failed { code: 127 });
}

/// Test CPU time is attributed to the child
#[test]
fn test_runner_measures_user_time() {
    let runner = RusageRunner::new("sh");
    let start = Instant::now();
    let m = runner.run(&CommandLine::raw(
        "i=0; while [ $i -lt 300000 ]; do i=$((i+1)); done",
    ));

    assert!(m.succeeded());
    assert!(
        m.user_ms + m.system_ms > 0,
        "busy loop reported no CPU time: {:?}",
        m
    );
    assert!(Duration::from_millis(m.user_ms) <= start.elapsed() + Duration::from_millis(50));
}

/// Test the timeout kills a hung tool
#[test]
fn test_runner_timeout_kills_child() {
    let runner = RusageRunner::new("sh").timeout(Some(Duration::from_millis(200)));
    let start = Instant::now();
    let m = runner.run(&CommandLine::raw("sleep 30"));

    assert_eq!(m.outcome, RunOutcome::TimedOut);
    assert!(start.elapsed() < Duration::from_secs(10));
}

/// Test a built command line hands the tool its arguments intact
#[test]
fn test_command_line_reaches_tool_intact() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let args_file = temp_dir.path().join("args.txt");
    let tool = write_script(
        temp_dir.path(),
        "fake tool",
        &format!(
            "for a in \"$@\"; do echo \"$a\" >> '{}'; done",
            args_file.display()
        ),
    );

    let document = temp_dir.path().join("My Deck.sketch");
    std::fs::write(&document, b"").unwrap();
    let output_dir = temp_dir.path().join("out dir");

    let mode = ExportMode::new(
        ModeLabel::new("list").unwrap(),
        "export presentation --formats=list",
    );
    let cmd = CommandLine::build(&tool, &mode, &document, &output_dir).unwrap();

    let m = RusageRunner::new("sh").run(&cmd);
    assert!(m.succeeded(), "fake tool failed: {:?}", m.outcome);

    let args = std::fs::read_to_string(&args_file).unwrap();
    let args: Vec<&str> = args.lines().collect();
    assert_eq!(
        args,
        vec![
            "export".to_string(),
            "presentation".to_string(),
            "--formats=list".to_string(),
            document.display().to_string(),
            format!("--output={}", output_dir.display()),
        ]
    );
}

/// Test configuration loading from a file
#[test]
fn test_config_loading_and_listing() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let docs = temp_dir.path().join("docs");
    std::fs::create_dir(&docs).unwrap();
    std::fs::write(docs.join("one.sketch"), b"").unwrap();
    std::fs::write(docs.join("two.fig"), b"").unwrap();

    let config_path = temp_dir.path().join("exportbench.yaml");
    std::fs::write(
        &config_path,
        format!(
            "documents_dir: {}\nrepeats: 2\n",
            docs.display()
        ),
    )
    .expect("Failed to write config");

    let config = ConfigLoader::load_file(&config_path).expect("Failed to load config");
    assert_eq!(config.repeats.value(), 2);

    let found = list_documents(&config.documents_dir, &config.extension).unwrap();
    assert_eq!(found, vec![docs.join("one.sketch")]);
}

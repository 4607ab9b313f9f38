// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Document discovery.
//!
//! Lists the immediate entries of the documents directory and keeps those
//! whose name ends with the configured extension. Order is whatever the
//! filesystem enumerates; callers must not rely on sorting.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BenchError, BenchResult};

/// Return absolute paths of the documents in `dir` ending with `extension`.
///
/// Fails with [`BenchError::DocumentsDir`] if the directory cannot be
/// resolved or read. An existing empty directory yields an empty list.
pub fn list_documents(dir: impl AsRef<Path>, extension: &str) -> BenchResult<Vec<PathBuf>> {
    let dir = dir.as_ref();

    let root = absolute(dir).map_err(|e| BenchError::DocumentsDir {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let entries = fs::read_dir(&root).map_err(|e| BenchError::DocumentsDir {
        path: root.clone(),
        source: e,
    })?;

    let mut documents = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| BenchError::DocumentsDir {
            path: root.clone(),
            source: e,
        })?;

        let name = entry.file_name();
        if name.to_string_lossy().ends_with(extension) {
            let path = root.join(&name);
            tracing::debug!(document = %path.display(), "Found document");
            documents.push(path);
        }
    }

    tracing::info!(
        directory = %root.display(),
        count = documents.len(),
        "Listed documents"
    );

    Ok(documents)
}

fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_filters_by_extension() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.sketch"), b"").unwrap();
        fs::write(temp_dir.path().join("b.sketch"), b"").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), b"").unwrap();
        fs::write(temp_dir.path().join("sketch"), b"").unwrap();

        let mut docs = list_documents(temp_dir.path(), ".sketch").unwrap();
        docs.sort();

        assert_eq!(
            docs,
            vec![
                temp_dir.path().join("a.sketch"),
                temp_dir.path().join("b.sketch"),
            ]
        );
    }

    #[test]
    fn test_empty_directory_is_not_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let docs = list_documents(temp_dir.path(), ".sketch").unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");

        let err = list_documents(&missing, ".sketch").unwrap_err();
        assert!(matches!(err, BenchError::DocumentsDir { .. }));
        assert_eq!(err.exit_code(), crate::error::EXIT_DOCUMENTS);
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_does_not_recurse() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("deep.sketch"), b"").unwrap();

        let docs = list_documents(temp_dir.path(), ".sketch").unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn test_returns_absolute_paths() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("doc.sketch"), b"").unwrap();

        let docs = list_documents(temp_dir.path(), ".sketch").unwrap();
        assert_eq!(docs.len(), 1);
        assert!(docs[0].is_absolute());
    }
}

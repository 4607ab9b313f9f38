//! `exportbench list` command - Show the documents a run would benchmark.

use exportbench_core::{list_documents, BenchConfig, BenchResult};

pub fn execute(config: &BenchConfig) -> BenchResult<()> {
    let documents = list_documents(&config.documents_dir, &config.extension)?;

    if documents.is_empty() {
        println!(
            "No '{}' documents in {}",
            config.extension,
            config.documents_dir.display()
        );
        return Ok(());
    }

    println!("Documents ({}):", documents.len());
    for document in &documents {
        println!("  - {}", document.display());
    }

    Ok(())
}

//! Directory mode: find every document with the configured extension and process them in turn.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::fetch::Fetch;
use crate::models::DirectoryOutcome;
use crate::report::Reporter;
use crate::rewrite::Rewriter;

/// List regular files directly inside `dir` whose name ends in `.{extension}`, sorted by name.
///
/// Returned paths are relative to `dir`.
pub fn discover_documents(dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let suffix = format!(".{}", extension.trim_start_matches('.'));
    let mut documents = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };

        if name.ends_with(&suffix) {
            documents.push(PathBuf::from(name));
        }
    }

    documents.sort();
    Ok(documents)
}

/// Process every document the rewriter's root holds once `confirm` approves the listing.
///
/// A failure on one document is reported and does not stop the remaining ones.
pub fn process_directory<F, R, C>(
    rewriter: &Rewriter<F, R>,
    confirm: C,
) -> io::Result<DirectoryOutcome>
where
    F: Fetch,
    R: Reporter,
    C: FnOnce(&[PathBuf]) -> bool,
{
    let extension = rewriter.config().document_extension().to_string();
    let documents = discover_documents(rewriter.root(), &extension)?;
    let reporter = rewriter.reporter();

    if documents.is_empty() {
        reporter.error(&format!(
            "No .{extension} files found in {}.",
            rewriter.root().display()
        ));
        return Ok(DirectoryOutcome::NoDocuments);
    }

    reporter.info(&format!("Found the following .{extension} files:"));
    for document in &documents {
        reporter.info(&format!("  - {}", document.display()));
    }

    if !confirm(&documents) {
        reporter.warning("Operation cancelled.");
        return Ok(DirectoryOutcome::Cancelled);
    }

    tracing::info!(count = documents.len(), "processing directory");
    let results = documents
        .iter()
        .map(|document| rewriter.process_document(document))
        .collect();

    Ok(DirectoryOutcome::Processed(results))
}

//! Per-document orchestration: scan, download, substitute, write back.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use regex::bytes::{NoExpand, Regex};
use thiserror::Error;

use crate::config::VendorConfig;
use crate::extract::extract_asset_references;
use crate::fetch::{Fetch, download_asset};
use crate::models::DocumentReport;
use crate::report::Reporter;

/// Failure that aborts processing of a single document.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// The path does not name an existing regular file.
    #[error("File not found: {}", .path.display())]
    MissingDocument {
        /// Requested document path.
        path: PathBuf,
    },
    /// Reading or writing the document failed.
    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        /// `read` or `write`.
        action: &'static str,
        /// Document path.
        path: PathBuf,
        /// Source I/O error.
        source: io::Error,
    },
}

/// Rewrites documents so remote assets point at local copies under a root directory.
pub struct Rewriter<F, R> {
    fetcher: F,
    reporter: R,
    config: VendorConfig,
    root: PathBuf,
}

impl<F: Fetch, R: Reporter> Rewriter<F, R> {
    /// Create a rewriter placing assets (and resolving relative document paths) under `root`.
    pub fn new(fetcher: F, reporter: R, config: VendorConfig, root: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            reporter,
            config,
            root: root.into(),
        }
    }

    /// Configuration in effect for this rewriter.
    pub fn config(&self) -> &VendorConfig {
        &self.config
    }

    /// Directory receiving the category folders.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reporter receiving progress messages.
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Vendor every remote stylesheet and script referenced by the document at `path`.
    ///
    /// Assets that fail to download are reported and keep their remote URL. The document is only
    /// written back when at least one reference was replaced, and bytes outside the replaced
    /// URLs are preserved whatever the file's encoding.
    pub fn process_document(&self, path: &Path) -> Result<DocumentReport, RewriteError> {
        let result = self.rewrite(path);
        if let Err(err) = &result {
            self.reporter.error(&err.to_string());
        }
        result
    }

    fn rewrite(&self, path: &Path) -> Result<DocumentReport, RewriteError> {
        let document = self.root.join(path);
        if !document.is_file() {
            return Err(RewriteError::MissingDocument {
                path: path.to_path_buf(),
            });
        }

        let mut content = fs::read(&document).map_err(|source| RewriteError::Io {
            action: "read",
            path: path.to_path_buf(),
            source,
        })?;

        let mut relocated = Vec::new();
        for reference in extract_asset_references(&content) {
            match download_asset(&self.fetcher, &self.root, &self.config, &reference) {
                Ok(asset) => {
                    self.reporter.success(&format!(
                        "Downloaded: {} -> {}",
                        reference.url,
                        asset.path.display()
                    ));
                    let local = asset.local_reference(&self.config);
                    content = replace_literal(&content, &reference.url, &local);
                    relocated.push(reference.url);
                }
                Err(err) => {
                    tracing::debug!(url = %reference.url, error = %err, "asset skipped");
                    self.reporter.error(&format!("Failed to download {}: {err}", reference.url));
                }
            }
        }

        let report = DocumentReport {
            path: path.to_path_buf(),
            relocated,
        };

        if report.is_unchanged() {
            self.reporter.warning(&format!(
                "No external dependencies found in {}.",
                path.display()
            ));
            return Ok(report);
        }

        fs::write(&document, &content).map_err(|source| RewriteError::Io {
            action: "write",
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(
            document = %path.display(),
            updated = report.updated_count(),
            "document rewritten"
        );

        self.reporter.success(&format!("Processed: {}", path.display()));
        self.reporter.success(&format!(
            "Found and updated {} external dependencies.",
            report.updated_count()
        ));
        self.reporter.success("Updated references:");
        for original in &report.relocated {
            self.reporter.info(&format!("  - {original}"));
        }

        Ok(report)
    }
}

/// Replace every occurrence of `from` in `content` with `to`, treating both literally.
fn replace_literal(content: &[u8], from: &str, to: &str) -> Vec<u8> {
    let pattern = Regex::new(&regex::escape(from)).expect("escaped literal is a valid regex");
    pattern
        .replace_all(content, NoExpand(to.as_bytes()))
        .into_owned()
}

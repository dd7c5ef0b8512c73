//! Data structures produced while vendoring a document's remote assets.

use std::path::{Path, PathBuf};

use url::Url;

use crate::config::VendorConfig;

/// Asset class derived from the extension of a URL's path component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetCategory {
    /// `.css` resources.
    Stylesheet,
    /// `.js` resources.
    Script,
}

impl AssetCategory {
    /// Map a file extension (without the dot) to a category.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "css" => Some(Self::Stylesheet),
            "js" => Some(Self::Script),
            _ => None,
        }
    }

    /// Determine the category of an absolute URL from its path, ignoring query and fragment.
    pub fn from_url(url: &str) -> Option<Self> {
        let parsed = Url::parse(url).ok()?;
        let last_segment = parsed.path().rsplit('/').next()?;
        let extension = Path::new(last_segment).extension()?.to_str()?;
        Self::from_extension(extension)
    }
}

/// A remote asset referenced by a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReference {
    /// The absolute URL exactly as it appears in the document.
    pub url: String,
    /// Category used to pick the destination directory.
    pub category: AssetCategory,
}

/// An asset that has been written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalAsset {
    /// Category the asset was stored under.
    pub category: AssetCategory,
    /// Basename of the URL, used as the local file name.
    pub file_name: String,
    /// Full path of the written file.
    pub path: PathBuf,
}

impl LocalAsset {
    /// Relative reference substituted into documents, e.g. `./css/site.css`.
    pub fn local_reference(&self, config: &VendorConfig) -> String {
        format!(
            "./{}/{}",
            config.category_dir(self.category).trim_matches('/'),
            self.file_name
        )
    }
}

/// Summary of a single processed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentReport {
    /// Path of the processed document.
    pub path: PathBuf,
    /// Original URLs that were replaced, one entry per successful match.
    pub relocated: Vec<String>,
}

impl DocumentReport {
    /// Number of matches that were downloaded and substituted.
    ///
    /// Duplicate URLs within a document count once per match.
    pub fn updated_count(&self) -> usize {
        self.relocated.len()
    }

    /// Returns `true` when the document was left untouched on disk.
    pub fn is_unchanged(&self) -> bool {
        self.relocated.is_empty()
    }
}

/// Result of processing one document in directory mode.
pub type DocumentResult = Result<DocumentReport, crate::rewrite::RewriteError>;

/// Terminal state of a directory-mode run.
#[derive(Debug)]
pub enum DirectoryOutcome {
    /// No document with the configured extension exists.
    NoDocuments,
    /// The confirmation callback declined; nothing was processed.
    Cancelled,
    /// Every listed document was processed, in listing order.
    Processed(Vec<DocumentResult>),
}

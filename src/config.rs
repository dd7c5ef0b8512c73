//! Tool configuration loader describing document discovery and asset layout.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::models::AssetCategory;

/// File name searched for in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "vendor.config.json";

/// Discoverable configuration describing which documents to scan and where assets land.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VendorConfig {
    /// Extension (without the dot) of documents processed in directory mode.
    pub source_extension: String,
    /// Directory, relative to the working directory, receiving stylesheets.
    pub stylesheet_dir: String,
    /// Directory, relative to the working directory, receiving scripts.
    pub script_dir: String,
    /// Upper bound in seconds for a single asset request.
    pub timeout_secs: u64,
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            source_extension: "php".into(),
            stylesheet_dir: "css".into(),
            script_dir: "js".into(),
            timeout_secs: 10,
        }
    }
}

impl VendorConfig {
    /// Attempt to load configuration from the provided directory.
    ///
    /// When the configuration file does not exist or fails to parse we fall back to default
    /// values so a bare directory of templates still works.
    pub fn discover(dir: &Path) -> Self {
        Self::from_path(&dir.join(DEFAULT_CONFIG_FILE)).unwrap_or_default()
    }

    /// Read configuration from a specific JSON file.
    pub fn from_path(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Directory name holding assets of the given category.
    pub fn category_dir(&self, category: AssetCategory) -> &str {
        match category {
            AssetCategory::Stylesheet => &self.stylesheet_dir,
            AssetCategory::Script => &self.script_dir,
        }
    }

    /// Request timeout applied to every download.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Document extension with any leading dot removed.
    pub fn document_extension(&self) -> &str {
        self.source_extension.trim_start_matches('.')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn discover_falls_back_to_defaults_without_file() {
        let dir = tempdir().unwrap();
        let config = VendorConfig::discover(dir.path());
        assert_eq!(config, VendorConfig::default());
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn discover_reads_partial_overrides() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            r#"{"source_extension": ".html", "script_dir": "vendor/js"}"#,
        )
        .unwrap();

        let config = VendorConfig::discover(dir.path());
        assert_eq!(config.document_extension(), "html");
        assert_eq!(config.category_dir(AssetCategory::Script), "vendor/js");
        assert_eq!(config.category_dir(AssetCategory::Stylesheet), "css");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn discover_ignores_malformed_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "{ not json").unwrap();

        assert_eq!(VendorConfig::discover(dir.path()), VendorConfig::default());
    }
}

#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod batch;
pub mod cli;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod logging;
pub mod models;
pub mod report;
pub mod rewrite;

pub use config::VendorConfig;
pub use fetch::{Fetch, HttpFetcher};
pub use models::{AssetCategory, AssetReference, DirectoryOutcome, DocumentReport, LocalAsset};
pub use report::{ConsoleReporter, Reporter};
pub use rewrite::Rewriter;

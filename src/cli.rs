//! Command-line entry point.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use crate::batch::process_directory;
use crate::config::VendorConfig;
use crate::fetch::{Fetch, HttpFetcher};
use crate::report::{ConsoleReporter, Reporter};
use crate::rewrite::Rewriter;

/// Download remote stylesheets and scripts referenced by markup files and point the files at
/// the local copies.
#[derive(Debug, Parser)]
#[command(name = "asset-vendor", version, about, long_about = None)]
pub struct Cli {
    /// Document to process. Without it every matching document in the directory is processed
    /// after confirmation.
    pub file: Option<PathBuf>,

    /// Working directory holding documents and receiving the asset folders.
    #[arg(short = 'C', long = "dir", default_value = ".")]
    pub dir: PathBuf,

    /// Configuration file (defaults to `vendor.config.json` in the working directory).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Document extension processed in directory mode.
    #[arg(long)]
    pub extension: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Process every document in directory mode without asking.
    #[arg(short, long)]
    pub yes: bool,
}

impl Cli {
    /// Resolve the effective configuration: explicit file, discovered file, then flag overrides.
    pub fn load_config(&self) -> Result<VendorConfig> {
        let mut config = match &self.config {
            Some(path) => VendorConfig::from_path(path)
                .ok_or_else(|| anyhow!("failed to load configuration from {}", path.display()))?,
            None => VendorConfig::discover(&self.dir),
        };

        if let Some(extension) = &self.extension {
            config.source_extension = extension.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }

        Ok(config)
    }
}

/// Parse process arguments and run with the console reporter and stdin confirmation.
///
/// Malformed invocations are rejected by `clap`, which prints usage and exits non-zero.
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli.load_config()?;
    tracing::debug!(?config, "configuration resolved");

    let fetcher = HttpFetcher::new(config.timeout()).context("failed to build HTTP client")?;
    let assume_yes = cli.yes;
    execute(&cli, fetcher, ConsoleReporter, config, |documents| {
        assume_yes || prompt_confirmation(documents.len())
    })
}

/// Run one invocation with injected collaborators.
///
/// Only failures to list the working directory escape; per-document problems are reported.
pub fn execute<F, R, C>(
    cli: &Cli,
    fetcher: F,
    reporter: R,
    config: VendorConfig,
    confirm: C,
) -> Result<ExitCode>
where
    F: Fetch,
    R: Reporter,
    C: FnOnce(&[PathBuf]) -> bool,
{
    let rewriter = Rewriter::new(fetcher, reporter, config, &cli.dir);

    match &cli.file {
        Some(file) => {
            if let Err(err) = rewriter.process_document(file) {
                tracing::debug!(%err, "document skipped");
            }
        }
        None => {
            rewriter.reporter().warning("No filename provided.");
            process_directory(&rewriter, confirm)
                .with_context(|| format!("failed to list {}", cli.dir.display()))?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn prompt_confirmation(count: usize) -> bool {
    print!("Do you want to process all {count} files? (y/n): ");
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => is_affirmative(&answer),
        Err(_) => false,
    }
}

/// Interpret a confirmation answer; only `y` or `yes` (any case) approve.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    use crate::fetch::tests::StubFetcher;
    use crate::report::{Level, MemoryReporter};

    #[test]
    fn accepts_zero_or_one_positional() {
        assert!(Cli::try_parse_from(["asset-vendor"]).unwrap().file.is_none());
        let cli = Cli::try_parse_from(["asset-vendor", "index.php"]).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("index.php")));
    }

    #[test]
    fn rejects_extra_positionals() {
        let err = Cli::try_parse_from(["asset-vendor", "a.php", "b.php"]).unwrap_err();
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn affirmative_answers() {
        assert!(is_affirmative("y\n"));
        assert!(is_affirmative(" YES "));
        assert!(!is_affirmative("n"));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("yep"));
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("vendor.config.json"),
            r#"{"source_extension": "html", "timeout_secs": 30}"#,
        )
        .unwrap();
        let dir_arg = dir.path().to_str().unwrap();

        let cli = Cli::try_parse_from(["asset-vendor", "-C", dir_arg, "--timeout", "5"]).unwrap();
        let config = cli.load_config().unwrap();

        assert_eq!(config.source_extension, "html");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let cli =
            Cli::try_parse_from(["asset-vendor", "--config", "/nonexistent/vendor.json"]).unwrap();
        assert!(cli.load_config().is_err());
    }

    #[test]
    fn missing_file_still_succeeds() {
        let dir = tempdir().unwrap();
        let dir_arg = dir.path().to_str().unwrap();
        let cli = Cli::try_parse_from(["asset-vendor", "-C", dir_arg, "absent.php"]).unwrap();
        let reporter = MemoryReporter::default();

        execute(
            &cli,
            StubFetcher::default(),
            &reporter,
            VendorConfig::default(),
            |_| true,
        )
        .unwrap();

        assert_eq!(
            reporter.at(Level::Error),
            vec!["File not found: absent.php".to_string()]
        );
        assert!(reporter.at(Level::Warning).is_empty());
    }

    #[test]
    fn directory_mode_uses_confirmation() {
        let dir = tempdir().unwrap();
        let url = "https://cdn.example.com/site.css";
        fs::write(dir.path().join("index.php"), format!("<link href=\"{url}\">")).unwrap();
        let dir_arg = dir.path().to_str().unwrap();
        let cli = Cli::try_parse_from(["asset-vendor", "-C", dir_arg]).unwrap();
        let reporter = MemoryReporter::default();

        execute(
            &cli,
            StubFetcher::default().with_body(url, b"css"),
            &reporter,
            VendorConfig::default(),
            |documents| documents.len() == 1,
        )
        .unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("index.php")).unwrap(),
            "<link href=\"./css/site.css\">"
        );
        assert_eq!(fs::read(dir.path().join("css/site.css")).unwrap(), b"css");
    }
}

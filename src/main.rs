use std::process::ExitCode;

use asset_vendor::{cli, logging};

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        eprintln!("asset-vendor: {err:#}");
    }

    match cli::run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("asset-vendor error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

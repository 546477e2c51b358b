//! # RadioSync Console Entry Point
//!
//! ```text
//! radiosync [--config <path>]
//! ```
//!
//! Reads configurator commands from stdin, one per line, and prints one JSON
//! document per command to stdout. Logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config_path = match parse_args(std::env::args().skip(1)) {
        Ok(path) => path,
        Err(usage) => {
            eprintln!("{}", usage);
            return ExitCode::from(2);
        }
    };

    match radiosync_configurator::run(config_path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("radiosync: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<PathBuf>, &'static str> {
    const USAGE: &str = "usage: radiosync [--config <path>]";

    match args.next().as_deref() {
        None => Ok(None),
        Some("--config") => match (args.next(), args.next()) {
            (Some(path), None) => Ok(Some(PathBuf::from(path))),
            _ => Err(USAGE),
        },
        Some(_) => Err(USAGE),
    }
}

//! # orderly
//!
//! ```text
//! request.json ──► parse ──► orderly-core ──► {"status": ...} on stdout
//! ```
//!
//! Exit codes: `0` accepted, `2` rejected, `1` on any error.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use orderly_cli::{logging, process, Argon2Hasher, CliConfig, CliError, Request};
use orderly_core::Currency;

/// Validate an order, user, or stock item change request.
#[derive(Debug, Parser)]
#[command(name = "orderly", version, about)]
struct Cli {
    /// Request file; reads stdin when omitted or `-`
    input: Option<PathBuf>,

    /// Reference currency (overrides ORDERLY_CURRENCY)
    #[arg(short, long)]
    currency: Option<String>,

    /// Emit single-line JSON
    #[arg(long)]
    compact: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<bool> {
    let cli = Cli::parse();

    let config = CliConfig::load().context("loading configuration")?;
    logging::init_logging(&config.log_filter)?;

    let currency = match cli.currency.as_deref() {
        Some(code) => code
            .parse::<Currency>()
            .map_err(|_| CliError::Currency(code.to_string()))?,
        None => config.currency,
    };
    info!(%currency, "Configuration loaded");

    let raw = read_input(cli.input.as_ref())?;
    let request: Request = serde_json::from_str(&raw).map_err(CliError::Json)?;

    let response = process(request, currency, &Argon2Hasher)?;

    let rendered = if cli.compact || !config.pretty {
        serde_json::to_string(&response.body)?
    } else {
        serde_json::to_string_pretty(&response.body)?
    };
    println!("{rendered}");

    Ok(response.accepted)
}

fn read_input(path: Option<&PathBuf>) -> Result<String, CliError> {
    match path {
        Some(path) if path.as_os_str() != "-" => {
            std::fs::read_to_string(path).map_err(|source| CliError::ReadInput {
                path: path.clone(),
                source,
            })
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(CliError::Stdin)?;
            Ok(buf)
        }
    }
}

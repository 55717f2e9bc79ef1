//! Magpie CLI entrypoint for review bot comment export.

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use tracing::error;

use magpie::github::ExportError;
use magpie::{MagpieConfig, logging};

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if writeln!(io::stderr().lock(), "{err}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ExportError> {
    let config = load_config()?;
    logging::init(&config.log_root(), config.log_level.as_deref())?;

    cli::export_comments::run(&config).await.inspect_err(|err| {
        error!(error = %err, "export failed");
    })
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`ExportError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<MagpieConfig, ExportError> {
    MagpieConfig::load().map_err(|err| ExportError::Configuration {
        message: err.to_string(),
    })
}

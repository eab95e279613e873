//! reqview - print a review summary of a build service change request.

mod cli;
mod config;
mod constants;
mod core;
mod logging;
mod state;

use std::io;

use clap::{CommandFactory, Parser};
use color_eyre::eyre::eyre;
use color_eyre::Result;

use cli::args::Args;
use cli::commands::{self, Outcome};

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(
            shell,
            &mut Args::command(),
            constants::APP_NAME,
            &mut io::stdout(),
        );
        return Ok(());
    }
    // clap enforces REQUEST-ID whenever --completions is absent
    let request_id = args
        .request_id
        .as_deref()
        .ok_or_else(|| eyre!("Missing REQUEST-ID"))?;

    let config = config::resolve(&args.overrides())?;
    logging::init(config.debug);
    tracing::debug!(
        apiurl = %config.apiurl,
        authenticated = config.credentials.is_some(),
        "resolved configuration"
    );

    let client = crate::core::ObsClient::new(&config)?;
    let outcome = commands::run(
        &client,
        request_id,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    )?;

    if let Outcome::Skipped(state) = outcome {
        tracing::debug!(%state, "request not in a reviewable state");
    }
    Ok(())
}

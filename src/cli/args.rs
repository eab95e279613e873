//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;
use clap_complete::Shell;

use crate::config::Overrides;
use crate::constants;

/// reqview - summarize a build service change request for review
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// API endpoint URL or an alias from the config file
    #[arg(short = 'A', long, value_name = "URL/alias", env = constants::ENV_APIURL)]
    pub apiurl: Option<String>,

    /// Log every HTTP exchange with the build service to stderr
    #[arg(long)]
    pub debug: bool,

    /// Path to the config file
    #[arg(short, long, value_name = "PATH", env = constants::ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL", value_enum, conflicts_with = "request_id")]
    pub completions: Option<Shell>,

    /// Identifier of the request to report on
    #[arg(value_name = "REQUEST-ID", required_unless_present = "completions")]
    pub request_id: Option<String>,
}

impl Args {
    /// Config overrides carried by these arguments.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            apiurl: self.apiurl.clone(),
            debug: self.debug,
            config_path: self.config.clone(),
        }
    }
}

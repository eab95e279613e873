//! Tracing initialisation.
//!
//! Logs always go to stderr so stdout carries nothing but the report.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::constants;

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise only warnings are shown, or our own
/// debug output (every HTTP exchange) when `debug` is on.
pub fn init(debug: bool) {
    let fallback = if debug {
        constants::LOG_FILTER_DEBUG
    } else {
        constants::LOG_FILTER_DEFAULT
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .ok();
}

//! Application-wide constants and configuration values.
//!
//! This module defines the static values used throughout reqview,
//! including API defaults, file paths, timeouts, and report labels.

use std::time::Duration;

// === Application Metadata ===

/// Application name (from Cargo.toml).
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
/// Current application version (from Cargo.toml).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// === API Configuration ===

/// Endpoint used when neither the CLI nor the config file names one.
pub const DEFAULT_APIURL: &str = "https://api.opensuse.org";
/// Scheme prepended to endpoints given without one.
pub const DEFAULT_SCHEME: &str = "https://";
/// Timeout for a single HTTP call to the build service.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

// === Path Configuration ===

/// Name of the config subdirectory under the user config dir.
pub const CONFIG_DIR_NAME: &str = "reqview";
/// Name of the config file.
pub const CONFIG_FILE_NAME: &str = "config.toml";

// === Environment Variables ===

/// Overrides the endpoint, same as `--apiurl`.
pub const ENV_APIURL: &str = "REQVIEW_APIURL";
/// Overrides the config file path, same as `--config`.
pub const ENV_CONFIG: &str = "REQVIEW_CONFIG";
/// Overrides the password of the matching `[hosts]` entry.
pub const ENV_PASSWORD: &str = "REQVIEW_PASSWORD";

// === Logging ===

/// Filter used when `RUST_LOG` is unset.
pub const LOG_FILTER_DEFAULT: &str = "warn";
/// Filter used with `--debug` when `RUST_LOG` is unset.
pub const LOG_FILTER_DEBUG: &str = "warn,reqview=debug";

// === Report Layout ===

/// Header of the per-action section.
pub const LABEL_ACTIONS: &str = "ACTIONS";
/// Sub-header of an action's source package listing.
pub const LABEL_SOURCE_FILES: &str = "SOURCE FILES";
/// Sub-header of an action's target package listing.
pub const LABEL_TARGET_FILES: &str = "TARGET FILES";
/// Header of the review list.
pub const LABEL_REVIEWS: &str = "REVIEWS";
/// Header of the linked issue list.
pub const LABEL_ISSUES: &str = "ISSUES";
/// Header of the raw request description.
pub const LABEL_DESCRIPTION: &str = "DESCRIPTION";
/// Indentation of the per-action file listings.
pub const FILES_INDENT: &str = "    ";

// === Error Messages ===

/// Context when the HTTP client cannot be constructed.
pub const ERR_HTTP_CLIENT_BUILD_FAILED: &str = "Failed to build HTTP client";
/// Context for transport failures, followed by the request URL.
pub const ERR_NETWORK_REQUEST_FAILED: &str = "Network request failed";
/// Context when a response body cannot be read.
pub const ERR_READ_CONTENT_FAILED: &str = "Failed to read response body";
/// Prefix of non-success HTTP status errors.
pub const ERR_SERVER_ERROR: &str = "Server returned error: ";

//! Client configuration loading and endpoint resolution.
//!
//! Settings come from a TOML file, the environment and CLI overrides, in
//! increasing order of precedence.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{bail, eyre, WrapErr};
use color_eyre::Result;
use serde::Deserialize;
use url::Url;

use crate::constants;

/// On-disk config file layout.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Endpoint (URL or alias) used when `--apiurl` is not given.
    pub apiurl: Option<String>,
    /// Enable transport debug logging.
    pub debug: bool,
    /// Short names for endpoints, e.g. `obs = "https://api.opensuse.org"`.
    pub aliases: BTreeMap<String, String>,
    /// Credentials keyed by endpoint URL.
    pub hosts: BTreeMap<String, HostEntry>,
}

/// Credentials for one endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HostEntry {
    pub user: Option<String>,
    pub pass: Option<String>,
}

/// Values supplied on the command line (or their env fallbacks).
#[derive(Debug, Default)]
pub struct Overrides {
    pub apiurl: Option<String>,
    pub debug: bool,
    pub config_path: Option<PathBuf>,
}

/// HTTP basic auth credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub apiurl: Url,
    pub credentials: Option<Credentials>,
    pub debug: bool,
}

/// Resolve the configuration from the config file, environment and `overrides`.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or parsed, the
/// endpoint is not a valid http(s) URL, or credentials are incomplete.
pub fn resolve(overrides: &Overrides) -> Result<ResolvedConfig> {
    let file = load(overrides.config_path.as_deref())?;
    let password = std::env::var(constants::ENV_PASSWORD).ok();
    resolve_with(&file, overrides, password)
}

/// Default config file location: `<config dir>/reqview/config.toml`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| {
        dir.join(constants::CONFIG_DIR_NAME)
            .join(constants::CONFIG_FILE_NAME)
    })
}

/// Load the config file. An explicit path must exist; the default one may not.
fn load(explicit: Option<&Path>) -> Result<ConfigFile> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.is_file() => path,
            _ => return Ok(ConfigFile::default()),
        },
    };

    let content = std::fs::read_to_string(&path)
        .wrap_err_with(|| format!("Failed to read config file {}", path.display()))?;
    parse(&content).wrap_err_with(|| format!("Invalid config file {}", path.display()))
}

/// Parse config file contents.
///
/// # Errors
///
/// Returns an error if `content` is not valid TOML for [`ConfigFile`].
pub fn parse(content: &str) -> Result<ConfigFile> {
    Ok(toml::from_str(content)?)
}

fn resolve_with(
    file: &ConfigFile,
    overrides: &Overrides,
    password_env: Option<String>,
) -> Result<ResolvedConfig> {
    let requested = overrides
        .apiurl
        .as_deref()
        .or(file.apiurl.as_deref())
        .unwrap_or(constants::DEFAULT_APIURL);
    let apiurl = expand_apiurl(requested, &file.aliases)?;

    let mut credentials = None;
    for (host, entry) in &file.hosts {
        let host_url =
            normalize_url(host).wrap_err_with(|| format!("Invalid [hosts] entry '{host}'"))?;
        if host_url != apiurl {
            continue;
        }
        if let Some(user) = &entry.user {
            let password = password_env
                .clone()
                .or_else(|| entry.pass.clone())
                .ok_or_else(|| {
                    eyre!(
                        "No password for user '{user}' at {apiurl} (set `pass` or {})",
                        constants::ENV_PASSWORD
                    )
                })?;
            credentials = Some(Credentials {
                user: user.clone(),
                password,
            });
        }
        break;
    }

    Ok(ResolvedConfig {
        apiurl,
        credentials,
        debug: overrides.debug || file.debug,
    })
}

/// Map an alias or bare host to a normalized endpoint URL.
fn expand_apiurl(value: &str, aliases: &BTreeMap<String, String>) -> Result<Url> {
    let value = value.trim();
    let expanded = aliases.get(value).map_or(value, String::as_str);
    normalize_url(expanded)
}

fn normalize_url(value: &str) -> Result<Url> {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        bail!("Empty API URL");
    }
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("{}{trimmed}", constants::DEFAULT_SCHEME)
    };

    let url = Url::parse(&with_scheme).wrap_err_with(|| format!("Invalid API URL '{value}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("Unsupported scheme '{}' in API URL '{value}'", url.scheme());
    }
    if url.host_str().is_none() {
        bail!("API URL '{value}' has no host");
    }
    Ok(url)
}

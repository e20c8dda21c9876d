//! Configuration data model.
//!
//! `FileConfig` mirrors the TOML file with every field optional; `Config` is
//! the resolved runtime view after defaults and environment overrides.

use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ConfigError;

/// Where `get_tty` takes its answer from.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TtySource {
    /// Report `session.placeholder_tty` for every resolved session.
    #[default]
    Placeholder,
    /// Query the session's `tty` variable through the API.
    Variable,
}

impl FromStr for TtySource {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "placeholder" => Ok(Self::Placeholder),
            "variable" => Ok(Self::Variable),
            other => Err(ConfigError::Invalid(format!(
                "unknown tty source `{other}`; expected `placeholder` or `variable`"
            ))),
        }
    }
}

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub connection: ConnectionConfig,
    pub session: SessionConfig,
}

/// How to reach iTerm2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Unix socket tried first; `None` when no home directory is known.
    pub socket_path: Option<PathBuf>,
    /// TCP websocket URL used when the socket does not exist.
    pub url: String,
    /// Sent as `x-iterm2-advisory-name`.
    pub advisory_name: String,
}

/// Per-session command behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub tty_source: TtySource,
    pub placeholder_tty: String,
}

/// Raw TOML file shape.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(super) struct FileConfig {
    pub connection: FileConnectionConfig,
    pub session: FileSessionConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(super) struct FileConnectionConfig {
    pub socket_path: Option<String>,
    pub url: Option<String>,
    pub advisory_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(super) struct FileSessionConfig {
    pub tty_source: Option<TtySource>,
    pub placeholder_tty: Option<String>,
}

//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. Environment variables (`ITERM_BRIDGE_SOCKET`, `ITERM_BRIDGE_URL`,
//!    `ITERM_BRIDGE_TTY_SOURCE`, `ITERM_BRIDGE_PLACEHOLDER_TTY`)
//! 2. TOML file specified via --config CLI flag
//! 3. ./iterm-bridge.toml in the current directory
//! 4. $XDG_CONFIG_HOME/iterm-bridge/config.toml (or
//!    ~/.config/iterm-bridge/config.toml)
//! 5. Built-in defaults

use crate::error::ConfigError;
use std::path::{Path, PathBuf};
use tracing::debug;

mod defaults;
mod types;

use defaults::{
    DEFAULT_ADVISORY_NAME, DEFAULT_API_URL, DEFAULT_PLACEHOLDER_TTY, DEFAULT_SOCKET_RELATIVE,
    GLOBAL_CONFIG_DIR, GLOBAL_CONFIG_FILE, LOCAL_CONFIG_FILE,
};
use types::FileConfig;
pub use types::{Config, ConnectionConfig, SessionConfig, TtySource};

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from --config flag).
pub fn load_config(path_override: Option<&str>) -> Result<Config, ConfigError> {
    load_config_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        config_root_dir,
        dirs::home_dir(),
    )
}

fn load_config_from_sources<FRead, FEnv, FRoot>(
    path_override: Option<&str>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
    home: Option<PathBuf>,
) -> Result<Config, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let (text, source) = read_config_text(path_override, &read_file, &config_root)?;
    debug!(source = %source.display(), "loaded configuration");
    let parsed: FileConfig = toml::from_str(&text)?;
    let mut config = resolve(parsed, home.as_deref());
    apply_env_overrides(&mut config, &env_lookup, home.as_deref())?;
    if config.connection.url.trim().is_empty() {
        return Err(ConfigError::Invalid("connection.url cannot be empty".into()));
    }
    Ok(config)
}

/// Read config text from the highest-precedence available source.
fn read_config_text<FRead, FRoot>(
    path_override: Option<&str>,
    read_file: &FRead,
    config_root: &FRoot,
) -> Result<(String, PathBuf), ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FRoot: Fn() -> Option<PathBuf>,
{
    // An explicit path must exist; the implicit ones are optional.
    if let Some(p) = path_override {
        let path = PathBuf::from(p);
        let text = read_file(&path)?;
        return Ok((text, path));
    }

    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if let Ok(text) = read_file(&local) {
        return Ok((text, local));
    }
    if let Some(dir) = config_root() {
        let global = dir.join(GLOBAL_CONFIG_DIR).join(GLOBAL_CONFIG_FILE);
        if let Ok(text) = read_file(&global) {
            return Ok((text, global));
        }
    }

    Ok((String::new(), PathBuf::from("<built-in defaults>")))
}

fn resolve(file: FileConfig, home: Option<&Path>) -> Config {
    let socket_path = match file.connection.socket_path {
        Some(raw) => socket_path_from(&raw, home),
        None => home.map(|home| home.join(DEFAULT_SOCKET_RELATIVE)),
    };
    Config {
        connection: ConnectionConfig {
            socket_path,
            url: file
                .connection
                .url
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            advisory_name: file
                .connection
                .advisory_name
                .unwrap_or_else(|| DEFAULT_ADVISORY_NAME.to_string()),
        },
        session: SessionConfig {
            tty_source: file.session.tty_source.unwrap_or_default(),
            placeholder_tty: file
                .session
                .placeholder_tty
                .unwrap_or_else(|| DEFAULT_PLACEHOLDER_TTY.to_string()),
        },
    }
}

fn apply_env_overrides<FEnv>(
    config: &mut Config,
    env_lookup: &FEnv,
    home: Option<&Path>,
) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(raw) = env_lookup("ITERM_BRIDGE_SOCKET") {
        config.connection.socket_path = socket_path_from(&raw, home);
    }
    if let Some(url) = env_lookup("ITERM_BRIDGE_URL") {
        config.connection.url = url;
    }
    if let Some(raw) = env_lookup("ITERM_BRIDGE_TTY_SOURCE") {
        config.session.tty_source = raw.parse()?;
    }
    if let Some(tty) = env_lookup("ITERM_BRIDGE_PLACEHOLDER_TTY") {
        config.session.placeholder_tty = tty;
    }
    Ok(())
}

/// An empty value disables the Unix socket; `~` expands to the home directory.
fn socket_path_from(raw: &str, home: Option<&Path>) -> Option<PathBuf> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(expand_home(trimmed, home))
}

fn expand_home(raw: &str, home: Option<&Path>) -> PathBuf {
    match (raw, home) {
        ("~", Some(home)) => home.to_path_buf(),
        (_, Some(home)) if raw.starts_with("~/") => home.join(&raw[2..]),
        _ => PathBuf::from(raw),
    }
}

/// Root for per-user config (`$XDG_CONFIG_HOME`, else `~/.config`).
pub fn config_root_dir() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".config"))
        .or_else(dirs::config_dir)
}

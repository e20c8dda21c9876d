//! Default configuration constants.

/// iTerm2's private API socket, relative to the home directory.
pub(super) const DEFAULT_SOCKET_RELATIVE: &str =
    "Library/Application Support/iTerm2/private/socket";
/// iTerm2's TCP websocket endpoint, used when the Unix socket is absent.
pub(super) const DEFAULT_API_URL: &str = "ws://localhost:1912";
/// Name iTerm2 shows when asking the user to allow the connection.
pub(super) const DEFAULT_ADVISORY_NAME: &str = "iterm-bridge";
/// Device path reported by `get_tty` in placeholder mode.
pub(super) const DEFAULT_PLACEHOLDER_TTY: &str = "/dev/ttys000";
/// Config file looked up in the working directory.
pub(super) const LOCAL_CONFIG_FILE: &str = "iterm-bridge.toml";
/// Directory under the config root holding the global config file.
pub(super) const GLOBAL_CONFIG_DIR: &str = "iterm-bridge";
/// Global config file name.
pub(super) const GLOBAL_CONFIG_FILE: &str = "config.toml";

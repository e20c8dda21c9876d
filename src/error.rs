//! Unified error types for the bridge.
//!
//! Every variant's `Display` is the text that ends up in the `error` field of
//! the JSON result, so messages here are user-facing.

use std::fmt;

// ---------------------------------------------------------------------------
// UsageError
// ---------------------------------------------------------------------------

/// Invalid invocations, detected before any connection is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    NoCommand,
    NoText,
    NoControlCharacter,
    UnknownCommand(String),
    UnknownControlCharacter(String),
    /// Argument parsing failed outside the command grammar (bad flag, etc).
    InvalidArguments(String),
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCommand => write!(f, "No command specified"),
            Self::NoText => write!(f, "No text provided"),
            Self::NoControlCharacter => write!(f, "No control character provided"),
            Self::UnknownCommand(name) => write!(f, "Unknown command: {name}"),
            Self::UnknownControlCharacter(name) => write!(f, "Unknown control character: {name}"),
            Self::InvalidArguments(msg) => write!(f, "invalid arguments: {msg}"),
        }
    }
}

impl std::error::Error for UsageError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// HostError
// ---------------------------------------------------------------------------

/// Errors talking to the iTerm2 scripting API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// iTerm2 could not be reached or refused the handshake.
    Connect(String),
    /// The websocket failed mid-request.
    Transport(String),
    /// A reply could not be decoded or had an unexpected shape.
    Protocol(String),
    /// iTerm2 answered with an explicit error string.
    Server(String),
    /// iTerm2 no longer knows the session the request targeted.
    SessionNotFound,
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect(msg) => write!(f, "failed to connect to iTerm2: {msg}"),
            Self::Transport(msg) => write!(f, "iTerm2 connection error: {msg}"),
            Self::Protocol(msg) => write!(f, "unexpected reply from iTerm2: {msg}"),
            Self::Server(msg) => write!(f, "iTerm2 error: {msg}"),
            Self::SessionNotFound => write!(f, "session not found"),
        }
    }
}

impl std::error::Error for HostError {}

impl From<tokio_tungstenite::tungstenite::Error> for HostError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

impl From<prost::DecodeError> for HostError {
    fn from(e: prost::DecodeError) -> Self {
        Self::Protocol(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// BridgeError (top-level)
// ---------------------------------------------------------------------------

/// Top-level error type; one of these becomes the `error` of a failed result.
#[derive(Debug)]
pub enum BridgeError {
    Usage(UsageError),
    Config(ConfigError),
    Host(HostError),
    /// No current window, tab, or session could be resolved.
    NoActiveSession,
    /// The session reported no controlling terminal.
    TtyUnavailable,
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Usage(e) => write!(f, "{e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Host(e) => write!(f, "{e}"),
            Self::NoActiveSession => write!(f, "No active session found"),
            Self::TtyUnavailable => write!(f, "Could not get TTY path"),
        }
    }
}

impl std::error::Error for BridgeError {}

impl From<UsageError> for BridgeError {
    fn from(e: UsageError) -> Self {
        Self::Usage(e)
    }
}

impl From<ConfigError> for BridgeError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<HostError> for BridgeError {
    fn from(e: HostError) -> Self {
        match e {
            // A session that vanished between resolution and use is reported
            // the same way as one that never resolved.
            HostError::SessionNotFound => Self::NoActiveSession,
            other => Self::Host(other),
        }
    }
}

//! One command against the current iTerm2 session.
//!
//! Each run opens its own connection, resolves the current session, performs
//! the command and closes the connection on every path before returning.
//! Failures never escape: they become a failed [`Outcome`].

use tracing::{debug, warn};

use crate::command::Command;
use crate::config::{SessionConfig, TtySource};
use crate::control::control_text;
use crate::error::{BridgeError, HostError};
use crate::host::{AppSnapshot, Connector, HostConnection};
use crate::outcome::Outcome;

/// Session variable holding the controlling terminal's device path.
const TTY_VARIABLE: &str = "tty";

/// Run `command` and describe the result.
pub async fn run(
    command: &Command,
    connector: &dyn Connector,
    settings: &SessionConfig,
) -> Outcome {
    match execute(command, connector, settings).await {
        Ok(outcome) => outcome,
        Err(err) => {
            if let BridgeError::Host(HostError::Connect(_)) = &err {
                warn!(command = command.name(), error = %err, "iTerm2 is unreachable");
            } else {
                debug!(command = command.name(), error = %err, "command failed");
            }
            Outcome::failure(err.to_string())
        }
    }
}

async fn execute(
    command: &Command,
    connector: &dyn Connector,
    settings: &SessionConfig,
) -> Result<Outcome, BridgeError> {
    let mut host = connector.connect().await?;
    let result = perform(command, host.as_mut(), settings).await;
    if let Err(err) = host.close().await {
        warn!(error = %err, "failed to close iTerm2 connection");
    }
    result
}

async fn perform(
    command: &Command,
    host: &mut dyn HostConnection,
    settings: &SessionConfig,
) -> Result<Outcome, BridgeError> {
    let session_id = current_session(host).await?;
    debug!(command = command.name(), session = %session_id, "resolved current session");

    match command {
        Command::WriteText(text) => {
            host.send_text(&session_id, text).await?;
            Ok(Outcome::ok())
        }
        Command::GetContent => {
            let lines = host.screen_lines(&session_id).await?;
            Ok(Outcome::content(lines.join("\n")))
        }
        Command::SendControl { name, byte } => {
            debug!(control = %name, byte, "sending control character");
            host.send_text(&session_id, &control_text(*byte)).await?;
            Ok(Outcome::ok())
        }
        Command::GetTty => tty_path(host, &session_id, settings).await.map(Outcome::tty),
        // iTerm2 does not expose foreground-job state through the API.
        Command::IsProcessing => Ok(Outcome::processing(false)),
    }
}

/// Resolve current window, then current tab, then current session.
pub async fn current_session(host: &mut dyn HostConnection) -> Result<String, BridgeError> {
    let layout = host.list_windows().await?;
    let focus = host.focus().await?;
    AppSnapshot::new(layout, &focus)
        .current_session()
        .map(str::to_string)
        .ok_or(BridgeError::NoActiveSession)
}

async fn tty_path(
    host: &mut dyn HostConnection,
    session_id: &str,
    settings: &SessionConfig,
) -> Result<String, BridgeError> {
    match settings.tty_source {
        TtySource::Placeholder => Ok(settings.placeholder_tty.clone()),
        TtySource::Variable => host
            .session_variable(session_id, TTY_VARIABLE)
            .await?
            .filter(|tty| !tty.is_empty())
            .ok_or(BridgeError::TtyUnavailable),
    }
}

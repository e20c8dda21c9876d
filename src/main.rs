//! CLI entry point for iterm-bridge.

mod cli;

use clap::error::ErrorKind;
use clap::Parser;
use iterm_bridge::command::Command;
use iterm_bridge::config::load_config;
use iterm_bridge::dispatch;
use iterm_bridge::error::{BridgeError, UsageError};
use iterm_bridge::host::WebsocketConnector;
use iterm_bridge::logging;
use iterm_bridge::outcome::Outcome;
use tracing::debug;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = match cli::Args::try_parse() {
        Ok(args) => args,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                let usage = UsageError::InvalidArguments(clap_message(&err.to_string()));
                emit(&Outcome::failure(usage.to_string()));
                return;
            }
        },
    };

    logging::init(args.verbose);
    if !args.extra().is_empty() {
        debug!(ignored = ?args.extra(), "ignoring extra arguments");
    }

    let outcome = match prepare(&args) {
        Ok((command, config)) => {
            let connector = WebsocketConnector::new(config.connection);
            dispatch::run(&command, &connector, &config.session).await
        }
        Err(err) => Outcome::failure(err.to_string()),
    };
    emit(&outcome);
}

/// Validate the command before loading config so usage errors never depend
/// on the environment.
fn prepare(args: &cli::Args) -> Result<(Command, iterm_bridge::config::Config), BridgeError> {
    let command = Command::parse(args.command(), args.argument())?;
    let config = load_config(args.config.as_deref())?;
    Ok((command, config))
}

fn emit(outcome: &Outcome) {
    println!("{}", outcome.render());
}

/// First line of a clap error without its `error: ` prefix.
fn clap_message(rendered: &str) -> String {
    let line = rendered.lines().next().unwrap_or_default().trim();
    line.strip_prefix("error:").unwrap_or(line).trim().to_string()
}

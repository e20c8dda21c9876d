//! iterm-bridge: drive the current iTerm2 session from the command line.
//!
//! Each invocation parses one command, opens a transient connection to
//! iTerm2's scripting API, resolves the current window, tab and session,
//! performs the command and reports the result as one JSON line.
//!
//! # Quick start
//!
//! ```no_run
//! use iterm_bridge::command::Command;
//! use iterm_bridge::config::load_config;
//! use iterm_bridge::dispatch;
//! use iterm_bridge::host::WebsocketConnector;
//!
//! # async fn example() {
//! let config = load_config(None).unwrap();
//! let connector = WebsocketConnector::new(config.connection);
//! let command = Command::parse(Some("get_content"), None).unwrap();
//! let outcome = dispatch::run(&command, &connector, &config.session).await;
//! println!("{}", outcome.render());
//! # }
//! ```

pub mod build_info;
pub mod command;
pub mod config;
pub mod control;
pub mod dispatch;
pub mod error;
pub mod host;
pub mod logging;
pub mod outcome;
#[cfg(test)]
pub mod testsupport;

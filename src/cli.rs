//! CLI argument parsing via clap.

use clap::Parser;

use iterm_bridge::build_info;

/// Drive the current iTerm2 session from the command line.
///
/// Commands: write_text <text>, get_content, send_control <name>, get_tty,
/// is_processing. Every invocation prints one JSON line on stdout.
#[derive(Debug, Parser)]
#[command(name = "iterm-bridge", version, long_version = build_info::LONG_VERSION)]
pub struct Args {
    /// Command, then its argument (text for write_text, control name for
    /// send_control). Options are only recognized before the command; the
    /// argument is taken verbatim even when it starts with `-`.
    #[arg(trailing_var_arg = true, value_name = "COMMAND [ARGUMENT]")]
    pub invocation: Vec<String>,

    /// Path to config file (default: ./iterm-bridge.toml or
    /// ~/.config/iterm-bridge/config.toml).
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    /// Log debug diagnostics to stderr.
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Args {
    pub fn command(&self) -> Option<&str> {
        self.invocation.first().map(String::as_str)
    }

    pub fn argument(&self) -> Option<&str> {
        self.invocation.get(1).map(String::as_str)
    }

    /// Anything after the argument; ignored.
    pub fn extra(&self) -> &[String] {
        self.invocation.get(2..).unwrap_or_default()
    }
}

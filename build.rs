//! Embeds commit and build time for `iterm-bridge --version`.
//!
//! Either value can be pinned from the environment for reproducible builds.
//! Missing git or date tooling yields "unknown" / a unix timestamp.

use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

const GIT_HASH_VAR: &str = "ITERM_BRIDGE_BUILD_GIT_HASH";
const TIMESTAMP_VAR: &str = "ITERM_BRIDGE_BUILD_TIMESTAMP";

fn main() {
    watch_git_head();
    emit(GIT_HASH_VAR, || {
        capture("git", &["describe", "--always", "--dirty", "--abbrev=12"])
            .unwrap_or_else(|| "unknown".into())
    });
    emit(TIMESTAMP_VAR, || {
        capture("date", &["-u", "+%Y-%m-%dT%H:%M:%SZ"]).unwrap_or_else(unix_seconds)
    });
}

/// Export `name` to the crate, preferring a pinned value from the environment.
fn emit(name: &str, compute: impl FnOnce() -> String) {
    println!("cargo:rerun-if-env-changed={name}");
    let value = std::env::var(name).unwrap_or_else(|_| compute());
    println!("cargo:rustc-env={name}={value}");
}

fn watch_git_head() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    let branch = std::fs::read_to_string(".git/HEAD")
        .ok()
        .and_then(|head| head.trim().strip_prefix("ref: ").map(str::to_string));
    if let Some(branch) = branch {
        println!("cargo:rerun-if-changed=.git/{branch}");
    }
}

fn unix_seconds() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0);
    format!("unix:{secs}")
}

fn capture(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

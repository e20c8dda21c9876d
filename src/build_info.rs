//! Compile-time build metadata exposed to the CLI.

/// Semver package version from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// VCS commit hash captured at build time.
pub const GIT_COMMIT: &str = env!("ITERM_BRIDGE_BUILD_GIT_HASH");

/// Build timestamp captured at compile time.
pub const BUILD_TIMESTAMP: &str = env!("ITERM_BRIDGE_BUILD_TIMESTAMP");

/// Long version block shown by `iterm-bridge --version`.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("ITERM_BRIDGE_BUILD_GIT_HASH"),
    "\nbuilt: ",
    env!("ITERM_BRIDGE_BUILD_TIMESTAMP")
);

/// Value sent in the `x-iterm2-library-version` handshake header.
pub fn library_version() -> String {
    format!("rust {VERSION}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_version_includes_all_fields() {
        assert!(LONG_VERSION.starts_with(VERSION));
        assert!(LONG_VERSION.contains(GIT_COMMIT));
        assert!(LONG_VERSION.contains(BUILD_TIMESTAMP));
    }

    #[test]
    fn library_version_names_language_and_version() {
        assert_eq!(library_version(), format!("rust {VERSION}"));
    }
}

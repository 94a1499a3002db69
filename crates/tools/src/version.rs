use std::fmt;

use clap::Args;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const BUILD_HASH: &str = env!("BUILD_HASH");

#[derive(Args, Clone, Copy, Debug)]
pub struct VersionFlag {
    #[arg(
        long,
        global = true,
        default_value_t = false,
        help = "Print the version of this tool"
    )]
    version: bool,
}

impl From<VersionFlag> for bool {
    fn from(val: VersionFlag) -> Self {
        val.version
    }
}

/// Displays as `<version>-<short build hash>`.
pub struct Version;

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short_hash = BUILD_HASH.get(..8).unwrap_or(BUILD_HASH);
        write!(f, "{VERSION}-{short_hash}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_starts_with_package_version() {
        let version = Version.to_string();
        assert!(version.starts_with(VERSION));
        assert!(version.len() > VERSION.len() + 1);
    }
}

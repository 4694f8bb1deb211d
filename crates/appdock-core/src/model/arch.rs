//! Architecture filters for capability lists.

use crate::platform::Platform;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An OS + CPU wildcard pattern, written as `"os-cpu"` (e.g. `"windows-*"`,
/// `"linux-x86_64"`, `"*-*"`).
///
/// A capability list is only handled on machines its architecture matches.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Architecture {
    /// OS name or `"*"`.
    pub os: String,
    /// CPU name or `"*"`.
    pub cpu: String,
}

impl Architecture {
    /// The wildcard architecture matching every machine.
    pub fn any() -> Self {
        Self {
            os: "*".to_string(),
            cpu: "*".to_string(),
        }
    }

    /// Parse an `"os-cpu"` pattern. A bare `"os"` segment implies `"os-*"`.
    pub fn parse(pattern: &str) -> Self {
        match pattern.split_once('-') {
            Some((os, cpu)) => Self {
                os: os.to_string(),
                cpu: cpu.to_string(),
            },
            None => Self {
                os: pattern.to_string(),
                cpu: "*".to_string(),
            },
        }
    }

    /// Whether this filter matches the given machine.
    pub fn is_compatible(&self, platform: &Platform) -> bool {
        (self.os == "*" || self.os == platform.os) && (self.cpu == "*" || self.cpu == platform.cpu)
    }
}

impl Default for Architecture {
    fn default() -> Self {
        Self::any()
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.cpu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_pattern() {
        let arch = Architecture::parse("windows-x86_64");
        assert_eq!(arch.os, "windows");
        assert_eq!(arch.cpu, "x86_64");
    }

    #[test]
    fn test_parse_bare_os() {
        let arch = Architecture::parse("linux");
        assert_eq!(arch.os, "linux");
        assert_eq!(arch.cpu, "*");
    }

    #[test]
    fn test_wildcard_matches_everything() {
        assert!(Architecture::any().is_compatible(&Platform::windows()));
        assert!(Architecture::any().is_compatible(&Platform::unix()));
        assert!(Architecture::any().is_compatible(&Platform::unknown()));
    }

    #[test]
    fn test_windows_filter_excluded_on_unix() {
        let arch = Architecture::parse("windows-*");
        assert!(arch.is_compatible(&Platform::windows()));
        assert!(!arch.is_compatible(&Platform::unix()));
    }

    #[test]
    fn test_cpu_filter() {
        let arch = Architecture::parse("linux-aarch64");
        let mut platform = Platform::unix();
        assert!(!arch.is_compatible(&platform));
        platform.cpu = "aarch64".to_string();
        assert!(arch.is_compatible(&platform));
    }

    #[test]
    fn test_display_roundtrip() {
        let arch = Architecture::parse("windows-*");
        assert_eq!(Architecture::parse(&arch.to_string()), arch);
    }
}

//! Explicit platform context for dispatch decisions.
//!
//! Apply/unapply routing depends on the OS family, so the running platform
//! is passed around as an explicit value instead of being queried through
//! globals. This keeps the dispatcher a pure function of its inputs and
//! lets tests exercise any (OS family, scope) combination on any host.

pub mod paths;

use serde::{Deserialize, Serialize};

/// Broad OS family used to select platform collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OsFamily {
    /// Windows desktop (registry-based integration, `.lnk` shortcuts).
    Windows,
    /// Unix-like desktops (FreeDesktop entries, MIME databases).
    Unix,
    /// Anything else; every integration dispatch is a silent no-op.
    Unknown,
}

/// The machine an access point list is being applied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// OS name as matched by capability-list architecture filters
    /// (`"windows"`, `"linux"`, `"macos"`, ...).
    pub os: String,
    /// CPU architecture (`"x86_64"`, `"aarch64"`, ...).
    pub cpu: String,
    /// OS family used for collaborator selection.
    pub family: OsFamily,
    /// Windows 8 or later: AppRegistration is always machine-scoped and may
    /// be applied without the machine-wide flag.
    pub modern_windows: bool,
    /// Hostname used for per-machine app entry filtering. May be empty when
    /// the environment does not expose one.
    pub hostname: String,
}

impl Platform {
    /// Detect the running platform.
    pub fn current() -> Self {
        let os = std::env::consts::OS.to_string();
        let family = match std::env::consts::OS {
            "windows" => OsFamily::Windows,
            "linux" | "macos" | "freebsd" | "netbsd" | "openbsd" => OsFamily::Unix,
            _ => OsFamily::Unknown,
        };
        Self {
            os,
            cpu: std::env::consts::ARCH.to_string(),
            family,
            // Down-level Windows versions are out of support; every Windows
            // host we can run on has the machine-scoped AppRegistration path.
            modern_windows: family == OsFamily::Windows,
            hostname: hostname_from_env(),
        }
    }

    /// A modern Windows machine. Intended for tests and diffing.
    pub fn windows() -> Self {
        Self {
            os: "windows".to_string(),
            cpu: "x86_64".to_string(),
            family: OsFamily::Windows,
            modern_windows: true,
            hostname: String::new(),
        }
    }

    /// A down-level Windows machine where AppRegistration is only available
    /// machine-wide.
    pub fn legacy_windows() -> Self {
        Self {
            modern_windows: false,
            ..Self::windows()
        }
    }

    /// A Linux machine. Intended for tests and diffing.
    pub fn unix() -> Self {
        Self {
            os: "linux".to_string(),
            cpu: "x86_64".to_string(),
            family: OsFamily::Unix,
            modern_windows: false,
            hostname: String::new(),
        }
    }

    /// A platform outside the supported families; all dispatch no-ops.
    pub fn unknown() -> Self {
        Self {
            os: "unknown".to_string(),
            cpu: "unknown".to_string(),
            family: OsFamily::Unknown,
            modern_windows: false,
            hostname: String::new(),
        }
    }
}

fn hostname_from_env() -> String {
    std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_platform_family_matches_os() {
        let platform = Platform::current();
        match platform.os.as_str() {
            "windows" => assert_eq!(platform.family, OsFamily::Windows),
            "linux" | "macos" => assert_eq!(platform.family, OsFamily::Unix),
            _ => {}
        }
    }

    #[test]
    fn test_test_platforms() {
        assert_eq!(Platform::windows().family, OsFamily::Windows);
        assert!(Platform::windows().modern_windows);
        assert!(!Platform::legacy_windows().modern_windows);
        assert_eq!(Platform::unix().family, OsFamily::Unix);
        assert_eq!(Platform::unknown().family, OsFamily::Unknown);
    }
}

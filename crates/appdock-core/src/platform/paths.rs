//! Well-known desktop directories for platform collaborators.
//!
//! The core never writes to these locations itself; collaborator
//! implementations use them as the default targets for menu entries,
//! desktop icons and autostart registrations.

use crate::error::{IntegrationError, Result};
use std::path::PathBuf;

/// Directory where application menu entries live.
///
/// # Platform Behavior
/// - **Linux**: `~/.local/share/applications` (XDG spec)
/// - **Windows**: `%APPDATA%/Microsoft/Windows/Start Menu/Programs`
/// - **macOS**: `/Applications`
pub fn menu_dir() -> Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let home = dirs::home_dir().ok_or_else(|| IntegrationError::Config {
            message: "Could not determine home directory".to_string(),
        })?;
        Ok(home.join(".local").join("share").join("applications"))
    }

    #[cfg(target_os = "windows")]
    {
        let data_dir = dirs::data_dir().ok_or_else(|| IntegrationError::Config {
            message: "Could not determine app data directory".to_string(),
        })?;
        Ok(data_dir
            .join("Microsoft")
            .join("Windows")
            .join("Start Menu")
            .join("Programs"))
    }

    #[cfg(target_os = "macos")]
    {
        Ok(PathBuf::from("/Applications"))
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
    {
        Err(IntegrationError::Config {
            message: "Unsupported platform for menu directory".to_string(),
        })
    }
}

/// The user's desktop directory.
pub fn desktop_dir() -> Result<PathBuf> {
    dirs::desktop_dir().ok_or_else(|| IntegrationError::Config {
        message: "Could not determine desktop directory".to_string(),
    })
}

/// Directory where autostart registrations live.
///
/// # Platform Behavior
/// - **Linux/macOS**: `~/.config/autostart` (XDG autostart spec)
/// - **Windows**: `%APPDATA%/Microsoft/Windows/Start Menu/Programs/Startup`
pub fn autostart_dir() -> Result<PathBuf> {
    #[cfg(unix)]
    {
        let config = dirs::config_dir().ok_or_else(|| IntegrationError::Config {
            message: "Could not determine config directory".to_string(),
        })?;
        Ok(config.join("autostart"))
    }

    #[cfg(windows)]
    {
        Ok(menu_dir()?.join("Startup"))
    }
}

/// File extension for shortcut artifacts on the current platform.
///
/// # Platform Behavior
/// - **Linux**: `desktop` (freedesktop .desktop files)
/// - **Windows**: `lnk` (Windows shortcut files)
/// - **macOS**: `app`
pub fn shortcut_extension() -> &'static str {
    #[cfg(target_os = "linux")]
    {
        "desktop"
    }
    #[cfg(target_os = "windows")]
    {
        "lnk"
    }
    #[cfg(target_os = "macos")]
    {
        "app"
    }
    #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
    {
        "shortcut"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_dir() {
        let result = menu_dir();

        #[cfg(any(target_os = "linux", target_os = "windows", target_os = "macos"))]
        assert!(result.is_ok());
        #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
        assert!(result.is_err());
    }

    #[test]
    fn test_desktop_dir_does_not_panic() {
        // May fail in headless environments; only check it returns.
        let _ = desktop_dir();
    }

    #[test]
    fn test_shortcut_extension() {
        let ext = shortcut_extension();

        #[cfg(target_os = "linux")]
        assert_eq!(ext, "desktop");

        #[cfg(target_os = "windows")]
        assert_eq!(ext, "lnk");
    }
}

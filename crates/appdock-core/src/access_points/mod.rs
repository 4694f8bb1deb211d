//! Access points: user-requested desktop artifacts realizing capabilities.
//!
//! Where a capability states what a program *could* do, an access point is
//! the record that the user asked for a concrete piece of desktop wiring: a
//! menu entry, a desktop icon, a default-program registration. Each variant
//! claims string identifiers in the global access-point conflict namespace;
//! the registry rejects additions whose claims intersect those of another
//! application. Conflict IDs are regenerated on demand and never persisted.

mod list;
mod mock;

pub use list::AccessPointList;
pub use mock::MockAccessPoint;

use crate::app_entry::AppEntry;
use crate::error::Result;
use crate::model::{
    AutoPlayCapability, Command, ContextMenuCapability, DefaultProgramCapability,
    FileTypeCapability, UrlProtocolCapability,
};
use crate::platform::Platform;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Reference to a capability by ID, shared by all default-access-point
/// variants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CapabilityRef {
    /// ID of the referenced capability. Required; resolution fails on an
    /// empty or dangling reference.
    pub capability: String,
}

impl CapabilityRef {
    pub fn new(capability: impl Into<String>) -> Self {
        Self {
            capability: capability.into(),
        }
    }
}

/// Launch parameters shared by all command-access-point variants: a display
/// name plus the feed command to start.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AppCommand {
    /// Name the artifact is created under (shortcut file name, menu label).
    pub name: String,
    /// Feed command to launch; `None` means the feed's "run" command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

impl AppCommand {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: None,
        }
    }

    pub fn with_command(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: Some(command.into()),
        }
    }

    /// The feed command this access point launches.
    pub fn command_name(&self) -> &str {
        self.command.as_deref().unwrap_or(Command::NAME_RUN)
    }
}

/// An application-menu entry below an optional category.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MenuEntry {
    #[serde(flatten)]
    pub launch: AppCommand,
    /// Menu category path; empty places the entry at the top level.
    #[serde(default)]
    pub category: String,
}

/// The closed set of access point variants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AccessPoint {
    /// Registers every compatible capability of the app entry at once.
    /// Carries no capability reference of its own; its conflict set is the
    /// union over live capability lists, recomputed on every call.
    CapabilityRegistration,
    /// File-type handler registration for one file-type capability.
    FileType(CapabilityRef),
    /// URL-scheme handler registration for one url-protocol capability.
    UrlProtocol(CapabilityRef),
    /// AutoPlay handler registration for one auto-play capability.
    AutoPlay(CapabilityRef),
    /// Context-menu entry for one context-menu capability.
    ContextMenu(CapabilityRef),
    /// Default-program client registration for one default-program capability.
    DefaultProgram(CapabilityRef),
    /// Launch on login.
    AutoStart(AppCommand),
    /// Icon on the desktop.
    DesktopIcon(AppCommand),
    /// Entry in the application menu.
    MenuEntry(MenuEntry),
    /// Icon in the quick-launch bar. Per-user only.
    QuickLaunch(AppCommand),
    /// Entry in the file manager's "Send to" menu. Per-user only.
    SendTo(AppCommand),
    /// Test access point: optionally validates a capability reference and
    /// touches sentinel files instead of real OS artifacts.
    Mock(MockAccessPoint),
}

impl AccessPoint {
    /// The identifiers this access point claims in the global conflict
    /// namespace.
    ///
    /// Deterministic for value-equal inputs. Capability-referencing variants
    /// resolve their reference first and fail on dangling or mistyped IDs.
    pub fn conflict_ids(&self, entry: &AppEntry, platform: &Platform) -> Result<BTreeSet<String>> {
        match self {
            AccessPoint::CapabilityRegistration => Ok(entry
                .compatible_capabilities(platform)
                .flat_map(|capability| capability.conflict_ids())
                .collect()),
            AccessPoint::FileType(reference) => {
                let capability =
                    entry.get_capability::<FileTypeCapability>(platform, &reference.capability)?;
                Ok(capability
                    .extensions
                    .iter()
                    .map(|extension| format!("extension:{}", extension.value))
                    .collect())
            }
            AccessPoint::UrlProtocol(reference) => {
                entry.get_capability::<UrlProtocolCapability>(platform, &reference.capability)?;
                Ok(BTreeSet::from([format!("progid:{}", reference.capability)]))
            }
            AccessPoint::AutoPlay(reference) => {
                let capability =
                    entry.get_capability::<AutoPlayCapability>(platform, &reference.capability)?;
                Ok(capability
                    .events
                    .iter()
                    .map(|event| format!("autoplay-event:{}", event.name))
                    .collect())
            }
            AccessPoint::ContextMenu(reference) => {
                entry.get_capability::<ContextMenuCapability>(platform, &reference.capability)?;
                Ok(BTreeSet::from([format!(
                    "context-menu:{}",
                    reference.capability
                )]))
            }
            AccessPoint::DefaultProgram(reference) => {
                let capability = entry
                    .get_capability::<DefaultProgramCapability>(platform, &reference.capability)?;
                Ok(BTreeSet::from([format!("clients:{}", capability.service)]))
            }
            AccessPoint::AutoStart(command) => {
                Ok(BTreeSet::from([format!("autostart:{}", command.name)]))
            }
            AccessPoint::DesktopIcon(command) => {
                Ok(BTreeSet::from([format!("desktop:{}", command.name)]))
            }
            AccessPoint::MenuEntry(menu) => Ok(BTreeSet::from([format!(
                "menu:{}/{}",
                menu.category, menu.launch.name
            )])),
            AccessPoint::QuickLaunch(command) => {
                Ok(BTreeSet::from([format!("quick-launch:{}", command.name)]))
            }
            AccessPoint::SendTo(command) => {
                Ok(BTreeSet::from([format!("send-to:{}", command.name)]))
            }
            AccessPoint::Mock(mock) => Ok(BTreeSet::from([format!("mock:{}", mock.id)])),
        }
    }
}

impl fmt::Display for AccessPoint {
    /// `"MenuEntry: Utilities/Editor"`. Not safe for parsing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessPoint::CapabilityRegistration => write!(f, "CapabilityRegistration"),
            AccessPoint::FileType(r) => write!(f, "FileType: {}", r.capability),
            AccessPoint::UrlProtocol(r) => write!(f, "UrlProtocol: {}", r.capability),
            AccessPoint::AutoPlay(r) => write!(f, "AutoPlay: {}", r.capability),
            AccessPoint::ContextMenu(r) => write!(f, "ContextMenu: {}", r.capability),
            AccessPoint::DefaultProgram(r) => write!(f, "DefaultProgram: {}", r.capability),
            AccessPoint::AutoStart(c) => write!(f, "AutoStart: {}", c.name),
            AccessPoint::DesktopIcon(c) => write!(f, "DesktopIcon: {}", c.name),
            AccessPoint::MenuEntry(m) => write!(f, "MenuEntry: {}/{}", m.category, m.launch.name),
            AccessPoint::QuickLaunch(c) => write!(f, "QuickLaunch: {}", c.name),
            AccessPoint::SendTo(c) => write!(f, "SendTo: {}", c.name),
            AccessPoint::Mock(m) => write!(f, "Mock: {}", m.id),
        }
    }
}

//! Capabilities: immutable declarations of what a program can do.
//!
//! The variants form a closed set; shared behavior (conflict-id formula,
//! default-selection policy, verbs) lives on [`Capability`] and dispatches
//! over [`CapabilityKind`]. Capability conflict IDs form their own namespace,
//! disjoint from the desktop resources claimed by access points: a
//! capability by itself never touches the desktop. The only consumer of this
//! namespace is the capability-registration access point.

use super::icon::{Icon, LocalizedString};
use super::verb::Verb;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Policy fields shared by capabilities eligible for "make this the
/// default" integration categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DefaultPolicy {
    /// When set, the capability must never be auto-selected as a default
    /// handler without explicit user confirmation.
    #[serde(default)]
    pub explicit_only: bool,
}

/// Display fields shared by capabilities that own icons and descriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Presentation {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub icons: Vec<Icon>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub descriptions: Vec<LocalizedString>,
}

/// A single file extension handled by a file-type capability.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileTypeExtension {
    /// The extension including the leading dot (e.g. `".txt"`).
    pub value: String,
    /// MIME type of files with this extension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Windows perceived type (e.g. `"text"`, `"audio"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perceived_type: Option<String>,
}

impl FileTypeExtension {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            mime_type: None,
            perceived_type: None,
        }
    }
}

/// An AutoPlay event a handler can be wired to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AutoPlayEvent {
    pub name: String,
}

impl AutoPlayEvent {
    pub const PLAY_MUSIC_ON_ARRIVAL: &'static str = "PlayMusicFilesOnArrival";
    pub const PLAY_VIDEO_ON_ARRIVAL: &'static str = "PlayVideoFilesOnArrival";
    pub const BURN_CD_ON_ARRIVAL: &'static str = "HandleCDBurningOnArrival";

    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Ability to handle one or more file extensions.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileTypeCapability {
    #[serde(default)]
    pub policy: DefaultPolicy,
    #[serde(default)]
    pub presentation: Presentation,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub verbs: Vec<Verb>,
    pub extensions: Vec<FileTypeExtension>,
}

/// Ability to handle a URL scheme such as `http`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UrlProtocolCapability {
    #[serde(default)]
    pub policy: DefaultPolicy,
    #[serde(default)]
    pub presentation: Presentation,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub verbs: Vec<Verb>,
    /// Well-known scheme prefixes (e.g. `"http"`). Empty for custom schemes
    /// identified solely by the capability ID.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub known_prefixes: Vec<String>,
}

/// Ability to act as an AutoPlay handler for removable-media events.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AutoPlayCapability {
    #[serde(default)]
    pub policy: DefaultPolicy,
    #[serde(default)]
    pub presentation: Presentation,
    /// Provider name shown in the AutoPlay dialog.
    pub provider: String,
    /// Associated prog-id; may be empty.
    #[serde(default)]
    pub prog_id: String,
    /// The action invoked when the handler fires.
    pub verb: Verb,
    /// Events this handler can be wired to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<AutoPlayEvent>,
}

/// Ability to contribute an entry to the file manager's context menu.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContextMenuCapability {
    #[serde(default)]
    pub policy: DefaultPolicy,
    #[serde(default)]
    pub presentation: Presentation,
    /// Whether the entry applies to all object types instead of only files.
    #[serde(default)]
    pub all_objects: bool,
    /// The verb invoked from the menu.
    pub verb: Verb,
}

/// Ability to register as a client for a default-program service category.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DefaultProgramCapability {
    #[serde(default)]
    pub policy: DefaultPolicy,
    #[serde(default)]
    pub presentation: Presentation,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub verbs: Vec<Verb>,
    /// Service category name. Canonical values are the `SERVICE_*` constants.
    pub service: String,
}

impl DefaultProgramCapability {
    pub const SERVICE_INTERNET: &'static str = "StartMenuInternet";
    pub const SERVICE_MAIL: &'static str = "Mail";
    pub const SERVICE_MEDIA: &'static str = "Media";
}

/// Ability to host a COM server.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComServerCapability {}

/// Registration in the Windows "registered applications" list, making the
/// program discoverable by default-program dialogs.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AppRegistrationCapability {
    /// Registry path below which the application's capabilities are listed.
    pub capability_reg_path: String,
}

/// Registration in the Windows Games Explorer.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GamesExplorerCapability {}

/// The closed set of capability variants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CapabilityKind {
    FileType(FileTypeCapability),
    UrlProtocol(UrlProtocolCapability),
    AutoPlay(AutoPlayCapability),
    ContextMenu(ContextMenuCapability),
    DefaultProgram(DefaultProgramCapability),
    ComServer(ComServerCapability),
    AppRegistration(AppRegistrationCapability),
    GamesExplorer(GamesExplorerCapability),
}

/// A single declared capability: an ID unique within its owning list plus
/// the variant payload.
///
/// On duplicate IDs within one list, only the first declaration is
/// authoritative (lookup returns the first match).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Capability {
    pub id: String,
    #[serde(flatten)]
    pub kind: CapabilityKind,
}

impl Capability {
    pub fn new(id: impl Into<String>, kind: CapabilityKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    /// Stable kind name used in error messages and diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            CapabilityKind::FileType(_) => FileTypeCapability::KIND_NAME,
            CapabilityKind::UrlProtocol(_) => UrlProtocolCapability::KIND_NAME,
            CapabilityKind::AutoPlay(_) => AutoPlayCapability::KIND_NAME,
            CapabilityKind::ContextMenu(_) => ContextMenuCapability::KIND_NAME,
            CapabilityKind::DefaultProgram(_) => DefaultProgramCapability::KIND_NAME,
            CapabilityKind::ComServer(_) => ComServerCapability::KIND_NAME,
            CapabilityKind::AppRegistration(_) => AppRegistrationCapability::KIND_NAME,
            CapabilityKind::GamesExplorer(_) => GamesExplorerCapability::KIND_NAME,
        }
    }

    /// The identifiers this capability claims in the capability conflict
    /// namespace.
    ///
    /// Regenerated on demand; the strings are stable for equal inputs but
    /// their format is not part of any stored schema.
    pub fn conflict_ids(&self) -> BTreeSet<String> {
        let mut ids = BTreeSet::new();
        match &self.kind {
            CapabilityKind::FileType(_) | CapabilityKind::UrlProtocol(_) => {
                ids.insert(format!("progid:{}", self.id));
            }
            CapabilityKind::AutoPlay(auto_play) => {
                ids.insert(format!("autoplay:{}", self.id));
                ids.insert(format!("progid:{}", auto_play.prog_id));
                for event in &auto_play.events {
                    ids.insert(format!("autoplay-event:{}", event.name));
                }
            }
            CapabilityKind::ContextMenu(_) => {
                ids.insert(format!("context-menu:{}", self.id));
            }
            CapabilityKind::DefaultProgram(default_program) => {
                ids.insert(format!("clients:{}", default_program.service));
            }
            CapabilityKind::ComServer(_) => {
                ids.insert(format!("classes:{}", self.id));
            }
            CapabilityKind::AppRegistration(_) => {
                ids.insert(format!("registered-apps:{}", self.id));
            }
            CapabilityKind::GamesExplorer(_) => {
                ids.insert(format!("games:{}", self.id));
            }
        }
        ids
    }

    /// Whether this capability must not be auto-selected as a default
    /// handler.
    pub fn explicit_only(&self) -> bool {
        match &self.kind {
            CapabilityKind::FileType(c) => c.policy.explicit_only,
            CapabilityKind::UrlProtocol(c) => c.policy.explicit_only,
            CapabilityKind::AutoPlay(c) => c.policy.explicit_only,
            CapabilityKind::ContextMenu(c) => c.policy.explicit_only,
            CapabilityKind::DefaultProgram(c) => c.policy.explicit_only,
            CapabilityKind::ComServer(_)
            | CapabilityKind::AppRegistration(_)
            | CapabilityKind::GamesExplorer(_) => false,
        }
    }

    /// The verbs this capability exposes, in declaration order.
    pub fn verbs(&self) -> &[Verb] {
        match &self.kind {
            CapabilityKind::FileType(c) => &c.verbs,
            CapabilityKind::UrlProtocol(c) => &c.verbs,
            CapabilityKind::DefaultProgram(c) => &c.verbs,
            CapabilityKind::AutoPlay(c) => std::slice::from_ref(&c.verb),
            CapabilityKind::ContextMenu(c) => std::slice::from_ref(&c.verb),
            CapabilityKind::ComServer(_)
            | CapabilityKind::AppRegistration(_)
            | CapabilityKind::GamesExplorer(_) => &[],
        }
    }

    /// Whether this is a verb-bearing variant. AppRegistration cross-references
    /// these when publishing an application's capability list.
    pub fn is_verb_capability(&self) -> bool {
        matches!(
            self.kind,
            CapabilityKind::FileType(_)
                | CapabilityKind::UrlProtocol(_)
                | CapabilityKind::AutoPlay(_)
                | CapabilityKind::ContextMenu(_)
                | CapabilityKind::DefaultProgram(_)
        )
    }
}

impl fmt::Display for Capability {
    /// `"FileType: text/plain"`. Not safe for parsing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = match &self.kind {
            CapabilityKind::FileType(_) => "FileType",
            CapabilityKind::UrlProtocol(_) => "UrlProtocol",
            CapabilityKind::AutoPlay(_) => "AutoPlay",
            CapabilityKind::ContextMenu(_) => "ContextMenu",
            CapabilityKind::DefaultProgram(_) => "DefaultProgram",
            CapabilityKind::ComServer(_) => "ComServer",
            CapabilityKind::AppRegistration(_) => "AppRegistration",
            CapabilityKind::GamesExplorer(_) => "GamesExplorer",
        };
        write!(f, "{variant}: {}", self.id)
    }
}

/// Marker trait connecting variant payload types to [`CapabilityKind`],
/// enabling typed lookup (`lookup_capability::<FileTypeCapability>(...)`).
pub trait CapabilityVariant: Sized {
    /// Stable kind name used in error messages.
    const KIND_NAME: &'static str;

    /// Narrow a kind to this variant's payload.
    fn from_kind(kind: &CapabilityKind) -> Option<&Self>;
}

macro_rules! capability_variant {
    ($payload:ty, $variant:ident, $name:literal) => {
        impl CapabilityVariant for $payload {
            const KIND_NAME: &'static str = $name;

            fn from_kind(kind: &CapabilityKind) -> Option<&Self> {
                match kind {
                    CapabilityKind::$variant(payload) => Some(payload),
                    _ => None,
                }
            }
        }
    };
}

capability_variant!(FileTypeCapability, FileType, "file-type");
capability_variant!(UrlProtocolCapability, UrlProtocol, "url-protocol");
capability_variant!(AutoPlayCapability, AutoPlay, "auto-play");
capability_variant!(ContextMenuCapability, ContextMenu, "context-menu");
capability_variant!(DefaultProgramCapability, DefaultProgram, "default-program");
capability_variant!(ComServerCapability, ComServer, "com-server");
capability_variant!(AppRegistrationCapability, AppRegistration, "app-registration");
capability_variant!(GamesExplorerCapability, GamesExplorer, "games-explorer");

#[cfg(test)]
mod tests {
    use super::*;

    fn text_file_type() -> Capability {
        Capability::new(
            "text/plain",
            CapabilityKind::FileType(FileTypeCapability {
                extensions: vec![FileTypeExtension::new(".txt"), FileTypeExtension::new(".log")],
                ..Default::default()
            }),
        )
    }

    #[test]
    fn test_file_type_conflict_ids() {
        let ids = text_file_type().conflict_ids();
        assert_eq!(ids, BTreeSet::from(["progid:text/plain".to_string()]));
    }

    #[test]
    fn test_auto_play_conflict_ids() {
        let cap = Capability::new(
            "ap1",
            CapabilityKind::AutoPlay(AutoPlayCapability {
                policy: DefaultPolicy::default(),
                presentation: Presentation::default(),
                provider: "Music Player".to_string(),
                prog_id: String::new(),
                verb: Verb::new(Verb::NAME_PLAY),
                events: vec![AutoPlayEvent::new(AutoPlayEvent::PLAY_MUSIC_ON_ARRIVAL)],
            }),
        );
        let ids = cap.conflict_ids();
        assert_eq!(
            ids,
            BTreeSet::from([
                "autoplay:ap1".to_string(),
                "progid:".to_string(),
                "autoplay-event:PlayMusicFilesOnArrival".to_string(),
            ])
        );
    }

    #[test]
    fn test_default_program_conflict_ids() {
        let cap = Capability::new(
            "my-mailer",
            CapabilityKind::DefaultProgram(DefaultProgramCapability {
                policy: DefaultPolicy::default(),
                presentation: Presentation::default(),
                verbs: vec![Verb::new(Verb::NAME_OPEN)],
                service: DefaultProgramCapability::SERVICE_MAIL.to_string(),
            }),
        );
        assert_eq!(
            cap.conflict_ids(),
            BTreeSet::from(["clients:Mail".to_string()])
        );
    }

    #[test]
    fn test_conflict_ids_stable_under_clone() {
        let cap = text_file_type();
        assert_eq!(cap.conflict_ids(), cap.clone().conflict_ids());
    }

    #[test]
    fn test_clone_is_deep_and_equal() {
        let cap = text_file_type();
        let copy = cap.clone();
        assert_eq!(cap, copy);
        match (&cap.kind, &copy.kind) {
            (CapabilityKind::FileType(a), CapabilityKind::FileType(b)) => {
                assert_eq!(a.extensions.len(), 2);
                assert_eq!(a.extensions, b.extensions);
            }
            _ => panic!("expected file-type capability"),
        }
    }

    #[test]
    fn test_typed_narrowing() {
        let cap = text_file_type();
        assert!(FileTypeCapability::from_kind(&cap.kind).is_some());
        assert!(UrlProtocolCapability::from_kind(&cap.kind).is_none());
        assert_eq!(cap.kind_name(), "file-type");
    }

    #[test]
    fn test_verbs_accessor() {
        let cap = Capability::new(
            "ctx",
            CapabilityKind::ContextMenu(ContextMenuCapability {
                policy: DefaultPolicy::default(),
                presentation: Presentation::default(),
                all_objects: false,
                verb: Verb::new(Verb::NAME_EDIT),
            }),
        );
        assert_eq!(cap.verbs().len(), 1);
        assert!(cap.is_verb_capability());

        let com = Capability::new("com1", CapabilityKind::ComServer(ComServerCapability {}));
        assert!(com.verbs().is_empty());
        assert!(!com.is_verb_capability());
    }

    #[test]
    fn test_explicit_only_flag() {
        let mut cap = text_file_type();
        assert!(!cap.explicit_only());
        if let CapabilityKind::FileType(ft) = &mut cap.kind {
            ft.policy.explicit_only = true;
        }
        assert!(cap.explicit_only());
    }

    #[test]
    fn test_display_form() {
        assert_eq!(text_file_type().to_string(), "FileType: text/plain");
    }
}

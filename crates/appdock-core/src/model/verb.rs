//! Verbs: named actions a capability exposes on its targets.

use super::icon::LocalizedString;
use serde::{Deserialize, Serialize};

/// A named action (e.g. "open", "edit", "print") mapping to a command in
/// the feed plus an argument template.
///
/// Canonical names are reserved constants, but custom names are permitted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Verb {
    /// Verb name. Canonical values are the `NAME_*` constants.
    pub name: String,
    /// Name of the feed command to invoke; `None` means the feed's default
    /// "run" command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Argument template; `%1` is replaced with the target path or URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
    /// Extended verbs are hidden from basic context menus.
    #[serde(default)]
    pub extended: bool,
    /// Localized display names for the verb.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub descriptions: Vec<LocalizedString>,
}

impl Verb {
    pub const NAME_OPEN: &'static str = "open";
    pub const NAME_OPEN_NEW: &'static str = "open-new";
    pub const NAME_OPEN_AS: &'static str = "open-as";
    pub const NAME_EDIT: &'static str = "edit";
    pub const NAME_PLAY: &'static str = "play";
    pub const NAME_PRINT: &'static str = "print";
    pub const NAME_PREVIEW: &'static str = "preview";

    /// Create a verb with just a name, invoking the feed's default command.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: None,
            arguments: None,
            extended: false,
            descriptions: Vec::new(),
        }
    }

    /// The feed command this verb invokes.
    pub fn command_name(&self) -> &str {
        self.command
            .as_deref()
            .unwrap_or(super::feed::Command::NAME_RUN)
    }

    /// Expand the argument template for a concrete target.
    ///
    /// Returns `None` when the verb has no argument template; collaborators
    /// then pass the target as the sole argument.
    pub fn expand_arguments(&self, target: &str) -> Option<String> {
        self.arguments
            .as_ref()
            .map(|template| template.replace("%1", target))
    }
}

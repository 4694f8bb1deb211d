//! Read-only feed surface consumed by apply operations.
//!
//! How feeds are fetched, parsed or cached is not this crate's concern;
//! apply only needs the interface URI, the declared commands and the icons
//! so collaborators can build launch commands and download shortcut icons.

use super::icon::Icon;
use serde::{Deserialize, Serialize};
use url::Url;

/// A named command declared by a feed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Command {
    /// Command name. The default launch command is [`Command::NAME_RUN`].
    pub name: String,
    /// Executable path relative to the implementation root, if declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Fixed arguments prepended to any verb arguments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<String>,
}

impl Command {
    /// The command launched when no explicit command is requested.
    pub const NAME_RUN: &'static str = "run";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            arguments: Vec::new(),
        }
    }
}

/// The feed describing the application being integrated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    /// Canonical feed location.
    pub uri: Url,
    /// Application name.
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<Command>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub icons: Vec<Icon>,
}

impl Feed {
    pub fn new(uri: Url, name: impl Into<String>) -> Self {
        Self {
            uri,
            name: name.into(),
            commands: vec![Command::new(Command::NAME_RUN)],
            icons: Vec::new(),
        }
    }

    /// Look up a declared command by name.
    pub fn command(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|command| command.name == name)
    }
}

/// The `(interface URI, feed)` pairing handed to platform collaborators.
///
/// The interface URI comes from the app entry, not the feed: a feed may be
/// served from a mirror while the entry keeps its canonical identity.
#[derive(Debug, Clone, Copy)]
pub struct FeedTarget<'a> {
    pub interface_uri: &'a Url,
    pub feed: &'a Feed,
}

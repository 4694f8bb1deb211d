//! The registry's view of all integrated applications.

use crate::app_entry::AppEntry;
use serde::{Deserialize, Serialize};
use url::Url;

/// All app entries known to one integration scope (per-user or
/// machine-wide).
///
/// The list itself is a plain value; serializing it to disk and locking it
/// across processes is the owning registry's concern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppList {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<AppEntry>,
}

impl AppList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the entry for an interface URI.
    pub fn get_entry(&self, interface_uri: &Url) -> Option<&AppEntry> {
        self.entries
            .iter()
            .find(|entry| entry.interface_uri == *interface_uri)
    }

    /// Find the position of the entry for an interface URI.
    pub fn position(&self, interface_uri: &Url) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.interface_uri == *interface_uri)
    }

    /// Whether an entry exists for the interface URI.
    pub fn contains(&self, interface_uri: &Url) -> bool {
        self.get_entry(interface_uri).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_interface_uri() {
        let uri = Url::parse("https://example.com/a.xml").unwrap();
        let other = Url::parse("https://example.com/b.xml").unwrap();
        let mut list = AppList::new();
        list.entries.push(AppEntry::new(uri.clone(), "A"));

        assert!(list.contains(&uri));
        assert_eq!(list.get_entry(&uri).unwrap().name, "A");
        assert!(!list.contains(&other));
        assert_eq!(list.position(&uri), Some(0));
    }
}

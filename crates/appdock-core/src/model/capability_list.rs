//! Architecture-filtered collections of capabilities.

use super::arch::Architecture;
use super::capability::Capability;
use crate::platform::Platform;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered sequence of capabilities belonging to one feed, guarded by an
/// architecture filter.
///
/// Duplicate IDs are permitted; the first declaration wins on lookup.
/// Equality is order-sensitive sequence equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CapabilityList {
    /// Machines this list applies to.
    #[serde(default)]
    pub architecture: Architecture,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<Capability>,
}

impl CapabilityList {
    /// An empty list applying to every machine.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty list restricted to the given architecture.
    pub fn for_architecture(architecture: Architecture) -> Self {
        Self {
            architecture,
            entries: Vec::new(),
        }
    }

    /// Append a capability, preserving declaration order.
    pub fn push(&mut self, capability: Capability) -> &mut Self {
        self.entries.push(capability);
        self
    }

    /// Whether this list is handled on the given machine.
    pub fn is_compatible(&self, platform: &Platform) -> bool {
        self.architecture.is_compatible(platform)
    }
}

impl FromIterator<Capability> for CapabilityList {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self {
            architecture: Architecture::any(),
            entries: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for CapabilityList {
    /// `"Entry; Entry; ..."`. Not safe for parsing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for entry in &self.entries {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{entry}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::capability::{CapabilityKind, FileTypeCapability, FileTypeExtension};

    fn cap(id: &str, ext: &str) -> Capability {
        Capability::new(
            id,
            CapabilityKind::FileType(FileTypeCapability {
                extensions: vec![FileTypeExtension::new(ext)],
                ..Default::default()
            }),
        )
    }

    #[test]
    fn test_order_sensitive_equality() {
        let a: CapabilityList = vec![cap("a", ".a"), cap("b", ".b")].into_iter().collect();
        let b: CapabilityList = vec![cap("b", ".b"), cap("a", ".a")].into_iter().collect();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_deep_clone() {
        let list: CapabilityList = vec![cap("a", ".a")].into_iter().collect();
        let mut copy = list.clone();
        assert_eq!(list, copy);
        copy.entries[0].id = "changed".to_string();
        assert_ne!(list, copy);
        assert_eq!(list.entries[0].id, "a");
    }

    #[test]
    fn test_display_joined_with_semicolons() {
        let list: CapabilityList = vec![cap("a", ".a"), cap("b", ".b")].into_iter().collect();
        assert_eq!(list.to_string(), "FileType: a; FileType: b");
        assert_eq!(CapabilityList::new().to_string(), "");
    }

    #[test]
    fn test_architecture_gating() {
        let mut list = CapabilityList::for_architecture(Architecture::parse("windows-*"));
        list.push(cap("a", ".a"));
        assert!(list.is_compatible(&crate::platform::Platform::windows()));
        assert!(!list.is_compatible(&crate::platform::Platform::unix()));
    }
}

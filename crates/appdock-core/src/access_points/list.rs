//! The set of access points active for one app entry.

use super::AccessPoint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered sequence of access points.
///
/// Equality is order-sensitive sequence equality; clone duplicates every
/// contained element.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccessPointList {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<AccessPoint>,
}

impl AccessPointList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an access point, preserving request order.
    pub fn push(&mut self, access_point: AccessPoint) -> &mut Self {
        self.entries.push(access_point);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether a value-equal access point is already present.
    pub fn contains(&self, access_point: &AccessPoint) -> bool {
        self.entries.contains(access_point)
    }
}

impl FromIterator<AccessPoint> for AccessPointList {
    fn from_iter<I: IntoIterator<Item = AccessPoint>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for AccessPointList {
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
    use crate::access_points::AppCommand;

    #[test]
    fn test_order_sensitive_equality() {
        let a: AccessPointList = vec![
            AccessPoint::DesktopIcon(AppCommand::new("A")),
            AccessPoint::DesktopIcon(AppCommand::new("B")),
        ]
        .into_iter()
        .collect();
        let b: AccessPointList = vec![
            AccessPoint::DesktopIcon(AppCommand::new("B")),
            AccessPoint::DesktopIcon(AppCommand::new("A")),
        ]
        .into_iter()
        .collect();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_clone_is_distinct_deep_copy() {
        let list: AccessPointList = vec![AccessPoint::DesktopIcon(AppCommand::new("A"))]
            .into_iter()
            .collect();
        let mut copy = list.clone();
        if let AccessPoint::DesktopIcon(command) = &mut copy.entries[0] {
            command.name = "changed".to_string();
        }
        assert_ne!(list, copy);
    }

    #[test]
    fn test_display() {
        let list: AccessPointList = vec![
            AccessPoint::CapabilityRegistration,
            AccessPoint::DesktopIcon(AppCommand::new("Editor")),
        ]
        .into_iter()
        .collect();
        assert_eq!(list.to_string(), "CapabilityRegistration; DesktopIcon: Editor");
    }
}

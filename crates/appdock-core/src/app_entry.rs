//! App entries: the integration state of one installed application.

use crate::access_points::AccessPointList;
use crate::error::{IntegrationError, Result};
use crate::model::{Capability, CapabilityList, CapabilityVariant};
use crate::platform::Platform;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// One application known to the integration registry: its interface URI,
/// the capability lists declared by its feed (one per architecture), and
/// the access points the user has requested.
///
/// Created when a user integrates an application, mutated whenever access
/// points are added or removed, destroyed on full removal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppEntry {
    /// URI of the interface defining the application.
    pub interface_uri: Url,
    /// Application name, usually equal to the feed name.
    pub name: String,
    /// Regular expression a machine's hostname must match for this entry to
    /// be applied. Enables machine-specific entry filtering in synced lists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname_filter: Option<String>,
    /// Capability lists declared by the feed. Only architecture-compatible
    /// lists are handled.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capability_lists: Vec<CapabilityList>,
    /// Access points registered in the desktop environment. `None` until
    /// the first integration has been performed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_points: Option<AccessPointList>,
    /// Last modification time. Excluded from equality.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl AppEntry {
    pub fn new(interface_uri: Url, name: impl Into<String>) -> Self {
        Self {
            interface_uri,
            name: name.into(),
            hostname_filter: None,
            capability_lists: Vec::new(),
            access_points: None,
            timestamp: Utc::now(),
        }
    }

    /// All capabilities across architecture-compatible capability lists, in
    /// list order and intra-list declaration order.
    ///
    /// Duplicate IDs across lists are surfaced as-is; callers that need only
    /// one declaration must filter (lookup takes the first).
    pub fn compatible_capabilities<'a, 'p>(
        &'a self,
        platform: &'p Platform,
    ) -> impl Iterator<Item = &'a Capability> + 'p
    where
        'a: 'p,
    {
        self.capability_lists
            .iter()
            .filter(move |list| list.is_compatible(platform))
            .flat_map(|list| list.entries.iter())
    }

    /// Find the first compatible capability with the given ID and variant.
    ///
    /// Fails with `CapabilityNotFound` when no compatible capability carries
    /// the ID, or `CapabilityTypeMismatch` when the ID exists only under a
    /// different variant.
    pub fn lookup_capability<T: CapabilityVariant>(
        &self,
        platform: &Platform,
        id: &str,
    ) -> Result<&T> {
        let mut mismatched: Option<&'static str> = None;
        for capability in self.compatible_capabilities(platform) {
            if capability.id == id {
                if let Some(payload) = T::from_kind(&capability.kind) {
                    return Ok(payload);
                }
                mismatched.get_or_insert(capability.kind_name());
            }
        }
        match mismatched {
            Some(found) => Err(IntegrationError::CapabilityTypeMismatch {
                id: id.to_string(),
                expected: T::KIND_NAME,
                found,
            }),
            None => Err(IntegrationError::CapabilityNotFound {
                kind: T::KIND_NAME,
                id: id.to_string(),
            }),
        }
    }

    /// Like [`lookup_capability`](Self::lookup_capability), but for required
    /// references: additionally rejects empty IDs.
    pub fn get_capability<T: CapabilityVariant>(
        &self,
        platform: &Platform,
        id: &str,
    ) -> Result<&T> {
        if id.is_empty() {
            return Err(IntegrationError::Validation {
                field: "capability".to_string(),
                message: "capability reference must not be empty".to_string(),
            });
        }
        self.lookup_capability(platform, id)
    }
}

/// Equality ignores the modification timestamp; two entries describing the
/// same integration state compare equal regardless of when they were
/// written.
impl PartialEq for AppEntry {
    fn eq(&self, other: &Self) -> bool {
        self.interface_uri == other.interface_uri
            && self.name == other.name
            && self.hostname_filter == other.hostname_filter
            && self.capability_lists == other.capability_lists
            && self.access_points == other.access_points
    }
}

impl Eq for AppEntry {}

impl fmt::Display for AppEntry {
    /// `"Name (interface URI)"`. Not safe for parsing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.interface_uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Architecture, CapabilityKind, FileTypeCapability, FileTypeExtension,
        UrlProtocolCapability,
    };

    fn file_type(id: &str, ext: &str) -> Capability {
        Capability::new(
            id,
            CapabilityKind::FileType(FileTypeCapability {
                extensions: vec![FileTypeExtension::new(ext)],
                ..Default::default()
            }),
        )
    }

    fn entry() -> AppEntry {
        AppEntry::new(
            Url::parse("https://example.com/app.xml").unwrap(),
            "Test App",
        )
    }

    #[test]
    fn test_first_declaration_wins_across_lists() {
        let mut e = entry();
        e.capability_lists
            .push(vec![file_type("id1", ".first")].into_iter().collect());
        e.capability_lists
            .push(vec![file_type("id1", ".second")].into_iter().collect());

        let capability = e
            .lookup_capability::<FileTypeCapability>(&Platform::unix(), "id1")
            .unwrap();
        assert_eq!(capability.extensions[0].value, ".first");
    }

    #[test]
    fn test_duplicates_not_deduplicated_in_iteration() {
        let mut e = entry();
        e.capability_lists
            .push(vec![file_type("id1", ".first")].into_iter().collect());
        e.capability_lists
            .push(vec![file_type("id1", ".second")].into_iter().collect());

        let ids: Vec<_> = e
            .compatible_capabilities(&Platform::unix())
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, vec!["id1", "id1"]);
    }

    #[test]
    fn test_incompatible_lists_skipped() {
        let mut e = entry();
        let mut windows_only =
            CapabilityList::for_architecture(Architecture::parse("windows-*"));
        windows_only.push(file_type("id1", ".txt"));
        e.capability_lists.push(windows_only);

        assert_eq!(e.compatible_capabilities(&Platform::unix()).count(), 0);
        assert!(e
            .lookup_capability::<FileTypeCapability>(&Platform::unix(), "id1")
            .is_err());
        assert!(e
            .lookup_capability::<FileTypeCapability>(&Platform::windows(), "id1")
            .is_ok());
    }

    #[test]
    fn test_type_mismatch_reports_found_kind() {
        let mut e = entry();
        e.capability_lists.push(
            vec![Capability::new(
                "http",
                CapabilityKind::UrlProtocol(UrlProtocolCapability::default()),
            )]
            .into_iter()
            .collect(),
        );

        let err = e
            .lookup_capability::<FileTypeCapability>(&Platform::unix(), "http")
            .unwrap_err();
        match err {
            IntegrationError::CapabilityTypeMismatch {
                expected, found, ..
            } => {
                assert_eq!(expected, "file-type");
                assert_eq!(found, "url-protocol");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_mismatch_does_not_shadow_later_match() {
        // An earlier same-ID capability of the wrong variant must not hide a
        // later correctly-typed declaration.
        let mut e = entry();
        e.capability_lists.push(
            vec![
                Capability::new(
                    "dual",
                    CapabilityKind::UrlProtocol(UrlProtocolCapability::default()),
                ),
                file_type("dual", ".txt"),
            ]
            .into_iter()
            .collect(),
        );

        assert!(e
            .lookup_capability::<FileTypeCapability>(&Platform::unix(), "dual")
            .is_ok());
    }

    #[test]
    fn test_get_capability_rejects_empty_id() {
        let e = entry();
        let err = e
            .get_capability::<FileTypeCapability>(&Platform::unix(), "")
            .unwrap_err();
        assert!(matches!(err, IntegrationError::Validation { .. }));
    }

    #[test]
    fn test_equality_ignores_timestamp() {
        let a = entry();
        let mut b = a.clone();
        b.timestamp = b.timestamp + chrono::Duration::seconds(60);
        assert_eq!(a, b);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            entry().to_string(),
            "Test App (https://example.com/app.xml)"
        );
    }
}

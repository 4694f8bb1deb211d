//! Mock access point for exercising the dispatcher without OS side effects.

use crate::app_entry::AppEntry;
use crate::error::{IntegrationError, Result};
use crate::platform::Platform;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// An access point that records apply/unapply calls as sentinel files.
///
/// When `capability` is set, apply and unapply validate that the reference
/// resolves against the entry's compatible capability lists, so referential
/// integrity checks can be tested without any platform collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MockAccessPoint {
    /// Token used for the `mock:<id>` conflict identifier.
    pub id: String,
    /// Optional capability reference to validate on apply/unapply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capability: Option<String>,
    /// File touched on every apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_flag: Option<PathBuf>,
    /// File touched on every unapply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unapply_flag: Option<PathBuf>,
}

impl MockAccessPoint {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub(crate) fn apply(&self, entry: &AppEntry, platform: &Platform) -> Result<()> {
        self.validate_reference(entry, platform)?;
        if let Some(flag) = &self.apply_flag {
            debug!(id = %self.id, path = ?flag, "mock access point applied");
            touch(flag)?;
        }
        Ok(())
    }

    pub(crate) fn unapply(&self, entry: &AppEntry, platform: &Platform) -> Result<()> {
        self.validate_reference(entry, platform)?;
        if let Some(flag) = &self.unapply_flag {
            debug!(id = %self.id, path = ?flag, "mock access point unapplied");
            touch(flag)?;
        }
        Ok(())
    }

    fn validate_reference(&self, entry: &AppEntry, platform: &Platform) -> Result<()> {
        if let Some(id) = &self.capability {
            entry
                .compatible_capabilities(platform)
                .find(|capability| capability.id == *id)
                .ok_or_else(|| IntegrationError::CapabilityNotFound {
                    kind: "any",
                    id: id.clone(),
                })?;
        }
        Ok(())
    }
}

fn touch(path: &Path) -> Result<()> {
    fs::write(path, b"").map_err(|e| IntegrationError::io_with_path(e, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Capability, CapabilityKind, ComServerCapability};
    use tempfile::TempDir;
    use url::Url;

    fn entry() -> AppEntry {
        let mut entry = AppEntry::new(
            Url::parse("https://example.com/app.xml").unwrap(),
            "Test App",
        );
        entry.capability_lists.push(
            vec![Capability::new(
                "com1",
                CapabilityKind::ComServer(ComServerCapability {}),
            )]
            .into_iter()
            .collect(),
        );
        entry
    }

    #[test]
    fn test_apply_touches_flag() {
        let dir = TempDir::new().unwrap();
        let flag = dir.path().join("applied");
        let mock = MockAccessPoint {
            apply_flag: Some(flag.clone()),
            ..MockAccessPoint::new("m1")
        };
        mock.apply(&entry(), &Platform::unix()).unwrap();
        assert!(flag.exists());
    }

    #[test]
    fn test_valid_reference_passes() {
        let mock = MockAccessPoint {
            capability: Some("com1".to_string()),
            ..MockAccessPoint::new("m1")
        };
        mock.apply(&entry(), &Platform::unix()).unwrap();
    }

    #[test]
    fn test_dangling_reference_fails_even_without_flags() {
        let mock = MockAccessPoint {
            capability: Some("missing".to_string()),
            ..MockAccessPoint::new("m1")
        };
        let err = mock.apply(&entry(), &Platform::unix()).unwrap_err();
        assert!(err.is_resolution_failure());
    }
}

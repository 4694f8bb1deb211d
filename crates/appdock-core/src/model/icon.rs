//! Icons and localized text carried by capabilities and feeds.

use serde::{Deserialize, Serialize};
use url::Url;

/// An icon associated with a feed or capability.
///
/// Downloading and converting the icon is collaborator work; the core only
/// carries the reference.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Icon {
    /// Location the icon can be fetched from.
    pub href: Url,
    /// MIME type of the icon data (e.g. `image/png`, `image/vnd.microsoft.icon`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl Icon {
    pub const MIME_TYPE_PNG: &'static str = "image/png";
    pub const MIME_TYPE_ICO: &'static str = "image/vnd.microsoft.icon";
}

/// A human-readable string in a specific language.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocalizedString {
    /// BCP 47 language tag; `None` means the feed's default language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    pub value: String,
}

impl LocalizedString {
    /// A string in the feed's default language.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            lang: None,
            value: value.into(),
        }
    }

    /// A string in an explicit language.
    pub fn with_lang(lang: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            lang: Some(lang.into()),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localized_string_default_language() {
        let s = LocalizedString::new("Open with Editor");
        assert_eq!(s.lang, None);
        assert_eq!(s.value, "Open with Editor");
    }

    #[test]
    fn test_icon_roundtrip() {
        let icon = Icon {
            href: Url::parse("https://example.com/app.png").unwrap(),
            mime_type: Some(Icon::MIME_TYPE_PNG.to_string()),
        };
        let json = serde_json::to_string(&icon).unwrap();
        let back: Icon = serde_json::from_str(&json).unwrap();
        assert_eq!(icon, back);
    }
}

//! Inline styles and per-character metadata

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::entity::EntityKey;

/// Inline style flag applied to a run of characters
///
/// The four recognized styles drive toolbar state and HTML output. Any other
/// style name found in an external document is kept as [`InlineStyle::Other`]
/// so that the document survives a parse/serialize round trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InlineStyle {
    Bold,
    Italic,
    Underline,
    /// UI marker for an active link decoration. Link targets live in entities.
    Link,
    Other(String),
}

impl InlineStyle {
    /// Wire name of the style
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bold => "BOLD",
            Self::Italic => "ITALIC",
            Self::Underline => "UNDERLINE",
            Self::Link => "LINK",
            Self::Other(name) => name,
        }
    }

    /// CSS declaration emitted by the HTML serializers, if any
    pub fn css(&self) -> Option<&'static str> {
        match self {
            Self::Bold => Some("font-weight: bold;"),
            Self::Italic => Some("font-style: italic;"),
            Self::Underline => Some("text-decoration: underline;"),
            Self::Link | Self::Other(_) => None,
        }
    }
}

impl From<&str> for InlineStyle {
    fn from(name: &str) -> Self {
        match name {
            "BOLD" => Self::Bold,
            "ITALIC" => Self::Italic,
            "UNDERLINE" => Self::Underline,
            "LINK" => Self::Link,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for InlineStyle {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<InlineStyle> for String {
    fn from(style: InlineStyle) -> Self {
        style.as_str().to_string()
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Set of inline styles active at one character position
pub type InlineStyleSet = BTreeSet<InlineStyle>;

/// Metadata carried by a single UTF-16 unit of block text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterMetadata {
    pub style: InlineStyleSet,
    pub entity: Option<EntityKey>,
}

impl CharacterMetadata {
    /// Metadata with no style and no entity
    pub fn plain() -> Self {
        Self::default()
    }

    /// Metadata referencing a single entity and no style
    pub fn with_entity(entity: EntityKey) -> Self {
        Self {
            style: InlineStyleSet::new(),
            entity: Some(entity),
        }
    }

    pub fn has_style(&self, style: &InlineStyle) -> bool {
        self.style.contains(style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_names_round_trip() {
        for name in ["BOLD", "ITALIC", "UNDERLINE", "LINK", "STRIKETHROUGH"] {
            assert_eq!(InlineStyle::from(name).as_str(), name);
        }
        assert_eq!(
            InlineStyle::from("CODE"),
            InlineStyle::Other("CODE".to_string())
        );
    }

    #[test]
    fn test_css_only_for_rendered_styles() {
        assert_eq!(InlineStyle::Bold.css(), Some("font-weight: bold;"));
        assert_eq!(InlineStyle::Italic.css(), Some("font-style: italic;"));
        assert_eq!(
            InlineStyle::Underline.css(),
            Some("text-decoration: underline;")
        );
        assert_eq!(InlineStyle::Link.css(), None);
    }

    #[test]
    fn test_serde_as_plain_string() {
        let json = serde_json::to_string(&InlineStyle::Italic).unwrap();
        assert_eq!(json, "\"ITALIC\"");
        let style: InlineStyle = serde_json::from_str("\"UNDERLINE\"").unwrap();
        assert_eq!(style, InlineStyle::Underline);
    }
}

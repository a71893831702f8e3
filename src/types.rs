//! Shared types used across all pipeline stages.
//!
//! Content items flow from the loader through the packer into the slide
//! builder, and are serialized as-is when a deck is written to JSON.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a content item is a verse or a section heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Verse,
    Title,
}

/// Verse reference: an optional chapter label plus the verse label.
///
/// - `Reference { chapter: None, verse: "5" }` displays as `5`
/// - `Reference { chapter: Some("Genesis 1"), verse: "5" }` displays as `Genesis 1:5`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
    pub verse: String,
}

impl Reference {
    pub fn verse(verse: impl Into<String>) -> Self {
        Self {
            chapter: None,
            verse: verse.into(),
        }
    }

    pub fn with_chapter(chapter: impl Into<String>, verse: impl Into<String>) -> Self {
        Self {
            chapter: Some(chapter.into()),
            verse: verse.into(),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.chapter {
            Some(chapter) => write!(f, "{}:{}", chapter, self.verse),
            None => f.write_str(&self.verse),
        }
    }
}

/// One packable unit of text: a verse or a section title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Unique within a selection (`"5"`, `"title-3"`)
    pub key: String,
    pub kind: ItemKind,
    /// Sort position across the selection; strictly increasing, gaps allowed
    pub order: i64,
    /// Plain text, HTML already stripped
    #[serde(rename = "text")]
    pub display_text: String,
    /// Present only for verses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<Reference>,
}

impl ContentItem {
    pub fn verse(key: impl Into<String>, order: i64, text: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            reference: Some(Reference::verse(key.clone())),
            key,
            kind: ItemKind::Verse,
            order,
            display_text: text.into(),
        }
    }

    pub fn title(key: impl Into<String>, order: i64, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: ItemKind::Title,
            order,
            display_text: text.into(),
            reference: None,
        }
    }

    pub fn is_title(&self) -> bool {
        self.kind == ItemKind::Title
    }

    /// True when there is nothing to show once whitespace is ignored.
    pub fn is_blank(&self) -> bool {
        self.display_text.trim().is_empty()
    }

    /// Label used for verse prefixes; falls back to the key for bare verses.
    pub fn verse_label(&self) -> &str {
        self.reference
            .as_ref()
            .map(|r| r.verse.as_str())
            .unwrap_or(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_display_without_chapter() {
        assert_eq!(Reference::verse("5").to_string(), "5");
    }

    #[test]
    fn reference_display_with_chapter() {
        assert_eq!(
            Reference::with_chapter("Genesis 1", "5").to_string(),
            "Genesis 1:5"
        );
    }

    #[test]
    fn verse_label_falls_back_to_key() {
        let mut item = ContentItem::verse("7", 7, "text");
        item.reference = None;
        assert_eq!(item.verse_label(), "7");
    }

    #[test]
    fn whitespace_only_is_blank() {
        assert!(ContentItem::verse("1", 1, " \t\n ").is_blank());
        assert!(!ContentItem::verse("1", 1, " a ").is_blank());
    }

    #[test]
    fn item_kind_serializes_lowercase() {
        let json = serde_json::to_string(&ItemKind::Title).unwrap();
        assert_eq!(json, "\"title\"");
    }

    #[test]
    fn item_json_uses_text_field() {
        let item: ContentItem = serde_json::from_str(
            r#"{"key":"title-1","kind":"title","order":0,"text":"The Creation"}"#,
        )
        .unwrap();
        assert_eq!(item.display_text, "The Creation");
        assert!(item.is_title());
        assert!(item.reference.is_none());
    }
}

//! Selection loading and validation.
//!
//! Stage 1 of the verse-deck pipeline. Reads a selection file exported by the
//! Bible browser and turns it into an ordered list of [`ContentItem`]s that
//! the packer can consume.
//!
//! ## Selection File
//!
//! ```json
//! {
//!   "chapter": "Genesis 1",
//!   "items": [
//!     { "key": "title-1", "kind": "title", "order": 0, "text": "The Creation" },
//!     { "key": "1", "kind": "verse", "order": 1,
//!       "text": "In the <b>beginning</b>", "reference": { "verse": "1" } }
//!   ]
//! }
//! ```
//!
//! ## Normalization
//!
//! - Verse text is stored as HTML in the browser; tags are stripped, common
//!   entities decoded, and whitespace collapsed.
//! - A verse without a reference gets one built from its key.
//! - A verse reference without a chapter inherits the file's `chapter`.
//! - Items are sorted by `order`.
//!
//! ## Validation
//!
//! - Keys are unique
//! - Orders are unique
//! - Titles carry no reference

use crate::reference;
use crate::types::{ContentItem, ItemKind, Reference};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Duplicate item key: {0}")]
    DuplicateKey(String),
    #[error("Duplicate order {0} (item {1})")]
    DuplicateOrder(i64, String),
    #[error("Title item {0} must not carry a verse reference")]
    TitleWithReference(String),
}

/// A validated, ordered selection ready for packing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Selection {
    /// Default chapter label for verse references
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
    #[serde(default)]
    pub items: Vec<ContentItem>,
}

impl Selection {
    pub fn verse_count(&self) -> usize {
        self.items.iter().filter(|i| !i.is_title()).count()
    }

    pub fn title_count(&self) -> usize {
        self.items.iter().filter(|i| i.is_title()).count()
    }

    /// Keep only verses inside `ranges`, plus titles that head a kept verse.
    ///
    /// A title is kept when the first verse after it (in order) is kept.
    /// Titles with no following verse are dropped.
    pub fn filter_verses(&self, ranges: &[RangeInclusive<u32>]) -> Selection {
        let keep_verse = |item: &ContentItem| reference::in_ranges(item.verse_label(), ranges);

        let items = self
            .items
            .iter()
            .enumerate()
            .filter(|&(i, item)| match item.kind {
                ItemKind::Verse => keep_verse(item),
                ItemKind::Title => self.items[i + 1..]
                    .iter()
                    .find(|next| !next.is_title())
                    .is_some_and(|next| keep_verse(next)),
            })
            .map(|(_, item)| item.clone())
            .collect();

        Selection {
            chapter: self.chapter.clone(),
            items,
        }
    }
}

/// Load, normalize, and validate a selection file.
pub fn load_selection(path: &Path) -> Result<Selection, ContentError> {
    let content = fs::read_to_string(path)?;
    let raw: Selection = serde_json::from_str(&content)?;
    log::debug!("read {} items from {}", raw.items.len(), path.display());
    normalize(raw)
}

/// Normalize a parsed selection: strip HTML, fill references, validate, sort.
pub fn normalize(raw: Selection) -> Result<Selection, ContentError> {
    let mut keys = HashSet::new();
    let mut orders = HashSet::new();
    let mut items = Vec::with_capacity(raw.items.len());

    for mut item in raw.items {
        if !keys.insert(item.key.clone()) {
            return Err(ContentError::DuplicateKey(item.key));
        }
        if !orders.insert(item.order) {
            return Err(ContentError::DuplicateOrder(item.order, item.key));
        }

        item.display_text = strip_html(&item.display_text);
        match item.kind {
            ItemKind::Title if item.reference.is_some() => {
                return Err(ContentError::TitleWithReference(item.key));
            }
            ItemKind::Title => {}
            ItemKind::Verse => {
                let mut reference = item
                    .reference
                    .take()
                    .unwrap_or_else(|| Reference::verse(item.key.clone()));
                if reference.chapter.is_none() {
                    reference.chapter = raw.chapter.clone();
                }
                item.reference = Some(reference);
            }
        }
        items.push(item);
    }

    items.sort_by_key(|item| item.order);
    Ok(Selection {
        chapter: raw.chapter,
        items,
    })
}

/// Strip HTML markup from verse text.
///
/// Tags are removed (line-breaking tags become spaces), the handful of
/// entities the editor emits are decoded, and whitespace runs collapse to a
/// single space.
pub fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut tag = String::new();
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                tag.clear();
            }
            '>' if in_tag => {
                in_tag = false;
                if is_breaking_tag(&tag) {
                    text.push(' ');
                }
            }
            _ if in_tag => tag.push(c),
            _ => text.push(c),
        }
    }
    let decoded = decode_entities(&text);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_breaking_tag(tag: &str) -> bool {
    let name: String = tag
        .trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    matches!(name.as_str(), "br" | "p" | "div" | "li")
}

fn decode_entities(text: &str) -> String {
    // &amp; last so "&amp;lt;" stays "&lt;"
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn write_selection(dir: &TempDir, json: &str) -> std::path::PathBuf {
        let path = dir.path().join("selection.json");
        fs::write(&path, json).unwrap();
        path
    }

    // =========================================================================
    // strip_html
    // =========================================================================

    #[test]
    fn strip_html_removes_inline_tags() {
        assert_eq!(
            strip_html("In the <b>beginning</b> <i>God</i>"),
            "In the beginning God"
        );
    }

    #[test]
    fn strip_html_breaks_become_spaces() {
        assert_eq!(strip_html("light:<br/>and"), "light: and");
        assert_eq!(strip_html("<p>one</p><p>two</p>"), "one two");
    }

    #[test]
    fn strip_html_decodes_entities() {
        assert_eq!(
            strip_html("Day &amp; Night&nbsp;&quot;one&quot; &lt;x&gt; it&#39;s"),
            "Day & Night \"one\" <x> it's"
        );
    }

    #[test]
    fn strip_html_keeps_escaped_entity_text() {
        assert_eq!(strip_html("&amp;lt;"), "&lt;");
    }

    #[test]
    fn strip_html_collapses_whitespace() {
        assert_eq!(strip_html("  a \n\t b  "), "a b");
    }

    #[test]
    fn strip_html_tag_only_is_blank() {
        assert_eq!(strip_html("<span></span>"), "");
    }

    // =========================================================================
    // normalize
    // =========================================================================

    #[test]
    fn normalize_sorts_by_order() {
        let raw = Selection {
            chapter: None,
            items: vec![verse(3, "c"), title(0, "T"), verse(1, "a")],
        };
        let sel = normalize(raw).unwrap();
        let keys: Vec<&str> = sel.items.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["title-0", "1", "3"]);
    }

    #[test]
    fn normalize_fills_missing_reference_and_chapter() {
        let mut bare = verse(4, "text");
        bare.reference = None;
        let raw = Selection {
            chapter: Some("Genesis 1".into()),
            items: vec![bare],
        };
        let sel = normalize(raw).unwrap();
        assert_eq!(
            sel.items[0].reference,
            Some(Reference::with_chapter("Genesis 1", "4"))
        );
    }

    #[test]
    fn normalize_keeps_explicit_chapter() {
        let mut item = verse(4, "text");
        item.reference = Some(Reference::with_chapter("Exodus 2", "4"));
        let raw = Selection {
            chapter: Some("Genesis 1".into()),
            items: vec![item],
        };
        let sel = normalize(raw).unwrap();
        assert_eq!(
            sel.items[0].reference.as_ref().unwrap().to_string(),
            "Exodus 2:4"
        );
    }

    #[test]
    fn normalize_rejects_duplicate_key() {
        let raw = Selection {
            chapter: None,
            items: vec![verse(1, "a"), ContentItem::verse("1", 2, "b")],
        };
        assert!(matches!(
            normalize(raw),
            Err(ContentError::DuplicateKey(k)) if k == "1"
        ));
    }

    #[test]
    fn normalize_rejects_duplicate_order() {
        let raw = Selection {
            chapter: None,
            items: vec![verse(1, "a"), ContentItem::verse("2", 1, "b")],
        };
        assert!(matches!(
            normalize(raw),
            Err(ContentError::DuplicateOrder(1, _))
        ));
    }

    #[test]
    fn normalize_rejects_title_with_reference() {
        let mut t = title(0, "Heading");
        t.reference = Some(Reference::verse("1"));
        let raw = Selection {
            chapter: None,
            items: vec![t],
        };
        assert!(matches!(
            normalize(raw),
            Err(ContentError::TitleWithReference(_))
        ));
    }

    // =========================================================================
    // load_selection
    // =========================================================================

    #[test]
    fn load_selection_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = write_selection(
            &tmp,
            r#"{
                "chapter": "Genesis 1",
                "items": [
                    { "key": "2", "kind": "verse", "order": 2, "text": "And the <i>earth</i>" },
                    { "key": "title-1", "kind": "title", "order": 0, "text": "The Creation" },
                    { "key": "1", "kind": "verse", "order": 1, "text": "In the beginning",
                      "reference": { "verse": "1" } }
                ]
            }"#,
        );
        let sel = load_selection(&path).unwrap();
        assert_eq!(sel.items.len(), 3);
        assert_eq!(sel.items[0].key, "title-1");
        assert_eq!(sel.items[2].display_text, "And the earth");
        assert_eq!(
            sel.items[1].reference.as_ref().unwrap().to_string(),
            "Genesis 1:1"
        );
        assert_eq!(sel.verse_count(), 2);
        assert_eq!(sel.title_count(), 1);
    }

    #[test]
    fn load_selection_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_selection(&tmp.path().join("missing.json"));
        assert!(matches!(result, Err(ContentError::Io(_))));
    }

    #[test]
    fn load_selection_invalid_json_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = write_selection(&tmp, "{ not json");
        assert!(matches!(load_selection(&path), Err(ContentError::Json(_))));
    }

    #[test]
    fn load_selection_rejects_unknown_kind() {
        let tmp = TempDir::new().unwrap();
        let path = write_selection(
            &tmp,
            r#"{ "items": [ { "key": "1", "kind": "footnote", "order": 1, "text": "x" } ] }"#,
        );
        assert!(matches!(load_selection(&path), Err(ContentError::Json(_))));
    }

    // =========================================================================
    // filter_verses
    // =========================================================================

    #[test]
    fn filter_verses_keeps_ranges_and_heading_titles() {
        let sel = Selection {
            chapter: None,
            items: sample_chapter(),
        };
        let filtered = sel.filter_verses(&[1..=2, 7..=7]);
        let keys: Vec<&str> = filtered.items.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["title-0", "1", "2", "title-6", "7"]);
    }

    #[test]
    fn filter_verses_drops_title_when_next_verse_excluded() {
        let sel = Selection {
            chapter: None,
            items: sample_chapter(),
        };
        let filtered = sel.filter_verses(&[3..=5]);
        let keys: Vec<&str> = filtered.items.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["3", "4", "5"]);
    }

    #[test]
    fn filter_verses_drops_trailing_title() {
        let sel = Selection {
            chapter: None,
            items: vec![verse(1, "a"), title(2, "Dangling")],
        };
        let filtered = sel.filter_verses(&[1..=u32::MAX]);
        assert_eq!(filtered.items.len(), 1);
    }
}

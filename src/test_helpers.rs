//! Shared test utilities for the verse-deck test suite.
//!
//! Provides item builders, a sample chapter fixture, and assertions over
//! packed slide groups.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let items = sample_chapter();
//! let groups = pack_for_presentation(&items, &PackConfig::fixed_count(2)).unwrap();
//! assert_eq!(group_keys(&groups)[0], vec!["title-0", "1"]);
//! assert_orders_ascending(&items, &groups);
//! ```

use crate::pack::SlideGroup;
use crate::types::ContentItem;

// =========================================================================
// Item builders
// =========================================================================

/// Verse `n` with key `"n"`, order `n`, and reference `n`.
pub fn verse(n: u32, text: &str) -> ContentItem {
    ContentItem::verse(n.to_string(), i64::from(n), text)
}

/// Section title with key `"title-{order}"`.
pub fn title(order: i64, text: &str) -> ContentItem {
    ContentItem::title(format!("title-{order}"), order, text)
}

/// A short chapter with two section titles and one blank verse.
pub fn sample_chapter() -> Vec<ContentItem> {
    vec![
        title(0, "The Creation"),
        verse(1, "In the beginning God created the heaven and the earth."),
        verse(
            2,
            "And the earth was without form, and void; and darkness was upon the face of the deep.",
        ),
        verse(3, "And God said, Let there be light: and there was light."),
        verse(4, "   "),
        verse(5, "And God called the light Day."),
        title(6, "The Second Day"),
        verse(
            7,
            "And God said, Let there be a firmament in the midst of the waters.",
        ),
        verse(8, "And God called the firmament Heaven."),
    ]
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Find an item by key. Panics if not found.
pub fn find_item<'a>(items: &'a [ContentItem], key: &str) -> &'a ContentItem {
    items.iter().find(|i| i.key == key).unwrap_or_else(|| {
        let keys: Vec<&str> = items.iter().map(|i| i.key.as_str()).collect();
        panic!("item '{key}' not found. Available: {keys:?}")
    })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// Member keys of every group.
pub fn group_keys(groups: &[SlideGroup]) -> Vec<Vec<&str>> {
    groups
        .iter()
        .map(|g| g.member_keys.iter().map(String::as_str).collect())
        .collect()
}

/// All member keys, flattened in emission order.
pub fn flat_keys(groups: &[SlideGroup]) -> Vec<&str> {
    groups
        .iter()
        .flat_map(|g| g.member_keys.iter().map(String::as_str))
        .collect()
}

/// Rendered text of every group.
pub fn fragments(groups: &[SlideGroup]) -> Vec<&str> {
    groups.iter().map(|g| g.rendered_text.as_str()).collect()
}

// =========================================================================
// Assertions
// =========================================================================

/// Assert members ascend within each group and groups never step backwards.
pub fn assert_orders_ascending(items: &[ContentItem], groups: &[SlideGroup]) {
    let mut previous: Option<i64> = None;
    for group in groups {
        let orders: Vec<i64> = group
            .member_keys
            .iter()
            .map(|k| find_item(items, k).order)
            .collect();
        assert!(
            orders.windows(2).all(|w| w[0] < w[1]),
            "members out of order in {group:?}"
        );
        if let (Some(prev), Some(first)) = (previous, orders.first()) {
            assert!(*first >= prev, "group {group:?} starts before order {prev}");
        }
        previous = orders.last().copied().or(previous);
    }
}

//! CLI output formatting for all pipeline stages.
//!
//! Every slide is shown by its positional index and member keys, with its
//! text as indented context lines:
//!
//! ## Pack
//!
//! ```text
//! 001 [title-0, 1] (71 chars)
//!     The Creation
//!     1. In the beginning God created the heaven and the earth.
//! 002 [2] (88 chars)
//!     2. And the earth was without form, and void; and darkness was upon...
//!
//! 2 presentation slides from 3 items
//! ```
//!
//! ## Check
//!
//! ```text
//! Selection
//!     Chapter: Genesis 1
//!     Verses: 31
//!     Titles: 2
//! Config
//!     presentation: char-budget, max 200 chars
//!     subtitle: max 40 chars
//! ```
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::config::DeckConfig;
use crate::content::Selection;
use crate::pack::{self, PackMode, SlideGroup, SlideStyle};
use std::path::Path;

/// Longest line of slide text shown before truncating.
const PREVIEW_CHARS: usize = 72;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate(text: &str, max: usize) -> String {
    if pack::char_len(text) <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut.trim_end())
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Format packed groups, one header per slide and its text lines beneath.
pub fn format_pack_output(
    groups: &[SlideGroup],
    style: SlideStyle,
    item_count: usize,
) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, group) in groups.iter().enumerate() {
        lines.push(format!(
            "{} [{}] ({} chars)",
            format_index(i + 1),
            group.member_keys.join(", "),
            pack::char_len(&group.rendered_text)
        ));
        for paragraph in group.rendered_text.split(pack::ITEM_SEPARATOR) {
            lines.push(format!(
                "{}{}",
                indent(1),
                truncate(paragraph, PREVIEW_CHARS)
            ));
        }
    }
    if !groups.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "{} from {}",
        plural(groups.len(), &format!("{} slide", style.name())),
        plural(item_count, "item")
    ));
    lines
}

pub fn print_pack_output(groups: &[SlideGroup], style: SlideStyle, item_count: usize) {
    for line in format_pack_output(groups, style, item_count) {
        println!("{}", line);
    }
}

/// Format a selection and the effective config.
pub fn format_check_output(selection: &Selection, config: &DeckConfig) -> Vec<String> {
    let mut lines = vec!["Selection".to_string()];
    if let Some(chapter) = &selection.chapter {
        lines.push(format!("{}Chapter: {}", indent(1), chapter));
    }
    lines.push(format!("{}Verses: {}", indent(1), selection.verse_count()));
    lines.push(format!("{}Titles: {}", indent(1), selection.title_count()));
    let blank: Vec<&str> = selection
        .items
        .iter()
        .filter(|i| i.is_blank())
        .map(|i| i.key.as_str())
        .collect();
    if !blank.is_empty() {
        lines.push(format!(
            "{}Blank (skipped): {}",
            indent(1),
            blank.join(", ")
        ));
    }

    lines.push("Config".to_string());
    let presentation = &config.presentation;
    let packing = match presentation.mode {
        PackMode::FixedCount => format!("fixed-count, {} per slide", presentation.items_per_slide),
        PackMode::CharBudget => format!("char-budget, max {} chars", presentation.max_chars),
    };
    lines.push(format!("{}presentation: {}", indent(1), packing));
    lines.push(format!(
        "{}subtitle: max {} chars",
        indent(1),
        config.subtitle.max_chars
    ));
    let [w, h] = config.layout.aspect_ratio;
    lines.push(format!("{}layout: {}:{}", indent(1), w, h));
    lines
}

pub fn print_check_output(selection: &Selection, config: &DeckConfig) {
    for line in format_check_output(selection, config) {
        println!("{}", line);
    }
}

/// One-line summary of a written file.
pub fn format_written(what: &str, slide_count: usize, path: &Path) -> String {
    format!(
        "Wrote {} ({}) → {}",
        what,
        plural(slide_count, "slide"),
        path.display()
    )
}

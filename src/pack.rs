//! Slide packing: grouping ordered verses and titles into slides.
//!
//! The packer is a pure function from `(&[ContentItem], &PackConfig)` to a
//! list of [`SlideGroup`]s. It performs no I/O and keeps no state between
//! calls, so the same selection always packs the same way.
//!
//! ## Presentation Style
//!
//! Whole items are grouped onto slides, joined by a blank line. Verses are
//! prefixed with their verse label (`"5. In the beginning"`); titles are
//! rendered bare. Two modes decide where slide boundaries fall:
//!
//! - **Fixed count**: every slide holds `items_per_group` items (the last may
//!   hold fewer).
//! - **Char budget**: items accumulate until the next one would push the
//!   running total past `max_chars_per_group`. The running total sums the
//!   items' own lengths and ignores the `"\n\n"` separators, so a packed
//!   slide's rendered text can exceed the budget by a few characters. An
//!   item longer than the budget gets a slide to itself; it is never split.
//!
//! ## Subtitle Style
//!
//! Every item is wrapped on its own into caption fragments of at most
//! `max_chars_per_group` characters, breaking only between words:
//!
//! ```text
//! "1:5 In the beginning God created"  (max 10)
//!   → "1:5 In the" | "beginning" | "God" | "created"
//! ```
//!
//! Fragments never mix text from two items. A single word longer than the
//! budget becomes its own fragment.
//!
//! ## Blank Items
//!
//! Items whose text is empty or whitespace produce no groups in any mode.
//! Lengths are counted in `char`s so accented and non-Latin text packs the
//! way it reads.

use crate::types::ContentItem;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator between items on a presentation slide.
pub const ITEM_SEPARATOR: &str = "\n\n";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PackError {
    #[error("Invalid pack configuration: {0}")]
    InvalidConfig(String),
}

/// How presentation slides are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PackMode {
    FixedCount,
    CharBudget,
}

/// Which kind of deck the groups are destined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SlideStyle {
    Presentation,
    Subtitle,
}

impl SlideStyle {
    pub fn name(self) -> &'static str {
        match self {
            SlideStyle::Presentation => "presentation",
            SlideStyle::Subtitle => "subtitle",
        }
    }
}

/// Configuration for one packing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackConfig {
    pub mode: PackMode,
    /// Items per slide; only read in `FixedCount` mode.
    pub items_per_group: usize,
    /// Character budget; read in `CharBudget` mode and for subtitles.
    pub max_chars_per_group: usize,
    pub style: SlideStyle,
}

impl PackConfig {
    pub fn fixed_count(items_per_group: usize) -> Self {
        Self {
            mode: PackMode::FixedCount,
            items_per_group,
            max_chars_per_group: 0,
            style: SlideStyle::Presentation,
        }
    }

    pub fn char_budget(max_chars_per_group: usize) -> Self {
        Self {
            mode: PackMode::CharBudget,
            items_per_group: 1,
            max_chars_per_group,
            style: SlideStyle::Presentation,
        }
    }

    pub fn subtitle(max_chars_per_group: usize) -> Self {
        Self {
            mode: PackMode::CharBudget,
            items_per_group: 1,
            max_chars_per_group,
            style: SlideStyle::Subtitle,
        }
    }

    /// Reject configurations that would produce zero or unbounded groups.
    ///
    /// Only the fields the configured style and mode actually read are checked.
    pub fn validate(&self) -> Result<(), PackError> {
        match (self.style, self.mode) {
            (SlideStyle::Presentation, PackMode::FixedCount) if self.items_per_group == 0 => Err(
                PackError::InvalidConfig("items_per_group must be at least 1".into()),
            ),
            (SlideStyle::Presentation, PackMode::CharBudget) | (SlideStyle::Subtitle, _)
                if self.max_chars_per_group == 0 =>
            {
                Err(PackError::InvalidConfig(
                    "max_chars_per_group must be at least 1".into(),
                ))
            }
            _ => Ok(()),
        }
    }
}

/// One slide's worth of content (or one subtitle fragment).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideGroup {
    /// Keys of the source items, in source order
    pub member_keys: Vec<String>,
    /// Text to display, already fit to the packing constraint
    pub rendered_text: String,
}

/// Length in characters, as the budget counts them.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Presentation display form: `"{verse}. {text}"` for verses, bare text for titles.
pub fn presentation_text(item: &ContentItem) -> String {
    if item.is_title() {
        item.display_text.trim().to_string()
    } else {
        format!("{}. {}", item.verse_label(), item.display_text.trim())
    }
}

/// Subtitle prefix: `"{chapter}:{verse} "` for verses, empty for titles.
pub fn subtitle_prefix(item: &ContentItem) -> String {
    if item.is_title() {
        return String::new();
    }
    match &item.reference {
        Some(reference) => format!("{reference} "),
        None => format!("{} ", item.key),
    }
}

/// Pack items for the style named in `config`.
pub fn pack(items: &[ContentItem], config: &PackConfig) -> Result<Vec<SlideGroup>, PackError> {
    match config.style {
        SlideStyle::Presentation => pack_for_presentation(items, config),
        SlideStyle::Subtitle => pack_for_subtitle(items, config),
    }
}

/// Group whole items onto presentation slides.
///
/// `items` must be sorted by `order`; boundaries only ever fall between items.
pub fn pack_for_presentation(
    items: &[ContentItem],
    config: &PackConfig,
) -> Result<Vec<SlideGroup>, PackError> {
    PackConfig {
        style: SlideStyle::Presentation,
        ..config.clone()
    }
    .validate()?;
    debug_assert!(is_ordered(items), "items must be sorted by order");

    let rendered: Vec<RenderedItem<'_>> = items
        .iter()
        .filter(|item| !item.is_blank())
        .map(RenderedItem::new)
        .collect();

    let groups: Vec<SlideGroup> = match config.mode {
        PackMode::FixedCount => rendered
            .chunks(config.items_per_group)
            .map(close_group)
            .collect(),
        PackMode::CharBudget => pack_by_budget(&rendered, config.max_chars_per_group),
    };
    Ok(groups)
}

/// Wrap each item into caption fragments at word boundaries.
pub fn pack_for_subtitle(
    items: &[ContentItem],
    config: &PackConfig,
) -> Result<Vec<SlideGroup>, PackError> {
    PackConfig {
        style: SlideStyle::Subtitle,
        ..config.clone()
    }
    .validate()?;
    debug_assert!(is_ordered(items), "items must be sorted by order");

    let max = config.max_chars_per_group;
    Ok(items
        .iter()
        .filter(|item| !item.is_blank())
        .flat_map(|item| {
            let full_text = format!("{}{}", subtitle_prefix(item), item.display_text);
            wrap_words(&full_text, max)
                .into_iter()
                .map(move |fragment| SlideGroup {
                    member_keys: vec![item.key.clone()],
                    rendered_text: fragment,
                })
        })
        .collect())
}

/// Greedy word wrap: lines of at most `max` chars unless a word alone is longer.
pub fn wrap_words(text: &str, max: usize) -> Vec<String> {
    let (mut lines, last) = text
        .split_whitespace()
        .fold((Vec::new(), Line::default()), |(mut lines, line), word| {
            let word_len = char_len(word);
            if !line.words.is_empty() && line.len + 1 + word_len > max {
                lines.push(line.join());
                (lines, Line::start(word, word_len))
            } else {
                (lines, line.push(word, word_len))
            }
        });
    if !last.words.is_empty() {
        lines.push(last.join());
    }
    lines
}

struct RenderedItem<'a> {
    key: &'a str,
    text: String,
    len: usize,
}

impl<'a> RenderedItem<'a> {
    fn new(item: &'a ContentItem) -> Self {
        let text = presentation_text(item);
        Self {
            key: &item.key,
            len: char_len(&text),
            text,
        }
    }
}

#[derive(Default)]
struct Line<'a> {
    words: Vec<&'a str>,
    len: usize,
}

impl<'a> Line<'a> {
    fn start(word: &'a str, word_len: usize) -> Self {
        Self {
            words: vec![word],
            len: word_len,
        }
    }

    fn push(mut self, word: &'a str, word_len: usize) -> Self {
        self.len += if self.words.is_empty() {
            word_len
        } else {
            word_len + 1
        };
        self.words.push(word);
        self
    }

    fn join(&self) -> String {
        self.words.join(" ")
    }
}

fn close_group(members: &[RenderedItem<'_>]) -> SlideGroup {
    SlideGroup {
        member_keys: members.iter().map(|m| m.key.to_string()).collect(),
        rendered_text: members
            .iter()
            .map(|m| m.text.as_str())
            .collect::<Vec<_>>()
            .join(ITEM_SEPARATOR),
    }
}

fn pack_by_budget(rendered: &[RenderedItem<'_>], max: usize) -> Vec<SlideGroup> {
    // (closed groups, start index of the open group, chars in the open group)
    let (mut groups, start, _) = rendered.iter().enumerate().fold(
        (Vec::new(), 0usize, 0usize),
        |(mut groups, start, chars), (i, item)| {
            if i > start && chars + item.len > max {
                groups.push(close_group(&rendered[start..i]));
                (groups, i, item.len)
            } else {
                (groups, start, chars + item.len)
            }
        },
    );
    if start < rendered.len() {
        groups.push(close_group(&rendered[start..]));
    }
    groups
}

fn is_ordered(items: &[ContentItem]) -> bool {
    items.windows(2).all(|w| w[0].order < w[1].order)
}

//! Slide descriptor generation.
//!
//! Stage 3 of the verse-deck pipeline. Takes packed [`SlideGroup`]s and turns
//! each one into a [`SlideDescriptor`]: the background, text runs, font,
//! color, and alignment a slide-file writer needs to lay the slide out.
//!
//! ## Presentation Slides
//!
//! One run per member item, each after the first starting on a new paragraph.
//! Verses carry their `"N. "` prefix; titles are bare and, when the theme asks
//! for it, italic.
//!
//! ## Subtitle Slides
//!
//! One run holding the caption fragment. Fragments cut from a title are
//! italic under the same theme switch.

use crate::config::{DeckConfig, HAlign, SlideTheme, VAlign};
use crate::content::Selection;
use crate::pack::{self, PackError, SlideGroup, SlideStyle};
use crate::types::ContentItem;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlideError {
    #[error("Slide group references unknown item: {0}")]
    UnknownKey(String),
    #[error("Packing error: {0}")]
    Pack(#[from] PackError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A complete deck, ready for a slide-file writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    pub style: SlideStyle,
    /// Slide aspect ratio as `[width, height]`
    pub aspect_ratio: [u32; 2],
    pub slides: Vec<SlideDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideDescriptor {
    pub background: String,
    pub font_face: String,
    pub font_size: u32,
    pub color: String,
    pub align: HAlign,
    pub valign: VAlign,
    pub member_keys: Vec<String>,
    pub runs: Vec<TextRun>,
}

impl SlideDescriptor {
    /// Plain text of the slide, paragraphs separated by a blank line.
    pub fn plain_text(&self) -> String {
        self.runs.iter().fold(String::new(), |mut text, run| {
            if run.break_before {
                text.push_str(pack::ITEM_SEPARATOR);
            }
            text.push_str(&run.text);
            text
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(default)]
    pub italic: bool,
    /// Start a new paragraph before this run
    #[serde(default)]
    pub break_before: bool,
}

/// Pack `selection` in `style` and build its deck.
pub fn build(
    selection: &Selection,
    style: SlideStyle,
    config: &DeckConfig,
) -> Result<(Vec<SlideGroup>, Deck), SlideError> {
    let groups = pack::pack(&selection.items, &config.pack_config(style))?;
    log::debug!(
        "packed {} items into {} {} groups",
        selection.items.len(),
        groups.len(),
        style.name()
    );
    let deck = build_deck(&selection.items, &groups, style, config)?;
    Ok((groups, deck))
}

/// Map packed groups onto slide descriptors using the style's theme.
pub fn build_deck(
    items: &[ContentItem],
    groups: &[SlideGroup],
    style: SlideStyle,
    config: &DeckConfig,
) -> Result<Deck, SlideError> {
    let by_key: HashMap<&str, &ContentItem> =
        items.iter().map(|item| (item.key.as_str(), item)).collect();
    let theme = config.theme(style);

    let slides = groups
        .iter()
        .map(|group| -> Result<SlideDescriptor, SlideError> {
            let runs = match style {
                SlideStyle::Presentation => presentation_runs(group, &by_key, theme)?,
                SlideStyle::Subtitle => vec![subtitle_run(group, &by_key, theme)?],
            };
            Ok(describe(group, runs, theme))
        })
        .collect::<Result<Vec<_>, SlideError>>()?;

    Ok(Deck {
        style,
        aspect_ratio: config.layout.aspect_ratio,
        slides,
    })
}

/// Write a deck as pretty-printed JSON.
pub fn write_deck(deck: &Deck, path: &Path) -> Result<(), SlideError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(deck)?;
    fs::write(path, json)?;
    Ok(())
}

fn lookup<'a>(
    by_key: &HashMap<&str, &'a ContentItem>,
    key: &str,
) -> Result<&'a ContentItem, SlideError> {
    by_key
        .get(key)
        .copied()
        .ok_or_else(|| SlideError::UnknownKey(key.to_string()))
}

fn presentation_runs(
    group: &SlideGroup,
    by_key: &HashMap<&str, &ContentItem>,
    theme: &SlideTheme,
) -> Result<Vec<TextRun>, SlideError> {
    group
        .member_keys
        .iter()
        .enumerate()
        .map(|(i, key)| -> Result<TextRun, SlideError> {
            let item = lookup(by_key, key)?;
            Ok(TextRun {
                text: pack::presentation_text(item),
                italic: theme.title_italic && item.is_title(),
                break_before: i > 0,
            })
        })
        .collect()
}

fn subtitle_run(
    group: &SlideGroup,
    by_key: &HashMap<&str, &ContentItem>,
    theme: &SlideTheme,
) -> Result<TextRun, SlideError> {
    let key = group
        .member_keys
        .first()
        .ok_or_else(|| SlideError::UnknownKey(String::new()))?;
    let item = lookup(by_key, key)?;
    Ok(TextRun {
        text: group.rendered_text.clone(),
        italic: theme.title_italic && item.is_title(),
        break_before: false,
    })
}

fn describe(group: &SlideGroup, runs: Vec<TextRun>, theme: &SlideTheme) -> SlideDescriptor {
    SlideDescriptor {
        background: theme.background.clone(),
        font_face: theme.font_face.clone(),
        font_size: theme.font_size,
        color: theme.color.clone(),
        align: theme.align,
        valign: theme.valign,
        member_keys: group.member_keys.clone(),
        runs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn selection() -> Selection {
        Selection {
            chapter: None,
            items: sample_chapter(),
        }
    }

    #[test]
    fn presentation_runs_match_rendered_text() {
        let mut config = DeckConfig::default();
        config.presentation.max_chars = 120;
        let (groups, deck) = build(&selection(), SlideStyle::Presentation, &config).unwrap();

        assert_eq!(deck.slides.len(), groups.len());
        for (slide, group) in deck.slides.iter().zip(&groups) {
            assert_eq!(slide.plain_text(), group.rendered_text);
            assert_eq!(slide.member_keys, group.member_keys);
        }
    }

    #[test]
    fn presentation_titles_are_italic() {
        let mut config = DeckConfig::default();
        config.presentation.mode = crate::pack::PackMode::FixedCount;
        config.presentation.items_per_slide = 2;
        let (_, deck) = build(&selection(), SlideStyle::Presentation, &config).unwrap();

        let first = &deck.slides[0];
        assert_eq!(first.runs.len(), 2);
        assert!(first.runs[0].italic);
        assert!(!first.runs[0].break_before);
        assert!(!first.runs[1].italic);
        assert!(first.runs[1].break_before);
        assert!(first.runs[1].text.starts_with("1. "));
    }

    #[test]
    fn title_italic_can_be_disabled() {
        let mut config = DeckConfig::default();
        config.presentation.slide.title_italic = false;
        let (_, deck) = build(&selection(), SlideStyle::Presentation, &config).unwrap();
        assert!(deck.slides.iter().flat_map(|s| &s.runs).all(|r| !r.italic));
    }

    #[test]
    fn presentation_uses_presentation_theme() {
        let config = DeckConfig::default();
        let (_, deck) = build(&selection(), SlideStyle::Presentation, &config).unwrap();
        let slide = &deck.slides[0];
        assert_eq!(slide.background, "#000000");
        assert_eq!(slide.valign, VAlign::Middle);
        assert_eq!(slide.align, HAlign::Center);
        assert_eq!(deck.aspect_ratio, [16, 9]);
    }

    #[test]
    fn subtitle_slides_are_single_runs_at_bottom() {
        let mut config = DeckConfig::default();
        config.subtitle.max_chars = 20;
        let (groups, deck) = build(&selection(), SlideStyle::Subtitle, &config).unwrap();

        assert_eq!(deck.style, SlideStyle::Subtitle);
        assert_eq!(deck.slides.len(), groups.len());
        for slide in &deck.slides {
            assert_eq!(slide.runs.len(), 1);
            assert_eq!(slide.member_keys.len(), 1);
            assert_eq!(slide.valign, VAlign::Bottom);
            assert_eq!(slide.background, "#00ff00");
        }
        let title_slide = deck
            .slides
            .iter()
            .find(|s| s.member_keys[0] == "title-6")
            .unwrap();
        assert!(title_slide.runs[0].italic);
        assert_eq!(title_slide.plain_text(), "The Second Day");
    }

    #[test]
    fn unknown_member_key_is_error() {
        let groups = vec![SlideGroup {
            member_keys: vec!["99".into()],
            rendered_text: "x".into(),
        }];
        let result = build_deck(
            &sample_chapter(),
            &groups,
            SlideStyle::Presentation,
            &DeckConfig::default(),
        );
        assert!(matches!(result, Err(SlideError::UnknownKey(k)) if k == "99"));
    }

    #[test]
    fn invalid_pack_config_surfaces_as_pack_error() {
        let mut config = DeckConfig::default();
        config.subtitle.max_chars = 0;
        let result = build(&selection(), SlideStyle::Subtitle, &config);
        assert!(matches!(result, Err(SlideError::Pack(_))));
    }

    #[test]
    fn empty_selection_builds_empty_deck() {
        let (groups, deck) = build(
            &Selection::default(),
            SlideStyle::Presentation,
            &DeckConfig::default(),
        )
        .unwrap();
        assert!(groups.is_empty());
        assert!(deck.slides.is_empty());
    }

    #[test]
    fn write_deck_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out/deck.json");
        let (_, deck) = build(&selection(), SlideStyle::Subtitle, &DeckConfig::default()).unwrap();
        write_deck(&deck, &path).unwrap();

        let written: Deck = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.slides, deck.slides);
        assert_eq!(written.style, SlideStyle::Subtitle);
    }
}

//! # verse-deck
//!
//! Packs a selection of Bible verses and section titles into slide decks:
//! full-text "presentation" slides for projection, or caption-sized
//! "subtitle" slides for video overlays.
//!
//! # Architecture: Four-Stage Pipeline
//!
//! ```text
//! 1. Load     selection.json  →  Selection      (validated, HTML-stripped, ordered)
//! 2. Pack     Selection       →  SlideGroup[]   (which text goes on which slide)
//! 3. Build    SlideGroup[]    →  Deck           (background, runs, font, color, alignment)
//! 4. Emit     Deck            →  deck.json | preview.html
//! ```
//!
//! Packing is a pure function with no I/O, so the rules that decide slide
//! boundaries can be tested without touching the filesystem. The deck JSON is
//! the hand-off point to whatever writes the final slide file.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`content`] | Stage 1: reads and normalizes the selection file |
//! | [`reference`] | Verse range queries (`1-3,5,9-`) for narrowing a selection |
//! | [`pack`] | Stage 2: fixed-count, char-budget, and subtitle packing |
//! | [`slides`] | Stage 3: slide descriptors from packed groups |
//! | [`preview`] | HTML proof sheet of a deck, rendered with Maud |
//! | [`config`] | Layered `config.toml` loading, validation, and merging |
//! | [`types`] | Shared types (`ContentItem`, `Reference`) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Soft Character Budget
//!
//! In char-budget mode the running total counts each item's own length and
//! ignores the blank-line separators between items. A packed slide can
//! therefore run a few characters over the budget. A verse longer than the
//! budget still gets a slide of its own; verses are never split across
//! presentation slides.
//!
//! ## Word-Boundary Captions
//!
//! Subtitle fragments break only between words and never mix two verses, so
//! every caption can be traced back to exactly one verse or title.
//!
//! ## Verses and Titles Are Tagged
//!
//! Items carry an explicit [`types::ItemKind`]. Nothing downstream inspects
//! key strings to decide whether an item is a heading.

pub mod config;
pub mod content;
pub mod output;
pub mod pack;
pub mod preview;
pub mod reference;
pub mod slides;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

//! HTML proof sheet for a deck.
//!
//! Renders every slide as a box with the deck's aspect ratio, colored and
//! aligned from its descriptor, so a selection can be proofed in a browser
//! before it is handed to the slide-file writer. Font sizes are in points on
//! a 720pt-wide slide and scale with the box via container query units.
//!
//! Uses [maud](https://maud.lambda.xyz/); all slide text is auto-escaped.

use crate::config::{HAlign, VAlign};
use crate::slides::{Deck, SlideDescriptor, TextRun};
use maud::{DOCTYPE, Markup, html};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Slide width in points; descriptor font sizes are relative to this.
const SLIDE_WIDTH_PT: f32 = 720.0;

const CSS: &str = r#"
body { margin: 0; padding: 2rem; background: #1e1e1e; font-family: sans-serif; }
h1 { color: #ddd; font-weight: normal; font-size: 1rem; }
.slides { display: grid; grid-template-columns: repeat(auto-fill, minmax(22rem, 1fr)); gap: 1.5rem; }
figure { margin: 0; }
figcaption { color: #999; font-size: 0.75rem; margin-top: 0.25rem; }
.slide { container-type: inline-size; display: flex; flex-direction: column; padding: 4%; box-sizing: border-box; overflow: hidden; }
.slide p { margin: 0 0 0.6em 0; white-space: pre-wrap; }
.slide p:last-child { margin-bottom: 0; }
"#;

/// Render the deck as a standalone HTML document.
pub fn render_preview(deck: &Deck, title: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (CSS) }
            }
            body {
                h1 { (title) ": " (deck.slides.len()) " " (deck.style.name()) " slides" }
                div.slides {
                    @for (i, slide) in deck.slides.iter().enumerate() {
                        figure {
                            (render_slide(slide, deck.aspect_ratio))
                            figcaption { (i + 1) ". " (slide.member_keys.join(", ")) }
                        }
                    }
                }
            }
        }
    }
}

/// Render and write the preview to `path`.
pub fn write_preview(deck: &Deck, title: &str, path: &Path) -> Result<(), PreviewError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render_preview(deck, title).into_string())?;
    Ok(())
}

fn render_slide(slide: &SlideDescriptor, aspect_ratio: [u32; 2]) -> Markup {
    html! {
        div.slide style=(slide_style(slide, aspect_ratio)) {
            @for paragraph in paragraphs(&slide.runs) {
                p {
                    @for run in paragraph {
                        @if run.italic {
                            em { (run.text) }
                        } @else {
                            (run.text)
                        }
                    }
                }
            }
        }
    }
}

fn slide_style(slide: &SlideDescriptor, [w, h]: [u32; 2]) -> String {
    let justify = match slide.valign {
        VAlign::Top => "flex-start",
        VAlign::Middle => "center",
        VAlign::Bottom => "flex-end",
    };
    let text_align = match slide.align {
        HAlign::Left => "left",
        HAlign::Center => "center",
        HAlign::Right => "right",
    };
    format!(
        "aspect-ratio: {w} / {h}; background: {bg}; color: {color}; \
         font-family: '{font}'; font-size: {size:.2}cqw; \
         justify-content: {justify}; text-align: {text_align};",
        bg = slide.background,
        color = slide.color,
        font = slide.font_face.replace('\'', ""),
        size = slide.font_size as f32 * 100.0 / SLIDE_WIDTH_PT,
    )
}

/// Split runs into paragraphs at every `break_before`.
fn paragraphs(runs: &[TextRun]) -> Vec<&[TextRun]> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, run) in runs.iter().enumerate() {
        if run.break_before && i > start {
            out.push(&runs[start..i]);
            start = i;
        }
    }
    if start < runs.len() {
        out.push(&runs[start..]);
    }
    out
}

//! Extraction of translatable text runs from a presentation.

use crate::slides::{Presentation, TextElementKind};
use tracing::debug;

/// Runs of this many characters or fewer are noise: bullet glyphs, stray
/// whitespace, lone linefeeds.
pub const NOISE_MAX_CHARS: usize = 2;

/// True when `text` is too short to be worth translating.
///
/// Length is counted in characters, not bytes, so a two-character CJK run is
/// noise just like a two-character Latin one.
pub fn is_noise(text: &str) -> bool {
    text.chars().count() <= NOISE_MAX_CHARS
}

/// One text run and the slide that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextFragment<'a> {
    pub slide_id: &'a str,
    pub text: &'a str,
}

/// Lazily yield every text run of `presentation` in document order: slides,
/// then page elements within a slide, then text elements within a shape.
///
/// Elements without a shape, shapes without text and non-run text elements
/// (paragraph markers, auto text) are skipped, as are runs whose raw content
/// [`is_noise`]. The iterator borrows the presentation and holds no other
/// state; walk again by calling this again.
pub fn walk(presentation: &Presentation) -> impl Iterator<Item = TextFragment<'_>> + '_ {
    presentation
        .slides
        .iter()
        .flat_map(|slide| {
            slide.page_elements.iter().flat_map(move |element| {
                debug!("Shape {} on slide {}", element.object_id, slide.object_id);
                element
                    .shape
                    .iter()
                    .flat_map(|shape| shape.text.iter())
                    .flat_map(|text| text.text_elements.iter())
                    .filter_map(move |text_element| match text_element.kind() {
                        TextElementKind::TextRun(run) => Some(TextFragment {
                            slide_id: &slide.object_id,
                            text: &run.content,
                        }),
                        _ => None,
                    })
            })
        })
        .filter(|fragment| !is_noise(fragment.text))
}

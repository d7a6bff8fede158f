//! Styled text runs
//!
//! A [`StyledTextRun`] is built by appending pieces in order. Each piece adds
//! its text and one span per styling attribute it carries. Inline images
//! reserve a single object-replacement character; the placeholder span over
//! that character is later swapped for the resolved image without moving the
//! range.
//!
//! # Example
//!
//! ```rust
//! use wear_tiles::spannable::StyledTextRun;
//!
//! let mut run = StyledTextRun::new();
//! run.append_plain("Steps ");
//! let slot = run.append_image_placeholder("shoe", 12.0, 12.0, None, None);
//! let range = run.span(slot).unwrap().range();
//! assert_eq!(&run.text()[range], "\u{FFFC}");
//! ```

use std::ops::Range;

use smallvec::SmallVec;

use crate::action::ClickAction;
use crate::proto::{Argb, FontWeight};
use crate::resources::Drawable;
use crate::text_measure::ResolvedFontStyle;

/// Character reserved for an inline image
pub const OBJECT_REPLACEMENT: char = '\u{FFFC}';

/// Styling attribute applied to a byte range of the run
#[derive(Clone, Debug, PartialEq)]
pub enum SpanKind {
    Size(f32),
    Weight(FontWeight),
    Italic,
    Underline,
    LetterSpacing(f32),
    Color(Argb),
    Click(ClickAction),
    /// Image still loading
    ImagePlaceholder {
        resource_id: String,
        width_px: f32,
        height_px: f32,
        placeholder: Option<Drawable>,
    },
    Image {
        resource_id: String,
        width_px: f32,
        height_px: f32,
        drawable: Drawable,
    },
}

/// A span of styled text within the run
#[derive(Clone, Debug, PartialEq)]
pub struct TextSpan {
    /// Start byte index
    pub start: usize,
    /// End byte index (exclusive)
    pub end: usize,
    pub kind: SpanKind,
}

impl TextSpan {
    pub fn new(start: usize, end: usize, kind: SpanKind) -> Self {
        Self { start, end, kind }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Text with attribute spans, in append order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyledTextRun {
    text: String,
    spans: Vec<TextSpan>,
}

impl StyledTextRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn spans(&self) -> &[TextSpan] {
        &self.spans
    }

    pub fn span(&self, index: usize) -> Option<&TextSpan> {
        self.spans.get(index)
    }

    /// Spans covering the byte at `offset`
    pub fn spans_at(&self, offset: usize) -> impl Iterator<Item = &TextSpan> {
        self.spans
            .iter()
            .filter(move |span| span.start <= offset && offset < span.end)
    }

    /// Append unstyled text
    pub fn append_plain(&mut self, text: &str) -> Range<usize> {
        let start = self.text.len();
        self.text.push_str(text);
        start..self.text.len()
    }

    /// Append text with one span per attribute of `style`
    pub fn append_text(
        &mut self,
        text: &str,
        style: &ResolvedFontStyle,
        click: Option<ClickAction>,
    ) -> Range<usize> {
        let range = self.append_plain(text);
        if range.is_empty() {
            return range;
        }

        let mut kinds: SmallVec<[SpanKind; 6]> = SmallVec::new();
        kinds.push(SpanKind::Size(style.size_px));
        if style.weight != FontWeight::Normal {
            kinds.push(SpanKind::Weight(style.weight));
        }
        if style.italic {
            kinds.push(SpanKind::Italic);
        }
        if style.underline {
            kinds.push(SpanKind::Underline);
        }
        if style.letter_spacing_em != 0.0 {
            kinds.push(SpanKind::LetterSpacing(style.letter_spacing_em));
        }
        kinds.push(SpanKind::Color(style.color));
        if let Some(click) = click {
            kinds.push(SpanKind::Click(click));
        }

        for kind in kinds {
            self.spans.push(TextSpan::new(range.start, range.end, kind));
        }
        range
    }

    /// Append a resolved inline image
    pub fn append_image(
        &mut self,
        resource_id: &str,
        width_px: f32,
        height_px: f32,
        drawable: Drawable,
        click: Option<ClickAction>,
    ) -> usize {
        self.push_image_span(
            SpanKind::Image {
                resource_id: resource_id.to_string(),
                width_px,
                height_px,
                drawable,
            },
            click,
        )
    }

    /// Reserve a character for an image that is still loading.
    ///
    /// Returns the index of the placeholder span for [`swap_image`](Self::swap_image).
    pub fn append_image_placeholder(
        &mut self,
        resource_id: &str,
        width_px: f32,
        height_px: f32,
        placeholder: Option<Drawable>,
        click: Option<ClickAction>,
    ) -> usize {
        self.push_image_span(
            SpanKind::ImagePlaceholder {
                resource_id: resource_id.to_string(),
                width_px,
                height_px,
                placeholder,
            },
            click,
        )
    }

    fn push_image_span(&mut self, kind: SpanKind, click: Option<ClickAction>) -> usize {
        let start = self.text.len();
        self.text.push(OBJECT_REPLACEMENT);
        let end = self.text.len();

        let index = self.spans.len();
        self.spans.push(TextSpan::new(start, end, kind));
        if let Some(click) = click {
            self.spans.push(TextSpan::new(start, end, SpanKind::Click(click)));
        }
        index
    }

    /// Replace the placeholder span at `index` with the resolved image.
    ///
    /// Returns false if `index` is not a placeholder, e.g. it was already
    /// swapped.
    pub fn swap_image(&mut self, index: usize, drawable: Drawable) -> bool {
        let Some(span) = self.spans.get_mut(index) else {
            return false;
        };
        let SpanKind::ImagePlaceholder {
            resource_id,
            width_px,
            height_px,
            ..
        } = &span.kind
        else {
            return false;
        };

        span.kind = SpanKind::Image {
            resource_id: resource_id.clone(),
            width_px: *width_px,
            height_px: *height_px,
            drawable,
        };
        true
    }

    /// Largest font size of any text span
    pub fn max_font_size(&self) -> Option<f32> {
        self.spans
            .iter()
            .filter_map(|span| match span.kind {
                SpanKind::Size(size) => Some(size),
                _ => None,
            })
            .reduce(f32::max)
    }

    /// Widest and tallest inline image
    pub fn max_image_size(&self) -> (f32, f32) {
        self.spans
            .iter()
            .filter_map(|span| match span.kind {
                SpanKind::Image {
                    width_px,
                    height_px,
                    ..
                }
                | SpanKind::ImagePlaceholder {
                    width_px,
                    height_px,
                    ..
                } => Some((width_px, height_px)),
                _ => None,
            })
            .fold((0.0, 0.0), |(w, h), (iw, ih)| (f32::max(w, iw), f32::max(h, ih)))
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

//! Text measurement for layout
//!
//! Glyph shaping belongs to the host. The inflater only needs a size for
//! each text leaf so wrap-sized containers can be measured.

use crate::config::InflaterConfig;
use crate::proto::{Argb, FontStyle, FontWeight};

/// A [`FontStyle`] with every default filled in and sizes in pixels
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedFontStyle {
    pub size_px: f32,
    pub weight: FontWeight,
    pub italic: bool,
    pub underline: bool,
    pub letter_spacing_em: f32,
    pub color: Argb,
}

impl ResolvedFontStyle {
    pub fn resolve(style: &FontStyle, config: &InflaterConfig) -> Self {
        let size_sp = style.size_sp.unwrap_or(config.default_font_size_sp);
        Self {
            size_px: config.metrics.sp_to_px(size_sp),
            weight: style.weight,
            italic: style.italic,
            underline: style.underline,
            letter_spacing_em: style.letter_spacing_em,
            color: style.color.unwrap_or(Argb::WHITE),
        }
    }
}

/// Measured size of a block of text
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextMetrics {
    pub width: f32,
    pub height: f32,
    pub line_count: u32,
}

pub trait TextMeasurer {
    fn measure(&self, text: &str, style: &ResolvedFontStyle, max_lines: Option<u32>)
        -> TextMetrics;
}

/// Fixed-advance estimate: every character is `char_width_em` wide.
///
/// Lines break only on `\n`; `max_lines` truncates.
#[derive(Clone, Copy, Debug)]
pub struct EstimatingTextMeasurer {
    char_width_em: f32,
    line_height_em: f32,
}

impl EstimatingTextMeasurer {
    pub fn new(char_width_em: f32, line_height_em: f32) -> Self {
        Self {
            char_width_em,
            line_height_em,
        }
    }

    pub fn from_config(config: &InflaterConfig) -> Self {
        Self::new(config.text_char_width_em, config.text_line_height_em)
    }
}

impl TextMeasurer for EstimatingTextMeasurer {
    fn measure(
        &self,
        text: &str,
        style: &ResolvedFontStyle,
        max_lines: Option<u32>,
    ) -> TextMetrics {
        let advance = style.size_px * (self.char_width_em + style.letter_spacing_em);
        let limit = max_lines.map(|n| n.max(1) as usize).unwrap_or(usize::MAX);

        let mut width: f32 = 0.0;
        let mut line_count = 0u32;
        for line in text.split('\n').take(limit) {
            width = width.max(line.chars().count() as f32 * advance);
            line_count += 1;
        }

        TextMetrics {
            width,
            height: line_count as f32 * style.size_px * self.line_height_em,
            line_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(size_px: f32) -> ResolvedFontStyle {
        ResolvedFontStyle {
            size_px,
            weight: FontWeight::Normal,
            italic: false,
            underline: false,
            letter_spacing_em: 0.0,
            color: Argb::WHITE,
        }
    }

    #[test]
    fn test_estimate() {
        let measurer = EstimatingTextMeasurer::new(0.5, 1.0);
        let metrics = measurer.measure("abcd\nab", &style(10.0), None);
        assert_eq!(metrics.width, 20.0);
        assert_eq!(metrics.height, 20.0);
        assert_eq!(metrics.line_count, 2);

        let truncated = measurer.measure("abcd\nabcdefgh", &style(10.0), Some(1));
        assert_eq!(truncated.width, 20.0);
        assert_eq!(truncated.line_count, 1);
    }

    #[test]
    fn test_resolve_defaults() {
        let config = InflaterConfig::default();
        let resolved = ResolvedFontStyle::resolve(&FontStyle::default(), &config);
        assert_eq!(resolved.size_px, 16.0);
        assert_eq!(resolved.color, Argb::WHITE);
    }
}

//! Display metrics and inflater configuration
//!
//! ```toml
//! text_char_width_em = 0.55
//! default_arc_thickness_dp = 10.0
//!
//! [metrics]
//! density = 2.0
//! width_px = 454
//! height_px = 454
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Screen properties used to convert protocol units into pixels
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplayMetrics {
    /// Pixels per dp
    #[serde(default = "default_density")]
    pub density: f32,
    /// Pixels per sp, includes the user's font scale
    #[serde(default)]
    pub scaled_density: Option<f32>,
    #[serde(default = "default_screen_px")]
    pub width_px: u32,
    #[serde(default = "default_screen_px")]
    pub height_px: u32,
}

fn default_density() -> f32 {
    1.0
}

fn default_screen_px() -> u32 {
    384
}

impl Default for DisplayMetrics {
    fn default() -> Self {
        Self {
            density: default_density(),
            scaled_density: None,
            width_px: default_screen_px(),
            height_px: default_screen_px(),
        }
    }
}

impl DisplayMetrics {
    pub fn new(density: f32, width_px: u32, height_px: u32) -> Self {
        Self {
            density,
            scaled_density: None,
            width_px,
            height_px,
        }
    }

    pub fn with_scaled_density(mut self, scaled_density: f32) -> Self {
        self.scaled_density = Some(scaled_density);
        self
    }

    pub fn dp_to_px(&self, dp: f32) -> f32 {
        dp * self.density
    }

    pub fn sp_to_px(&self, sp: f32) -> f32 {
        sp * self.scaled_density.unwrap_or(self.density)
    }

    pub fn is_round(&self) -> bool {
        self.width_px == self.height_px
    }
}

/// Inflater tuning knobs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InflaterConfig {
    /// Average glyph advance as a fraction of the font size
    #[serde(default = "default_char_width_em")]
    pub text_char_width_em: f32,
    #[serde(default = "default_line_height_em")]
    pub text_line_height_em: f32,
    #[serde(default = "default_font_size_sp")]
    pub default_font_size_sp: f32,
    /// Thickness of arc lines and spacers that declare none
    #[serde(default = "default_arc_thickness_dp")]
    pub default_arc_thickness_dp: f32,
    #[serde(default)]
    pub metrics: DisplayMetrics,
}

fn default_char_width_em() -> f32 {
    0.55
}

fn default_line_height_em() -> f32 {
    1.2
}

fn default_font_size_sp() -> f32 {
    16.0
}

fn default_arc_thickness_dp() -> f32 {
    4.0
}

impl Default for InflaterConfig {
    fn default() -> Self {
        Self {
            metrics: DisplayMetrics::default(),
            text_char_width_em: default_char_width_em(),
            text_line_height_em: default_line_height_em(),
            default_font_size_sp: default_font_size_sp(),
            default_arc_thickness_dp: default_arc_thickness_dp(),
        }
    }
}

impl InflaterConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn with_metrics(mut self, metrics: DisplayMetrics) -> Self {
        self.metrics = metrics;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_conversion() {
        let metrics = DisplayMetrics::new(2.0, 454, 454);
        assert_eq!(metrics.dp_to_px(10.0), 20.0);
        assert_eq!(metrics.sp_to_px(10.0), 20.0);
        assert_eq!(metrics.with_scaled_density(3.0).sp_to_px(10.0), 30.0);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = InflaterConfig::from_toml_str(
            r#"
            default_arc_thickness_dp = 10.0

            [metrics]
            density = 2.0
            "#,
        )
        .unwrap();
        assert_eq!(config.metrics.density, 2.0);
        assert_eq!(config.metrics.width_px, 384);
        assert_eq!(config.default_arc_thickness_dp, 10.0);
        assert_eq!(config.text_char_width_em, 0.55);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(InflaterConfig::from_toml_str("metrics = 3").is_err());
    }
}

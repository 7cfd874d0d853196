//! Watermark style configuration.
//!
//! Every size and padding is a fraction of the square canvas edge. Fractions
//! are not range-checked; out-of-range values move layers off the canvas,
//! where they are clipped.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{Error, Result};

/// Complete style for both watermark layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatermarkStyle {
    /// Top-left logo layer.
    pub logo: LogoStyle,
    /// Bottom-right text label.
    pub text: TextStyle,
    /// Icon drawn to the left of the text label.
    pub icon: IconStyle,
    /// Largest canvas edge in pixels. Bigger sources are center-cropped.
    pub max_image_size: u32,
}

impl Default for WatermarkStyle {
    fn default() -> Self {
        Self {
            logo: LogoStyle::default(),
            text: TextStyle::default(),
            icon: IconStyle::default(),
            max_image_size: 1024,
        }
    }
}

impl WatermarkStyle {
    /// Check the settings that would make rendering impossible.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `max_image_size` is zero or a
    /// fraction is not finite.
    pub fn validate(&self) -> Result<()> {
        if self.max_image_size == 0 {
            return Err(Error::InvalidConfig(
                "max_image_size must be a positive integer".to_string(),
            ));
        }

        let fractions = [
            ("logo.size", self.logo.size),
            ("logo.left_padding", self.logo.left_padding),
            ("logo.top_padding", self.logo.top_padding),
            ("text.size", self.text.size),
            ("text.right_padding", self.text.right_padding),
            ("text.bottom_padding", self.text.bottom_padding),
            ("icon.width", self.icon.width),
            ("icon.offset_x", self.icon.offset_x),
            ("icon.offset_y", self.icon.offset_y),
        ];
        if let Some((name, _)) = fractions.iter().find(|(_, v)| !v.is_finite()) {
            return Err(Error::InvalidConfig(format!("{name} must be a finite number")));
        }

        Ok(())
    }
}

/// Style of the top-left logo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogoStyle {
    /// Where to load the logo image from.
    pub source: String,
    /// Maximum logo width. The logo is never scaled up.
    pub size: f32,
    /// Distance from the left edge.
    pub left_padding: f32,
    /// Distance from the top edge.
    pub top_padding: f32,
    /// Color on darker backgrounds.
    pub light_color: Color,
    /// Color on very bright backgrounds.
    pub dark_color: Color,
}

impl Default for LogoStyle {
    fn default() -> Self {
        Self {
            source: "logo.png".to_string(),
            size: 0.15,
            left_padding: 0.05,
            top_padding: 0.05,
            light_color: Color::WHITE,
            dark_color: Color::new(0xcc, 0xcc, 0xcc),
        }
    }
}

/// Style of the bottom-right text label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextStyle {
    /// The label itself.
    pub content: String,
    /// Font size.
    pub size: f32,
    /// Distance from the right edge to the end of the text.
    pub right_padding: f32,
    /// Distance from the bottom edge to the baseline.
    pub bottom_padding: f32,
    /// Where to load the font file from.
    pub font: String,
    /// Color on darker backgrounds.
    pub light_color: Color,
    /// Color on bright backgrounds.
    pub dark_color: Color,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            content: "123".to_string(),
            size: 0.15,
            right_padding: 0.1,
            bottom_padding: 0.1,
            font: "OxygenMono.ttf".to_string(),
            light_color: Color::WHITE,
            dark_color: Color::new(0x44, 0x44, 0x44),
        }
    }
}

/// Style of the icon beside the text label.
///
/// Sizes here are relative to the width of one character of the label, not
/// to the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IconStyle {
    /// Where to load the icon image from.
    pub source: String,
    /// Icon width in character widths.
    pub width: f32,
    /// Extra gap between icon and text, in character widths.
    pub offset_x: f32,
    /// Upward shift from the vertical center of the text, in ascents.
    pub offset_y: f32,
}

impl Default for IconStyle {
    fn default() -> Self {
        Self {
            source: "lightning.png".to_string(),
            width: 1.0,
            offset_x: 0.1,
            offset_y: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let style = WatermarkStyle::default();
        assert_eq!(style.max_image_size, 1024);
        assert!((style.logo.size - 0.15).abs() < f32::EPSILON);
        assert!((style.logo.left_padding - 0.05).abs() < f32::EPSILON);
        assert_eq!(style.logo.light_color.to_string(), "#ffffff");
        assert_eq!(style.logo.dark_color.to_string(), "#cccccc");
        assert_eq!(style.text.content, "123");
        assert_eq!(style.text.dark_color.to_string(), "#444444");
        assert!((style.icon.width - 1.0).abs() < f32::EPSILON);
        assert!((style.icon.offset_x - 0.1).abs() < f32::EPSILON);
        assert!(style.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let style: WatermarkStyle = toml::from_str(
            r##"
            max_image_size = 512

            [text]
            content = "42"
            dark_color = "#000"
            "##,
        )
        .unwrap();

        assert_eq!(style.max_image_size, 512);
        assert_eq!(style.text.content, "42");
        assert_eq!(style.text.dark_color, Color::new(0, 0, 0));
        assert_eq!(style.text.light_color, Color::WHITE);
        assert_eq!(style.logo, LogoStyle::default());
    }

    #[test]
    fn malformed_color_fails_to_parse() {
        let result: std::result::Result<WatermarkStyle, _> = toml::from_str(
            r##"
            [logo]
            dark_color = "#cc"
            "##,
        );
        let err = result.unwrap_err().to_string();
        assert!(err.contains("#cc"), "unexpected error: {err}");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: std::result::Result<WatermarkStyle, _> = toml::from_str("colour = \"#fff\"");
        assert!(result.is_err());
    }

    #[test]
    fn zero_max_size_is_invalid() {
        let style = WatermarkStyle {
            max_image_size: 0,
            ..WatermarkStyle::default()
        };
        assert!(matches!(style.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn non_finite_fraction_is_invalid() {
        let mut style = WatermarkStyle::default();
        style.text.size = f32::NAN;
        let err = style.validate().unwrap_err();
        assert!(err.to_string().contains("text.size"));
    }

    #[test]
    fn out_of_range_fractions_are_allowed() {
        let mut style = WatermarkStyle::default();
        style.logo.left_padding = 1.5;
        style.text.right_padding = -0.2;
        assert!(style.validate().is_ok());
    }
}

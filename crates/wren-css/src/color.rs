//! Color values.
//!
//! [CSS Color Module Level 4](https://www.w3.org/TR/css-color-4/)
//!
//! Colors arrive as strings from the cascade (`"blue"`, `"#1a2b3c"`) and
//! are resolved to RGBA at paint time, so the display list carries
//! concrete channel values rather than CSS text.

use serde::Serialize;

/// An sRGB color with alpha.
///
/// [§ 4.1 The RGB functions](https://www.w3.org/TR/css-color-4/#rgb-functions)
///
/// "The RGB color model is used in numeric color values, with each
/// channel ranging from 0 to 255."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorValue {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel; 255 is fully opaque.
    pub a: u8,
}

impl ColorValue {
    /// Opaque black, the initial `color` value.
    pub const BLACK: ColorValue = ColorValue::rgb(0, 0, 0);
    /// Opaque white, the default canvas background.
    pub const WHITE: ColorValue = ColorValue::rgb(255, 255, 255);

    /// An opaque color from its channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        ColorValue { r, g, b, a: 255 }
    }

    /// Parse any supported color syntax: hex notations or a named color.
    /// Unknown input yields `None`; callers fall back to a default.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Some(hex) = value.strip_prefix('#') {
            Self::from_hex(hex)
        } else {
            Self::from_named(value)
        }
    }

    /// [§ 5 Hex notations](https://www.w3.org/TR/css-color-4/#hex-notation)
    ///
    /// "The syntax of a hex color is a `#` immediately followed by 3, 4,
    /// 6, or 8 hexadecimal digits."
    ///
    /// Three- and four-digit forms replicate each digit (`#abc` is
    /// `#aabbcc`).
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digit = |i: usize| -> Option<u8> {
            u8::try_from(hex[i..=i].chars().next()?.to_digit(16)?).ok()
        };
        let wide = |i: usize| -> Option<u8> { u8::from_str_radix(&hex[i..i + 2], 16).ok() };
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            3 => Some(ColorValue::rgb(
                digit(0)? * 17,
                digit(1)? * 17,
                digit(2)? * 17,
            )),
            4 => Some(ColorValue {
                r: digit(0)? * 17,
                g: digit(1)? * 17,
                b: digit(2)? * 17,
                a: digit(3)? * 17,
            }),
            6 => Some(ColorValue::rgb(wide(0)?, wide(2)?, wide(4)?)),
            8 => Some(ColorValue {
                r: wide(0)?,
                g: wide(2)?,
                b: wide(4)?,
                a: wide(6)?,
            }),
            _ => None,
        }
    }

    /// [§ 6.1 Named colors](https://www.w3.org/TR/css-color-4/#named-colors)
    ///
    /// The subset of the named-color table that the default stylesheet
    /// and common page styles actually use.
    #[must_use]
    pub fn from_named(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "black" => ColorValue::BLACK,
            "white" => ColorValue::WHITE,
            "red" => ColorValue::rgb(255, 0, 0),
            "green" => ColorValue::rgb(0, 128, 0),
            "blue" => ColorValue::rgb(0, 0, 255),
            "yellow" => ColorValue::rgb(255, 255, 0),
            "orange" => ColorValue::rgb(255, 165, 0),
            "purple" => ColorValue::rgb(128, 0, 128),
            "gray" | "grey" => ColorValue::rgb(128, 128, 128),
            "lightgray" | "lightgrey" => ColorValue::rgb(211, 211, 211),
            "darkgray" | "darkgrey" => ColorValue::rgb(169, 169, 169),
            "lightblue" => ColorValue::rgb(173, 216, 230),
            "lightgreen" => ColorValue::rgb(144, 238, 144),
            "silver" => ColorValue::rgb(192, 192, 192),
            "maroon" => ColorValue::rgb(128, 0, 0),
            "navy" => ColorValue::rgb(0, 0, 128),
            "teal" => ColorValue::rgb(0, 128, 128),
            "olive" => ColorValue::rgb(128, 128, 0),
            "aqua" | "cyan" => ColorValue::rgb(0, 255, 255),
            "fuchsia" | "magenta" => ColorValue::rgb(255, 0, 255),
            "lime" => ColorValue::rgb(0, 255, 0),
            "transparent" => ColorValue {
                r: 0,
                g: 0,
                b: 0,
                a: 0,
            },
            _ => return None,
        };
        Some(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_colors() {
        assert_eq!(ColorValue::parse("blue"), Some(ColorValue::rgb(0, 0, 255)));
        assert_eq!(ColorValue::parse("Orange"), Some(ColorValue::rgb(255, 165, 0)));
        assert_eq!(ColorValue::parse("no-such-color"), None);
    }

    #[test]
    fn test_hex_six_digit() {
        assert_eq!(
            ColorValue::parse("#1a2b3c"),
            Some(ColorValue::rgb(26, 43, 60))
        );
    }

    #[test]
    fn test_hex_three_digit_replicates() {
        assert_eq!(ColorValue::parse("#abc"), ColorValue::parse("#aabbcc"));
    }

    #[test]
    fn test_hex_with_alpha() {
        assert_eq!(
            ColorValue::parse("#00000080"),
            Some(ColorValue {
                r: 0,
                g: 0,
                b: 0,
                a: 128
            })
        );
    }

    #[test]
    fn test_invalid_hex() {
        assert_eq!(ColorValue::parse("#12345"), None);
        assert_eq!(ColorValue::parse("#zzz"), None);
    }
}

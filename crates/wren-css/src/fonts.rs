//! Font metrics abstraction and the per-session metrics cache.
//!
//! [CSS Fonts Module Level 4](https://www.w3.org/TR/css-fonts-4/)
//!
//! Layout never touches glyph data directly. It consumes a
//! [`FontProvider`]: a pure oracle answering "how wide is this text" and
//! "what are the vertical metrics" for a (size, weight, slant) triple.
//! The real rasterizing provider lives outside this crate; tests and the
//! CLI use [`ApproximateFontProvider`].

use std::cell::RefCell;
use std::collections::HashMap;

use serde::Serialize;
use strum_macros::Display;

/// [§ 4.2 Font weight](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
///
/// Only the two weights the cascade produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
pub enum FontWeight {
    /// `font-weight: normal`
    Normal,
    /// `font-weight: bold`
    Bold,
}

impl FontWeight {
    /// Map a resolved `font-weight` value; anything but `bold` is normal.
    #[must_use]
    pub fn from_css(value: &str) -> Self {
        if value == "bold" {
            FontWeight::Bold
        } else {
            FontWeight::Normal
        }
    }
}

/// [§ 4.1 Font style](https://www.w3.org/TR/css-fonts-4/#font-style-prop)
///
/// Upright text is called `roman` throughout the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
pub enum FontSlant {
    /// Upright glyphs.
    Roman,
    /// `font-style: italic`
    Italic,
}

impl FontSlant {
    /// Map a resolved `font-style` value; anything but `italic` is roman.
    #[must_use]
    pub fn from_css(value: &str) -> Self {
        if value == "italic" {
            FontSlant::Italic
        } else {
            FontSlant::Roman
        }
    }
}

/// Vertical metrics for one font configuration.
///
/// [§ 4.6 Font metrics](https://www.w3.org/TR/css-inline-3/#css-metrics)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineMetrics {
    /// Distance from the baseline to the top of the tallest glyph.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the lowest glyph,
    /// as a positive number.
    pub descent: f32,
    /// Recommended baseline-to-baseline distance.
    pub linespace: f32,
}

/// A pure font-metrics oracle.
///
/// Both methods are total: any (size, weight, slant) triple is valid and
/// there is no error path. Implementations must be deterministic so
/// cached and uncached answers are interchangeable.
pub trait FontProvider {
    /// The advance width of `text` in pixels at the given configuration.
    fn measure(&self, text: &str, size: i32, weight: FontWeight, slant: FontSlant) -> f32;

    /// The vertical metrics for the given configuration.
    fn metrics(&self, size: i32, weight: FontWeight, slant: FontSlant) -> LineMetrics;
}

/// Cache key: one font configuration.
type FontKey = (i32, FontWeight, FontSlant);

/// Memoizing wrapper around a [`FontProvider`], scoped to one rendering
/// session and threaded through layout explicitly.
///
/// Vertical metrics are cached per configuration; `measure` passes
/// through, since it varies per text run. Results are idempotent, so
/// racing writers overwriting the same key is harmless.
pub struct FontCache<'a> {
    provider: &'a dyn FontProvider,
    metrics: RefCell<HashMap<FontKey, LineMetrics>>,
}

impl<'a> FontCache<'a> {
    /// Wrap a provider in a fresh, empty cache.
    #[must_use]
    pub fn new(provider: &'a dyn FontProvider) -> Self {
        Self {
            provider,
            metrics: RefCell::new(HashMap::new()),
        }
    }
}

impl FontProvider for FontCache<'_> {
    fn measure(&self, text: &str, size: i32, weight: FontWeight, slant: FontSlant) -> f32 {
        self.provider.measure(text, size, weight, slant)
    }

    fn metrics(&self, size: i32, weight: FontWeight, slant: FontSlant) -> LineMetrics {
        let key = (size, weight, slant);
        if let Some(&cached) = self.metrics.borrow().get(&key) {
            return cached;
        }
        let computed = self.provider.metrics(size, weight, slant);
        let _ = self.metrics.borrow_mut().insert(key, computed);
        computed
    }
}

/// Deterministic arithmetic metrics with no font files.
///
/// Widths assume a fixed advance of 0.6 em per character; ascent,
/// descent, and linespace are the conventional 0.8/0.2/1.2 em splits.
/// Good enough for layout tests and text-mode output, where only the
/// relative geometry matters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateFontProvider;

/// Advance width per character, as a fraction of the em size.
const CHAR_WIDTH_RATIO: f32 = 0.6;
/// Ascent as a fraction of the em size.
const ASCENT_RATIO: f32 = 0.8;
/// Descent as a fraction of the em size.
const DESCENT_RATIO: f32 = 0.2;
/// Baseline-to-baseline distance as a fraction of the em size.
const LINESPACE_RATIO: f32 = 1.2;

impl FontProvider for ApproximateFontProvider {
    #[allow(clippy::cast_precision_loss)]
    fn measure(&self, text: &str, size: i32, _weight: FontWeight, _slant: FontSlant) -> f32 {
        text.chars().count() as f32 * size as f32 * CHAR_WIDTH_RATIO
    }

    #[allow(clippy::cast_precision_loss)]
    fn metrics(&self, size: i32, _weight: FontWeight, _slant: FontSlant) -> LineMetrics {
        let em = size as f32;
        LineMetrics {
            ascent: em * ASCENT_RATIO,
            descent: em * DESCENT_RATIO,
            linespace: em * LINESPACE_RATIO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_value_mapping() {
        assert_eq!(FontWeight::from_css("bold"), FontWeight::Bold);
        assert_eq!(FontWeight::from_css("normal"), FontWeight::Normal);
        assert_eq!(FontWeight::from_css("anything"), FontWeight::Normal);
        assert_eq!(FontSlant::from_css("italic"), FontSlant::Italic);
        assert_eq!(FontSlant::from_css("roman"), FontSlant::Roman);
    }

    #[test]
    fn test_approximate_measure_scales_with_size() {
        let fonts = ApproximateFontProvider;
        let small = fonts.measure("word", 10, FontWeight::Normal, FontSlant::Roman);
        let large = fonts.measure("word", 20, FontWeight::Normal, FontSlant::Roman);
        assert!((large - small * 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_cache_returns_identical_metrics() {
        let inner = ApproximateFontProvider;
        let cache = FontCache::new(&inner);
        let first = cache.metrics(16, FontWeight::Bold, FontSlant::Roman);
        let second = cache.metrics(16, FontWeight::Bold, FontSlant::Roman);
        assert_eq!(first, second);
        assert_eq!(first, inner.metrics(16, FontWeight::Bold, FontSlant::Roman));
    }
}

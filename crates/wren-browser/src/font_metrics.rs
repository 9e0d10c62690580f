//! Font metrics backed by fontdue for accurate text measurement during
//! layout.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."

use fontdue::Font;
use wren_css::{FontProvider, FontSlant, FontWeight, LineMetrics};

/// Font metrics provider backed by fontdue's per-glyph metrics.
///
/// Holds one loaded face per (weight, slant) combination, all supplied
/// by the caller so font loading stays outside the pipeline. Queries use
/// `Font::metrics()` (not `Font::rasterize()`) to avoid bitmap
/// generation when only measurements are needed.
pub struct FontdueProvider<'a> {
    regular: &'a Font,
    bold: &'a Font,
    italic: &'a Font,
    bold_italic: &'a Font,
}

impl<'a> FontdueProvider<'a> {
    /// Create a provider over the four loaded faces.
    #[must_use]
    pub fn new(regular: &'a Font, bold: &'a Font, italic: &'a Font, bold_italic: &'a Font) -> Self {
        Self {
            regular,
            bold,
            italic,
            bold_italic,
        }
    }

    /// A provider that uses one face for every configuration.
    #[must_use]
    pub fn single(font: &'a Font) -> Self {
        Self::new(font, font, font, font)
    }

    fn face(&self, weight: FontWeight, slant: FontSlant) -> &Font {
        match (weight, slant) {
            (FontWeight::Normal, FontSlant::Roman) => self.regular,
            (FontWeight::Bold, FontSlant::Roman) => self.bold,
            (FontWeight::Normal, FontSlant::Italic) => self.italic,
            (FontWeight::Bold, FontSlant::Italic) => self.bold_italic,
        }
    }
}

impl FontProvider for FontdueProvider<'_> {
    #[allow(clippy::cast_precision_loss)]
    fn measure(&self, text: &str, size: i32, weight: FontWeight, slant: FontSlant) -> f32 {
        let face = self.face(weight, slant);
        // Sum per-character advance widths, matching the cursor
        // advancement a glyph rasterizer would use.
        text.chars()
            .filter(|ch| !ch.is_control())
            .map(|ch| face.metrics(ch, size as f32).advance_width)
            .sum()
    }

    #[allow(clippy::cast_precision_loss)]
    fn metrics(&self, size: i32, weight: FontWeight, slant: FontSlant) -> LineMetrics {
        let face = self.face(weight, slant);
        let px = size as f32;
        face.horizontal_line_metrics(px).map_or(
            // A face without horizontal metrics falls back to the
            // conventional 0.8/0.2 split of the em box.
            LineMetrics {
                ascent: px * 0.8,
                descent: px * 0.2,
                linespace: px * 1.2,
            },
            |m| LineMetrics {
                ascent: m.ascent,
                descent: m.descent.abs(),
                linespace: m.new_line_size,
            },
        )
    }
}

//! Display list generation.
//!
//! [CSS 2.1 Appendix E — Elaborate description of Stacking Contexts](https://www.w3.org/TR/CSS2/zindex.html)
//!
//! The painter walks the finished box tree in document order and
//! flattens it into an ordered list of primitive draw operations. List
//! order is z-order: later commands draw on top. Every command carries a
//! bounding rectangle so a backend can cull against its viewport.

use serde::Serialize;
use wren_common::warn_once;
use wren_dom::DomTree;

use crate::color::ColorValue;
use crate::fonts::{FontProvider, FontSlant, FontWeight};
use crate::layout::{BoxKind, InputBox, LayoutBox, TextBox};

/// How far a superscript run is raised above its layout position.
const SUPERSCRIPT_RISE_PX: f32 = 3.0;
/// Border thickness of replaced boxes and the caret line.
const FIELD_STROKE_PX: f32 = 1.0;

/// An axis-aligned rectangle in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Right edge.
    pub right: f32,
    /// Bottom edge.
    pub bottom: f32,
}

impl Rect {
    /// A rectangle from its four edges.
    #[must_use]
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Rect {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Whether the point lies inside; edges are half-open so adjacent
    /// boxes never both claim a point.
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }
}

/// One primitive draw operation.
///
/// The variant set is closed; a rendering backend matches exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DisplayCommand {
    /// Draw a text run.
    DrawText {
        /// Bounding rectangle of the glyphs.
        rect: Rect,
        /// The text to draw.
        text: String,
        /// Font size in pixels.
        size: i32,
        /// Font weight.
        weight: FontWeight,
        /// Font slant.
        slant: FontSlant,
        /// Glyph color.
        color: ColorValue,
    },
    /// Fill a rectangle.
    DrawRect {
        /// The rectangle to fill.
        rect: Rect,
        /// Fill color.
        color: ColorValue,
    },
    /// Stroke a rectangle's border without filling it.
    DrawOutline {
        /// The rectangle to stroke.
        rect: Rect,
        /// Stroke color.
        color: ColorValue,
        /// Stroke thickness in pixels.
        thickness: f32,
    },
    /// Draw a line segment from the rectangle's top-left to its
    /// bottom-right corner.
    DrawLine {
        /// Endpoints as a degenerate rectangle.
        rect: Rect,
        /// Line color.
        color: ColorValue,
        /// Line thickness in pixels.
        thickness: f32,
    },
}

impl DisplayCommand {
    /// The command's bounding rectangle, for viewport culling.
    #[must_use]
    pub fn rect(&self) -> Rect {
        match self {
            DisplayCommand::DrawText { rect, .. }
            | DisplayCommand::DrawRect { rect, .. }
            | DisplayCommand::DrawOutline { rect, .. }
            | DisplayCommand::DrawLine { rect, .. } => *rect,
        }
    }
}

/// The ordered, flattened sequence of draw operations for one layout.
pub type DisplayList = Vec<DisplayCommand>;

/// Flattens a box tree into a display list.
///
/// The DOM is consulted for background colors; the metrics provider for
/// caret positioning.
pub struct Painter<'a> {
    tree: &'a DomTree,
    fonts: &'a dyn FontProvider,
}

impl<'a> Painter<'a> {
    /// Create a painter over the styled DOM and metrics provider that
    /// produced the box tree.
    #[must_use]
    pub fn new(tree: &'a DomTree, fonts: &'a dyn FontProvider) -> Self {
        Self { tree, fonts }
    }

    /// Paint the box tree. Document and line boxes contribute nothing
    /// themselves; painting cannot fail.
    #[must_use]
    pub fn paint(&self, root: &LayoutBox) -> DisplayList {
        let mut list = DisplayList::new();
        self.paint_box(root, &mut list);
        list
    }

    fn paint_box(&self, layout_box: &LayoutBox, list: &mut DisplayList) {
        match &layout_box.kind {
            BoxKind::Document | BoxKind::Line => {}
            BoxKind::Block => self.paint_background(layout_box, list),
            BoxKind::Text(text) => Self::paint_text(layout_box, text, list),
            BoxKind::Input(field) => self.paint_field(layout_box, field, list),
        }
        // A box's own paint precedes its children's, so children draw on
        // top of their block's background.
        for child in &layout_box.children {
            self.paint_box(child, list);
        }
    }

    /// [CSS Backgrounds § 3.2](https://www.w3.org/TR/css-backgrounds-3/#the-background-color)
    ///
    /// A fill behind the box when its resolved style names a color.
    fn paint_background(&self, layout_box: &LayoutBox, list: &mut DisplayList) {
        let Some(value) = self.tree.style_value(layout_box.node, "background-color") else {
            return;
        };
        match ColorValue::parse(value) {
            Some(color) => list.push(DisplayCommand::DrawRect {
                rect: layout_box.rect(),
                color,
            }),
            None => warn_once("paint", &format!("unknown background-color '{value}'")),
        }
    }

    fn paint_text(layout_box: &LayoutBox, text: &TextBox, list: &mut DisplayList) {
        let mut rect = layout_box.rect();
        if text.superscript {
            // Superscript runs were sized at layout time; the raise
            // happens here.
            rect.top -= SUPERSCRIPT_RISE_PX;
            rect.bottom -= SUPERSCRIPT_RISE_PX;
        }
        list.push(DisplayCommand::DrawText {
            rect,
            text: text.text.clone(),
            size: text.size,
            weight: text.weight,
            slant: text.slant,
            color: foreground_color(&text.color),
        });
    }

    /// [WHATWG HTML § 15.5.4 The input element as a text entry widget](https://html.spec.whatwg.org/multipage/rendering.html#the-input-element-as-a-text-entry-widget)
    ///
    /// Background, border, value text, and — when focused — a caret at
    /// the measured end of the text.
    fn paint_field(&self, layout_box: &LayoutBox, field: &InputBox, list: &mut DisplayList) {
        self.paint_background(layout_box, list);
        list.push(DisplayCommand::DrawOutline {
            rect: layout_box.rect(),
            color: ColorValue::BLACK,
            thickness: FIELD_STROKE_PX,
        });
        list.push(DisplayCommand::DrawText {
            rect: layout_box.rect(),
            text: field.text.clone(),
            size: field.size,
            weight: field.weight,
            slant: field.slant,
            color: foreground_color(&field.color),
        });
        if field.focused {
            let caret_x = layout_box.x
                + self
                    .fonts
                    .measure(&field.text, field.size, field.weight, field.slant);
            list.push(DisplayCommand::DrawLine {
                rect: Rect::new(caret_x, layout_box.y, caret_x, layout_box.y + layout_box.height),
                color: ColorValue::BLACK,
                thickness: FIELD_STROKE_PX,
            });
        }
    }
}

/// Resolve a `color` value, warning once and falling back to black when
/// it is not a color we know.
fn foreground_color(value: &str) -> ColorValue {
    ColorValue::parse(value).unwrap_or_else(|| {
        warn_once("paint", &format!("unknown color '{value}'"));
        ColorValue::BLACK
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_is_half_open() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(0.0, 0.0));
        assert!(rect.contains(9.9, 9.9));
        assert!(!rect.contains(10.0, 5.0));
        assert!(!rect.contains(5.0, 10.0));
        assert!(!rect.contains(-0.1, 5.0));
    }

    #[test]
    fn test_command_rect_accessor() {
        let rect = Rect::new(1.0, 2.0, 3.0, 4.0);
        let command = DisplayCommand::DrawRect {
            rect,
            color: ColorValue::WHITE,
        };
        assert_eq!(command.rect(), rect);
    }
}

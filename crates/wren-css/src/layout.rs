//! Box tree construction.
//!
//! [CSS 2.1 § 9 Visual formatting model](https://www.w3.org/TR/CSS2/visuren.html)
//!
//! "In the visual formatting model, each element in the document tree
//! generates zero or more boxes."
//!
//! The engine walks the styled DOM and builds a tree of positioned boxes:
//! one `Document` root, `Block` boxes stacked vertically, and inside
//! inline blocks a sequence of `Line` boxes holding `Text` and `Input`
//! children that share a baseline. Geometry is computed in one pass with
//! no partial state visible afterwards; re-layout is a full rebuild.

use strum_macros::Display;
use wren_common::warn_once;
use wren_dom::{DomTree, NodeId};

use crate::fonts::{FontProvider, FontSlant, FontWeight};
use crate::paint::Rect;
use crate::style::{parse_px, DEFAULT_FONT_SIZE_PX};

/// Horizontal page margin in pixels, on each side.
pub const HSTEP: f32 = 13.0;
/// Vertical page margin in pixels.
pub const VSTEP: f32 = 18.0;
/// Fixed width of replaced `input` and `button` boxes.
pub const INPUT_WIDTH_PX: f32 = 200.0;
/// The soft hyphen, a permitted in-word break point.
pub const SOFT_HYPHEN: char = '\u{00AD}';

/// [CSS 2.1 § 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
///
/// Leading factor applied above and below the baseline.
const LEADING: f32 = 1.25;

/// [WHATWG HTML § 15.3.3 Flow content](https://html.spec.whatwg.org/multipage/rendering.html#flow-content-3)
///
/// Tags that establish their own block.
const BLOCK_ELEMENTS: &[&str] = &[
    "html",
    "body",
    "article",
    "section",
    "nav",
    "aside",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "hgroup",
    "header",
    "footer",
    "address",
    "p",
    "hr",
    "pre",
    "blockquote",
    "ol",
    "ul",
    "menu",
    "li",
    "dl",
    "dt",
    "dd",
    "figure",
    "figcaption",
    "main",
    "div",
    "table",
    "form",
    "fieldset",
    "legend",
    "details",
    "summary",
];

/// [WHATWG HTML § 15.3.1 Hidden elements](https://html.spec.whatwg.org/multipage/rendering.html#hidden-elements)
///
/// "The following elements are expected to not be rendered."
const HIDDEN_ELEMENTS: &[&str] = &["head", "title", "style", "script", "meta", "link", "base"];

/// Text-run payload of a [`BoxKind::Text`] box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    /// The word to draw, soft hyphens already stripped or replaced by a
    /// visible `-` at a break.
    pub text: String,
    /// Font size in pixels.
    pub size: i32,
    /// Font weight.
    pub weight: FontWeight,
    /// Font slant.
    pub slant: FontSlant,
    /// Resolved `color` value, as CSS text.
    pub color: String,
    /// Whether this run is superscript; the painter raises it.
    pub superscript: bool,
}

/// Replaced-content payload of a [`BoxKind::Input`] box.
#[derive(Debug, Clone, PartialEq)]
pub struct InputBox {
    /// The displayed text: the `value` attribute for `input`, the text
    /// child for `button`.
    pub text: String,
    /// Whether the element holds input focus; the painter adds a caret.
    pub focused: bool,
    /// Font size in pixels.
    pub size: i32,
    /// Font weight.
    pub weight: FontWeight,
    /// Font slant.
    pub slant: FontSlant,
    /// Resolved `color` value, as CSS text.
    pub color: String,
}

/// The closed set of box variants.
///
/// [CSS 2.1 § 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
#[derive(Debug, Clone, PartialEq)]
pub enum BoxKind {
    /// The root box covering the page content area.
    Document,
    /// A vertically stacked block.
    Block,
    /// A synthetic line box grouping runs that share one baseline; its
    /// node reference is the enclosing block's node.
    Line,
    /// One word of text on a line.
    Text(TextBox),
    /// A replaced `input` or `button` box.
    Input(InputBox),
}

/// A positioned box in the layout tree.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutBox {
    /// Which kind of box this is.
    pub kind: BoxKind,
    /// The DOM node this box was generated for.
    pub node: NodeId,
    /// Left edge in page coordinates.
    pub x: f32,
    /// Top edge in page coordinates.
    pub y: f32,
    /// Box width.
    pub width: f32,
    /// Box height.
    pub height: f32,
    /// Child boxes, in document order.
    pub children: Vec<LayoutBox>,
}

impl LayoutBox {
    /// The box's bounding rectangle.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect {
            left: self.x,
            top: self.y,
            right: self.x + self.width,
            bottom: self.y + self.height,
        }
    }

    /// [CSS 2.1 § 9 / hit testing]
    ///
    /// Find the DOM node of the topmost box containing `(x, y)`: the last
    /// box in paint order whose rectangle contains the point.
    #[must_use]
    pub fn hit_test(&self, x: f32, y: f32) -> Option<NodeId> {
        let mut hit = None;
        if self.rect().contains(x, y) {
            hit = Some(self.node);
        }
        for child in &self.children {
            if let Some(found) = child.hit_test(x, y) {
                hit = Some(found);
            }
        }
        hit
    }
}

/// Whether a block lays out its children as stacked blocks or as inline
/// flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
enum LayoutMode {
    /// One child block per DOM child, stacked vertically.
    Block,
    /// The subtree's text runs flattened into line boxes.
    Inline,
}

/// One-pass layout over a styled DOM.
///
/// [CSS 2.1 § 10 Visual formatting model details](https://www.w3.org/TR/CSS2/visudet.html)
pub struct LayoutEngine<'a> {
    tree: &'a DomTree,
    fonts: &'a dyn FontProvider,
    viewport_width: f32,
}

impl<'a> LayoutEngine<'a> {
    /// Create an engine over a styled DOM, a metrics provider, and the
    /// viewport width in pixels. Viewport height is not needed; content
    /// may exceed it.
    #[must_use]
    pub fn new(tree: &'a DomTree, fonts: &'a dyn FontProvider, viewport_width: f32) -> Self {
        Self {
            tree,
            fonts,
            viewport_width,
        }
    }

    /// Build the box tree. Layout cannot fail on a valid styled DOM.
    #[must_use]
    pub fn layout(&self) -> LayoutBox {
        let width = self.viewport_width - 2.0 * HSTEP;
        let child = self.layout_block(self.tree.root(), HSTEP, VSTEP, width);
        let height = child.height;
        LayoutBox {
            kind: BoxKind::Document,
            node: self.tree.root(),
            x: HSTEP,
            y: VSTEP,
            width,
            height,
            children: vec![child],
        }
    }

    /// Lay out one block at the given position and content width.
    fn layout_block(&self, id: NodeId, x: f32, y: f32, width: f32) -> LayoutBox {
        match self.layout_mode(id) {
            LayoutMode::Block => {
                let mut children = Vec::new();
                let mut cursor_y = y;
                for &child in self.tree.children(id) {
                    if self.is_hidden(child) {
                        continue;
                    }
                    // Vertical stacking: each child starts where the
                    // previous one ended.
                    let child_box = self.layout_block(child, x, cursor_y, width);
                    cursor_y += child_box.height;
                    children.push(child_box);
                }
                LayoutBox {
                    kind: BoxKind::Block,
                    node: id,
                    x,
                    y,
                    width,
                    height: cursor_y - y,
                    children,
                }
            }
            LayoutMode::Inline => {
                let mut flow = InlineFlow::new(self.tree, self.fonts, id, x, y, width);
                flow.recurse(id, false, false);
                flow.into_block()
            }
        }
    }

    /// [CSS 2.1 § 9.4 Normal flow](https://www.w3.org/TR/CSS2/visuren.html#normal-flow)
    ///
    /// A node is laid out inline if it is text, is itself replaced
    /// content, or has children none of which establish a block.
    fn layout_mode(&self, id: NodeId) -> LayoutMode {
        if self.tree.as_text(id).is_some() {
            return LayoutMode::Inline;
        }
        let has_block_child = self.tree.children(id).iter().any(|&child| {
            self.tree
                .as_element(child)
                .is_some_and(|el| BLOCK_ELEMENTS.contains(&el.tag_name.as_str()))
        });
        if has_block_child {
            LayoutMode::Block
        } else if !self.tree.children(id).is_empty()
            || self.tree.is_element_named(id, "input")
            || self.tree.is_element_named(id, "button")
        {
            LayoutMode::Inline
        } else {
            // An empty non-replaced element generates a zero-height block.
            LayoutMode::Block
        }
    }

    /// Whether the node is in the never-rendered set.
    fn is_hidden(&self, id: NodeId) -> bool {
        self.tree
            .as_element(id)
            .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.tag_name.as_str()))
    }
}

/// An item buffered on the current line, positioned horizontally but not
/// yet vertically; `flush` assigns the shared baseline.
struct Pending {
    node: NodeId,
    x: f32,
    width: f32,
    item: PendingItem,
}

enum PendingItem {
    Word {
        text: String,
        size: i32,
        weight: FontWeight,
        slant: FontSlant,
        color: String,
        superscript: bool,
    },
    Field {
        text: String,
        focused: bool,
        size: i32,
        weight: FontWeight,
        slant: FontSlant,
        color: String,
    },
}

impl PendingItem {
    fn font(&self) -> (i32, FontWeight, FontSlant) {
        match self {
            PendingItem::Word {
                size,
                weight,
                slant,
                ..
            }
            | PendingItem::Field {
                size,
                weight,
                slant,
                ..
            } => (*size, *weight, *slant),
        }
    }
}

/// Inline formatting context for one block: flattens a subtree into line
/// boxes, breaking on `br`, overflow, and soft hyphens.
///
/// [CSS 2.1 § 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
struct InlineFlow<'a> {
    tree: &'a DomTree,
    fonts: &'a dyn FontProvider,
    /// The block whose content is being flowed; line boxes reference it.
    block: NodeId,
    x: f32,
    top: f32,
    width: f32,
    cursor_x: f32,
    cursor_y: f32,
    pending: Vec<Pending>,
    lines: Vec<LayoutBox>,
}

impl<'a> InlineFlow<'a> {
    fn new(
        tree: &'a DomTree,
        fonts: &'a dyn FontProvider,
        block: NodeId,
        x: f32,
        top: f32,
        width: f32,
    ) -> Self {
        Self {
            tree,
            fonts,
            block,
            x,
            top,
            width,
            cursor_x: x,
            cursor_y: top,
            pending: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// Depth-first walk emitting words and replaced boxes. `in_sup` and
    /// `in_abbr` track enclosing `sup`/`abbr` elements.
    fn recurse(&mut self, id: NodeId, in_sup: bool, in_abbr: bool) {
        let tree = self.tree;
        if let Some(text) = tree.as_text(id) {
            for word in text.split_whitespace() {
                self.word(id, word, in_sup, in_abbr);
            }
        } else if let Some(el) = tree.as_element(id) {
            match el.tag_name.as_str() {
                "br" => self.flush(),
                "input" | "button" => self.field(id),
                tag if HIDDEN_ELEMENTS.contains(&tag) => {}
                tag => {
                    let in_sup = in_sup || tag == "sup";
                    let in_abbr = in_abbr || tag == "abbr";
                    for &child in tree.children(id) {
                        self.recurse(child, in_sup, in_abbr);
                    }
                }
            }
        }
    }

    /// The node's resolved font configuration.
    #[allow(clippy::cast_possible_truncation)]
    fn node_font(&self, id: NodeId) -> (i32, FontWeight, FontSlant) {
        let size = self
            .tree
            .style_value(id, "font-size")
            .and_then(parse_px)
            .unwrap_or(DEFAULT_FONT_SIZE_PX)
            .round() as i32;
        let weight = FontWeight::from_css(self.tree.style_value(id, "font-weight").unwrap_or(""));
        let slant = FontSlant::from_css(self.tree.style_value(id, "font-style").unwrap_or(""));
        (size, weight, slant)
    }

    fn node_color(&self, id: NodeId) -> String {
        self.tree
            .style_value(id, "color")
            .unwrap_or("black")
            .to_string()
    }

    /// Place one word, breaking the line or splitting at soft hyphens as
    /// needed.
    ///
    /// [CSS Text § 5.3 Hyphenation](https://www.w3.org/TR/css-text-3/#hyphenation)
    ///
    /// "U+00AD SOFT HYPHEN: marks a hyphenation opportunity within a
    /// word."
    fn word(&mut self, id: NodeId, word: &str, in_sup: bool, in_abbr: bool) {
        let (mut size, mut weight, slant) = self.node_font(id);
        if in_sup {
            // Superscript renders at half size; the painter raises it.
            size = (size / 2).max(1);
        }
        let mut text = word.to_string();
        if in_abbr && is_lowercase_word(&text) {
            // Small caps: lowercase words become uppercase in a smaller
            // bold font. Mixed-case words keep the normal font.
            text = text.to_uppercase();
            size = (size / 2).max(1);
            weight = FontWeight::Bold;
        }

        let stripped: String = text.chars().filter(|&c| c != SOFT_HYPHEN).collect();
        let width = self.fonts.measure(&stripped, size, weight, slant);

        if self.cursor_x + width <= self.x + self.width {
            self.push_word(id, stripped, width, size, weight, slant, in_sup);
            return;
        }

        if text.contains(SOFT_HYPHEN) {
            let segments: Vec<&str> = text.split(SOFT_HYPHEN).collect();
            // Widest prefix (plus a visible hyphen) that still fits; the
            // first split is the fallback when nothing fits.
            let mut split = 1;
            for i in 1..segments.len() {
                let left = format!("{}-", segments[..i].concat());
                if self.cursor_x + self.fonts.measure(&left, size, weight, slant)
                    <= self.x + self.width
                {
                    split = i;
                } else {
                    break;
                }
            }
            let left = format!("{}-", segments[..split].concat());
            let left_width = self.fonts.measure(&left, size, weight, slant);
            self.push_word(id, left, left_width, size, weight, slant, in_sup);
            self.flush();
            let rest = segments[split..].join("\u{00AD}");
            // A trailing soft hyphen leaves nothing to carry over.
            if !rest.is_empty() {
                self.word(id, &rest, in_sup, in_abbr);
            }
            return;
        }

        // No break point: the word moves whole to a fresh line.
        self.flush();
        self.push_word(id, stripped, width, size, weight, slant, in_sup);
    }

    #[allow(clippy::too_many_arguments)]
    fn push_word(
        &mut self,
        id: NodeId,
        text: String,
        width: f32,
        size: i32,
        weight: FontWeight,
        slant: FontSlant,
        superscript: bool,
    ) {
        let color = self.node_color(id);
        self.pending.push(Pending {
            node: id,
            x: self.cursor_x,
            width,
            item: PendingItem::Word {
                text,
                size,
                weight,
                slant,
                color,
                superscript,
            },
        });
        self.cursor_x += width + self.fonts.measure(" ", size, weight, slant);
    }

    /// Place a replaced `input`/`button` box on the line.
    ///
    /// [WHATWG HTML § 15.5 Widgets](https://html.spec.whatwg.org/multipage/rendering.html#widgets)
    fn field(&mut self, id: NodeId) {
        let tree = self.tree;
        let text = if tree.is_element_named(id, "input") {
            tree.as_element(id)
                .and_then(|el| el.attr("value"))
                .unwrap_or("")
                .to_string()
        } else {
            // A button shows its single text child; anything else inside
            // it is dropped with a warning, not a failure.
            let children = tree.children(id);
            match children {
                [only] if tree.as_text(*only).is_some() => {
                    tree.as_text(*only).unwrap_or("").to_string()
                }
                [] => String::new(),
                _ => {
                    warn_once("layout", "ignoring non-text contents of <button>");
                    children
                        .iter()
                        .filter_map(|&c| tree.as_text(c))
                        .collect::<Vec<_>>()
                        .join(" ")
                }
            }
        };

        if self.cursor_x + INPUT_WIDTH_PX > self.x + self.width {
            self.flush();
        }

        let (size, weight, slant) = self.node_font(id);
        let color = self.node_color(id);
        let focused = tree.get(id).is_some_and(|n| n.is_focused);
        self.pending.push(Pending {
            node: id,
            x: self.cursor_x,
            width: INPUT_WIDTH_PX,
            item: PendingItem::Field {
                text,
                focused,
                size,
                weight,
                slant,
                color,
            },
        });
        self.cursor_x += INPUT_WIDTH_PX + self.fonts.measure(" ", size, weight, slant);
    }

    /// [CSS 2.1 § 10.8](https://www.w3.org/TR/CSS2/visudet.html#line-height)
    ///
    /// Close the current line: compute the shared baseline from the
    /// tallest ascent, position every item relative to it, and advance
    /// the vertical cursor past the deepest descent.
    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let items = std::mem::take(&mut self.pending);

        let mut max_ascent: f32 = 0.0;
        let mut max_descent: f32 = 0.0;
        for pending in &items {
            let (size, weight, slant) = pending.item.font();
            let metrics = self.fonts.metrics(size, weight, slant);
            max_ascent = max_ascent.max(metrics.ascent);
            max_descent = max_descent.max(metrics.descent);
        }
        let baseline = self.cursor_y + LEADING * max_ascent;

        let mut boxes = Vec::new();
        for pending in items {
            let (size, weight, slant) = pending.item.font();
            let metrics = self.fonts.metrics(size, weight, slant);
            // Every item sits on the shared baseline regardless of its
            // own font size.
            let y = baseline - metrics.ascent;
            let kind = match pending.item {
                PendingItem::Word {
                    text,
                    size,
                    weight,
                    slant,
                    color,
                    superscript,
                } => BoxKind::Text(TextBox {
                    text,
                    size,
                    weight,
                    slant,
                    color,
                    superscript,
                }),
                PendingItem::Field {
                    text,
                    focused,
                    size,
                    weight,
                    slant,
                    color,
                } => BoxKind::Input(InputBox {
                    text,
                    focused,
                    size,
                    weight,
                    slant,
                    color,
                }),
            };
            boxes.push(LayoutBox {
                kind,
                node: pending.node,
                x: pending.x,
                y,
                width: pending.width,
                height: metrics.linespace,
                children: Vec::new(),
            });
        }

        let next_y = baseline + LEADING * max_descent;
        self.lines.push(LayoutBox {
            kind: BoxKind::Line,
            node: self.block,
            x: self.x,
            y: self.cursor_y,
            width: self.width,
            height: next_y - self.cursor_y,
            children: boxes,
        });
        self.cursor_y = next_y;
        self.cursor_x = self.x;
    }

    /// Close the flow and return the finished inline block.
    fn into_block(mut self) -> LayoutBox {
        self.flush();
        LayoutBox {
            kind: BoxKind::Block,
            node: self.block,
            x: self.x,
            y: self.top,
            width: self.width,
            height: self.cursor_y - self.top,
            children: self.lines,
        }
    }
}

/// Whether a word is entirely lowercase: it has at least one cased
/// character and none are uppercase.
fn is_lowercase_word(word: &str) -> bool {
    word.chars().any(char::is_lowercase) && !word.chars().any(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_lowercase_word() {
        assert!(is_lowercase_word("www"));
        assert!(is_lowercase_word("a1b"));
        assert!(!is_lowercase_word("Www"));
        assert!(!is_lowercase_word("123"));
        assert!(!is_lowercase_word(""));
    }
}

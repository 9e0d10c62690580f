//! CSS parsing, cascade, layout, and painting for the Wren rendering
//! pipeline.
//!
//! # Scope
//!
//! This crate implements:
//! - **CSS Parser** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - recursive descent over rule sets with per-declaration and per-rule
//!     error recovery
//!
//! - **Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - tag and descendant selectors with additive priority
//!
//! - **Cascade** ([CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/))
//!   - inheritance, priority-ordered application, inline `style`
//!     attributes, percentage font-size resolution
//!
//! - **Layout Engine** ([CSS 2.1 § 9 Visual formatting model](https://www.w3.org/TR/CSS2/visuren.html))
//!   - block and inline formatting, line boxes with shared baselines,
//!     soft-hyphen line breaking, small-caps and superscript text,
//!     replaced `input`/`button` boxes
//!
//! - **Painter** ([CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html))
//!   - flattening the box tree into an ordered display list
//!
//! # Not Yet Implemented
//!
//! - Class, id, attribute, and pseudo selectors
//! - Box model edges (margin/border/padding properties)
//! - `em`/`rem` units; only `px` and `%` are understood

/// Color values per [CSS Color Level 4](https://www.w3.org/TR/css-color-4/).
pub mod color;
/// Font metric traits and the per-session metrics cache.
pub mod fonts;
/// Box tree construction per [CSS 2.1 § 9](https://www.w3.org/TR/CSS2/visuren.html).
pub mod layout;
/// Display list and painting per [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html).
pub mod paint;
/// CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod parser;
/// Selector types and matching per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// Cascade and style resolution per [CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/).
pub mod style;
/// User-agent stylesheet per [WHATWG HTML § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html).
pub mod ua_stylesheet;

// Re-exports for convenience
pub use color::ColorValue;
pub use fonts::{ApproximateFontProvider, FontCache, FontProvider, FontSlant, FontWeight, LineMetrics};
pub use layout::{
    BoxKind, InputBox, LayoutBox, LayoutEngine, TextBox, HSTEP, INPUT_WIDTH_PX, SOFT_HYPHEN, VSTEP,
};
pub use paint::{DisplayCommand, DisplayList, Painter, Rect};
pub use parser::{CssParser, Rule};
pub use selector::{DescendantSelector, Selector, TagSelector};
pub use style::{apply_styles, parse_px, DEFAULT_FONT_SIZE_PX, INHERITED_PROPERTIES};
pub use ua_stylesheet::{default_stylesheet, UA_CSS};

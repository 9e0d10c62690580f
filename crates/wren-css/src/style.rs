//! Style resolution: inheritance, cascade, and inline styles.
//!
//! [CSS Cascading and Inheritance Level 4](https://www.w3.org/TR/css-cascade-4/)
//!
//! The resolver annotates the DOM in place: every node's `style` map is
//! filled depth-first in document order, parents before children, so a
//! child's percentage `font-size` can resolve against an
//! already-resolved parent.

use wren_dom::{DomTree, NodeId, StyleMap};

use crate::parser::{CssParser, Rule};

/// [§ 7.3 Inherited values](https://www.w3.org/TR/css-cascade-4/#inheriting)
///
/// "Inheritance propagates property values from parent elements to their
/// children."
///
/// The inherited properties and their root defaults.
pub const INHERITED_PROPERTIES: &[(&str, &str)] = &[
    ("font-size", "16px"),
    ("font-style", "roman"),
    ("font-weight", "normal"),
    ("color", "black"),
];

/// The root `font-size` in pixels.
pub const DEFAULT_FONT_SIZE_PX: f32 = 16.0;

/// Parse a `<length>` in pixels (`"16px"` or a bare number). `None` for
/// anything else; callers fall back to a default.
#[must_use]
pub fn parse_px(value: &str) -> Option<f32> {
    value
        .strip_suffix("px")
        .unwrap_or(value)
        .trim()
        .parse()
        .ok()
}

/// [§ 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
///
/// Resolve every node's style in place. Rules apply in ascending selector
/// priority (stable, so declaration order breaks ties and later rules
/// win), then the inline `style` attribute applies last.
pub fn apply_styles(tree: &mut DomTree, rules: &[Rule]) {
    let mut ordered: Vec<&Rule> = rules.iter().collect();
    ordered.sort_by_key(|rule| rule.selector.priority());
    if !tree.is_empty() {
        resolve_node(tree, tree.root(), &ordered);
    }
}

/// Resolve one node, then recurse. Children run after the node's own
/// style is final since their percentage resolution depends on it.
fn resolve_node(tree: &mut DomTree, id: NodeId, ordered: &[&Rule]) {
    let mut style = StyleMap::new();

    // [§ 7.3] Seed inherited properties from the parent, or the root
    // defaults.
    let parent = tree.parent(id);
    for &(property, default) in INHERITED_PROPERTIES {
        let value = parent
            .and_then(|p| tree.style_value(p, property))
            .unwrap_or(default);
        let _ = style.insert(property.to_string(), value.to_string());
    }

    // [§ 6.1] Sheet rules, in ascending priority; last write wins per
    // property.
    for rule in ordered {
        if rule.selector.matches(tree, id) {
            for (property, value) in &rule.declarations {
                let _ = style.insert(property.clone(), value.clone());
            }
        }
    }

    // [CSS Style Attributes] The inline `style` attribute applies after
    // every sheet rule.
    if let Some(inline) = tree
        .as_element(id)
        .and_then(|el| el.attr("style"))
        .map(str::to_string)
    {
        for (property, value) in CssParser::new(&inline).parse_inline_block() {
            let _ = style.insert(property, value);
        }
    }

    // [CSS Values § 5.1] Percentage font-size resolves against the
    // parent's resolved pixel size.
    if let Some(pct) = style
        .get("font-size")
        .and_then(|v| v.strip_suffix('%'))
        .and_then(|v| v.trim().parse::<f32>().ok())
    {
        let parent_px = parent
            .and_then(|p| tree.style_value(p, "font-size"))
            .and_then(parse_px)
            .unwrap_or(DEFAULT_FONT_SIZE_PX);
        let _ = style.insert(
            "font-size".to_string(),
            format!("{}px", pct * parent_px / 100.0),
        );
    }

    if let Some(node) = tree.get_mut(id) {
        node.style = style;
    }

    for child in tree.children(id).to_vec() {
        resolve_node(tree, child, ordered);
    }
}

//! Selector types and matching.
//!
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/)
//!
//! Only two selector forms exist here: the type (tag) selector and the
//! descendant combinator. Everything else — class, id, attribute, and
//! pseudo selectors — is out of scope.

use wren_dom::{DomTree, NodeId};

/// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
///
/// "A type selector is the name of a document language element type
/// written as a CSS qualified name."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSelector {
    /// The element tag name to match, lowercased.
    pub tag: String,
}

/// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
///
/// "A selector of the form `A B` represents an element B that is an
/// arbitrary descendant of some ancestor element A."
///
/// The ancestor side is a full selector, so chains like `nav ul li`
/// left-fold into nested descendants; the rightmost tag is always the
/// match target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescendantSelector {
    /// The selector any ancestor must match.
    pub ancestor: Box<Selector>,
    /// The tag the element itself must match.
    pub descendant: TagSelector,
}

/// A parsed selector.
///
/// [§ 17 Calculating a selector's specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
///
/// Specificity collapses to a single count here: every tag contributes
/// one, so `div p` outweighs `p`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// A bare tag name.
    Tag(TagSelector),
    /// An `ancestor descendant` pair.
    Descendant(DescendantSelector),
}

impl Selector {
    /// Wrap `ancestor` and a further tag into a descendant selector.
    #[must_use]
    pub fn descendant(ancestor: Selector, descendant: TagSelector) -> Self {
        Selector::Descendant(DescendantSelector {
            ancestor: Box::new(ancestor),
            descendant,
        })
    }

    /// The selector's cascade priority: the number of tag names it
    /// mentions. Rules are applied in ascending priority so higher
    /// specificity wins.
    #[must_use]
    pub fn priority(&self) -> u32 {
        match self {
            Selector::Tag(_) => 1,
            Selector::Descendant(sel) => 1 + sel.ancestor.priority(),
        }
    }

    /// [§ 3.1 Matches](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)
    ///
    /// Whether this selector matches the given node. Descendant matching
    /// walks the parent chain upward; any ancestor matching the left
    /// operand suffices.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        match self {
            Selector::Tag(sel) => tree.is_element_named(id, &sel.tag),
            Selector::Descendant(sel) => {
                tree.is_element_named(id, &sel.descendant.tag)
                    && tree
                        .ancestors(id)
                        .any(|ancestor| sel.ancestor.matches(tree, ancestor))
            }
        }
    }
}

//! HTML tree builder.
//!
//! [WHATWG § 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//!
//! "The input to the tree construction stage is a sequence of tokens from
//! the tokenization stage."
//!
//! The builder keeps a stack of open ("unfinished") elements and runs a
//! small implicit-tag state machine before every insertion, so any input
//! — including empty input — produces exactly one `html` root. Tree
//! construction never fails.

use strum_macros::Display;
use wren_common::warn_once;
use wren_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeType};

use crate::tokenizer::Token;

/// [WHATWG § 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements only have a start tag; end tags must not be specified
/// for void elements."
const SELF_CLOSING_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// [WHATWG § 4.2 Document metadata](https://html.spec.whatwg.org/multipage/semantics.html#document-metadata)
///
/// Tags that belong in `head`; seeing one of these while only `html` is
/// open implies `<head>`.
const HEAD_TAGS: &[&str] = &[
    "base", "basefont", "bgsound", "noscript", "link", "meta", "title", "style", "script",
];

/// The implicit-tag state machine's view of the open ancestor sequence.
///
/// [WHATWG § 13.2.6.4 The rules for parsing tokens in HTML content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhtml)
///
/// The full standard's insertion modes collapse to three structural
/// prefixes here: before the root, directly inside `html`, and inside
/// `head`. Each incoming token re-enters this machine until it reaches a
/// fixed point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
enum OpenPrefix {
    /// Nothing is open yet.
    Empty,
    /// Exactly `html` is open.
    Html,
    /// Exactly `html, head` is open.
    HtmlHead,
    /// Anything deeper; no implicit work remains.
    Deeper,
}

/// HTML tree builder over a token stream.
///
/// [WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// "Initially, the stack of open elements is empty."
pub struct HtmlParser {
    tokens: Vec<Token>,
    tree: DomTree,
    /// The stack of open elements; `last()` is the current insertion point.
    open: Vec<NodeId>,
}

impl HtmlParser {
    /// Create a parser over a token stream.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            tree: DomTree::new(),
            open: Vec::new(),
        }
    }

    /// Consume every token and return the finished tree.
    ///
    /// Tree construction always succeeds: implicit tags and recovery
    /// rules bound every malformed input.
    #[must_use]
    pub fn run(mut self) -> DomTree {
        for token in std::mem::take(&mut self.tokens) {
            match token {
                Token::Text(text) => self.add_text(&text),
                Token::Tag(tag) => self.add_tag(&tag),
            }
        }
        self.finish()
    }

    /// [§ 13.2.6.4.7 "in body"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// "A character token: insert the token's character."
    ///
    /// Whitespace-only runs are discarded rather than inserted; inter-tag
    /// indentation is not content.
    fn add_text(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        self.implicit_tags(None);
        let node = self.tree.alloc(NodeType::Text(text.to_string()));
        if let Some(&parent) = self.open.last() {
            self.tree.append_child(parent, node);
        }
    }

    /// Dispatch one tag token: open, close, or self-closing.
    fn add_tag(&mut self, tag: &str) {
        let (name, attrs) = parse_tag(tag);
        if name.starts_with('!') {
            // Doctypes and other declarations are dropped.
            return;
        }
        self.implicit_tags(Some(&name));

        if let Some(close_name) = name.strip_prefix('/') {
            self.close_tag(close_name);
        } else if SELF_CLOSING_TAGS.contains(&name.as_str()) {
            // [§ 13.1.2] Void element: attach without pushing.
            let node = self.tree.alloc(NodeType::Element(ElementData {
                tag_name: name,
                attrs,
            }));
            if let Some(&parent) = self.open.last() {
                self.tree.append_child(parent, node);
            }
        } else {
            self.open_tag(name, attrs);
        }
    }

    /// Push a new unfinished element, attached to the current insertion
    /// point (document order is fixed at open time).
    fn open_tag(&mut self, name: String, attrs: AttributesMap) {
        let node = self.tree.alloc(NodeType::Element(ElementData {
            tag_name: name,
            attrs,
        }));
        if let Some(&parent) = self.open.last() {
            self.tree.append_child(parent, node);
        }
        self.open.push(node);
    }

    /// Pop the current element.
    ///
    /// A close tag with only the root unfinished is a no-op, which is the
    /// recovery rule for unbalanced markup. The tag name is not checked
    /// against the popped element; mismatched close tags close whatever
    /// is innermost.
    fn close_tag(&mut self, name: &str) {
        if self.open.len() <= 1 {
            return;
        }
        let popped = self.open.pop();
        if popped.is_some_and(|p| !self.tree.is_element_named(p, name)) {
            warn_once("html", &format!("close tag </{name}> does not match open element"));
        }
    }

    /// [WHATWG § 13.2.6.4.1–13.2.6.4.4](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    ///
    /// Synthesize missing structural ancestors before an insertion,
    /// looping to a fixed point. `incoming` is `None` for text.
    fn implicit_tags(&mut self, incoming: Option<&str>) {
        loop {
            match self.open_prefix() {
                OpenPrefix::Empty => {
                    // [§ 13.2.6.4.2 "before html"]
                    // "Create an html element... then switch to 'before head'."
                    if incoming == Some("html") {
                        return;
                    }
                    self.open_tag("html".to_string(), AttributesMap::new());
                }
                OpenPrefix::Html => {
                    // [§ 13.2.6.4.3 "before head"]
                    if matches!(incoming, Some("head") | Some("body") | Some("/html")) {
                        return;
                    }
                    if incoming.is_some_and(|t| HEAD_TAGS.contains(&t)) {
                        self.open_tag("head".to_string(), AttributesMap::new());
                    } else {
                        self.open_tag("body".to_string(), AttributesMap::new());
                    }
                }
                OpenPrefix::HtmlHead => {
                    // [§ 13.2.6.4.4 "in head"]
                    // "Anything else: pop the current node (which will be
                    // the head element) off the stack of open elements."
                    if incoming == Some("/head")
                        || incoming.is_some_and(|t| HEAD_TAGS.contains(&t))
                    {
                        return;
                    }
                    let _ = self.open.pop();
                }
                OpenPrefix::Deeper => return,
            }
        }
    }

    /// Classify the currently open ancestor sequence for the implicit-tag
    /// machine.
    fn open_prefix(&self) -> OpenPrefix {
        match self.open.as_slice() {
            [] => OpenPrefix::Empty,
            [root] if self.tree.is_element_named(*root, "html") => OpenPrefix::Html,
            [root, second]
                if self.tree.is_element_named(*root, "html")
                    && self.tree.is_element_named(*second, "head") =>
            {
                OpenPrefix::HtmlHead
            }
            _ => OpenPrefix::Deeper,
        }
    }

    /// Close all still-open elements and return the tree.
    ///
    /// "Once the user agent stops parsing the document... pop all the
    /// nodes off the stack of open elements."
    fn finish(mut self) -> DomTree {
        if self.tree.is_empty() {
            // Even empty input yields an html root.
            self.implicit_tags(None);
        }
        self.open.clear();
        self.tree
    }
}

/// Split a tag token's raw text into a (lowercased) name and attributes.
///
/// [WHATWG § 13.1.2.3 Attributes](https://html.spec.whatwg.org/multipage/syntax.html#attributes-2)
///
/// "Attribute values are a mixture of text and character references...
/// the value can remain unquoted... single-quoted... double-quoted."
///
/// Values wrapped in matching quote characters have the quotes stripped;
/// bare attributes get an empty string value.
fn parse_tag(raw: &str) -> (String, AttributesMap) {
    let mut words = split_tag_words(raw);
    if words.is_empty() {
        return (String::new(), AttributesMap::new());
    }
    let name = words.remove(0).to_ascii_lowercase();

    let mut attrs = AttributesMap::new();
    for word in words {
        if let Some((key, value)) = word.split_once('=') {
            let _ = attrs.insert(key.to_ascii_lowercase(), strip_quotes(value).to_string());
        } else {
            let _ = attrs.insert(word.to_ascii_lowercase(), String::new());
        }
    }
    (name, attrs)
}

/// Split tag text on whitespace, keeping quoted attribute values intact.
fn split_tag_words(raw: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in raw.chars() {
        match quote {
            Some(open) => {
                current.push(ch);
                if ch == open {
                    quote = None;
                }
            }
            None => {
                if ch == '"' || ch == '\'' {
                    quote = Some(ch);
                    current.push(ch);
                } else if ch.is_whitespace() {
                    if !current.is_empty() {
                        words.push(std::mem::take(&mut current));
                    }
                } else {
                    current.push(ch);
                }
            }
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Strip a matching pair of surrounding quotes, if present.
fn strip_quotes(value: &str) -> &str {
    let mut chars = value.chars();
    match (chars.next(), value.chars().last()) {
        (Some(first), Some(last))
            if value.len() >= 2 && first == last && (first == '"' || first == '\'') =>
        {
            &value[1..value.len() - 1]
        }
        _ => value,
    }
}

/// Print a DOM tree with indentation, for debugging.
pub fn print_tree(tree: &DomTree, id: NodeId, depth: usize) {
    let indent = "  ".repeat(depth);
    match tree.get(id).map(|n| &n.node_type) {
        Some(NodeType::Element(data)) => {
            println!("{indent}<{}>", data.tag_name);
        }
        Some(NodeType::Text(text)) => {
            println!("{indent}{text:?}");
        }
        None => return,
    }
    for &child in tree.children(id) {
        print_tree(tree, child, depth + 1);
    }
}

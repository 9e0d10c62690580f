//! Integration tests for HTML tree construction.
//!
//! [WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)

use wren_dom::{DomTree, NodeId, NodeType};
use wren_html::{HtmlParseError, parse_document};

/// Collect the tag names of a node's element children.
fn child_tags(tree: &DomTree, id: NodeId) -> Vec<String> {
    tree.children(id)
        .iter()
        .filter_map(|&c| tree.as_element(c).map(|e| e.tag_name.clone()))
        .collect()
}

#[test]
fn test_root_is_always_html() {
    for input in ["", "hi", "<p>hi</p>", "</div>", "<html><body>x"] {
        let tree = parse_document(input).unwrap();
        assert!(
            tree.is_element_named(tree.root(), "html"),
            "input {input:?} should produce an html root"
        );
    }
}

#[test]
fn test_implicit_body_and_head() {
    // <p>hi</p> becomes html > body > p > "hi"
    let tree = parse_document("<p>hi</p>").unwrap();
    let html = tree.root();
    assert_eq!(child_tags(&tree, html), vec!["body"]);

    let body = tree.children(html)[0];
    assert_eq!(child_tags(&tree, body), vec!["p"]);

    let p = tree.children(body)[0];
    let text = tree.children(p)[0];
    assert_eq!(tree.as_text(text), Some("hi"));
}

#[test]
fn test_head_tags_open_implicit_head() {
    let tree = parse_document("<title>t</title><p>body text</p>").unwrap();
    let html = tree.root();
    assert_eq!(child_tags(&tree, html), vec!["head", "body"]);

    let head = tree.children(html)[0];
    assert_eq!(child_tags(&tree, head), vec!["title"]);
}

#[test]
fn test_comment_merges_adjacent_text() {
    let tree = parse_document("<p>a<!-- x -->b</p>").unwrap();
    let p = tree.find_element(tree.root(), "p").unwrap();
    let children = tree.children(p);
    assert_eq!(children.len(), 1, "comment must not split the text node");
    assert_eq!(tree.as_text(children[0]), Some("ab"));
}

#[test]
fn test_unterminated_comment_is_fatal() {
    assert_eq!(
        parse_document("<p>a<!-- b").unwrap_err(),
        HtmlParseError::UnterminatedComment
    );
}

#[test]
fn test_unbalanced_close_tags_ignored() {
    let tree = parse_document("</p></p><div>x</div></section>").unwrap();
    let div = tree.find_element(tree.root(), "div").unwrap();
    assert_eq!(tree.as_text(tree.children(div)[0]), Some("x"));
}

#[test]
fn test_self_closing_tags_not_pushed() {
    let tree = parse_document("<p>a<br>b</p>").unwrap();
    let p = tree.find_element(tree.root(), "p").unwrap();
    let children = tree.children(p);
    // "a", <br>, "b" are all siblings under p.
    assert_eq!(children.len(), 3);
    assert!(tree.is_element_named(children[1], "br"));
}

#[test]
fn test_unclosed_elements_closed_at_eof() {
    let tree = parse_document("<div><p>dangling").unwrap();
    let div = tree.find_element(tree.root(), "div").unwrap();
    let p = tree.find_element(div, "p").unwrap();
    assert_eq!(tree.as_text(tree.children(p)[0]), Some("dangling"));
}

#[test]
fn test_whitespace_only_text_discarded() {
    let tree = parse_document("<div>\n  <p>x</p>\n</div>").unwrap();
    let div = tree.find_element(tree.root(), "div").unwrap();
    let children = tree.children(div);
    assert_eq!(children.len(), 1);
    assert!(tree.is_element_named(children[0], "p"));
}

#[test]
fn test_entities_in_content() {
    let tree = parse_document("<p>1 &lt; 2</p>").unwrap();
    let p = tree.find_element(tree.root(), "p").unwrap();
    assert_eq!(tree.as_text(tree.children(p)[0]), Some("1 < 2"));
}

#[test]
fn test_doctype_dropped() {
    let tree = parse_document("<!DOCTYPE html><p>x</p>").unwrap();
    assert!(tree.is_element_named(tree.root(), "html"));
    assert!(tree.find_element(tree.root(), "p").is_some());
}

#[test]
fn test_nested_structure_preserves_document_order() {
    let tree = parse_document("<div><span>a</span><span>b</span></div>").unwrap();
    let div = tree.find_element(tree.root(), "div").unwrap();
    let spans = tree.children(div);
    assert_eq!(spans.len(), 2);
    let first = tree.children(spans[0])[0];
    let second = tree.children(spans[1])[0];
    assert_eq!(tree.as_text(first), Some("a"));
    assert_eq!(tree.as_text(second), Some("b"));
}

#[test]
fn test_attributes_parsed_onto_elements() {
    let tree = parse_document("<a href=\"http://example.org/\">link</a>").unwrap();
    let a = tree.find_element(tree.root(), "a").unwrap();
    let data = tree.as_element(a).unwrap();
    assert_eq!(data.attr("href"), Some("http://example.org/"));
}

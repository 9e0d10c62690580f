//! Integration tests for layout and painting, using the deterministic
//! arithmetic font provider (0.6 em advance, 0.8/0.2/1.2 em vertical
//! metrics).

use wren_css::fonts::{ApproximateFontProvider, FontProvider, FontWeight};
use wren_css::{
    apply_styles, default_stylesheet, BoxKind, CssParser, DisplayCommand, LayoutBox, LayoutEngine,
    Painter, Rule, HSTEP, INPUT_WIDTH_PX, VSTEP,
};
use wren_dom::DomTree;
use wren_html::parse_document;

const FONTS: ApproximateFontProvider = ApproximateFontProvider;

fn layout_page(html: &str, css: &str, viewport_width: f32) -> (DomTree, LayoutBox) {
    let mut tree = parse_document(html).unwrap();
    let mut rules: Vec<Rule> = default_stylesheet().to_vec();
    rules.extend(CssParser::new(css).parse());
    apply_styles(&mut tree, &rules);
    let root = LayoutEngine::new(&tree, &FONTS, viewport_width).layout();
    (tree, root)
}

/// All line boxes in paint order.
fn collect_lines(root: &LayoutBox) -> Vec<&LayoutBox> {
    fn walk<'a>(b: &'a LayoutBox, out: &mut Vec<&'a LayoutBox>) {
        if matches!(b.kind, BoxKind::Line) {
            out.push(b);
        }
        for child in &b.children {
            walk(child, out);
        }
    }
    let mut lines = Vec::new();
    walk(root, &mut lines);
    lines
}

fn line_texts(line: &LayoutBox) -> Vec<&str> {
    line.children
        .iter()
        .filter_map(|b| match &b.kind {
            BoxKind::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_document_box_covers_content_area() {
    let (_, root) = layout_page("<p>hi</p>", "", 800.0);
    assert!(matches!(root.kind, BoxKind::Document));
    assert!((root.x - HSTEP).abs() < f32::EPSILON);
    assert!((root.y - VSTEP).abs() < f32::EPSILON);
    assert!((root.width - (800.0 - 2.0 * HSTEP)).abs() < f32::EPSILON);
}

#[test]
fn test_blocks_stack_vertically() {
    let (_, root) = layout_page("<p>one</p><p>two</p>", "", 800.0);
    // document > html > body > [p, p]
    let body = &root.children[0].children[0];
    assert_eq!(body.children.len(), 2);
    let first = &body.children[0];
    let second = &body.children[1];
    assert!((second.y - (first.y + first.height)).abs() < 0.001);
    assert!((body.height - (first.height + second.height)).abs() < 0.001);
}

#[test]
fn test_head_content_is_not_laid_out() {
    let (_, root) = layout_page("<title>ignored</title><p>shown</p>", "", 800.0);
    let lines = collect_lines(&root);
    let words: Vec<&str> = lines.iter().flat_map(|l| line_texts(l)).collect();
    assert_eq!(words, vec!["shown"]);
}

#[test]
fn test_word_without_break_point_moves_whole() {
    // "aaaa" is 38.4px; after it the cursor sits at 48.0. "bbbbbb" is
    // 57.6px, overflowing the 100px content width, so it wraps whole.
    let (_, root) = layout_page("<p>aaaa bbbbbb</p>", "", 126.0);
    let lines = collect_lines(&root);
    assert_eq!(lines.len(), 2);
    assert_eq!(line_texts(lines[0]), vec!["aaaa"]);
    assert_eq!(line_texts(lines[1]), vec!["bbbbbb"]);
    // The wrapped word restarts at the left edge, below the first line.
    let wrapped = &lines[1].children[0];
    assert!((wrapped.x - HSTEP).abs() < f32::EPSILON);
    assert!(wrapped.y > lines[0].children[0].y);
}

#[test]
fn test_soft_hyphen_picks_widest_fitting_prefix() {
    // Content width 170px. The whole word (20 chars, 192px) overflows;
    // "super-" (57.6) and "supercali-" (96) both fit, so the widest
    // prefix wins and the remainder fills the next line.
    let (_, root) = layout_page("<p>super\u{00AD}cali\u{00AD}fragilistic</p>", "", 196.0);
    let lines = collect_lines(&root);
    assert_eq!(lines.len(), 2);
    assert_eq!(line_texts(lines[0]), vec!["supercali-"]);
    assert_eq!(line_texts(lines[1]), vec!["fragilistic"]);
}

#[test]
fn test_soft_hyphen_splits_repeatedly_when_narrow() {
    // Content width 80px only fits "super-" (57.6); the remainder is
    // split again at its own soft hyphen.
    let (_, root) = layout_page("<p>super\u{00AD}cali\u{00AD}fragilistic</p>", "", 106.0);
    let lines = collect_lines(&root);
    let words: Vec<&str> = lines.iter().flat_map(|l| line_texts(l)).collect();
    assert_eq!(words, vec!["super-", "cali-", "fragilistic"]);
}

#[test]
fn test_trailing_soft_hyphen_leaves_no_empty_box() {
    // Content width 30px: "tiny" (38.4px) overflows, the only break
    // point is the trailing soft hyphen, and nothing remains after it.
    let (_, root) = layout_page("<p>tiny\u{00AD}</p>", "", 56.0);
    let lines = collect_lines(&root);
    assert_eq!(lines.len(), 1);
    assert_eq!(line_texts(lines[0]), vec!["tiny-"]);
    for line in &lines {
        for text in line_texts(line) {
            assert!(!text.is_empty(), "no line should carry an empty run");
        }
    }
}

#[test]
fn test_soft_hyphen_stripped_when_word_fits() {
    let (_, root) = layout_page("<p>hy\u{00AD}phen</p>", "", 800.0);
    let lines = collect_lines(&root);
    assert_eq!(line_texts(lines[0]), vec!["hyphen"]);
}

#[test]
fn test_mixed_sizes_share_a_baseline() {
    let (_, root) = layout_page("<p>big <small>small</small> words</p>", "", 800.0);
    let lines = collect_lines(&root);
    assert_eq!(lines.len(), 1);
    let baselines: Vec<f32> = lines[0]
        .children
        .iter()
        .map(|b| match &b.kind {
            BoxKind::Text(t) => b.y + FONTS.metrics(t.size, t.weight, t.slant).ascent,
            _ => panic!("expected text boxes"),
        })
        .collect();
    assert!(baselines.len() >= 3);
    for &baseline in &baselines[1..] {
        assert!((baseline - baselines[0]).abs() < 0.001);
    }
}

#[test]
fn test_line_height_uses_leading_over_tallest_font() {
    let (_, root) = layout_page("<p>word</p>", "", 800.0);
    let lines = collect_lines(&root);
    // ascent 12.8, descent 3.2 at 16px; leading 1.25 on both sides.
    assert!((lines[0].height - 1.25 * (12.8 + 3.2)).abs() < 0.001);
}

#[test]
fn test_superscript_halves_font_size() {
    let (_, root) = layout_page("<p>x<sup>2</sup></p>", "", 800.0);
    let lines = collect_lines(&root);
    let boxes = &lines[0].children;
    let (base, sup) = (&boxes[0], &boxes[1]);
    match (&base.kind, &sup.kind) {
        (BoxKind::Text(b), BoxKind::Text(s)) => {
            assert_eq!(b.size, 16);
            assert_eq!(s.size, 8);
            assert!(s.superscript);
            assert!(!b.superscript);
        }
        _ => panic!("expected text boxes"),
    }
}

#[test]
fn test_abbr_renders_lowercase_words_as_small_caps() {
    let (_, root) = layout_page("<p><abbr>abc DEF</abbr></p>", "", 800.0);
    let lines = collect_lines(&root);
    let boxes = &lines[0].children;
    match (&boxes[0].kind, &boxes[1].kind) {
        (BoxKind::Text(lower), BoxKind::Text(mixed)) => {
            assert_eq!(lower.text, "ABC");
            assert_eq!(lower.size, 8);
            assert_eq!(lower.weight, FontWeight::Bold);
            // Words that are not all-lowercase keep the normal font.
            assert_eq!(mixed.text, "DEF");
            assert_eq!(mixed.size, 16);
            assert_eq!(mixed.weight, FontWeight::Normal);
        }
        _ => panic!("expected text boxes"),
    }
}

#[test]
fn test_input_occupies_fixed_width() {
    let (_, root) = layout_page("<p>name <input value=\"hi\"></p>", "", 800.0);
    let lines = collect_lines(&root);
    let field = lines[0]
        .children
        .iter()
        .find(|b| matches!(b.kind, BoxKind::Input(_)))
        .unwrap();
    assert!((field.width - INPUT_WIDTH_PX).abs() < f32::EPSILON);
    match &field.kind {
        BoxKind::Input(i) => assert_eq!(i.text, "hi"),
        BoxKind::Document | BoxKind::Block | BoxKind::Line | BoxKind::Text(_) => unreachable!(),
    }
}

#[test]
fn test_button_shows_its_text_child() {
    let (_, root) = layout_page("<p><button>Go</button></p>", "", 800.0);
    let lines = collect_lines(&root);
    match &lines[0].children[0].kind {
        BoxKind::Input(i) => assert_eq!(i.text, "Go"),
        _ => panic!("expected a replaced box"),
    }
}

#[test]
fn test_br_starts_a_new_line() {
    let (_, root) = layout_page("<p>one<br>two</p>", "", 800.0);
    let lines = collect_lines(&root);
    assert_eq!(lines.len(), 2);
    assert_eq!(line_texts(lines[0]), vec!["one"]);
    assert_eq!(line_texts(lines[1]), vec!["two"]);
}

#[test]
fn test_layout_is_idempotent() {
    let html = "<p>some <b>styled</b> text</p><pre>code</pre>";
    let (tree, first) = layout_page(html, "p { color: red; }", 640.0);
    let second = LayoutEngine::new(&tree, &FONTS, 640.0).layout();
    assert_eq!(first, second);

    let painter = Painter::new(&tree, &FONTS);
    assert_eq!(painter.paint(&first), painter.paint(&second));
}

#[test]
fn test_paint_background_precedes_text() {
    let (tree, root) = layout_page("<pre>code</pre>", "", 800.0);
    let list = Painter::new(&tree, &FONTS).paint(&root);
    let rect_at = list
        .iter()
        .position(|c| matches!(c, DisplayCommand::DrawRect { .. }))
        .unwrap();
    let text_at = list
        .iter()
        .position(|c| matches!(c, DisplayCommand::DrawText { .. }))
        .unwrap();
    assert!(rect_at < text_at, "background fill must draw under the text");
}

#[test]
fn test_focused_input_paints_a_caret() {
    let mut tree = parse_document("<p><input value=\"ab\"></p>").unwrap();
    let rules: Vec<Rule> = default_stylesheet().to_vec();
    apply_styles(&mut tree, &rules);
    let input = tree.find_element(tree.root(), "input").unwrap();
    tree.get_mut(input).unwrap().is_focused = true;

    let root = LayoutEngine::new(&tree, &FONTS, 800.0).layout();
    let list = Painter::new(&tree, &FONTS).paint(&root);
    let caret = list
        .iter()
        .find_map(|c| match c {
            DisplayCommand::DrawLine { rect, .. } => Some(rect),
            _ => None,
        })
        .expect("focused input should paint a caret");
    // The caret sits at the measured end of the value text: 2 chars at
    // 16px is 19.2 past the field's left edge.
    let field = collect_lines(&root)[0].children[0].x;
    assert!((caret.left - (field + 19.2)).abs() < 0.001);
}

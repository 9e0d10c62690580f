//! Page orchestration for the Wren rendering pipeline.
//!
//! Ties the stages together: markup parsing, style resolution, layout,
//! and painting, plus the interaction layer on top of the finished
//! geometry — hit-testing, link navigation, input focus and editing, and
//! form submission. Fetching, windowing, and rasterization stay outside;
//! a [`Page`] consumes strings and a font oracle and produces a display
//! list and interaction outcomes.

/// Fontdue-backed [`wren_css::FontProvider`].
pub mod font_metrics;

use thiserror::Error;
use wren_common::{clear_warnings, form_urlencode, Url, UrlParseError};
use wren_css::{
    apply_styles, default_stylesheet, CssParser, DisplayList, FontCache, FontProvider, LayoutBox,
    LayoutEngine, Painter, Rule,
};
use wren_dom::{DomTree, NodeId};
use wren_html::{parse_document, HtmlParseError};

pub use font_metrics::FontdueProvider;

/// Failure to build a page from its inputs.
///
/// Once a page exists, layout, painting, and interaction cannot fail
/// except where a URL must be resolved.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The markup could not be parsed.
    #[error("markup error: {0}")]
    Html(#[from] HtmlParseError),
    /// A URL could not be parsed or resolved.
    #[error("url error: {0}")]
    Url(#[from] UrlParseError),
}

/// The outcome of a click, for the embedding shell to act on.
///
/// [WHATWG HTML § 4.10.21 Form submission](https://html.spec.whatwg.org/multipage/form-control-infrastructure.html#form-submission-2)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// Nothing clickable was under the pointer.
    None,
    /// A link was followed; the shell should load this URL.
    Navigate(Url),
    /// A text field took focus; handled internally, reported so the
    /// shell can route keystrokes here.
    Focus,
    /// A form was submitted; the shell should POST `body` to `url`.
    Submit {
        /// The resolved form action.
        url: Url,
        /// `name=value` pairs, percent-encoded and joined with `&`.
        body: String,
    },
}

/// One loaded document: styled DOM, box tree, and display list, rebuilt
/// as a whole on any change.
///
/// Re-layout is never incremental: the styled DOM is reused but the box
/// tree and display list are discarded and recreated, so there is no
/// hidden accumulating state.
pub struct Page<'a> {
    url: Url,
    fonts: &'a dyn FontProvider,
    viewport_width: f32,
    tree: DomTree,
    rules: Vec<Rule>,
    layout: LayoutBox,
    display_list: DisplayList,
    focus: Option<NodeId>,
}

impl<'a> Page<'a> {
    /// Build a page from markup, external stylesheets (in link order),
    /// a font oracle, and the viewport width.
    ///
    /// The cascade order is: user-agent sheet, then `sheets`, then
    /// `<style>` elements in document order, then inline `style`
    /// attributes (applied by the resolver).
    ///
    /// # Errors
    ///
    /// Fails on an unterminated comment in the markup; everything else
    /// degrades gracefully.
    pub fn load(
        url: Url,
        html: &str,
        sheets: &[&str],
        fonts: &'a dyn FontProvider,
        viewport_width: f32,
    ) -> Result<Self, RenderError> {
        // A new document starts with a clean warning slate, so the same
        // oddity warns again per page rather than once per process.
        clear_warnings();
        let mut tree = parse_document(html)?;

        let mut rules: Vec<Rule> = default_stylesheet().to_vec();
        for sheet in sheets {
            rules.extend(CssParser::new(sheet).parse());
        }
        rules.extend(document_sheet_rules(&tree));
        apply_styles(&mut tree, &rules);

        let cache = FontCache::new(fonts);
        let layout = LayoutEngine::new(&tree, &cache, viewport_width).layout();
        let display_list = Painter::new(&tree, &cache).paint(&layout);

        Ok(Page {
            url,
            fonts,
            viewport_width,
            tree,
            rules,
            layout,
            display_list,
            focus: None,
        })
    }

    /// The document URL relative references resolve against.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The styled DOM.
    #[must_use]
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// The box tree from the last layout.
    #[must_use]
    pub fn layout(&self) -> &LayoutBox {
        &self.layout
    }

    /// The display list from the last layout.
    #[must_use]
    pub fn display_list(&self) -> &DisplayList {
        &self.display_list
    }

    /// The rules the page was styled with, user-agent sheet included.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The focused node, if any.
    #[must_use]
    pub fn focus(&self) -> Option<NodeId> {
        self.focus
    }

    /// Change the viewport width and rebuild geometry.
    pub fn resize(&mut self, viewport_width: f32) {
        self.viewport_width = viewport_width;
        self.relayout();
    }

    /// Full rebuild of the box tree and display list from the styled
    /// DOM.
    fn relayout(&mut self) {
        let cache = FontCache::new(self.fonts);
        let layout = LayoutEngine::new(&self.tree, &cache, self.viewport_width).layout();
        self.display_list = Painter::new(&self.tree, &cache).paint(&layout);
        self.layout = layout;
    }

    /// Handle a click at page coordinates.
    ///
    /// The topmost box under the point is found, then its DOM ancestor
    /// chain is walked outward to the first clickable element: a link
    /// with `href` resolves to a navigation, a text field takes focus,
    /// and a button inside a `form` with `action` submits the form.
    ///
    /// # Errors
    ///
    /// Fails only when an `href` or form `action` cannot be resolved
    /// against the document URL.
    pub fn click(&mut self, x: f32, y: f32) -> Result<Interaction, UrlParseError> {
        self.blur();
        let outcome = match self.layout.hit_test(x, y) {
            Some(hit) => self.activate(hit)?,
            None => Interaction::None,
        };
        // Focus and value edits change the rendering either way.
        self.relayout();
        Ok(outcome)
    }

    /// Walk from the hit node outward and act on the first clickable
    /// ancestor.
    fn activate(&mut self, hit: NodeId) -> Result<Interaction, UrlParseError> {
        let mut chain = vec![hit];
        chain.extend(self.tree.ancestors(hit));

        for id in chain {
            let Some(tag) = self.tree.as_element(id).map(|el| el.tag_name.clone()) else {
                continue;
            };
            match tag.as_str() {
                "a" => {
                    if let Some(href) = self
                        .tree
                        .as_element(id)
                        .and_then(|el| el.attr("href"))
                        .map(str::to_string)
                    {
                        return Ok(Interaction::Navigate(self.url.resolve(&href)?));
                    }
                }
                "input" => {
                    // Clicking a text field clears it and moves the
                    // caret there.
                    if let Some(el) = self.tree.as_element_mut(id) {
                        let _ = el.attrs.insert("value".to_string(), String::new());
                    }
                    if let Some(node) = self.tree.get_mut(id) {
                        node.is_focused = true;
                    }
                    self.focus = Some(id);
                    return Ok(Interaction::Focus);
                }
                "button" => {
                    if let Some(submit) = self.submit_form(id)? {
                        return Ok(submit);
                    }
                }
                _ => {}
            }
        }
        Ok(Interaction::None)
    }

    /// [§ 4.10.21.3 Form submission algorithm](https://html.spec.whatwg.org/multipage/form-control-infrastructure.html#form-submission-algorithm)
    ///
    /// Submit the form enclosing `button`, if there is one with an
    /// `action`: gather every named `input` under the form into
    /// percent-encoded `name=value` pairs.
    fn submit_form(&self, button: NodeId) -> Result<Option<Interaction>, UrlParseError> {
        let Some((form, action)) = self.tree.ancestors(button).find_map(|id| {
            let el = self.tree.as_element(id)?;
            if el.tag_name == "form" {
                Some((id, el.attr("action")?.to_string()))
            } else {
                None
            }
        }) else {
            return Ok(None);
        };

        let mut pairs = Vec::new();
        collect_fields(&self.tree, form, &mut pairs);
        Ok(Some(Interaction::Submit {
            url: self.url.resolve(&action)?,
            body: form_urlencode(&pairs),
        }))
    }

    /// Append a character to the focused field's value.
    pub fn type_key(&mut self, ch: char) {
        let Some(id) = self.focus else { return };
        if let Some(el) = self.tree.as_element_mut(id) {
            let value = el.attrs.entry("value".to_string()).or_default();
            value.push(ch);
        }
        self.relayout();
    }

    /// Delete the last character of the focused field's value.
    pub fn backspace(&mut self) {
        let Some(id) = self.focus else { return };
        if let Some(value) = self
            .tree
            .as_element_mut(id)
            .and_then(|el| el.attrs.get_mut("value"))
        {
            let _ = value.pop();
        }
        self.relayout();
    }

    /// Drop input focus, if any.
    pub fn blur(&mut self) {
        let Some(old) = self.focus.take() else { return };
        if let Some(node) = self.tree.get_mut(old) {
            node.is_focused = false;
        }
    }
}

/// Rules from the document's own `<style>` elements, in document order.
fn document_sheet_rules(tree: &DomTree) -> Vec<Rule> {
    let mut rules = Vec::new();
    for id in tree.iter_all() {
        if !tree.is_element_named(id, "style") {
            continue;
        }
        for &child in tree.children(id) {
            if let Some(text) = tree.as_text(child) {
                rules.extend(CssParser::new(text).parse());
            }
        }
    }
    rules
}

/// Collect `(name, value)` pairs from every named `input` in a subtree,
/// document order.
fn collect_fields(tree: &DomTree, id: NodeId, pairs: &mut Vec<(String, String)>) {
    let field = tree
        .as_element(id)
        .filter(|el| el.tag_name == "input")
        .and_then(|el| {
            let name = el.attr("name")?;
            Some((name.to_string(), el.attr("value").unwrap_or("").to_string()))
        });
    if let Some(pair) = field {
        pairs.push(pair);
    }
    for &child in tree.children(id) {
        collect_fields(tree, child, pairs);
    }
}

//! The user-agent stylesheet.
//!
//! [WHATWG HTML § 15.3 Rendering — the CSS user agent style sheet](https://html.spec.whatwg.org/multipage/rendering.html#rendering)
//!
//! "The CSS user agent style sheet and presentational hints described in
//! this section are expected to be used by user agents."
//!
//! Always prepended to the cascade, so page sheets and inline styles
//! override it.

use std::sync::OnceLock;

use crate::parser::{CssParser, Rule};

/// Default presentation for the tags the pipeline understands.
pub const UA_CSS: &str = "\
a { color: blue; }
i { font-style: italic; }
em { font-style: italic; }
b { font-weight: bold; }
strong { font-weight: bold; }
small { font-size: 90%; }
big { font-size: 110%; }
pre { background-color: gray; font-family: monospace; }
code { background-color: gray; font-family: monospace; }
input { font-size: 16px; font-weight: normal; font-style: roman; background-color: lightblue; }
button { font-size: 16px; font-weight: normal; font-style: roman; background-color: orange; }
";

static DEFAULT_SHEET: OnceLock<Vec<Rule>> = OnceLock::new();

/// The parsed user-agent stylesheet. Parsed once per process; the rules
/// are immutable afterwards.
#[must_use]
pub fn default_stylesheet() -> &'static [Rule] {
    DEFAULT_SHEET.get_or_init(|| CssParser::new(UA_CSS).parse())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::Selector;

    #[test]
    fn test_default_sheet_parses_completely() {
        let rules = default_stylesheet();
        assert_eq!(rules.len(), UA_CSS.lines().filter(|l| !l.is_empty()).count());
    }

    #[test]
    fn test_links_are_blue() {
        let rule = default_stylesheet()
            .iter()
            .find(|r| matches!(&r.selector, Selector::Tag(t) if t.tag == "a"))
            .expect("a rule for links");
        assert_eq!(rule.declarations.get("color").map(String::as_str), Some("blue"));
    }
}

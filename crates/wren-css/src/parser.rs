//! CSS parser.
//!
//! [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing)
//!
//! "The input to the parsing stage is a stream of tokens from the
//! tokenization stage."
//!
//! This parser works straight off the character stream instead: a
//! recursive descent where `word`, `literal`, `pair`, `body`, and
//! `selector` mirror the grammar, and error recovery skips to the next
//! `;` or `}` per
//! [§ 5.2 Error handling](https://www.w3.org/TR/css-syntax-3/#error-handling):
//! "When an error is encountered, the parser discards the current
//! construct and moves on."

use std::collections::HashMap;

use thiserror::Error;

use crate::selector::{Selector, TagSelector};

/// Map of declared property names to values inside one rule body.
pub type Declarations = HashMap<String, String>;

/// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
///
/// A style rule: a selector plus its declaration block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// The selector this rule applies to.
    pub selector: Selector,
    /// The declared properties.
    pub declarations: Declarations,
}

/// Internal parse failure; always recovered at the declaration or rule
/// level, so it never escapes [`CssParser::parse`].
#[derive(Debug, Error, PartialEq, Eq)]
enum CssSyntaxError {
    /// The input ended mid-construct.
    #[error("unexpected end of stylesheet")]
    UnexpectedEnd,
    /// A specific character was required.
    #[error("expected '{expected}' at offset {position}")]
    ExpectedLiteral {
        /// The character the grammar required.
        expected: char,
        /// Character offset where something else was found.
        position: usize,
    },
    /// `word()` found no word characters.
    #[error("expected a word at offset {position}")]
    ExpectedWord {
        /// Character offset of the offending input.
        position: usize,
    },
}

/// Recursive-descent CSS parser.
///
/// [§ 5.3.2 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
pub struct CssParser {
    input: Vec<char>,
    position: usize,
}

impl CssParser {
    /// Create a parser over CSS source text.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
    ///
    /// Parse the whole input as a rule list. Malformed rules are skipped
    /// to the next `}`; rule order is preserved for cascade tie-breaking.
    pub fn parse(&mut self) -> Vec<Rule> {
        let mut rules = Vec::new();
        while self.position < self.input.len() {
            let attempt = self.rule();
            match attempt {
                Ok(rule) => rules.push(rule),
                Err(_) => {
                    // "Discard the current construct": skip to the end of
                    // this rule and continue with the next one.
                    match self.ignore_until(&['}']) {
                        Some('}') => {
                            self.position += 1;
                            self.whitespace();
                        }
                        _ => break,
                    }
                }
            }
        }
        rules
    }

    /// Parse the contents of a declaration block without braces, as found
    /// in an inline `style` attribute.
    ///
    /// [CSS Style Attributes § 3](https://www.w3.org/TR/css-style-attr/#syntax)
    ///
    /// "The value of the style attribute must match the syntax of the
    /// contents of a CSS declaration block."
    pub fn parse_inline_block(&mut self) -> Declarations {
        self.body()
    }

    /// One `selector { body }` rule.
    fn rule(&mut self) -> Result<Rule, CssSyntaxError> {
        self.whitespace();
        let selector = self.selector()?;
        self.literal('{')?;
        self.whitespace();
        let declarations = self.body();
        self.literal('}')?;
        self.whitespace();
        Ok(Rule {
            selector,
            declarations,
        })
    }

    /// [Selectors Level 4 § 16 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    ///
    /// "A descendant combinator is whitespace that separates two compound
    /// selectors."
    ///
    /// A whitespace-separated chain of tag names, left-folded so the
    /// rightmost name is the match target.
    fn selector(&mut self) -> Result<Selector, CssSyntaxError> {
        let mut out = Selector::Tag(TagSelector {
            tag: self.word()?.to_ascii_lowercase(),
        });
        self.whitespace();
        while self.position < self.input.len() && self.peek() != Some('{') {
            let descendant = TagSelector {
                tag: self.word()?.to_ascii_lowercase(),
            };
            out = Selector::descendant(out, descendant);
            self.whitespace();
        }
        Ok(out)
    }

    /// [§ 5.4.4 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
    ///
    /// Parse a declaration list, tolerating malformed pairs by skipping
    /// to the next `;` or `}`.
    fn body(&mut self) -> Declarations {
        let mut pairs = Declarations::new();
        while self.position < self.input.len() && self.peek() != Some('}') {
            match self.pair() {
                Ok((property, value)) => {
                    let _ = pairs.insert(property, value);
                    self.whitespace();
                    if self.literal(';').is_err() {
                        // A parsed pair with no separator after it: skip
                        // whatever follows up to the next one, like a
                        // malformed pair.
                        match self.ignore_until(&[';', '}']) {
                            Some(';') => self.position += 1,
                            _ => break,
                        }
                    }
                    self.whitespace();
                }
                Err(_) => {
                    // "Discard the declaration": resynchronize on the next
                    // separator, or give up on the block.
                    match self.ignore_until(&[';', '}']) {
                        Some(';') => {
                            self.position += 1;
                            self.whitespace();
                        }
                        _ => break,
                    }
                }
            }
        }
        pairs
    }

    /// One `property : value` pair, with the property lowercased.
    fn pair(&mut self) -> Result<(String, String), CssSyntaxError> {
        let property = self.word()?;
        self.whitespace();
        self.literal(':')?;
        self.whitespace();
        let value = self.word()?;
        Ok((property.to_ascii_lowercase(), value))
    }

    /// Consume a maximal run of word characters: alphanumerics plus
    /// `#-.%`, enough for tag names, property names, lengths,
    /// percentages, and hex colors.
    fn word(&mut self) -> Result<String, CssSyntaxError> {
        let start = self.position;
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || matches!(ch, '#' | '-' | '.' | '%') {
                self.position += 1;
            } else {
                break;
            }
        }
        if self.position == start {
            return Err(CssSyntaxError::ExpectedWord { position: start });
        }
        Ok(self.input[start..self.position].iter().collect())
    }

    /// Assert and consume one exact character.
    fn literal(&mut self, expected: char) -> Result<(), CssSyntaxError> {
        match self.peek() {
            Some(ch) if ch == expected => {
                self.position += 1;
                Ok(())
            }
            Some(_) => Err(CssSyntaxError::ExpectedLiteral {
                expected,
                position: self.position,
            }),
            None => Err(CssSyntaxError::UnexpectedEnd),
        }
    }

    /// Skip whitespace.
    fn whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.position += 1;
        }
    }

    /// Skip forward until one of `stops` (or end of input); the stop
    /// character itself is not consumed.
    fn ignore_until(&mut self, stops: &[char]) -> Option<char> {
        while let Some(ch) = self.peek() {
            if stops.contains(&ch) {
                return Some(ch);
            }
            self.position += 1;
        }
        None
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(css: &str) -> Vec<Rule> {
        CssParser::new(css).parse()
    }

    #[test]
    fn test_parse_single_rule() {
        let rules = parse("p { color: red; }");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].selector.priority(), 1);
        assert_eq!(
            rules[0].declarations.get("color").map(String::as_str),
            Some("red")
        );
    }

    #[test]
    fn test_parse_descendant_selector_priority() {
        let rules = parse("div p { color: green; }");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].selector.priority(), 2);
    }

    #[test]
    fn test_parse_preserves_rule_order() {
        let rules = parse("p { color: red; } p { color: blue; }");
        assert_eq!(rules.len(), 2);
        assert_eq!(
            rules[1].declarations.get("color").map(String::as_str),
            Some("blue")
        );
    }

    #[test]
    fn test_malformed_declaration_skipped() {
        let rules = parse("p { color:; font-size: 10px; }");
        assert_eq!(rules.len(), 1);
        assert!(!rules[0].declarations.contains_key("color"));
        assert_eq!(
            rules[0].declarations.get("font-size").map(String::as_str),
            Some("10px")
        );
    }

    #[test]
    fn test_malformed_rule_skipped() {
        let rules = parse("@media (x) { p { color: red; } } div { color: blue; }");
        // The at-rule fails to parse; recovery skips to the next `}` and
        // resumes, so the div rule survives.
        assert!(rules.iter().any(|r| {
            r.declarations.get("color").map(String::as_str) == Some("blue")
        }));
    }

    #[test]
    fn test_missing_semicolon_mid_block_keeps_other_declarations() {
        let rules = parse("p { color: red font-size: 10px; background-color: blue; }");
        assert_eq!(rules.len(), 1);
        // The separator-less run after `red` is skipped; everything on
        // either side of it survives.
        assert_eq!(
            rules[0].declarations.get("color").map(String::as_str),
            Some("red")
        );
        assert!(!rules[0].declarations.contains_key("font-size"));
        assert_eq!(
            rules[0]
                .declarations
                .get("background-color")
                .map(String::as_str),
            Some("blue")
        );
    }

    #[test]
    fn test_missing_semicolon_on_last_declaration() {
        let rules = parse("p { color: red }");
        assert_eq!(
            rules[0].declarations.get("color").map(String::as_str),
            Some("red")
        );
    }

    #[test]
    fn test_parse_inline_block() {
        let decls = CssParser::new("color: blue; font-size: 50%").parse_inline_block();
        assert_eq!(decls.get("color").map(String::as_str), Some("blue"));
        assert_eq!(decls.get("font-size").map(String::as_str), Some("50%"));
    }

    #[test]
    fn test_percentage_and_hex_words() {
        let decls = CssParser::new("font-size: 90%; color: #1a2b3c").parse_inline_block();
        assert_eq!(decls.get("font-size").map(String::as_str), Some("90%"));
        assert_eq!(decls.get("color").map(String::as_str), Some("#1a2b3c"));
    }
}

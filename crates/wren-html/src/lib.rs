//! HTML tokenizer and tree builder for the Wren rendering pipeline.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - a single left-to-right scan producing text and tag tokens
//!   - `&lt;`/`&gt;` entity decoding outside tags
//!   - comment skipping (an unterminated comment is a fatal parse error)
//!
//! - **Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - stack of open elements with implicit `html`/`head`/`body` insertion
//!   - self-closing (void) element handling
//!   - attribute parsing with quote stripping
//!   - recovery from unbalanced markup (never fails)
//!
//! # Not Yet Implemented
//!
//! - Named character references beyond `&lt;`/`&gt;`
//! - RAWTEXT handling for `<script>`/`<style>` content containing `<`
//! - Table parsing modes, foster parenting, adoption agency

/// Tree construction from the token stream.
pub mod parser;
/// Tokenization of the input character stream.
pub mod tokenizer;

pub use parser::{HtmlParser, print_tree};
pub use tokenizer::{HtmlParseError, HtmlTokenizer, Token};

use wren_dom::DomTree;

/// Parse a complete markup string into a DOM tree.
///
/// Convenience entry point chaining [`HtmlTokenizer`] and [`HtmlParser`].
///
/// # Errors
///
/// Returns [`HtmlParseError`] only for input that cannot be bounded
/// (an unterminated comment); all other malformed markup is recovered.
pub fn parse_document(html: &str) -> Result<DomTree, HtmlParseError> {
    let mut tokenizer = HtmlTokenizer::new(html.to_string());
    tokenizer.run()?;
    let parser = HtmlParser::new(tokenizer.into_tokens());
    Ok(parser.run())
}

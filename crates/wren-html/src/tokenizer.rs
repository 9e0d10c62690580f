//! HTML tokenizer.
//!
//! [WHATWG § 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! A deliberately small state machine compared to the full standard: one
//! left-to-right scan over the input, switching between data, tag, and
//! comment states. Comments are skipped without flushing the pending text
//! buffer, so text separated only by a comment reaches the tree builder
//! as a single token.

use strum_macros::Display;
use thiserror::Error;

/// Error produced by tokenization.
///
/// Everything else in malformed markup is recoverable; an unterminated
/// comment is not, because its extent cannot be bounded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HtmlParseError {
    /// A `<!--` with no matching `-->` before end of input.
    #[error("unterminated comment at end of input")]
    UnterminatedComment,
}

/// A token produced by the tokenizer.
///
/// [WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// Tag tokens carry the raw text between `<` and `>`; the tree builder
/// splits it into a name and attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A run of character data, with entities already decoded.
    Text(String),
    /// The contents of a tag, e.g. `a href="/"` or `/a`.
    Tag(String),
}

/// The tokenizer's scan state.
///
/// [WHATWG § 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
/// [WHATWG § 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
/// [WHATWG § 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
enum TokenizerState {
    /// Accumulating character data.
    Data,
    /// Between `<` and `>`, accumulating the tag's raw text.
    Tag,
    /// Inside `<!--...-->`, discarding input.
    Comment,
}

/// Single-pass HTML tokenizer.
pub struct HtmlTokenizer {
    input: Vec<char>,
    position: usize,
    state: TokenizerState,
    text_buffer: String,
    tag_buffer: String,
    tokens: Vec<Token>,
}

impl HtmlTokenizer {
    /// Create a tokenizer over the complete input document.
    #[must_use]
    pub fn new(input: String) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            state: TokenizerState::Data,
            text_buffer: String::new(),
            tag_buffer: String::new(),
            tokens: Vec::new(),
        }
    }

    /// Run the tokenizer over the whole input.
    ///
    /// # Errors
    ///
    /// Returns [`HtmlParseError::UnterminatedComment`] when a comment is
    /// still open at end of input.
    pub fn run(&mut self) -> Result<(), HtmlParseError> {
        while self.position < self.input.len() {
            match self.state {
                TokenizerState::Data => self.step_data(),
                TokenizerState::Tag => self.step_tag(),
                TokenizerState::Comment => self.step_comment()?,
            }
        }

        // Flush trailing character data. A tag left open at end of input
        // (`...<foo`) is dropped, matching permissive-recovery behavior.
        if self.state == TokenizerState::Comment {
            return Err(HtmlParseError::UnterminatedComment);
        }
        if !self.text_buffer.is_empty() {
            self.tokens.push(Token::Text(std::mem::take(&mut self.text_buffer)));
        }
        Ok(())
    }

    /// Consume the tokenizer and return its token stream.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    fn step_data(&mut self) {
        let ch = self.input[self.position];
        match ch {
            '<' => {
                if self.lookahead("<!--") {
                    // Enter the comment without flushing the text buffer:
                    // text on either side of a comment stays one token.
                    self.position += 4;
                    self.state = TokenizerState::Comment;
                } else {
                    if !self.text_buffer.is_empty() {
                        self.tokens.push(Token::Text(std::mem::take(&mut self.text_buffer)));
                    }
                    self.position += 1;
                    self.state = TokenizerState::Tag;
                }
            }
            '&' => {
                // [§ 13.2.5.72 Character reference state]
                // Only the two angle-bracket entities are decoded; any
                // other ampersand is literal text.
                if self.lookahead("&lt;") {
                    self.text_buffer.push('<');
                    self.position += 4;
                } else if self.lookahead("&gt;") {
                    self.text_buffer.push('>');
                    self.position += 4;
                } else {
                    self.text_buffer.push('&');
                    self.position += 1;
                }
            }
            other => {
                self.text_buffer.push(other);
                self.position += 1;
            }
        }
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    fn step_tag(&mut self) {
        let ch = self.input[self.position];
        if ch == '>' {
            self.tokens.push(Token::Tag(std::mem::take(&mut self.tag_buffer)));
            self.state = TokenizerState::Data;
        } else {
            self.tag_buffer.push(ch);
        }
        self.position += 1;
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    ///
    /// Comments are skipped verbatim; they never become tokens or nodes.
    fn step_comment(&mut self) -> Result<(), HtmlParseError> {
        if self.lookahead("-->") {
            self.position += 3;
            self.state = TokenizerState::Data;
            return Ok(());
        }
        self.position += 1;
        if self.position >= self.input.len() {
            return Err(HtmlParseError::UnterminatedComment);
        }
        Ok(())
    }

    /// Whether the input at the current position starts with `needle`.
    fn lookahead(&self, needle: &str) -> bool {
        let mut pos = self.position;
        for expected in needle.chars() {
            if self.input.get(pos) != Some(&expected) {
                return false;
            }
            pos += 1;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Vec<Token> {
        let mut tokenizer = HtmlTokenizer::new(input.to_string());
        tokenizer.run().unwrap();
        tokenizer.into_tokens()
    }

    #[test]
    fn test_text_and_tags() {
        let tokens = tokenize("<p>hi</p>");
        assert_eq!(
            tokens,
            vec![
                Token::Tag("p".to_string()),
                Token::Text("hi".to_string()),
                Token::Tag("/p".to_string()),
            ]
        );
    }

    #[test]
    fn test_entities_decoded_outside_tags() {
        let tokens = tokenize("1 &lt; 2 &gt; 0 &amp;");
        assert_eq!(tokens, vec![Token::Text("1 < 2 > 0 &amp;".to_string())]);
    }

    #[test]
    fn test_comment_does_not_split_text() {
        let tokens = tokenize("<p>a<!-- x -->b</p>");
        assert_eq!(
            tokens,
            vec![
                Token::Tag("p".to_string()),
                Token::Text("ab".to_string()),
                Token::Tag("/p".to_string()),
            ]
        );
    }

    #[test]
    fn test_comment_containing_markup() {
        let tokens = tokenize("<!-- <div> ignore -->done");
        assert_eq!(tokens, vec![Token::Text("done".to_string())]);
    }

    #[test]
    fn test_unterminated_comment_is_fatal() {
        let mut tokenizer = HtmlTokenizer::new("<p>a<!-- never closed".to_string());
        assert_eq!(tokenizer.run(), Err(HtmlParseError::UnterminatedComment));
    }

    #[test]
    fn test_attributes_kept_raw_in_tag_token() {
        let tokens = tokenize("<a href=\"/index.html\" bold>");
        assert_eq!(
            tokens,
            vec![Token::Tag("a href=\"/index.html\" bold".to_string())]
        );
    }
}

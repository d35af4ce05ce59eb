//! Tokenizer for tag strings.

use crate::error::{Error, Result};

/// One lexical unit of a tag string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Hyphen,
    Wildcard,
    Subtag(&'a str),
}

impl<'a> Token<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            Token::Hyphen => "-",
            Token::Wildcard => "*",
            Token::Subtag(s) => s,
        }
    }
}

/// Splits a tag string into subtags, hyphens and wildcards.
///
/// Subtags are maximal runs of ASCII alphanumerics. A `*` is only accepted
/// as the first character of a run and is returned on its own.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    pub fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Restart from the beginning of the input.
    pub fn reset(&mut self) {
        self.position = 0;
    }

    pub fn next_token(&mut self) -> Result<Token<'a>> {
        let bytes = self.input.as_bytes();
        let start = self.position;

        match bytes.get(start) {
            None => return Err(Error::EndOfInput),
            Some(b'-') => {
                self.position += 1;
                return Ok(Token::Hyphen);
            }
            Some(b'*') => {
                self.position += 1;
                return Ok(Token::Wildcard);
            }
            Some(_) => {}
        }

        let mut end = start;
        while let Some(&b) = bytes.get(end) {
            match b {
                b'-' => break,
                b'*' => {
                    return Err(Error::syntax(format!("Invalid wildcard: position = {}", end)));
                }
                b if b.is_ascii_alphanumeric() => end += 1,
                _ => {
                    let c = self.input[end..].chars().next().unwrap_or('?');
                    return Err(Error::syntax(format!("Invalid character for tag: '{}'", c)));
                }
            }
        }

        self.position = end;
        Ok(Token::Subtag(&self.input[start..end]))
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_eof() {
            return None;
        }
        let token = self.next_token();
        if token.is_err() {
            // Stop after the first error.
            self.position = self.input.len();
        }
        Some(token)
    }
}

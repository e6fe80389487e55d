//! Whitespace tokenizer shared by the ASCII readers.

use std::str::FromStr;

use crate::{IoError, IoResult};

/// Whitespace-separated tokens with their 1-based line numbers.
///
/// Everything from a `#` to the end of its line is dropped.
pub(crate) struct Tokens<'a> {
    tokens: Vec<(usize, &'a str)>,
    pos: usize,
}

impl<'a> Tokens<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self::from_lines(text.lines().enumerate())
    }

    /// Tokenize lines that are already numbered (0-based).
    pub(crate) fn from_lines(lines: impl Iterator<Item = (usize, &'a str)>) -> Self {
        let tokens = lines
            .flat_map(|(n, line)| {
                let content = line.split('#').next().unwrap_or_default();
                content.split_whitespace().map(move |t| (n + 1, t))
            })
            .collect();
        Self { tokens, pos: 0 }
    }

    pub(crate) fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).map(|(_, t)| *t)
    }

    pub(crate) fn next_token(&mut self) -> Option<&'a str> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    /// Preallocation for `count` entries of `width` tokens each, bounded by
    /// what is left in the input so a bogus header count cannot exhaust
    /// memory.
    pub(crate) fn capacity_for(&self, count: usize, width: usize) -> usize {
        let remaining = self.tokens.len() - self.pos;
        count.min(remaining / width.max(1))
    }

    /// Line of the next token, or of the last one at end of input.
    fn line(&self) -> usize {
        self.tokens
            .get(self.pos.min(self.tokens.len().saturating_sub(1)))
            .map_or(0, |(n, _)| *n)
    }

    pub(crate) fn expect(&mut self, what: &str) -> IoResult<&'a str> {
        self.next_token().ok_or_else(|| IoError::UnexpectedEof {
            expected: what.to_string(),
        })
    }

    pub(crate) fn parse<T: FromStr>(&mut self, what: &str) -> IoResult<T> {
        let line = self.line();
        let token = self.expect(what)?;
        token.parse().map_err(|_| {
            IoError::invalid_content(format!("line {line}: expected {what}, found `{token}`"))
        })
    }

    pub(crate) fn skip(&mut self, count: usize, what: &str) -> IoResult<()> {
        for _ in 0..count {
            self.expect(what)?;
        }
        Ok(())
    }

    pub(crate) fn error(&self, message: impl std::fmt::Display) -> IoError {
        IoError::invalid_content(format!("line {}: {message}", self.line()))
    }
}

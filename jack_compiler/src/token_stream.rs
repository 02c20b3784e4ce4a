//! Buffered stream of tokens for look ahead.
use crate::{
    error::{ParseError, Position},
    tokens::{Token, TokenKind},
};

use smol_str::SmolStr;

/// Cursor over a fully lexed token sequence.
///
/// The whole sequence is held so productions can look
/// arbitrarily far ahead without consuming.
pub struct TokenStream {
    tokens: Vec<Token>,
    /// Index of the next token to be consumed.
    cursor: usize,
}

impl TokenStream {
    #[inline]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, cursor: 0 }
    }

    /// Index of the next token.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Indicates whether every token has been consumed.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    /// Return the current token without advancing the cursor.
    #[inline]
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor)
    }

    /// Look ahead `n` tokens past the current one.
    #[inline]
    pub fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.cursor + n)
    }

    #[inline]
    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|token| token.kind)
    }

    /// Consumes the current token regardless of kind.
    ///
    /// Returns `None` when the cursor is at the end of the token stream.
    pub fn next_token(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.cursor).cloned();
        if token.is_some() {
            self.cursor += 1;
        }
        token
    }

    /// Consumes the current token if it matches the given token kind.
    ///
    /// Returns true when matched. Does not consume the token if the
    /// kinds do not match.
    pub fn match_token(&mut self, token_kind: TokenKind) -> bool {
        let is_match = self.peek_kind() == Some(token_kind);
        if is_match {
            self.cursor += 1;
        }
        is_match
    }

    /// Return the current token and advance the cursor.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the token kind doesn't match, in which
    /// case the cursor is not advanced.
    pub fn consume(&mut self, token_kind: TokenKind) -> Result<Token, ParseError> {
        match self.peek() {
            Some(token) if token.kind == token_kind => {
                let token = token.clone();
                self.cursor += 1;
                Ok(token)
            }
            _ => Err(self.error(describe_kind(token_kind))),
        }
    }

    /// Consume an identifier and return its name.
    pub fn consume_ident(&mut self, what: &str) -> Result<SmolStr, ParseError> {
        match self.peek() {
            Some(token) if token.kind == TokenKind::Ident => {
                let name = token.text.clone();
                self.cursor += 1;
                Ok(name)
            }
            _ => Err(self.error(what)),
        }
    }

    /// Position of the current token.
    ///
    /// At the end of input this points just past the last token.
    pub fn position(&self) -> Position {
        match self.peek() {
            Some(token) => Position {
                token: self.cursor,
                line: token.span.line,
                column: token.span.column,
            },
            None => match self.tokens.last() {
                Some(last) => Position {
                    token: self.tokens.len(),
                    line: last.span.line,
                    column: last.span.column + last.span.size,
                },
                None => Position {
                    token: 0,
                    line: 1,
                    column: 1,
                },
            },
        }
    }

    /// Build an error describing what the current token should have been.
    #[cold]
    pub fn error(&self, expected: impl Into<String>) -> ParseError {
        ParseError {
            expected: expected.into(),
            found: self.peek().map(|token| token.to_string()),
            position: self.position(),
        }
    }
}

fn describe_kind(token_kind: TokenKind) -> String {
    match token_kind {
        TokenKind::Keyword(keyword) => format!("keyword '{keyword}'"),
        TokenKind::Symbol(symbol) => format!("symbol '{symbol}'"),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        lex::tokenize,
        tokens::{Keyword, Symbol},
    };

    fn stream(source: &str) -> TokenStream {
        TokenStream::new(tokenize(source).unwrap())
    }

    #[test]
    fn test_consume_mismatch_keeps_cursor() {
        let mut input = stream("class Main");
        let err = input
            .consume(TokenKind::Symbol(Symbol::LeftBrace))
            .unwrap_err();
        assert_eq!(err.expected, "symbol '{'");
        assert_eq!(err.found.as_deref(), Some("keyword 'class'"));
        assert_eq!(err.position.token, 0);
        assert_eq!(input.cursor(), 0);

        assert!(input.match_token(TokenKind::Keyword(Keyword::Class)));
        assert_eq!(input.consume_ident("class name").unwrap(), "Main");
        assert!(input.at_end());
    }

    #[test]
    fn test_error_at_end() {
        let mut input = stream("do f");
        input.next_token();
        input.next_token();
        let err = input.consume(TokenKind::Symbol(Symbol::Semicolon)).unwrap_err();
        assert_eq!(err.found, None);
        assert_eq!(err.position.token, 2);
        assert_eq!(err.position.column, 5);
    }

    #[test]
    fn test_peek_nth() {
        let input = stream("a [ 1 ]");
        assert_eq!(input.peek_nth(1).map(|t| t.kind), Some(TokenKind::Symbol(Symbol::LeftBracket)));
        assert_eq!(input.peek_nth(4), None);
    }
}

//! Lexical analysis (tokenizer)
use crate::{
    error::LexError,
    tokens::{Keyword, Span, Symbol, Token, TokenKind},
};

use itertools::{multipeek, MultiPeek};
use smol_str::SmolStr;
use std::str::CharIndices;

/// Largest value an integer constant may hold.
pub const MAX_INT: u32 = 32767;

/// Tokenize a whole comment-free source file.
///
/// The parser needs more than one token of lookahead, so the
/// entire sequence is built up front.
pub fn tokenize(source_code: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source_code).collect()
}

/// Print each token with its position, for inspecting the lexer output.
pub fn debug_print_lexer(lexer: Lexer) {
    let source_code = lexer.source_code();
    println!("Source Byte Count: {}", source_code.len());
    println!("line:col  | kind             | text             | fragment");

    for result in lexer {
        match result {
            Ok(token) => {
                let position = format!("{}", token.span);
                let kind = format!("{:?}", token.kind);
                let text = format!("{:?}", token.text.as_str());
                let fragment = token.span.fragment(source_code);
                println!("{position: <9} {kind: <18} {text: <18} {fragment}");
            }
            Err(err) => println!("{err}"),
        }
    }
}

/// Lexical analyzer.
pub struct Lexer<'a> {
    source: SourceText<'a>,
    /// Position where the current token started.
    token_start: SourcePos,
}

impl<'a> Lexer<'a> {
    pub fn new(source_code: &'a str) -> Self {
        Self {
            source: SourceText::new(source_code),
            token_start: SourcePos::default(),
        }
    }

    /// Original source code that was passed in during construction.
    pub fn source_code(&self) -> &'a str {
        self.source.original
    }

    /// Scan the source characters and construct the next token.
    ///
    /// Returns `None` once the source is exhausted.
    pub fn next_token(&mut self) -> Option<Result<Token, LexError>> {
        // Whitespace only separates tokens.
        while let Some(c) = self.source.peek_char() {
            if c.is_whitespace() {
                self.source.next_char();
            } else {
                break;
            }
        }
        self.source.reset_peek();

        self.start_token();
        let next_char = self.source.next_char()?;

        let result = match next_char {
            '"' => self.consume_string(),
            '\'' => self.consume_char(),
            c => match Symbol::from_char(c) {
                Some(symbol) => Ok(self.make_token(TokenKind::Symbol(symbol), c.to_string())),
                None => self.consume_word(),
            },
        };

        Some(result)
    }

    /// Prime the lexer state for recording a new token.
    fn start_token(&mut self) {
        self.token_start = self.source.position();
    }

    fn make_span(&self) -> Span {
        let start = self.token_start;
        Span {
            index: start.offset as u32,
            size: (self.source.offset() - start.offset) as u32,
            line: start.line,
            column: start.column,
        }
    }

    fn make_token(&self, kind: TokenKind, text: impl Into<SmolStr>) -> Token {
        Token {
            kind,
            text: text.into(),
            span: self.make_span(),
        }
    }

    fn fragment(&self) -> &'a str {
        let start = self.token_start.offset;
        &self.source.original[start..self.source.offset()]
    }
}

/// Specialised tokens.
impl<'a> Lexer<'a> {
    /// String constants are taken verbatim up to the closing quote.
    fn consume_string(&mut self) -> Result<Token, LexError> {
        loop {
            match self.source.next_char() {
                Some('"') => break,
                Some('\n') | None => return Err(LexError::UnterminatedString(self.make_span())),
                Some(_) => {}
            }
        }

        let fragment = self.fragment();
        let contents = &fragment[1..fragment.len() - 1];

        // Each character and the length are pushed as constants.
        if let Some(c) = contents.chars().find(|c| *c as u32 > MAX_INT) {
            return Err(LexError::CharOutOfRange {
                c,
                span: self.make_span(),
            });
        }
        if contents.chars().count() as u32 > MAX_INT {
            return Err(LexError::StringTooLong(self.make_span()));
        }

        Ok(self.make_token(TokenKind::StrConst, contents))
    }

    /// Character literal of exactly one character, lowered to its code point.
    fn consume_char(&mut self) -> Result<Token, LexError> {
        let c = match self.source.next_char() {
            Some('\'') | Some('\n') | None => {
                return Err(LexError::UnterminatedChar(self.make_span()))
            }
            Some(c) => c,
        };

        if self.source.next_char() != Some('\'') {
            return Err(LexError::UnterminatedChar(self.make_span()));
        }

        let code = c as u32;
        if code > MAX_INT {
            return Err(LexError::IntegerOutOfRange {
                text: SmolStr::from(self.fragment()),
                span: self.make_span(),
            });
        }

        Ok(self.make_token(TokenKind::IntConst, code.to_string()))
    }

    /// Maximal run of characters that are neither whitespace,
    /// symbols nor quotes.
    fn consume_word(&mut self) -> Result<Token, LexError> {
        while let Some(c) = self.source.peek_char() {
            if is_word_char(c) {
                self.source.next_char();
            } else {
                break;
            }
        }
        self.source.reset_peek();

        let fragment = self.fragment();

        if fragment.chars().all(|c| c.is_ascii_digit()) {
            return match fragment.parse::<u32>() {
                Ok(value) if value <= MAX_INT => Ok(self.make_token(TokenKind::IntConst, fragment)),
                _ => Err(LexError::IntegerOutOfRange {
                    text: SmolStr::from(fragment),
                    span: self.make_span(),
                }),
            };
        }

        // If a valid keyword can be parsed from the source fragment, then
        // the token is a reserved keyword instead of a user defined identifier.
        let kind = Keyword::parse(fragment)
            .map(TokenKind::Keyword)
            .unwrap_or(TokenKind::Ident);
        Ok(self.make_token(kind, fragment))
    }
}

fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && Symbol::from_char(c).is_none() && !matches!(c, '"' | '\'')
}

/// Implement `Lexer` as an iterator for consuming
/// tokens lazily.
impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Wrapper for source code that keeps a cursor position.
///
/// Allows forward lookup via peeking.
struct SourceText<'a> {
    original: &'a str,

    /// Iterator over UTF-8 encoded source code.
    ///
    /// Peeking advances the internal peek cursor by 1. The peek cursor
    /// is restored when calling `MultiPeek::next()` or `MultiPeek::reset_peek()`.
    chars: MultiPeek<CharIndices<'a>>,

    /// Byte offset of the next unconsumed character.
    offset: usize,
    line: u32,
    column: u32,
}

impl<'a> SourceText<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            original: source,
            chars: multipeek(source.char_indices()),
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Advance the cursor and return the consumed character.
    fn next_char(&mut self) -> Option<char> {
        let (index, c) = self.chars.next()?;
        self.offset = index + c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Peeks the next character in the stream.
    ///
    /// This call advances the peek cursor. Subsequent
    /// calls will look ahead by one character each call.
    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn reset_peek(&mut self) {
        self.chars.reset_peek()
    }

    fn offset(&self) -> usize {
        self.offset
    }

    fn position(&self) -> SourcePos {
        SourcePos {
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct SourcePos {
    offset: usize,
    line: u32,
    column: u32,
}

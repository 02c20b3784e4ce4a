//! Comment stripping.
//!
//! Runs ahead of the lexer so that it only ever sees comment-free
//! source. Comments are blanked out rather than removed, keeping
//! line and column positions of the remaining text intact.
use crate::error::LexError;

use itertools::{multipeek, MultiPeek};
use std::str::Chars;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    /// Inside double quotes.
    String,
    /// Inside a `'c'` character literal.
    Char,
    /// Inside `// ...` up to the end of the line.
    LineComment,
    /// Inside `/* ... */`, remembering where it was opened.
    BlockComment { line: u32, column: u32 },
}

/// Replace line and block comments with spaces.
///
/// Newlines inside block comments are kept. Comment markers
/// inside string constants and character literals are left alone.
pub fn strip_comments(source: &str) -> Result<String, LexError> {
    let mut output = String::with_capacity(source.len());
    let mut chars: MultiPeek<Chars> = multipeek(source.chars());
    let mut state = State::Code;
    let (mut line, mut column) = (1_u32, 1_u32);

    while let Some(c) = chars.next() {
        let (start_line, start_column) = (line, column);
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }

        match state {
            State::Code => match (c, chars.peek().copied()) {
                ('/', Some('/')) => {
                    chars.next();
                    column += 1;
                    output.push_str("  ");
                    state = State::LineComment;
                }
                ('/', Some('*')) => {
                    chars.next();
                    column += 1;
                    output.push_str("  ");
                    state = State::BlockComment {
                        line: start_line,
                        column: start_column,
                    };
                }
                ('"', _) => {
                    output.push(c);
                    state = State::String;
                }
                ('\'', _) => {
                    output.push(c);
                    state = State::Char;
                }
                _ => output.push(c),
            },
            State::String => {
                output.push(c);
                // The lexer reports unterminated strings, so a newline
                // simply falls back to code.
                if c == '"' || c == '\n' {
                    state = State::Code;
                }
            }
            State::Char => {
                output.push(c);
                if c == '\'' || c == '\n' {
                    state = State::Code;
                }
            }
            State::LineComment => {
                if c == '\n' {
                    output.push(c);
                    state = State::Code;
                } else {
                    output.push(' ');
                }
            }
            State::BlockComment { .. } => match (c, chars.peek().copied()) {
                ('*', Some('/')) => {
                    chars.next();
                    column += 1;
                    output.push_str("  ");
                    state = State::Code;
                }
                ('\n', _) => output.push('\n'),
                _ => output.push(' '),
            },
        }

        chars.reset_peek();
    }

    match state {
        State::BlockComment { line, column } => Err(LexError::UnterminatedComment { line, column }),
        _ => Ok(output),
    }
}

//! Result and errors.
use crate::tokens::Span;
use smol_str::SmolStr;
use std::fmt::{self, Display, Formatter};

pub type JackResult<T> = std::result::Result<T, CompileError>;

/// Terminal error for one compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    Lex(LexError),
    Parse(ParseError),
    Resolution(ResolutionError),
    Codegen(CodegenError),
}

impl Display for CompileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex(err) => write!(f, "lexical error: {err}"),
            Self::Parse(err) => write!(f, "syntax error: {err}"),
            Self::Resolution(err) => write!(f, "resolution error: {err}"),
            Self::Codegen(err) => write!(f, "code generation error: {err}"),
        }
    }
}

impl std::error::Error for CompileError {}

impl From<LexError> for CompileError {
    fn from(err: LexError) -> Self {
        CompileError::Lex(err)
    }
}

impl From<ParseError> for CompileError {
    fn from(err: ParseError) -> Self {
        CompileError::Parse(err)
    }
}

impl From<ResolutionError> for CompileError {
    fn from(err: ResolutionError) -> Self {
        CompileError::Resolution(err)
    }
}

impl From<CodegenError> for CompileError {
    fn from(err: CodegenError) -> Self {
        CompileError::Codegen(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// String constant without closing quote on the same line.
    UnterminatedString(Span),
    /// Character literal without a closing single quote.
    UnterminatedChar(Span),
    /// Block comment still open at the end of the source.
    UnterminatedComment { line: u32, column: u32 },
    /// Integer constant that does not fit in 15 bits.
    IntegerOutOfRange { text: SmolStr, span: Span },
    /// String constant holding a character whose code does not fit in 15 bits.
    CharOutOfRange { c: char, span: Span },
    /// String constant longer than the largest integer constant.
    StringTooLong(Span),
}

impl Display for LexError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedString(span) => write!(f, "{span}: unterminated string constant"),
            Self::UnterminatedChar(span) => write!(f, "{span}: unterminated character literal"),
            Self::UnterminatedComment { line, column } => {
                write!(f, "{line}:{column}: unterminated block comment")
            }
            Self::IntegerOutOfRange { text, span } => write!(
                f,
                "{span}: integer constant {text} is out of range 0..={}",
                crate::lex::MAX_INT
            ),
            Self::CharOutOfRange { c, span } => write!(
                f,
                "{span}: character {c:?} (U+{:04X}) in string constant is out of range 0..={}",
                *c as u32,
                crate::lex::MAX_INT
            ),
            Self::StringTooLong(span) => write!(
                f,
                "{span}: string constant is longer than {} characters",
                crate::lex::MAX_INT
            ),
        }
    }
}

impl std::error::Error for LexError {}

/// Location of a token in the token sequence.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// 0-based index into the token sequence.
    pub token: usize,
    pub line: u32,
    pub column: u32,
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} (token {})", self.line, self.column, self.token)
    }
}

/// Error returned when an unexpected token is encountered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub expected: String,
    /// Description of the offending token, `None` at end of input.
    pub found: Option<String>,
    pub position: Position,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.found {
            Some(found) => write!(
                f,
                "{}: expected {}, encountered {}",
                self.position, self.expected, found
            ),
            None => write!(
                f,
                "{}: expected {}, encountered end of source",
                self.position, self.expected
            ),
        }
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// Identifier not found in any active scope.
    Unresolved { name: SmolStr, subroutine: SmolStr },
    /// Name declared twice in the same scope.
    Redeclared { name: SmolStr, scope: &'static str },
}

impl Display for ResolutionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unresolved { name, subroutine } => {
                write!(f, "'{name}' is not declared in scope of '{subroutine}'")
            }
            Self::Redeclared { name, scope } => {
                write!(f, "'{name}' is already declared in {scope} scope")
            }
        }
    }
}

impl std::error::Error for ResolutionError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodegenError {
    /// `this` referenced where there is no receiver object.
    NoReceiver { subroutine: SmolStr },
    /// Method call on a variable of a primitive type.
    PrimitiveReceiver {
        name: SmolStr,
        ty: SmolStr,
        method: SmolStr,
    },
}

impl Display for CodegenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoReceiver { subroutine } => {
                write!(f, "'this' is not available in function '{subroutine}'")
            }
            Self::PrimitiveReceiver { name, ty, method } => write!(
                f,
                "cannot call method '{method}' on '{name}' of primitive type '{ty}'"
            ),
        }
    }
}

impl std::error::Error for CodegenError {}

//! Tokens
use smol_str::SmolStr;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Lexeme of the token.
    ///
    /// String constants are stored without their surrounding quotes,
    /// and character literals as the decimal code point.
    pub text: SmolStr,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }

    #[inline]
    pub fn is_symbol(&self, symbol: Symbol) -> bool {
        self.kind == TokenKind::Symbol(symbol)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::StrConst => write!(f, "{} \"{}\"", self.kind, self.text),
            _ => write!(f, "{} '{}'", self.kind, self.text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Reserved identifiers
    Keyword(Keyword),
    /// Single punctuation character
    Symbol(Symbol),
    Ident,
    /// Integer literal, or a character literal lowered to its code point
    IntConst,
    /// String literal
    StrConst,
}

impl TokenKind {
    /// Element name used by the analyzer XML output.
    #[rustfmt::skip]
    pub fn xml_tag(&self) -> &'static str {
        match self {
            TokenKind::Keyword(_) => "keyword",
            TokenKind::Symbol(_)  => "symbol",
            TokenKind::Ident      => "identifier",
            TokenKind::IntConst   => "integerConstant",
            TokenKind::StrConst   => "stringConstant",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(_) => write!(f, "keyword"),
            TokenKind::Symbol(_) => write!(f, "symbol"),
            TokenKind::Ident => write!(f, "identifier"),
            TokenKind::IntConst => write!(f, "integer constant"),
            TokenKind::StrConst => write!(f, "string constant"),
        }
    }
}

/// Creates a text-backed enum with conversions to and from its source form.
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),*
        }

        impl $name {
            pub fn parse(text: impl AsRef<str>) -> Option<Self> {
                match text.as_ref() {
                    $($text => Some(Self::$variant),)*
                    _ => None,
                }
            }

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

text_enum! {
    Keyword {
        Class       => "class",
        Constructor => "constructor",
        Function    => "function",
        Method      => "method",
        Field       => "field",
        Static      => "static",
        Var         => "var",
        Int         => "int",
        Char        => "char",
        Boolean     => "boolean",
        Void        => "void",
        True        => "true",
        False       => "false",
        Null        => "null",
        This        => "this",
        Let         => "let",
        Do          => "do",
        If          => "if",
        Else        => "else",
        While       => "while",
        Return      => "return",
    }
}

impl Keyword {
    /// Keywords that begin a statement.
    #[inline]
    pub fn is_statement(&self) -> bool {
        matches!(
            self,
            Keyword::Let | Keyword::If | Keyword::While | Keyword::Do | Keyword::Return
        )
    }
}

text_enum! {
    Symbol {
        LeftBrace    => "{",
        RightBrace   => "}",
        LeftParen    => "(",
        RightParen   => ")",
        LeftBracket  => "[",
        RightBracket => "]",
        Dot          => ".",
        Comma        => ",",
        Semicolon    => ";",
        Plus         => "+",
        Minus        => "-",
        Star         => "*",
        Slash        => "/",
        Ampersand    => "&",
        Pipe         => "|",
        Less         => "<",
        Greater      => ">",
        Eq           => "=",
        Tilde        => "~",
    }
}

impl Symbol {
    #[rustfmt::skip]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '{' => Some(Symbol::LeftBrace),
            '}' => Some(Symbol::RightBrace),
            '(' => Some(Symbol::LeftParen),
            ')' => Some(Symbol::RightParen),
            '[' => Some(Symbol::LeftBracket),
            ']' => Some(Symbol::RightBracket),
            '.' => Some(Symbol::Dot),
            ',' => Some(Symbol::Comma),
            ';' => Some(Symbol::Semicolon),
            '+' => Some(Symbol::Plus),
            '-' => Some(Symbol::Minus),
            '*' => Some(Symbol::Star),
            '/' => Some(Symbol::Slash),
            '&' => Some(Symbol::Ampersand),
            '|' => Some(Symbol::Pipe),
            '<' => Some(Symbol::Less),
            '>' => Some(Symbol::Greater),
            '=' => Some(Symbol::Eq),
            '~' => Some(Symbol::Tilde),
            _   => None,
        }
    }
}

/// Chunk of source code, encoded as a byte range plus the
/// human readable position of its first character.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct Span {
    pub index: u32,
    pub size: u32,
    /// 1-based line of the first character.
    pub line: u32,
    /// 1-based column of the first character.
    pub column: u32,
}

impl Span {
    #[inline]
    pub fn fragment<'a>(&self, text: &'a str) -> &'a str {
        &text[(self.index as usize)..(self.index as usize + self.size as usize)]
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_keyword_text() {
        assert_eq!(Keyword::parse("constructor"), Some(Keyword::Constructor));
        assert_eq!(Keyword::parse("Constructor"), None);
        assert_eq!(Keyword::While.as_str(), "while");
        assert!(Keyword::Return.is_statement());
        assert!(!Keyword::Else.is_statement());
    }

    #[test]
    fn test_symbol_chars() {
        for c in "{}()[].,;+-*/&|<>=~".chars() {
            let symbol = Symbol::from_char(c).expect("symbol");
            assert_eq!(symbol.as_str(), c.to_string());
        }
        assert_eq!(Symbol::from_char('!'), None);
    }

    #[test]
    fn test_span_fragment() {
        let span = Span {
            index: 4,
            size: 3,
            line: 1,
            column: 5,
        };
        assert_eq!(span.fragment("let foo = 1;"), "foo");
    }
}

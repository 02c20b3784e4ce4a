//! Class declaration and types.
use super::{subroutine::SubroutineDec, Parse};
use crate::{
    error::ParseError,
    token_stream::TokenStream,
    tokens::{Keyword, Symbol, TokenKind},
};
use smol_str::SmolStr;
use std::fmt;

/// Root of the syntax tree, one per compilation unit.
///
/// # Example
///
/// ```text
/// class Point {
///     field int x, y;
///     constructor Point new(int ax, int ay) { ... }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    pub name: SmolStr,
    pub var_decs: Vec<ClassVarDec>,
    pub subroutines: Vec<SubroutineDec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassVarScope {
    /// One slot shared by every instance.
    Static,
    /// One slot per instance.
    Field,
}

impl ClassVarScope {
    pub fn keyword(&self) -> Keyword {
        match self {
            ClassVarScope::Static => Keyword::Static,
            ClassVarScope::Field => Keyword::Field,
        }
    }
}

/// `static|field type name (, name)* ;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassVarDec {
    pub scope: ClassVarScope,
    pub ty: Type,
    pub names: Vec<SmolStr>,
}

/// Declared type of a variable or parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Char,
    Boolean,
    /// Any user or library class.
    Class(SmolStr),
}

impl Type {
    #[inline]
    pub fn is_primitive(&self) -> bool {
        !matches!(self, Type::Class(_))
    }

    pub fn name(&self) -> &str {
        match self {
            Type::Int => "int",
            Type::Char => "char",
            Type::Boolean => "boolean",
            Type::Class(name) => name.as_str(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Parse for Type {
    type Output = Self;

    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        let ty = match input.peek_kind() {
            Some(TokenKind::Keyword(Keyword::Int)) => Type::Int,
            Some(TokenKind::Keyword(Keyword::Char)) => Type::Char,
            Some(TokenKind::Keyword(Keyword::Boolean)) => Type::Boolean,
            Some(TokenKind::Ident) => Type::Class(input.consume_ident("type")?),
            _ => return Err(input.error("type 'int', 'char', 'boolean' or a class name")),
        };

        if ty.is_primitive() {
            input.next_token();
        }

        Ok(ty)
    }
}

impl Parse for ClassDecl {
    type Output = Self;

    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        input.consume(TokenKind::Keyword(Keyword::Class))?;
        let name = input.consume_ident("class name")?;
        input.consume(TokenKind::Symbol(Symbol::LeftBrace))?;

        // Variable declarations are consumed greedily before any subroutine.
        let mut var_decs = vec![];
        while let Some(var_dec) = ClassVarDec::parse(input)? {
            var_decs.push(var_dec);
        }

        let mut subroutines = vec![];
        while let Some(subroutine) = SubroutineDec::parse(input)? {
            subroutines.push(subroutine);
        }

        input.consume(TokenKind::Symbol(Symbol::RightBrace))?;

        Ok(ClassDecl {
            name,
            var_decs,
            subroutines,
        })
    }
}

/// Parse one class variable declaration.
///
/// Allowed to be absent because the lookahead is here and not in the class.
impl Parse for ClassVarDec {
    type Output = Option<Self>;

    fn parse(input: &mut TokenStream) -> Result<Option<Self>, ParseError> {
        let scope = match input.peek_kind() {
            Some(TokenKind::Keyword(Keyword::Static)) => ClassVarScope::Static,
            Some(TokenKind::Keyword(Keyword::Field)) => ClassVarScope::Field,
            _ => return Ok(None),
        };
        input.next_token();

        let ty = Type::parse(input)?;
        let names = parse_name_list(input)?;

        Ok(Some(ClassVarDec { scope, ty, names }))
    }
}

/// `name (, name)* ;`
pub(super) fn parse_name_list(input: &mut TokenStream) -> Result<Vec<SmolStr>, ParseError> {
    let mut names = vec![input.consume_ident("variable name")?];
    while input.match_token(TokenKind::Symbol(Symbol::Comma)) {
        names.push(input.consume_ident("variable name")?);
    }
    input.consume(TokenKind::Symbol(Symbol::Semicolon))?;
    Ok(names)
}

//! Subroutine declarations.
use super::{
    class::{parse_name_list, Type},
    stmts::{parse_statements, Statement},
    Parse,
};
use crate::{
    error::ParseError,
    token_stream::TokenStream,
    tokens::{Keyword, Symbol, TokenKind},
};
use smol_str::SmolStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubroutineKind {
    /// Allocates a new object and binds it as the receiver.
    Constructor,
    /// Static routine without a receiver.
    Function,
    /// Receives the object as implicit argument 0.
    Method,
}

impl SubroutineKind {
    pub fn keyword(&self) -> Keyword {
        match self {
            SubroutineKind::Constructor => Keyword::Constructor,
            SubroutineKind::Function => Keyword::Function,
            SubroutineKind::Method => Keyword::Method,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubroutineDec {
    pub kind: SubroutineKind,
    /// `None` for `void`.
    pub return_type: Option<Type>,
    pub name: SmolStr,
    pub params: Vec<Param>,
    pub body: SubroutineBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub ty: Type,
    pub name: SmolStr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubroutineBody {
    pub locals: Vec<VarDec>,
    pub statements: Vec<Statement>,
}

/// `var type name (, name)* ;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDec {
    pub ty: Type,
    pub names: Vec<SmolStr>,
}

/// Parse one subroutine declaration.
///
/// Allowed to be absent because the lookahead is here and not in the class.
impl Parse for SubroutineDec {
    type Output = Option<Self>;

    fn parse(input: &mut TokenStream) -> Result<Option<Self>, ParseError> {
        let kind = match input.peek_kind() {
            Some(TokenKind::Keyword(Keyword::Constructor)) => SubroutineKind::Constructor,
            Some(TokenKind::Keyword(Keyword::Function)) => SubroutineKind::Function,
            Some(TokenKind::Keyword(Keyword::Method)) => SubroutineKind::Method,
            _ => return Ok(None),
        };
        input.next_token();

        let return_type = if input.match_token(TokenKind::Keyword(Keyword::Void)) {
            None
        } else {
            Some(Type::parse(input)?)
        };
        let name = input.consume_ident("subroutine name")?;

        input.consume(TokenKind::Symbol(Symbol::LeftParen))?;
        let params = parse_params(input)?;
        input.consume(TokenKind::Symbol(Symbol::RightParen))?;

        let body = SubroutineBody::parse(input)?;

        Ok(Some(SubroutineDec {
            kind,
            return_type,
            name,
            params,
            body,
        }))
    }
}

/// `((type name) (, type name)*)?`
fn parse_params(input: &mut TokenStream) -> Result<Vec<Param>, ParseError> {
    let mut params = vec![];

    if input.peek_kind() == Some(TokenKind::Symbol(Symbol::RightParen)) {
        return Ok(params);
    }

    loop {
        let ty = Type::parse(input)?;
        let name = input.consume_ident("parameter name")?;
        params.push(Param { ty, name });

        if !input.match_token(TokenKind::Symbol(Symbol::Comma)) {
            break;
        }
    }

    Ok(params)
}

impl Parse for SubroutineBody {
    type Output = Self;

    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        input.consume(TokenKind::Symbol(Symbol::LeftBrace))?;

        let mut locals = vec![];
        while let Some(var_dec) = VarDec::parse(input)? {
            locals.push(var_dec);
        }

        let statements = parse_statements(input)?;
        input.consume(TokenKind::Symbol(Symbol::RightBrace))?;

        Ok(SubroutineBody { locals, statements })
    }
}

impl Parse for VarDec {
    type Output = Option<Self>;

    fn parse(input: &mut TokenStream) -> Result<Option<Self>, ParseError> {
        if !input.match_token(TokenKind::Keyword(Keyword::Var)) {
            return Ok(None);
        }

        let ty = Type::parse(input)?;
        let names = parse_name_list(input)?;

        Ok(Some(VarDec { ty, names }))
    }
}

//! Statement parsing.
use super::{
    expr::{Expression, SubroutineCall},
    Parse,
};
use crate::{
    error::ParseError,
    token_stream::TokenStream,
    tokens::{Keyword, Symbol, TokenKind},
};
use smol_str::SmolStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `let name ([index])? = value;`
    Let {
        target: SmolStr,
        index: Option<Expression>,
        value: Expression,
    },
    /// `if (cond) { ... } (else { ... })?`
    If {
        cond: Expression,
        then: Vec<Statement>,
        otherwise: Option<Vec<Statement>>,
    },
    /// `while (cond) { ... }`
    While {
        cond: Expression,
        body: Vec<Statement>,
    },
    /// `do call;`
    Do(SubroutineCall),
    /// `return value?;`
    Return(Option<Expression>),
}

/// Parse statements for as long as the next token is a statement keyword.
pub fn parse_statements(input: &mut TokenStream) -> Result<Vec<Statement>, ParseError> {
    let mut stmts = vec![];

    while let Some(TokenKind::Keyword(keyword)) = input.peek_kind() {
        if !keyword.is_statement() {
            break;
        }
        stmts.push(Statement::parse(input)?);
    }

    Ok(stmts)
}

impl Parse for Statement {
    type Output = Self;

    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        use Keyword as K;

        match input.peek_kind() {
            Some(TokenKind::Keyword(K::Let)) => parse_let(input),
            Some(TokenKind::Keyword(K::If)) => parse_if(input),
            Some(TokenKind::Keyword(K::While)) => parse_while(input),
            Some(TokenKind::Keyword(K::Do)) => parse_do(input),
            Some(TokenKind::Keyword(K::Return)) => parse_return(input),
            _ => Err(input.error("statement")),
        }
    }
}

fn parse_let(input: &mut TokenStream) -> Result<Statement, ParseError> {
    input.consume(TokenKind::Keyword(Keyword::Let))?;
    let target = input.consume_ident("variable name")?;

    let index = if input.match_token(TokenKind::Symbol(Symbol::LeftBracket)) {
        let index = Expression::parse(input)?;
        input.consume(TokenKind::Symbol(Symbol::RightBracket))?;
        Some(index)
    } else {
        None
    };

    input.consume(TokenKind::Symbol(Symbol::Eq))?;
    let value = Expression::parse(input)?;
    input.consume(TokenKind::Symbol(Symbol::Semicolon))?;

    Ok(Statement::Let {
        target,
        index,
        value,
    })
}

fn parse_if(input: &mut TokenStream) -> Result<Statement, ParseError> {
    input.consume(TokenKind::Keyword(Keyword::If))?;
    let cond = parse_condition(input)?;
    let then = parse_block(input)?;

    // Only an `else` directly after the closing brace belongs to this `if`.
    let otherwise = if input.match_token(TokenKind::Keyword(Keyword::Else)) {
        Some(parse_block(input)?)
    } else {
        None
    };

    Ok(Statement::If {
        cond,
        then,
        otherwise,
    })
}

fn parse_while(input: &mut TokenStream) -> Result<Statement, ParseError> {
    input.consume(TokenKind::Keyword(Keyword::While))?;
    let cond = parse_condition(input)?;
    let body = parse_block(input)?;

    Ok(Statement::While { cond, body })
}

fn parse_do(input: &mut TokenStream) -> Result<Statement, ParseError> {
    input.consume(TokenKind::Keyword(Keyword::Do))?;
    let call = SubroutineCall::parse(input)?;
    input.consume(TokenKind::Symbol(Symbol::Semicolon))?;

    Ok(Statement::Do(call))
}

fn parse_return(input: &mut TokenStream) -> Result<Statement, ParseError> {
    input.consume(TokenKind::Keyword(Keyword::Return))?;

    let value = if input.peek_kind() == Some(TokenKind::Symbol(Symbol::Semicolon)) {
        None
    } else {
        Some(Expression::parse(input)?)
    };
    input.consume(TokenKind::Symbol(Symbol::Semicolon))?;

    Ok(Statement::Return(value))
}

/// `( expression )`
fn parse_condition(input: &mut TokenStream) -> Result<Expression, ParseError> {
    input.consume(TokenKind::Symbol(Symbol::LeftParen))?;
    let cond = Expression::parse(input)?;
    input.consume(TokenKind::Symbol(Symbol::RightParen))?;
    Ok(cond)
}

/// `{ statements }`
fn parse_block(input: &mut TokenStream) -> Result<Vec<Statement>, ParseError> {
    input.consume(TokenKind::Symbol(Symbol::LeftBrace))?;
    let stmts = parse_statements(input)?;
    input.consume(TokenKind::Symbol(Symbol::RightBrace))?;
    Ok(stmts)
}

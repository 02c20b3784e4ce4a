//! Expressions and terms.
use super::Parse;
use crate::{
    error::ParseError,
    token_stream::TokenStream,
    tokens::{Keyword, Symbol, TokenKind},
};
use smol_str::SmolStr;

/// Flat left-to-right chain of terms.
///
/// The language has no operator precedence, so `1 + 2 * 3`
/// is `(1 + 2) * 3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub first: Term,
    pub rest: Vec<(BinaryOp, Term)>,
}

impl Expression {
    /// Expression consisting of a single term.
    pub fn term(term: Term) -> Self {
        Self {
            first: term,
            rest: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    IntLiteral(u16),
    StringLiteral(SmolStr),
    KeywordConst(KeywordConst),
    VarRef(SmolStr),
    /// `name[index]`
    IndexedVarRef {
        name: SmolStr,
        index: Box<Expression>,
    },
    Call(SubroutineCall),
    Unary {
        op: UnaryOp,
        operand: Box<Term>,
    },
    Paren(Box<Expression>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordConst {
    True,
    False,
    Null,
    This,
}

impl KeywordConst {
    pub fn keyword(&self) -> Keyword {
        match self {
            KeywordConst::True => Keyword::True,
            KeywordConst::False => Keyword::False,
            KeywordConst::Null => Keyword::Null,
            KeywordConst::This => Keyword::This,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-`
    Neg,
    /// `~`
    Not,
}

impl UnaryOp {
    pub fn symbol(&self) -> Symbol {
        match self {
            UnaryOp::Neg => Symbol::Minus,
            UnaryOp::Not => Symbol::Tilde,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    And,
    Or,
    Lt,
    Gt,
    Eq,
}

impl BinaryOp {
    #[rustfmt::skip]
    pub fn from_symbol(symbol: Symbol) -> Option<Self> {
        match symbol {
            Symbol::Plus      => Some(BinaryOp::Add),
            Symbol::Minus     => Some(BinaryOp::Sub),
            Symbol::Star      => Some(BinaryOp::Mul),
            Symbol::Slash     => Some(BinaryOp::Div),
            Symbol::Ampersand => Some(BinaryOp::And),
            Symbol::Pipe      => Some(BinaryOp::Or),
            Symbol::Less      => Some(BinaryOp::Lt),
            Symbol::Greater   => Some(BinaryOp::Gt),
            Symbol::Eq        => Some(BinaryOp::Eq),
            _                 => None,
        }
    }

    #[rustfmt::skip]
    pub fn symbol(&self) -> Symbol {
        match self {
            BinaryOp::Add => Symbol::Plus,
            BinaryOp::Sub => Symbol::Minus,
            BinaryOp::Mul => Symbol::Star,
            BinaryOp::Div => Symbol::Slash,
            BinaryOp::And => Symbol::Ampersand,
            BinaryOp::Or  => Symbol::Pipe,
            BinaryOp::Lt  => Symbol::Less,
            BinaryOp::Gt  => Symbol::Greater,
            BinaryOp::Eq  => Symbol::Eq,
        }
    }
}

/// `name(args)` or `receiver.name(args)`
///
/// Whether the receiver is a variable or a class name is
/// only known once symbols are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubroutineCall {
    pub receiver: Option<SmolStr>,
    pub name: SmolStr,
    pub args: Vec<Expression>,
}

impl Parse for Expression {
    type Output = Self;

    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        let first = Term::parse(input)?;
        let mut rest = vec![];

        while let Some(TokenKind::Symbol(symbol)) = input.peek_kind() {
            match BinaryOp::from_symbol(symbol) {
                Some(op) => {
                    input.next_token();
                    rest.push((op, Term::parse(input)?));
                }
                None => break,
            }
        }

        Ok(Expression { first, rest })
    }
}

impl Parse for Term {
    type Output = Self;

    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        use Keyword as K;
        use TokenKind as T;

        let token = match input.peek() {
            Some(token) => token.clone(),
            None => return Err(input.error("term")),
        };

        match token.kind {
            T::IntConst => {
                // The lexer guarantees the constant fits in 15 bits.
                let value = token
                    .text
                    .parse::<u16>()
                    .map_err(|_| input.error("integer constant"))?;
                input.next_token();
                Ok(Term::IntLiteral(value))
            }
            T::StrConst => {
                input.next_token();
                Ok(Term::StringLiteral(token.text))
            }
            T::Keyword(keyword) => {
                let constant = match keyword {
                    K::True => KeywordConst::True,
                    K::False => KeywordConst::False,
                    K::Null => KeywordConst::Null,
                    K::This => KeywordConst::This,
                    _ => return Err(input.error("term")),
                };
                input.next_token();
                Ok(Term::KeywordConst(constant))
            }
            T::Symbol(Symbol::LeftParen) => {
                input.next_token();
                let inner = Expression::parse(input)?;
                input.consume(T::Symbol(Symbol::RightParen))?;
                Ok(Term::Paren(Box::new(inner)))
            }
            T::Symbol(Symbol::Minus) | T::Symbol(Symbol::Tilde) => {
                input.next_token();
                let op = if token.is_symbol(Symbol::Minus) {
                    UnaryOp::Neg
                } else {
                    UnaryOp::Not
                };
                let operand = Term::parse(input)?;
                Ok(Term::Unary {
                    op,
                    operand: Box::new(operand),
                })
            }
            T::Ident => match input.peek_nth(1).map(|t| t.kind) {
                Some(T::Symbol(Symbol::LeftBracket)) => {
                    input.next_token();
                    input.next_token();
                    let index = Expression::parse(input)?;
                    input.consume(T::Symbol(Symbol::RightBracket))?;
                    Ok(Term::IndexedVarRef {
                        name: token.text,
                        index: Box::new(index),
                    })
                }
                Some(T::Symbol(Symbol::LeftParen)) | Some(T::Symbol(Symbol::Dot)) => {
                    SubroutineCall::parse(input).map(Term::Call)
                }
                _ => {
                    input.next_token();
                    Ok(Term::VarRef(token.text))
                }
            },
            T::Symbol(_) => Err(input.error("term")),
        }
    }
}

impl Parse for SubroutineCall {
    type Output = Self;

    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        let first = input.consume_ident("subroutine, class or variable name")?;

        let (receiver, name) = if input.match_token(TokenKind::Symbol(Symbol::Dot)) {
            let name = input.consume_ident("subroutine name")?;
            (Some(first), name)
        } else {
            (None, first)
        };

        input.consume(TokenKind::Symbol(Symbol::LeftParen))?;
        let args = parse_expression_list(input)?;
        input.consume(TokenKind::Symbol(Symbol::RightParen))?;

        Ok(SubroutineCall {
            receiver,
            name,
            args,
        })
    }
}

/// `(expression (, expression)*)?`
fn parse_expression_list(input: &mut TokenStream) -> Result<Vec<Expression>, ParseError> {
    let mut args = vec![];

    if input.peek_kind() == Some(TokenKind::Symbol(Symbol::RightParen)) {
        return Ok(args);
    }

    loop {
        args.push(Expression::parse(input)?);
        if !input.match_token(TokenKind::Symbol(Symbol::Comma)) {
            break;
        }
    }

    Ok(args)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lex::tokenize;

    fn parse_expr(source: &str) -> Expression {
        let mut input = TokenStream::new(tokenize(source).unwrap());
        let expr = Expression::parse(&mut input).unwrap();
        assert!(input.at_end(), "unconsumed tokens in {source:?}");
        expr
    }

    #[test]
    fn test_flat_chain() {
        let expr = parse_expr("1 + 2 * 3");
        assert_eq!(expr.first, Term::IntLiteral(1));
        assert_eq!(
            expr.rest,
            vec![
                (BinaryOp::Add, Term::IntLiteral(2)),
                (BinaryOp::Mul, Term::IntLiteral(3)),
            ]
        );
    }

    #[test]
    fn test_unary_binds_to_term() {
        let expr = parse_expr("-x - 1");
        assert_eq!(
            expr.first,
            Term::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(Term::VarRef("x".into())),
            }
        );
        assert_eq!(expr.rest, vec![(BinaryOp::Sub, Term::IntLiteral(1))]);
    }

    #[test]
    fn test_term_disambiguation() {
        assert_eq!(parse_expr("a").first, Term::VarRef("a".into()));
        assert!(matches!(
            parse_expr("a[i + 1]").first,
            Term::IndexedVarRef { ref name, .. } if name == "a"
        ));
        assert_eq!(
            parse_expr("draw()").first,
            Term::Call(SubroutineCall {
                receiver: None,
                name: "draw".into(),
                args: vec![],
            })
        );
        assert_eq!(
            parse_expr("Math.max(a, (b))").first,
            Term::Call(SubroutineCall {
                receiver: Some("Math".into()),
                name: "max".into(),
                args: vec![
                    Expression::term(Term::VarRef("a".into())),
                    Expression::term(Term::Paren(Box::new(Expression::term(Term::VarRef(
                        "b".into()
                    ))))),
                ],
            })
        );
    }

    #[test]
    fn test_keyword_constants() {
        assert_eq!(parse_expr("null").first, Term::KeywordConst(KeywordConst::Null));
        assert_eq!(parse_expr("this").first, Term::KeywordConst(KeywordConst::This));

        let mut input = TokenStream::new(tokenize("while").unwrap());
        let err = Term::parse(&mut input).unwrap_err();
        assert_eq!(err.expected, "term");
    }

    #[test]
    fn test_stops_at_non_operator() {
        let mut input = TokenStream::new(tokenize("x + 1)").unwrap());
        let expr = Expression::parse(&mut input).unwrap();
        assert_eq!(expr.rest.len(), 1);
        assert_eq!(
            input.peek_kind(),
            Some(TokenKind::Symbol(Symbol::RightParen))
        );
    }
}

//! Recursive-descent parser producing the syntax tree of one class.
mod class;
mod expr;
mod stmts;
mod subroutine;

pub use class::*;
pub use expr::*;
pub use stmts::*;
pub use subroutine::*;

use crate::{error::ParseError, token_stream::TokenStream, tokens::Token};

pub trait Parse: Sized {
    /// Either `Self`, or `Option<Self>` for nodes that are allowed
    /// to be absent because the lookahead lives in the node itself.
    type Output;

    fn parse(input: &mut TokenStream) -> Result<Self::Output, ParseError>;
}

/// Parse exactly one class from a token sequence.
///
/// Every token must belong to the class; trailing tokens are an error.
pub fn parse_class(tokens: Vec<Token>) -> Result<ClassDecl, ParseError> {
    let mut input = TokenStream::new(tokens);
    let class = ClassDecl::parse(&mut input)?;

    if !input.at_end() {
        return Err(input.error("end of source after class body"));
    }

    log::trace!(
        "parsed class '{}' with {} subroutines",
        class.name,
        class.subroutines.len()
    );

    Ok(class)
}

mod combinators;
mod grammar;
mod state;

pub use combinators::*;
pub use grammar::*;
pub use state::{MAX_EXPRESSION_DEPTH, ParseError, ParseResult, ParseState, Parser};

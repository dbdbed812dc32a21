//! Grammar for the quill language
//!
//! The parsing rules are organized by category:
//! - `literal`: identifiers, integers, strings, booleans
//! - `expression`: arithmetic, negation, grouping, calls
//! - `statement`: definitions, returns, conditionals, blocks

mod expression;
mod literal;
mod statement;

use crate::ast::{FunctionDefinition, Param, Program};
use crate::lexer::Token;

use super::combinators::{BoxedParser, comma_separated, expect_fn, expect_lparen, expect_rparen};
use super::state::{ParseError, ParseState, Parser};

pub use expression::expression;
pub use statement::{block, statement};

use literal::ident;

/// param := type ident
fn param() -> BoxedParser<Param> {
    (ident().label("parameter type") + ident().label("parameter name"))
        >> |(ty, name)| Param { name, ty }
}

/// function := "fn" type ident "(" [param ("," param)*] ")" block
pub fn function() -> BoxedParser<FunctionDefinition> {
    BoxedParser::new(|state: &mut ParseState| {
        let start = expect_fn().parse(state)?.pos();
        let return_type = ident().label("return type").parse(state)?;
        let name = ident().label("function name").parse(state)?;
        let params = (expect_lparen() * comma_separated(param()) - expect_rparen()).parse(state)?;
        let body = block().parse(state)?;

        Ok(FunctionDefinition {
            position: start.merge(&body.position),
            name,
            return_type,
            params,
            body,
        })
    })
}

/// Skip tokens until we reach what looks like a new function definition or end of input
fn skip_to_next_function(state: &mut ParseState) {
    // Skip current token first to make progress
    state.advance();

    while let Some(tok) = state.peek() {
        if matches!(tok, Token::Fn(_)) {
            break;
        }
        state.advance();
    }
}

/// program := function*
/// With error recovery: if a function fails to parse, skip to the next one
pub fn program() -> BoxedParser<Program> {
    BoxedParser::new(|state: &mut ParseState| {
        let mut functions = Vec::new();

        while state.has_next() {
            let pos = state.position();
            match function().parse(state) {
                Ok(f) => functions.push(f),
                Err(err) => {
                    if state.get_furthest_error().is_none() {
                        state.record_error(err);
                    }
                    state.commit_furthest_error();
                    state.restore(pos);
                    skip_to_next_function(state);
                }
            }
        }

        Ok(Program {
            functions,
            node_count: state.node_count(),
        })
    })
}

/// Parse a complete program from the token stream.
///
/// Returns the program only when no errors were collected.
pub fn parse(state: &mut ParseState) -> (Option<Program>, Vec<ParseError>) {
    let result = program().parse(state);

    let program = match result {
        Ok(prog) => Some(prog),
        Err(err) => {
            state.collect_error(err);
            None
        }
    };

    let errors = state.take_errors();
    if errors.is_empty() {
        (program, errors)
    } else {
        (None, errors)
    }
}

//! Literal parsers

use crate::ast::expression::{Boolean, Ident, Integer, StringLiteral};
use crate::lexer::Token;

use crate::parser::state::{ParseError, ParseResult, ParseState};
use crate::parser::combinators::BoxedParser;

fn unexpected(state: &mut ParseState, expected: &'static str) -> ParseError {
    let err = match state.peek() {
        Some(tok) => ParseError::new("unexpected token")
            .expected(expected)
            .found(tok.describe())
            .at(tok.pos()),
        None => ParseError::new("unexpected end of input").expected(expected),
    };
    state.record_error(err.clone());
    err
}

/// Parse an identifier
pub fn ident() -> BoxedParser<Ident> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::Ident(_)) => match state.advance() {
            Some(Token::Ident(id)) => Ok(Ident {
                value: id.value,
                position: id.position,
            }),
            _ => unreachable!("peeked an identifier"),
        },
        _ => Err(unexpected(state, "identifier")),
    })
}

/// Parse an integer literal
pub fn integer() -> BoxedParser<Integer> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::Integer(_)) => match state.advance() {
            Some(Token::Integer(int)) => {
                let value = int.value.parse().map_err(|_| {
                    ParseError::new("integer literal out of range")
                        .found(format!("integer '{}'", int.value))
                        .at(int.position.clone())
                })?;
                Ok(Integer {
                    value,
                    position: int.position,
                })
            }
            _ => unreachable!("peeked an integer"),
        },
        _ => Err(unexpected(state, "integer")),
    })
}

/// Parse a string literal, stripping the quotes and decoding escapes
pub fn string_literal() -> BoxedParser<StringLiteral> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::StringLiteral(_)) => match state.advance() {
            Some(Token::StringLiteral(s)) => {
                let raw = s
                    .value
                    .strip_prefix('"')
                    .and_then(|v| v.strip_suffix('"'))
                    .unwrap_or(&s.value);
                Ok(StringLiteral {
                    value: unescape(raw),
                    position: s.position,
                })
            }
            _ => unreachable!("peeked a string literal"),
        },
        _ => Err(unexpected(state, "string")),
    })
}

/// Parse `true` or `false`
pub fn boolean() -> BoxedParser<Boolean> {
    BoxedParser::new(|state: &mut ParseState| -> ParseResult<Boolean> {
        let value = match state.peek() {
            Some(Token::True(_)) => true,
            Some(Token::False(_)) => false,
            _ => return Err(unexpected(state, "boolean")),
        };
        let position = state
            .advance()
            .map(|tok| tok.pos())
            .unwrap_or_default();
        Ok(Boolean { value, position })
    })
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }

    out
}

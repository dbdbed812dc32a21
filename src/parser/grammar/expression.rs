//! Expression parsers

use crate::ast::expression::{
    BinOpKind, BinaryOp, Expression, FunctionCall, Group, UnaryOp, UnaryOpKind,
};
use crate::lexer::Token;

use crate::parser::combinators::{
    BoxedParser, comma_separated, expect_lparen, expect_minus, expect_plus, expect_rparen,
};
use crate::parser::state::{ParseResult, ParseState, Parser};

use super::literal::{boolean, ident, integer, string_literal};

/// group := "(" expression ")"
fn group() -> BoxedParser<Expression> {
    BoxedParser::new(|state: &mut ParseState| {
        let open = expect_lparen().parse(state)?.pos();
        let inner = expression().parse(state)?;
        let close = expect_rparen().parse(state)?.pos();
        Ok(Expression::Group(Group {
            inner: Box::new(inner),
            position: open.merge(&close),
        }))
    })
}

/// primary := integer | string | boolean | ident | group
pub fn primary() -> BoxedParser<Expression> {
    let int_expr = integer() >> Expression::Integer;
    let str_expr = string_literal() >> Expression::String;
    let bool_expr = boolean() >> Expression::Boolean;
    let ident_expr = ident() >> Expression::Ident;

    (int_expr | str_expr | bool_expr | ident_expr | group()).label("expression")
}

/// call_suffix := "(" [expression ("," expression)*] ")"
fn call_suffix() -> BoxedParser<(Vec<Expression>, lachs::Span)> {
    (expect_lparen() * comma_separated(expression())) + (expect_rparen() >> |tok: Token| tok.pos())
}

/// postfix := primary call_suffix*
///
/// Each call suffix wraps the callee one level deeper, so it counts toward
/// the nesting limit.
fn postfix() -> BoxedParser<Expression> {
    BoxedParser::new(|state: &mut ParseState| {
        let mut callee = primary().parse(state)?;
        let mut levels = 0;

        let result = loop {
            if !matches!(state.peek(), Some(Token::LParen(_))) {
                break Ok(callee);
            }
            if let Err(err) = state.enter_nested() {
                break Err(err);
            }
            levels += 1;

            let pos = state.position();
            match call_suffix().parse(state) {
                Ok((args, close)) => {
                    let position = callee.position().merge(&close);
                    callee = Expression::FunctionCall(FunctionCall {
                        func: Box::new(callee),
                        args,
                        position,
                    });
                }
                Err(_) => {
                    state.restore(pos);
                    break Ok(callee);
                }
            }
        };

        leave_levels(state, levels);
        result
    })
}

/// unary := "-" unary | postfix
pub fn unary() -> BoxedParser<Expression> {
    BoxedParser::new(|state: &mut ParseState| {
        if !matches!(state.peek(), Some(Token::Minus(_))) {
            return postfix().parse(state);
        }

        let start = expect_minus().parse(state)?.pos();
        state.enter_nested()?;
        let operand = unary().parse(state);
        state.leave_nested();
        let operand = operand?;

        let position = start.merge(operand.position());
        Ok(Expression::UnaryOp(UnaryOp {
            op: UnaryOpKind::Negate,
            operand: Box::new(operand),
            position,
        }))
    })
}

fn binary_operator() -> BoxedParser<BinOpKind> {
    (expect_plus() >> |_| BinOpKind::Add) | (expect_minus() >> |_| BinOpKind::Sub)
}

/// expression := unary (("+" | "-") unary)*
pub fn expression() -> BoxedParser<Expression> {
    BoxedParser::new(|state: &mut ParseState| {
        state.enter_nested()?;
        let result = operator_chain(state);
        state.leave_nested();
        result
    })
}

/// Left fold of `unary (op unary)*`. Every folded operator nests the tree
/// one level deeper and is charged against the nesting limit.
fn operator_chain(state: &mut ParseState) -> ParseResult<Expression> {
    let mut left = unary().parse(state)?;
    let mut levels = 0;

    let result = loop {
        let pos = state.position();
        let Ok(op) = binary_operator().parse(state) else {
            state.restore(pos);
            break Ok(left);
        };
        if let Err(err) = state.enter_nested() {
            break Err(err);
        }
        levels += 1;

        match unary().parse(state) {
            Ok(right) => {
                let position = left.position().merge(right.position());
                left = Expression::BinaryOp(BinaryOp {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                    position,
                });
            }
            Err(_) => {
                state.restore(pos);
                break Ok(left);
            }
        }
    };

    leave_levels(state, levels);
    result
}

fn leave_levels(state: &mut ParseState, levels: usize) {
    for _ in 0..levels {
        state.leave_nested();
    }
}

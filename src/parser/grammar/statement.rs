//! Statement and block parsers

use crate::ast::statement::{CodeBlock, Conditional, Statement, StatementKind, VariableDefinition};
use crate::lexer::Token;

use crate::parser::combinators::{
    BoxedParser, expect_equals, expect_if, expect_lbrace, expect_let, expect_lparen,
    expect_rbrace, expect_return, expect_rparen, expect_semicolon, optional,
};
use crate::parser::state::{ParseResult, ParseState, Parser};

use super::expression::expression;
use super::literal::ident;

/// let := "let" ident "=" expression ";"
fn variable_definition() -> BoxedParser<Statement> {
    BoxedParser::new(|state: &mut ParseState| {
        let start = expect_let().parse(state)?.pos();
        let (name, value) = ((ident().label("variable name") - expect_equals()) + expression())
            .parse(state)?;
        let end = expect_semicolon().parse(state)?.pos();

        Ok(Statement {
            id: state.next_node_id(),
            kind: StatementKind::VariableDefinition(VariableDefinition {
                name,
                value: Box::new(value),
            }),
            position: start.merge(&end),
        })
    })
}

/// return := "return" [expression] ";"
fn block_return() -> BoxedParser<Statement> {
    BoxedParser::new(|state: &mut ParseState| {
        let start = expect_return().parse(state)?.pos();
        let value = optional(expression()).parse(state)?;
        let end = expect_semicolon().parse(state)?.pos();

        Ok(Statement {
            id: state.next_node_id(),
            kind: StatementKind::Return(value),
            position: start.merge(&end),
        })
    })
}

/// if := "if" "(" expression ")" block
fn conditional() -> BoxedParser<Statement> {
    BoxedParser::new(|state: &mut ParseState| {
        let start = expect_if().parse(state)?.pos();
        let condition = (expect_lparen() * expression() - expect_rparen()).parse(state)?;
        let condition = Statement {
            id: state.next_node_id(),
            position: condition.position().clone(),
            kind: StatementKind::Expression(condition),
        };
        let then_block = block().parse(state)?;

        Ok(Statement {
            id: state.next_node_id(),
            position: start.merge(&then_block.position),
            kind: StatementKind::Conditional(Conditional {
                condition: Box::new(condition),
                then_block,
            }),
        })
    })
}

/// expression_statement := expression ";"
fn expression_statement() -> BoxedParser<Statement> {
    BoxedParser::new(|state: &mut ParseState| {
        let expr = expression().parse(state)?;
        let end = expect_semicolon().parse(state)?.pos();

        Ok(Statement {
            id: state.next_node_id(),
            position: expr.position().merge(&end),
            kind: StatementKind::Expression(expr),
        })
    })
}

/// statement := return | let | if | block | expression ";"
pub fn statement() -> BoxedParser<Statement> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::Return(_)) => block_return().parse(state),
        Some(Token::Let(_)) => variable_definition().parse(state),
        Some(Token::If(_)) => conditional().parse(state),
        Some(Token::LBrace(_)) => {
            let inner = block().parse(state)?;
            Ok(Statement {
                id: state.next_node_id(),
                position: inner.position.clone(),
                kind: StatementKind::Block(inner),
            })
        }
        _ => expression_statement().parse(state),
    })
}

/// block := "{" statement* "}"
///
/// A `return` statement must be the last statement of its block.
pub fn block() -> BoxedParser<CodeBlock> {
    BoxedParser::new(|state: &mut ParseState| {
        let start = expect_lbrace().parse(state)?.pos();
        state.enter_nested()?;
        let statements = block_statements(state);
        state.leave_nested();
        let statements = statements?;
        let end = expect_rbrace().parse(state)?.pos();

        Ok(CodeBlock {
            statements,
            position: start.merge(&end),
        })
    })
}

fn block_statements(state: &mut ParseState) -> ParseResult<Vec<Statement>> {
    let mut statements = Vec::new();

    while state.has_next() && !matches!(state.peek(), Some(Token::RBrace(_))) {
        let stmt = statement().parse(state)?;
        let is_return = matches!(stmt.kind, StatementKind::Return(_));
        statements.push(stmt);
        if is_return {
            break;
        }
    }

    Ok(statements)
}

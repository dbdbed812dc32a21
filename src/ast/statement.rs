use lachs::Span;

use super::NodeId;
use crate::ast::expression::{Expression, Ident};

#[derive(Debug, Clone)]
pub struct CodeBlock {
    pub statements: Vec<Statement>,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct Statement {
    pub id: NodeId,
    pub kind: StatementKind,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub enum StatementKind {
    Expression(Expression),
    VariableDefinition(VariableDefinition),
    /// `return;` or `return <expr>;`
    Return(Option<Expression>),
    Conditional(Conditional),
    /// A bare nested `{ ... }` block.
    Block(CodeBlock),
}

/// `let <name> = <value>;`
#[derive(Debug, Clone)]
pub struct VariableDefinition {
    pub name: Ident,
    pub value: Box<Expression>,
}

/// `if (<condition>) { ... }`
///
/// The condition is wrapped in its own expression statement so it gets a
/// [`NodeId`] like any other checked node.
#[derive(Debug, Clone)]
pub struct Conditional {
    pub condition: Box<Statement>,
    pub then_block: CodeBlock,
}

//! Surface syntax tree produced by the parser.
//!
//! Every statement carries a [`NodeId`] that is unique within one parsed
//! [`Program`]. The type checker keys its annotations by these ids instead of
//! holding references into the tree, so the tree stays owned by the caller.

use lachs::Span;

use crate::ast::expression::Ident;

pub mod expression;
pub mod statement;

use statement::CodeBlock;

/// Stable identifier of a statement node, assigned in parse order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub struct Program {
    pub functions: Vec<FunctionDefinition>,
    /// Number of [`NodeId`]s handed out while parsing this program.
    pub node_count: u32,
}

impl Program {
    pub fn function(&self, name: &str) -> Option<&FunctionDefinition> {
        self.functions.iter().find(|f| f.name.value == name)
    }
}

/// `fn <return type> <name>(<type> <param>, ...) { ... }`
#[derive(Debug, Clone)]
pub struct FunctionDefinition {
    pub name: Ident,
    pub return_type: Ident,
    pub params: Vec<Param>,
    pub body: CodeBlock,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: Ident,
    pub ty: Ident,
}

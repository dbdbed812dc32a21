//! Lowering of surface statements into [`InferExpr`].
//!
//! ```text
//! 5, "s", true          => int, string, bool
//! -e, (e)               => e
//! x                     => <mangled x>
//! return;               => unit
//! return e;             => let ret = e in ret
//! let x = e;            => e            (x registered in the scope)
//! a + b, a - b          => int_add a b, int_sub a b
//! f(a, b)               => f a b
//! f(a) with cont        => let _letN = f a in cont
//! ```
//!
//! Conditionals and bare blocks have no IR form; the checker walks
//! conditionals itself and rejects bare blocks.

use crate::ast::expression::{BinOpKind, Expression};
use crate::ast::statement::{Statement, StatementKind};

use super::error::CheckFailure;
use super::expr::InferExpr;
use super::scope::{ScopeId, ScopeTree};
use super::ty::{BOOL, INT, INT_ADD, INT_SUB, STRING, UNIT};

/// Counter for synthetic names (`if{N}` scopes, `_let{N}` bindings).
///
/// Shared by everything in one `check` run and never reset, so no two
/// synthetic names of that run collide.
#[derive(Debug, Default)]
pub struct TransientNames {
    next: usize,
}

impl TransientNames {
    pub fn new() -> Self {
        TransientNames { next: 0 }
    }

    pub fn next(&mut self, prefix: &str) -> String {
        self.next += 1;
        format!("{prefix}{}", self.next)
    }
}

pub struct Translator<'a> {
    scopes: &'a mut ScopeTree,
    transient: &'a mut TransientNames,
}

impl<'a> Translator<'a> {
    pub fn new(scopes: &'a mut ScopeTree, transient: &'a mut TransientNames) -> Self {
        Translator { scopes, transient }
    }

    pub fn statement(
        &mut self,
        scope: ScopeId,
        statement: &Statement,
    ) -> Result<InferExpr, CheckFailure> {
        match &statement.kind {
            StatementKind::Expression(expr) => self.expression(scope, expr, None),
            StatementKind::Return(None) => Ok(InferExpr::var(UNIT)),
            StatementKind::Return(Some(expr)) => Ok(InferExpr::let_in(
                "ret",
                self.expression(scope, expr, None)?,
                InferExpr::var("ret"),
            )),
            StatementKind::VariableDefinition(def) => {
                self.scopes.add_unscoped_variable(scope, &def.name.value);
                self.expression(scope, &def.value, None)
            }
            StatementKind::Conditional(_) => {
                Err(CheckFailure::UnsupportedSyntax("conditional statement"))
            }
            StatementKind::Block(_) => Err(CheckFailure::UnsupportedSyntax("nested block")),
        }
    }

    /// Lower one expression. `continuation` is threaded down to calls, which
    /// sequence themselves ahead of it.
    pub fn expression(
        &mut self,
        scope: ScopeId,
        expr: &Expression,
        continuation: Option<&InferExpr>,
    ) -> Result<InferExpr, CheckFailure> {
        match expr {
            Expression::Integer(_) => Ok(InferExpr::var(INT)),
            Expression::String(_) => Ok(InferExpr::var(STRING)),
            Expression::Boolean(_) => Ok(InferExpr::var(BOOL)),
            Expression::Group(group) => self.expression(scope, &group.inner, continuation),
            Expression::UnaryOp(unary) => self.expression(scope, &unary.operand, continuation),
            Expression::Ident(ident) => Ok(InferExpr::Variable(self.variable(scope, &ident.value))),
            Expression::BinaryOp(binop) => {
                let operator = match binop.op {
                    BinOpKind::Add => INT_ADD,
                    BinOpKind::Sub => INT_SUB,
                };
                let left = self.expression(scope, &binop.left, continuation)?;
                let right = self.expression(scope, &binop.right, continuation)?;
                Ok(InferExpr::app(
                    InferExpr::app(InferExpr::var(operator), left),
                    right,
                ))
            }
            Expression::FunctionCall(call) => {
                let callee = match call.func.as_ref() {
                    Expression::Group(group) => group.inner.as_ref(),
                    other => other,
                };

                let mut application = match callee {
                    Expression::Ident(ident) => {
                        InferExpr::Variable(self.variable(scope, &ident.value))
                    }
                    Expression::FunctionCall(_) => self.expression(scope, callee, continuation)?,
                    _ => {
                        return Err(CheckFailure::UnsupportedSyntax(
                            "call on a non-function expression",
                        ));
                    }
                };

                for arg in &call.args {
                    let arg = self.expression(scope, arg, continuation)?;
                    application = InferExpr::app(application, arg);
                }

                match continuation {
                    None => Ok(application),
                    Some(cont) => Ok(InferExpr::let_in(
                        self.transient.next("_let"),
                        application,
                        cont.clone(),
                    )),
                }
            }
        }
    }

    fn variable(&self, scope: ScopeId, identifier: &str) -> String {
        self.scopes
            .get_scoped_variable(scope, identifier)
            .unwrap_or_else(|| self.scopes.as_unregistered_scoped_variable(scope, identifier))
    }
}

//! Lowering of a checked [`Program`] into stack bytecode.
//!
//! Types are not needed to emit code; the checker's output is only consulted
//! to confirm that call targets exist.

use lachs::Span;
use thiserror::Error;
use tracing::debug;

use crate::ast::expression::{BinOpKind, Expression, UnaryOpKind};
use crate::ast::statement::{CodeBlock, Statement, StatementKind};
use crate::ast::{FunctionDefinition, Program};
use crate::stdlib::StandardFunction;
use crate::types::TypeCheckOutput;

use super::codec::Encoder;
use super::instruction::Instruction;
use super::module::{CompiledFunction, Module};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("{}", unknown_function(.name, .span))]
    UnknownFunction { name: String, span: Span },
    #[error("{}", located(.span, "only named functions can be called"))]
    UnsupportedCallee { span: Span },
}

fn unknown_function(name: &str, span: &Span) -> String {
    located(span, &format!("unknown function '{name}'"))
}

/// Renders `msg` against the source line of `span` when there is one.
fn located(span: &Span, msg: &str) -> String {
    if span.source.is_empty() {
        format!("compile error: {msg}")
    } else {
        span.to_string(msg)
    }
}

pub fn compile(program: &Program, checked: &TypeCheckOutput) -> Result<Module, CompileError> {
    let functions = program
        .functions
        .iter()
        .map(|function| FunctionCompiler::new(program, checked).compile(function))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Module { functions })
}

struct FunctionCompiler<'a> {
    program: &'a Program,
    checked: &'a TypeCheckOutput,
    enc: Encoder,
}

impl<'a> FunctionCompiler<'a> {
    fn new(program: &'a Program, checked: &'a TypeCheckOutput) -> Self {
        FunctionCompiler {
            program,
            checked,
            enc: Encoder::new(),
        }
    }

    fn compile(mut self, function: &FunctionDefinition) -> Result<CompiledFunction, CompileError> {
        let returned = self.block(&function.body)?;
        if !returned {
            self.emit(Instruction::PushUnit);
            self.emit(Instruction::Ret);
        }

        let code = self.enc.finish();
        debug!(function = %function.name.value, bytes = code.len(), "compiled function");

        Ok(CompiledFunction {
            name: function.name.value.clone(),
            params: function.params.iter().map(|p| p.name.value.clone()).collect(),
            code,
        })
    }

    fn emit(&mut self, inst: Instruction) {
        inst.encode(&mut self.enc);
    }

    /// Compile a statement list; `true` when it ends in a `return`.
    fn block(&mut self, block: &CodeBlock) -> Result<bool, CompileError> {
        let mut returned = false;
        for statement in &block.statements {
            returned = self.statement(statement)?;
        }
        Ok(returned)
    }

    fn scoped_block(&mut self, block: &CodeBlock) -> Result<(), CompileError> {
        self.emit(Instruction::EnterScope);
        let returned = self.block(block)?;
        if !returned {
            self.emit(Instruction::LeaveScope);
        }
        Ok(())
    }

    fn statement(&mut self, statement: &Statement) -> Result<bool, CompileError> {
        match &statement.kind {
            StatementKind::Expression(expr) => {
                self.expression(expr)?;
                self.emit(Instruction::Pop);
            }
            StatementKind::VariableDefinition(def) => {
                self.expression(&def.value)?;
                self.emit(Instruction::Let(def.name.value.clone()));
            }
            StatementKind::Return(value) => {
                match value {
                    Some(expr) => self.expression(expr)?,
                    None => self.emit(Instruction::PushUnit),
                }
                self.emit(Instruction::Ret);
                return Ok(true);
            }
            StatementKind::Conditional(conditional) => {
                self.statement_value(&conditional.condition)?;

                self.emit(Instruction::JumpIfFalse(0));
                let operand = self.enc.len() - 8;

                self.scoped_block(&conditional.then_block)?;
                self.enc.patch_u64(operand, self.enc.len() as u64);
            }
            StatementKind::Block(block) => self.scoped_block(block)?,
        }
        Ok(false)
    }

    /// The condition of an `if` is stored as an expression statement, but
    /// its value is consumed by the jump rather than popped.
    fn statement_value(&mut self, statement: &Statement) -> Result<(), CompileError> {
        match &statement.kind {
            StatementKind::Expression(expr) => self.expression(expr),
            _ => {
                self.statement(statement)?;
                self.emit(Instruction::PushUnit);
                Ok(())
            }
        }
    }

    fn expression(&mut self, expr: &Expression) -> Result<(), CompileError> {
        match expr {
            Expression::Integer(int) => self.emit(Instruction::PushInt(int.value)),
            Expression::String(s) => self.emit(Instruction::PushString(s.value.clone())),
            Expression::Boolean(b) => self.emit(Instruction::PushBool(b.value)),
            Expression::Ident(ident) => self.emit(Instruction::Load(ident.value.clone())),
            Expression::Group(group) => self.expression(&group.inner)?,
            Expression::UnaryOp(unary) => {
                self.expression(&unary.operand)?;
                match unary.op {
                    UnaryOpKind::Negate => self.emit(Instruction::Neg),
                }
            }
            Expression::BinaryOp(binop) => {
                self.expression(&binop.left)?;
                self.expression(&binop.right)?;
                self.emit(match binop.op {
                    BinOpKind::Add => Instruction::Add,
                    BinOpKind::Sub => Instruction::Sub,
                });
            }
            Expression::FunctionCall(call) => {
                let callee = match call.func.as_ref() {
                    Expression::Group(group) => group.inner.as_ref(),
                    other => other,
                };
                let Expression::Ident(ident) = callee else {
                    return Err(CompileError::UnsupportedCallee {
                        span: call.position.clone(),
                    });
                };
                if !self.is_known_function(&ident.value) {
                    return Err(CompileError::UnknownFunction {
                        name: ident.value.clone(),
                        span: ident.position.clone(),
                    });
                }

                for arg in &call.args {
                    self.expression(arg)?;
                }
                self.emit(Instruction::Call(ident.value.clone()));
            }
        }
        Ok(())
    }

    fn is_known_function(&self, name: &str) -> bool {
        let declared = self.program.function(name).is_some()
            || StandardFunction::from_name(name).is_some();
        declared && self.checked.context.contains(name)
    }
}

use std::collections::HashMap;

use crate::bytecode::CompiledFunction;

use super::value::Value;

type LocalScope = HashMap<String, Value>;

/// Lexically nested locals of one call, innermost last.
#[derive(Debug)]
pub struct Locals {
    scopes: Vec<LocalScope>,
}

impl Locals {
    /// One scope holding the call's parameters.
    pub fn new(params: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            scopes: vec![params.into_iter().collect()],
        }
    }

    pub fn enter(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Leave the innermost scope. The parameter scope is never left; returns
    /// `false` when asked to.
    pub fn leave(&mut self) -> bool {
        if self.scopes.len() > 1 {
            self.scopes.pop();
            true
        } else {
            false
        }
    }

    /// Resolve a name by searching from innermost to outermost scope
    pub fn resolve(&self, name: &str) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Add a binding to the innermost scope
    pub fn add(&mut self, name: impl ToString, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), value);
        }
    }
}

/// Activation record of a user function.
#[derive(Debug)]
pub struct Frame<'m> {
    pub function: &'m CompiledFunction,
    pub pc: usize,
    /// Operand stack height when the call started.
    pub stack_base: usize,
    pub locals: Locals,
}

use std::collections::HashMap;

use super::error::{CheckFailure, InferError};
use super::subst::Substitution;
use super::ty::Type;

/// Name -> monotype environment threaded through one `check` call.
///
/// Names are either plain source identifiers (built-ins, function names) or
/// scope-mangled identifiers such as `main::x`. The context stores monotypes
/// only; there are no quantified schemes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    bindings: HashMap<String, Type>,
}

impl Context {
    pub fn empty() -> Self {
        Context {
            bindings: HashMap::new(),
        }
    }

    pub fn with_bindings(bindings: Vec<(String, Type)>) -> Self {
        Context {
            bindings: bindings.into_iter().collect(),
        }
    }

    /// Insert or overwrite a binding.
    pub fn bind(&mut self, name: impl Into<String>, ty: Type) {
        self.bindings.insert(name.into(), ty);
    }

    pub fn get(&self, name: &str) -> Option<&Type> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Inference lookup.
    pub fn lookup(&self, name: &str) -> Result<&Type, InferError> {
        self.bindings
            .get(name)
            .ok_or_else(|| InferError::UnboundVariable(name.to_string()))
    }

    /// Turn a declared type name into its monotype. Only names bound to their
    /// own atomic type (`int` -> `int`) count as type names.
    pub fn resolve(&self, name: &str) -> Result<Type, CheckFailure> {
        self.bindings
            .get(name)
            .filter(|ty| **ty == Type::atom(name))
            .cloned()
            .ok_or_else(|| CheckFailure::UnknownTypeName(name.to_string()))
    }

    /// Copy of this context with one more binding.
    pub fn extend(&self, name: impl Into<String>, ty: Type) -> Context {
        let mut extended = self.clone();
        extended.bind(name, ty);
        extended
    }

    pub fn apply_subst(&self, subst: &Substitution) -> Context {
        if subst.is_empty() {
            return self.clone();
        }

        Context {
            bindings: self
                .bindings
                .iter()
                .map(|(name, ty)| (name.clone(), subst.apply(ty)))
                .collect(),
        }
    }

    /// Bindings sorted by name.
    pub fn sorted(&self) -> Vec<(&str, &Type)> {
        let mut entries: Vec<_> = self
            .bindings
            .iter()
            .map(|(name, ty)| (name.as_str(), ty))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

//! The inference driver.
//!
//! `check` walks a parsed [`Program`] in three passes: built-in function
//! signatures, user function signatures, then user function bodies. Bodies
//! are checked statement by statement, each statement translated to an
//! [`InferExpr`](super::InferExpr) and inferred on its own against the
//! shared [`Context`].

use lachs::Span;
use tracing::{debug, trace};

use crate::ast::statement::{Statement, StatementKind};
use crate::ast::{FunctionDefinition, NodeId, Program};
use crate::stdlib::StandardFunction;

use super::env::Context;
use super::error::{CheckFailure, FailedTypeCheck};
use super::infer::Infer;
use super::scope::{ScopeId, ScopeTree};
use super::translate::{TransientNames, Translator};
use super::ty::{BOOL, INT, INT_ADD, INT_SUB, STRING, Type, UNIT};

/// Inferred type per statement, indexed by [`NodeId`].
///
/// Statements that were never checked (e.g. anything after a `return`, or
/// conditionals themselves) have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationTable {
    types: Vec<Option<Type>>,
}

impl AnnotationTable {
    pub fn with_capacity(node_count: usize) -> Self {
        AnnotationTable {
            types: vec![None; node_count],
        }
    }

    pub fn record(&mut self, id: NodeId, ty: Type) {
        if id.index() >= self.types.len() {
            self.types.resize(id.index() + 1, None);
        }
        self.types[id.index()] = Some(ty);
    }

    pub fn get(&self, id: NodeId) -> Option<&Type> {
        self.types.get(id.index()).and_then(Option::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Type)> {
        self.types
            .iter()
            .enumerate()
            .filter_map(|(i, ty)| ty.as_ref().map(|ty| (NodeId(i as u32), ty)))
    }

    pub fn len(&self) -> usize {
        self.types.iter().filter(|ty| ty.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of a successful [`check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCheckOutput {
    pub annotations: AnnotationTable,
    pub context: Context,
}

/// Type check a whole program.
///
/// Every call starts from fresh state, so checking the same program twice
/// yields equal outputs. The first failure aborts the run.
pub fn check(program: &Program) -> Result<TypeCheckOutput, FailedTypeCheck> {
    let mut checker = Checker::new(program.node_count as usize);

    for function in StandardFunction::ALL {
        checker.register_standard_function(function)?;
    }

    for function in &program.functions {
        checker.register_signature(function)?;
    }

    for function in &program.functions {
        checker.check_function(function)?;
    }

    Ok(TypeCheckOutput {
        annotations: checker.annotations,
        context: checker.context,
    })
}

/// Context every run starts from: the atomic types bound to themselves, the
/// boolean literals, and the arithmetic operators.
pub fn builtin_context() -> Context {
    let int_op = Type::curried([Type::int(), Type::int()], Type::int());

    let mut context = Context::empty();
    for name in [STRING, INT, BOOL, UNIT] {
        context.bind(name, Type::atom(name));
    }
    context.bind("true", Type::bool());
    context.bind("false", Type::bool());
    context.bind(INT_ADD, int_op.clone());
    context.bind(INT_SUB, int_op);
    context
}

struct Checker {
    context: Context,
    annotations: AnnotationTable,
    infer: Infer,
    scopes: ScopeTree,
    transient: TransientNames,
}

impl Checker {
    fn new(node_count: usize) -> Self {
        Checker {
            context: builtin_context(),
            annotations: AnnotationTable::with_capacity(node_count),
            infer: Infer::new(),
            scopes: ScopeTree::new(),
            transient: TransientNames::new(),
        }
    }

    fn signature<'n>(
        &self,
        arguments: impl DoubleEndedIterator<Item = (&'n str, Span)>,
        return_type: (&str, Span),
    ) -> Result<Type, FailedTypeCheck> {
        let resolve = |(name, span): (&str, Span)| {
            self.context
                .resolve(name)
                .map_err(|cause| FailedTypeCheck::new(cause, span))
        };

        let ret = resolve(return_type)?;
        let args = arguments.map(resolve).collect::<Result<Vec<_>, _>>()?;
        Ok(Type::curried(args, ret))
    }

    fn register_standard_function(
        &mut self,
        function: StandardFunction,
    ) -> Result<(), FailedTypeCheck> {
        let arguments = function
            .arguments()
            .iter()
            .map(|name| (*name, Span::default()));
        let ty = self.signature(arguments, (function.return_type(), Span::default()))?;

        trace!(function = function.name(), %ty, "registered built-in function");
        self.bind_global(function.name(), ty);
        Ok(())
    }

    fn register_signature(&mut self, function: &FunctionDefinition) -> Result<(), FailedTypeCheck> {
        let arguments = function
            .params
            .iter()
            .map(|param| (param.ty.value.as_str(), param.ty.position.clone()));
        let return_type = (
            function.return_type.value.as_str(),
            function.return_type.position.clone(),
        );
        let ty = self.signature(arguments, return_type)?;

        debug!(function = %function.name.value, %ty, "registered function signature");
        self.bind_global(&function.name.value, ty);
        Ok(())
    }

    fn bind_global(&mut self, name: &str, ty: Type) {
        let root = self.scopes.root();
        self.scopes.add_unscoped_variable(root, name);
        self.context.bind(name, ty);
    }

    fn check_function(&mut self, function: &FunctionDefinition) -> Result<(), FailedTypeCheck> {
        debug!(function = %function.name.value, "checking function body");

        let scope = self
            .scopes
            .make_child_scope(self.scopes.root(), &function.name.value);

        let result = self
            .bind_params(scope, function)
            .and_then(|_| self.check_statements(scope, &function.body.statements));

        self.scopes.discard(scope);
        result
    }

    fn bind_params(
        &mut self,
        scope: ScopeId,
        function: &FunctionDefinition,
    ) -> Result<(), FailedTypeCheck> {
        for param in &function.params {
            let ty = self
                .context
                .resolve(&param.ty.value)
                .map_err(|cause| FailedTypeCheck::new(cause, param.ty.position.clone()))?;

            self.scopes.add_unscoped_variable(scope, &param.name.value);
            let name = self.scopes.as_unregistered_scoped_variable(scope, &param.name.value);
            self.context.bind(name, ty);
        }
        Ok(())
    }

    fn check_statements(
        &mut self,
        scope: ScopeId,
        statements: &[Statement],
    ) -> Result<(), FailedTypeCheck> {
        statements
            .iter()
            .try_for_each(|statement| self.check_statement(scope, statement))
    }

    fn check_statement(
        &mut self,
        scope: ScopeId,
        statement: &Statement,
    ) -> Result<(), FailedTypeCheck> {
        if let StatementKind::Conditional(conditional) = &statement.kind {
            self.check_statement(scope, &conditional.condition)?;

            let name = self.transient.next("if");
            let then_scope = self.scopes.make_child_scope(scope, &name);
            return self.check_statements(then_scope, &conditional.then_block.statements);
        }

        let fail = |cause: CheckFailure| FailedTypeCheck::new(cause, statement.position.clone());

        let expr = Translator::new(&mut self.scopes, &mut self.transient)
            .statement(scope, statement)
            .map_err(fail)?;

        let (_, ty) = self
            .infer
            .infer(&self.context, &expr)
            .map_err(|err| fail(err.into()))?;

        trace!(node = statement.id.0, %expr, %ty, "inferred statement");
        self.annotations.record(statement.id, ty);

        if let StatementKind::VariableDefinition(definition) = &statement.kind {
            let identifier = &definition.name.value;
            let name = self
                .scopes
                .get_scoped_variable(scope, identifier)
                .ok_or_else(|| fail(CheckFailure::InternalInconsistency(identifier.clone())))?;
            let ty = self
                .annotations
                .get(statement.id)
                .cloned()
                .ok_or_else(|| fail(CheckFailure::InternalInconsistency(identifier.clone())))?;

            self.context.bind(name, ty);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_context_resolves_atomic_types() {
        let context = builtin_context();
        for name in [STRING, INT, BOOL, UNIT] {
            assert_eq!(context.resolve(name), Ok(Type::atom(name)));
        }
        assert_eq!(context.get("true"), Some(&Type::bool()));
    }

    #[test]
    fn test_operators_are_not_type_names() {
        let context = builtin_context();
        assert!(matches!(
            context.resolve(INT_ADD),
            Err(CheckFailure::UnknownTypeName(_))
        ));
    }

    #[test]
    fn test_annotation_table_grows_on_demand() {
        let mut table = AnnotationTable::with_capacity(1);
        table.record(NodeId(4), Type::int());

        assert_eq!(table.get(NodeId(4)), Some(&Type::int()));
        assert_eq!(table.get(NodeId(0)), None);
        assert_eq!(table.get(NodeId(99)), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_annotation_table_iterates_in_id_order() {
        let mut table = AnnotationTable::default();
        table.record(NodeId(2), Type::string());
        table.record(NodeId(0), Type::int());

        let entries: Vec<_> = table.iter().map(|(id, ty)| (id.0, ty.clone())).collect();
        assert_eq!(entries, vec![(0, Type::int()), (2, Type::string())]);
    }
}

//! Monomorphic, unification-based type inference.
//!
//! The pipeline for one [`check`] call:
//!
//! 1. surface statements are lowered to [`InferExpr`] by the translator,
//!    with identifiers mangled by their declaring scope (`main::if1::x`)
//! 2. each expression is inferred against the shared [`Context`]
//! 3. the resulting type is recorded in the [`AnnotationTable`], and
//!    `let` statements bind their mangled name in the context
//!
//! There is no let-polymorphism: the context maps names to monotypes only.

pub mod check;
pub mod env;
pub mod error;
pub mod expr;
pub mod infer;
pub mod scope;
pub mod subst;
pub mod translate;
pub mod ty;
pub mod unify;

pub use check::{AnnotationTable, TypeCheckOutput, builtin_context, check};
pub use env::Context;
pub use error::{CheckFailure, FailedTypeCheck, InferError, UnifyError};
pub use expr::InferExpr;
pub use infer::Infer;
pub use scope::{ScopeId, ScopeTree};
pub use subst::Substitution;
pub use ty::{Type, TypeVar};
pub use unify::unify;

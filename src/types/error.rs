//! # Type Error Definitions
//!
//! Errors are layered the same way the checker is:
//!
//! - [`UnifyError`] - two monotypes could not be made equal
//! - [`InferError`] - failure of one inference call (unbound name or a
//!   unification failure)
//! - [`CheckFailure`] - everything the driver can run into, including
//!   translation and type-name resolution problems
//! - [`FailedTypeCheck`] - the single outward-facing error, pairing the cause
//!   with the position of the surface node being checked
//!
//! ## Example Error Messages
//!
//! ```text
//! failed type check: type mismatch: expected int, found string
//! failed type check: unbound variable: main::y
//! failed type check: unknown type name: float
//! ```

use std::fmt;

use lachs::Span;
use thiserror::Error;

use super::ty::{Type, TypeVar};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnifyError {
    #[error("type mismatch: expected {expected}, found {found}")]
    Mismatch { expected: Type, found: Type },
    #[error("cannot construct infinite type: {var} = {ty}")]
    OccursCheck { var: TypeVar, ty: Type },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferError {
    /// Covers undeclared identifiers as well as placeholder names fabricated
    /// by a scope lookup miss.
    #[error("unbound variable: {0}")]
    UnboundVariable(String),
    #[error(transparent)]
    Unify(#[from] UnifyError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckFailure {
    #[error(transparent)]
    Inference(#[from] InferError),
    #[error("unknown type name: {0}")]
    UnknownTypeName(String),
    #[error("unsupported syntax for inference: {0}")]
    UnsupportedSyntax(&'static str),
    #[error("internal inconsistency: no type recorded for variable '{0}'")]
    InternalInconsistency(String),
}

/// A failed `check` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedTypeCheck {
    pub cause: CheckFailure,
    /// Position of the surface node that was being checked.
    pub span: Span,
}

impl FailedTypeCheck {
    pub fn new(cause: impl Into<CheckFailure>, span: Span) -> Self {
        Self {
            cause: cause.into(),
            span,
        }
    }
}

impl fmt::Display for FailedTypeCheck {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = format!("failed type check: {}", self.cause);
        if self.span.source.is_empty() {
            write!(f, "{}", msg)
        } else {
            write!(f, "{}", self.span.to_string(&msg))
        }
    }
}

impl std::error::Error for FailedTypeCheck {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

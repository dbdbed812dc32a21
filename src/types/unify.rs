use super::error::UnifyError;
use super::subst::Substitution;
use super::ty::{Type, TypeVar};

/// Check if a type variable occurs within a type (occurs check).
///
/// Binding `'t0` to `'t0 -> int` would describe an infinite type, so
/// unification refuses any binding whose right-hand side mentions the
/// variable being bound.
///
/// ```text
/// occurs_in('t0, int) = false
/// occurs_in('t0, 't0) = true
/// occurs_in('t0, 't0 -> int) = true
/// occurs_in('t0, 't1 -> 't2) = false
/// ```
fn occurs_in(var: &TypeVar, ty: &Type) -> bool {
    match ty {
        Type::Var(v) => v == var,
        Type::App { arguments, .. } => arguments.iter().any(|arg| occurs_in(var, arg)),
    }
}

fn bind(var: &TypeVar, ty: &Type) -> Result<Substitution, UnifyError> {
    if occurs_in(var, ty) {
        Err(UnifyError::OccursCheck {
            var: var.clone(),
            ty: ty.clone(),
        })
    } else {
        Ok(Substitution::singleton(var.clone(), ty.clone()))
    }
}

/// Unify two types, finding a substitution that makes them equal.
///
/// # Algorithm
///
/// ```text
/// Unify(int, int) = ∅
/// Unify(int, string) = Mismatch
///
/// Unify('t0, 't0) = ∅
/// Unify('t0, 't1) = [t0 := 't1]
/// Unify('t0, int) = [t0 := int]
/// Unify('t0, 't0 -> int) = OccursCheck
///
/// Unify(C a1..an, C b1..bn):
///   S0 = ∅
///   Si = Unify(S(i-1)(ai), S(i-1)(bi)) ∘ S(i-1)
///   result Sn
/// Unify(C ..., D ...) or differing arity = Mismatch
/// ```
///
/// Each component pair is unified under the substitution accumulated from
/// the pairs before it, so `'t0 -> 't0` against `int -> 't1` binds both
/// variables to `int`.
pub fn unify(t1: &Type, t2: &Type) -> Result<Substitution, UnifyError> {
    match (t1, t2) {
        (Type::Var(v1), Type::Var(v2)) if v1 == v2 => Ok(Substitution::empty()),
        (Type::Var(v), t) | (t, Type::Var(v)) => bind(v, t),

        (
            Type::App {
                constructor: c1,
                arguments: args1,
            },
            Type::App {
                constructor: c2,
                arguments: args2,
            },
        ) if c1 == c2 && args1.len() == args2.len() => {
            args1
                .iter()
                .zip(args2)
                .try_fold(Substitution::empty(), |subst, (a, b)| {
                    let next = unify(&subst.apply(a), &subst.apply(b))?;
                    Ok(next.compose(&subst))
                })
        }

        _ => Err(UnifyError::Mismatch {
            expected: t1.clone(),
            found: t2.clone(),
        }),
    }
}

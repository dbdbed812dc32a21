use super::env::Context;
use super::error::InferError;
use super::expr::InferExpr;
use super::subst::Substitution;
use super::ty::{Type, TypeVar};
use super::unify::unify;

/// Unification-based inference over [`InferExpr`].
///
/// Holds the fresh-variable supply. One `Infer` is used for a whole `check`
/// run, so variable ids are never reused within that run.
///
/// There is no generalization: a `let`-bound name has exactly one monotype
/// for its whole body.
#[derive(Debug, Default)]
pub struct Infer {
    next_var: usize,
}

impl Infer {
    pub fn new() -> Self {
        Infer { next_var: 0 }
    }

    fn fresh_var(&mut self) -> TypeVar {
        let id = self.next_var;
        self.next_var += 1;
        TypeVar::new(id)
    }

    pub fn infer(
        &mut self,
        ctx: &Context,
        expr: &InferExpr,
    ) -> Result<(Substitution, Type), InferError> {
        match expr {
            InferExpr::Variable(name) => {
                let ty = ctx.lookup(name)?;
                Ok((Substitution::empty(), ty.clone()))
            }
            InferExpr::Application(func, arg) => self.infer_application(ctx, func, arg),
            InferExpr::Let(name, bound, body) => self.infer_let(ctx, name, bound, body),
        }
    }

    fn infer_application(
        &mut self,
        ctx: &Context,
        func: &InferExpr,
        arg: &InferExpr,
    ) -> Result<(Substitution, Type), InferError> {
        let (s1, func_ty) = self.infer(ctx, func)?;
        let ctx1 = ctx.apply_subst(&s1);
        let (s2, arg_ty) = self.infer(&ctx1, arg)?;

        let result_ty = Type::Var(self.fresh_var());
        let expected_func_ty = Type::func(arg_ty, result_ty.clone());

        let s3 = unify(&s2.apply(&func_ty), &expected_func_ty)?;

        let final_subst = s3.compose(&s2).compose(&s1);
        let final_ty = s3.apply(&result_ty);

        Ok((final_subst, final_ty))
    }

    fn infer_let(
        &mut self,
        ctx: &Context,
        name: &str,
        bound: &InferExpr,
        body: &InferExpr,
    ) -> Result<(Substitution, Type), InferError> {
        let (s1, bound_ty) = self.infer(ctx, bound)?;
        let ctx1 = ctx.apply_subst(&s1).extend(name, bound_ty);
        let (s2, body_ty) = self.infer(&ctx1, body)?;

        Ok((s2.compose(&s1), body_ty))
    }
}

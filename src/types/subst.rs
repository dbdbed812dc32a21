use std::collections::HashMap;

use super::ty::{Type, TypeVar};

/// Mapping from type variables to monotypes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution(pub HashMap<TypeVar, Type>);

impl Substitution {
    pub fn empty() -> Self {
        Substitution(HashMap::new())
    }

    pub fn singleton(var: TypeVar, ty: Type) -> Self {
        let mut map = HashMap::new();
        map.insert(var, ty);
        Substitution(map)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn apply(&self, ty: &Type) -> Type {
        match ty {
            Type::Var(v) => self.0.get(v).cloned().unwrap_or_else(|| ty.clone()),
            Type::App {
                constructor,
                arguments,
            } => Type::App {
                constructor: constructor.clone(),
                arguments: arguments.iter().map(|arg| self.apply(arg)).collect(),
            },
        }
    }

    /// `self ∘ earlier`: the result behaves like applying `earlier` first and
    /// `self` second.
    pub fn compose(&self, earlier: &Substitution) -> Substitution {
        let mut result: HashMap<_, _> = earlier
            .0
            .iter()
            .map(|(var, ty)| (var.clone(), self.apply(ty)))
            .collect();

        for (var, ty) in &self.0 {
            result.entry(var.clone()).or_insert_with(|| ty.clone());
        }

        Substitution(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_substitution() {
        let subst = Substitution::empty();
        assert_eq!(subst.apply(&Type::int()), Type::int());
    }

    #[test]
    fn test_singleton_substitution() {
        let var = TypeVar::new(0);
        let subst = Substitution::singleton(var.clone(), Type::int());
        assert_eq!(subst.apply(&Type::Var(var)), Type::int());
    }

    #[test]
    fn test_apply_to_function() {
        let var = TypeVar::new(0);
        let subst = Substitution::singleton(var.clone(), Type::int());
        let ty = Type::func(Type::Var(var), Type::string());
        assert_eq!(subst.apply(&ty), Type::func(Type::int(), Type::string()));
    }

    #[test]
    fn test_apply_preserves_unbound_vars() {
        let var1 = TypeVar::new(0);
        let var2 = TypeVar::new(1);
        let subst = Substitution::singleton(var1, Type::int());
        let ty = Type::Var(var2.clone());
        assert_eq!(subst.apply(&ty), Type::Var(var2));
    }

    #[test]
    fn test_compose_applies_later_to_earlier_range() {
        let var1 = TypeVar::new(0);
        let var2 = TypeVar::new(1);

        let earlier = Substitution::singleton(var1.clone(), Type::Var(var2.clone()));
        let later = Substitution::singleton(var2.clone(), Type::int());

        let composed = later.compose(&earlier);

        assert_eq!(composed.apply(&Type::Var(var1)), Type::int());
        assert_eq!(composed.apply(&Type::Var(var2)), Type::int());
    }

    #[test]
    fn test_compose_earlier_binding_wins() {
        let var = TypeVar::new(0);

        let earlier = Substitution::singleton(var.clone(), Type::int());
        let later = Substitution::singleton(var.clone(), Type::string());

        let result = later.compose(&earlier);
        assert_eq!(result.apply(&Type::Var(var)), Type::int());
    }

    #[test]
    fn test_substitution_idempotent() {
        let var = TypeVar::new(0);
        let subst = Substitution::singleton(var.clone(), Type::int());

        let once = subst.apply(&Type::Var(var));
        let twice = subst.apply(&once);
        assert_eq!(once, twice);
    }
}

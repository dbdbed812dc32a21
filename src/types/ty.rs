use std::fmt;

/// Constructor name of the function arrow.
pub const ARROW: &str = "->";

pub const INT: &str = "int";
pub const STRING: &str = "string";
pub const BOOL: &str = "bool";
pub const UNIT: &str = "unit";

/// Built-in operator bindings, both `int -> int -> int`.
pub const INT_ADD: &str = "int_add";
pub const INT_SUB: &str = "int_sub";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeVar {
    pub id: usize,
}

impl TypeVar {
    pub fn new(id: usize) -> Self {
        Self { id }
    }
}

impl fmt::Display for TypeVar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "'t{}", self.id)
    }
}

/// A monotype: either a type variable or a named constructor applied to
/// zero or more component types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Var(TypeVar),
    App {
        constructor: String,
        arguments: Vec<Type>,
    },
}

impl Type {
    /// Nullary application, e.g. `int`.
    pub fn atom(name: impl Into<String>) -> Self {
        Type::App {
            constructor: name.into(),
            arguments: Vec::new(),
        }
    }

    pub fn int() -> Self {
        Type::atom(INT)
    }

    pub fn string() -> Self {
        Type::atom(STRING)
    }

    pub fn bool() -> Self {
        Type::atom(BOOL)
    }

    pub fn unit() -> Self {
        Type::atom(UNIT)
    }

    pub fn func(from: Type, to: Type) -> Self {
        Type::App {
            constructor: ARROW.to_string(),
            arguments: vec![from, to],
        }
    }

    /// Right-fold `arguments` onto `ret`, so the first argument becomes the
    /// outermost arrow: `(a, b) -> r` is `a -> (b -> r)`.
    pub fn curried<I>(arguments: I, ret: Type) -> Self
    where
        I: IntoIterator<Item = Type>,
        I::IntoIter: DoubleEndedIterator,
    {
        arguments
            .into_iter()
            .rev()
            .fold(ret, |acc, arg| Type::func(arg, acc))
    }

    /// Split an arrow into its parameter and result.
    pub fn as_func(&self) -> Option<(&Type, &Type)> {
        match self {
            Type::App {
                constructor,
                arguments,
            } if constructor == ARROW && arguments.len() == 2 => {
                Some((&arguments[0], &arguments[1]))
            }
            _ => None,
        }
    }

    pub fn pretty(&self) -> String {
        match self {
            Type::Var(v) => v.to_string(),
            Type::App {
                constructor,
                arguments,
            } => {
                if let Some((from, to)) = self.as_func() {
                    let from_str = if from.as_func().is_some() {
                        format!("({})", from.pretty())
                    } else {
                        from.pretty()
                    };
                    return format!("{} -> {}", from_str, to.pretty());
                }

                if arguments.is_empty() {
                    constructor.clone()
                } else {
                    let args: Vec<_> = arguments.iter().map(Type::pretty).collect();
                    format!("{}<{}>", constructor, args.join(", "))
                }
            }
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.pretty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_equality() {
        assert_eq!(Type::atom("int"), Type::int());
        assert_ne!(Type::int(), Type::string());
        assert_eq!(
            Type::func(Type::int(), Type::bool()),
            Type::func(Type::int(), Type::bool())
        );
    }

    #[test]
    fn test_curried_first_argument_is_outermost() {
        let ty = Type::curried([Type::string(), Type::int()], Type::bool());
        assert_eq!(
            ty,
            Type::func(Type::string(), Type::func(Type::int(), Type::bool()))
        );
    }

    #[test]
    fn test_curried_without_arguments_is_return_type() {
        assert_eq!(Type::curried([], Type::unit()), Type::unit());
    }

    #[test]
    fn test_pretty_print_simple() {
        assert_eq!(Type::int().pretty(), "int");
        assert_eq!(Type::Var(TypeVar::new(3)).pretty(), "'t3");
    }

    #[test]
    fn test_pretty_print_function() {
        let ty = Type::curried([Type::int(), Type::int()], Type::int());
        assert_eq!(ty.pretty(), "int -> int -> int");
    }

    #[test]
    fn test_pretty_print_nested_function() {
        let ty = Type::func(Type::func(Type::int(), Type::int()), Type::string());
        assert_eq!(ty.pretty(), "(int -> int) -> string");
    }

    #[test]
    fn test_pretty_print_other_constructor() {
        let ty = Type::App {
            constructor: "list".to_string(),
            arguments: vec![Type::int()],
        };
        assert_eq!(ty.pretty(), "list<int>");
    }
}

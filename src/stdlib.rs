//! Built-in functions available to every program.
//!
//! The checker binds their signatures in the global scope; the VM executes
//! them natively. A user function with the same name takes precedence at
//! both stages.

use crate::types::ty::{INT, STRING, UNIT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFunction {
    /// Write a string to the output.
    Echo,
    /// Write an integer in decimal.
    EchoInt,
    ToString,
    Concat,
}

impl StandardFunction {
    pub const ALL: [StandardFunction; 4] = [
        StandardFunction::Echo,
        StandardFunction::EchoInt,
        StandardFunction::ToString,
        StandardFunction::Concat,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StandardFunction::Echo => "echo",
            StandardFunction::EchoInt => "echo_int",
            StandardFunction::ToString => "to_string",
            StandardFunction::Concat => "concat",
        }
    }

    /// Declared argument type names, in call order.
    pub fn arguments(self) -> &'static [&'static str] {
        match self {
            StandardFunction::Echo => &[STRING],
            StandardFunction::EchoInt => &[INT],
            StandardFunction::ToString => &[INT],
            StandardFunction::Concat => &[STRING, STRING],
        }
    }

    pub fn return_type(self) -> &'static str {
        match self {
            StandardFunction::Echo | StandardFunction::EchoInt => UNIT,
            StandardFunction::ToString | StandardFunction::Concat => STRING,
        }
    }

    pub fn from_name(name: &str) -> Option<StandardFunction> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(StandardFunction::from_name("echo"), Some(StandardFunction::Echo));
        assert_eq!(StandardFunction::from_name("concat"), Some(StandardFunction::Concat));
        assert_eq!(StandardFunction::from_name("print"), None);
    }

    #[test]
    fn test_names_are_unique() {
        for (i, a) in StandardFunction::ALL.iter().enumerate() {
            for b in &StandardFunction::ALL[i + 1..] {
                assert_ne!(a.name(), b.name());
            }
        }
    }
}

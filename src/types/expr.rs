use std::fmt;

/// The minimal expression language the inferer works on.
///
/// The translator lowers surface statements into this form; there is no
/// notion of control flow or statements here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferExpr {
    /// Reference to a context binding.
    Variable(String),
    /// Single-argument application.
    Application(Box<InferExpr>, Box<InferExpr>),
    /// `let name = bound in body`
    Let(String, Box<InferExpr>, Box<InferExpr>),
}

impl InferExpr {
    pub fn var(name: impl Into<String>) -> Self {
        InferExpr::Variable(name.into())
    }

    pub fn app(func: InferExpr, arg: InferExpr) -> Self {
        InferExpr::Application(Box::new(func), Box::new(arg))
    }

    pub fn let_in(name: impl Into<String>, bound: InferExpr, body: InferExpr) -> Self {
        InferExpr::Let(name.into(), Box::new(bound), Box::new(body))
    }
}

impl fmt::Display for InferExpr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InferExpr::Variable(name) => write!(f, "{name}"),
            InferExpr::Application(func, arg) => match **arg {
                InferExpr::Variable(_) => write!(f, "{func} {arg}"),
                _ => write!(f, "{func} ({arg})"),
            },
            InferExpr::Let(name, bound, body) => {
                write!(f, "let {name} = {bound} in {body}")
            }
        }
    }
}

use lachs::Span;

#[derive(Debug, Clone)]
pub enum Expression {
    Ident(Ident),
    Integer(Integer),
    String(StringLiteral),
    Boolean(Boolean),
    Group(Group),
    UnaryOp(UnaryOp),
    BinaryOp(BinaryOp),
    FunctionCall(FunctionCall),
}

impl Expression {
    pub fn position(&self) -> &Span {
        match self {
            Expression::Ident(i) => &i.position,
            Expression::Integer(i) => &i.position,
            Expression::String(s) => &s.position,
            Expression::Boolean(b) => &b.position,
            Expression::Group(g) => &g.position,
            Expression::UnaryOp(u) => &u.position,
            Expression::BinaryOp(b) => &b.position,
            Expression::FunctionCall(f) => &f.position,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Ident {
    pub value: String,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct Integer {
    pub value: i64,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct StringLiteral {
    pub value: String,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct Boolean {
    pub value: bool,
    pub position: Span,
}

/// Parenthesised expression
#[derive(Debug, Clone)]
pub struct Group {
    pub inner: Box<Expression>,
    pub position: Span,
}

/// Binary operator kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
}

/// Unary operator kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOpKind {
    Negate,
}

#[derive(Debug, Clone)]
pub struct BinaryOp {
    pub op: BinOpKind,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct UnaryOp {
    pub op: UnaryOpKind,
    pub operand: Box<Expression>,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct FunctionCall {
    pub func: Box<Expression>,
    pub args: Vec<Expression>,
    pub position: Span,
}

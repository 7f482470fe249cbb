use crate::error::Span;

/// Wraps a node with the source span it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    /// The wrapped node
    pub node: T,
    /// Location the node was parsed from
    pub span: Span,
}

impl<T> Spanned<T> {
    /// Wraps `node` with `span`
    pub fn new(node: T, span: Span) -> Self {
        Spanned { node, span }
    }
}

/// A boxed, span-tagged expression node
pub type Expr = Box<Spanned<Expression>>;

/// Expression tree nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Integer literal
    Integer(i64),
    /// Float literal
    Float(f64),
    /// Variable reference
    Identifier(String),
    /// Unary negation
    Neg(Expr),
    /// Addition
    Add(Expr, Expr),
    /// Subtraction
    Sub(Expr, Expr),
    /// Multiplication
    Mul(Expr, Expr),
    /// Division
    Div(Expr, Expr),
    /// Exponentiation
    Pow(Expr, Expr),
    /// `{begin, end}` range construction
    Range(Expr, Expr),
    /// `map(input, param -> body)`
    Map {
        /// Sequence to iterate
        input: Expr,
        /// Lambda parameter name
        param: String,
        /// Per-element body
        body: Expr,
    },
    /// `reduce(input, seed, p1 p2 -> body)`
    Reduce {
        /// Sequence to fold
        input: Expr,
        /// Initial accumulator expression
        seed: Expr,
        /// Accumulator parameter name
        p1: String,
        /// Element parameter name
        p2: String,
        /// Per-step body
        body: Expr,
    },
}

/// A parsed, executable statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `var name = expr`
    Var {
        /// Bound identifier
        name: String,
        /// Value expression
        expr: Expr,
    },
    /// `out expr`
    Out(Expr),
    /// `print "literal"`
    Print(String),
}

//! Recursive-descent parser producing statement/expression trees with
//! source spans attached to each node.

mod ast;
mod parser;

pub use ast::{Expr, Expression, Spanned, Statement};
pub use parser::{parse, Parser};

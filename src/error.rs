//! Error types for the exprflow interpreter

use thiserror::Error;

/// A source location used to point diagnostics at the offending text.
///
/// Lines are 1-based, columns are 0-based, matching the convention of the
/// original parser collaborator this crate is built against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Line on which the span starts
    pub line: usize,
    /// Column on which the span starts
    pub col: usize,
    /// Line on which the span ends (inclusive)
    pub end_line: usize,
    /// Column on which the span ends (inclusive)
    pub end_col: usize,
}

impl Span {
    /// A span that covers a single point
    pub fn point(line: usize, col: usize) -> Self {
        Span {
            line,
            col,
            end_line: line,
            end_col: col,
        }
    }

    /// Merges two spans into one that covers both
    pub fn merge(self, other: Span) -> Self {
        Span {
            line: self.line,
            col: self.col,
            end_line: other.end_line,
            end_col: other.end_col,
        }
    }

    fn is_point(&self) -> bool {
        self.line == self.end_line && self.col == self.end_col
    }
}

/// Interpreter errors
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Syntax error reported by the parser collaborator
    #[error("syntax error: {message}")]
    Syntax {
        /// Location of the offending token
        span: Span,
        /// Human-readable description
        message: String,
    },

    /// Reference to an identifier with no binding in the environment
    #[error("unknown identifier: {name}")]
    Name {
        /// The identifier that could not be resolved
        name: String,
        /// Location of the offending identifier
        span: Span,
    },

    /// Operation applied to a value of the wrong shape (e.g. arithmetic on a
    /// vector, or a lambda body returning a non-scalar)
    #[error("{message}")]
    Type {
        /// Human-readable description
        message: String,
        /// Location responsible for the error
        span: Span,
    },

    /// Division by zero, or integer overflow in exponentiation
    #[error("{message}")]
    Arithmetic {
        /// Human-readable description
        message: String,
        /// Location responsible for the error
        span: Span,
    },

    /// Unreachable interpreter state; always a bug
    #[error("internal error: {message}")]
    Internal {
        /// Human-readable description
        message: String,
    },
}

impl Error {
    /// Returns the span attached to this error, if any
    pub fn span(&self) -> Option<Span> {
        match self {
            Error::Syntax { span, .. }
            | Error::Name { span, .. }
            | Error::Type { span, .. }
            | Error::Arithmetic { span, .. } => Some(*span),
            Error::Internal { .. } => None,
        }
    }

    /// Formats this error in the driver's diagnostic format:
    /// `ERROR:<line>,<col>:<msg>`, `ERROR:<line>,<col>-<line2>,<col2>:<msg>`,
    /// or `ERROR:<line>:<msg>` when only a line number is known.
    pub fn diagnostic(&self) -> String {
        match self.span() {
            Some(span) if span.is_point() => {
                format!("ERROR:{},{}:{}", span.line, span.col, self)
            }
            Some(span) => format!(
                "ERROR:{},{}-{},{}:{}",
                span.line, span.col, span.end_line, span.end_col, self
            ),
            None => format!("ERROR:{}", self),
        }
    }
}

/// Result type for exprflow operations
pub type Result<T> = std::result::Result<T, Error>;

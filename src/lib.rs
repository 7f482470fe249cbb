//! # exprflow
//!
//! A line-oriented interpreter for a small expression-and-statement
//! language over numeric scalars and integer ranges. Its defining feature
//! is that `map`/`reduce` aggregate operations evaluate concurrently,
//! producing asynchronous values whose contents are forced only when
//! observed.
//!
//! ## Quick start
//!
//! ```rust
//! use exprflow::driver::Driver;
//! use exprflow::parallel::DEFAULT_MULTITHREAD_THRESHOLD;
//!
//! let mut driver = Driver::new(DEFAULT_MULTITHREAD_THRESHOLD);
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let code = driver.run("var n = 5\nout n".as_bytes(), &mut stdout, &mut stderr);
//!
//! assert_eq!(String::from_utf8(stdout).unwrap(), "5");
//! assert_eq!(code, 0);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Source line → lexer → parser → evaluator ⇄ environment
//!                                     |
//!                                     v
//!                             parallel runtime (map/reduce)
//! ```
//!
//! - [`lexer`] tokenizes one line of source text.
//! - [`parser`] turns tokens into a span-tagged [`parser::Statement`] tree.
//! - [`evaluator`] walks expression trees and executes statements.
//! - [`runtime`] holds the [`runtime::Value`] algebra and [`runtime::Environment`].
//! - [`parallel`] slices map/reduce inputs across a worker pool.
//! - [`driver`] ties the above into the line-by-line REPL loop.

pub mod cli;
pub mod diagnostics;
pub mod driver;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parallel;
pub mod parser;
pub mod runtime;

pub use error::{Error, Result};
pub use runtime::{Environment, Value};

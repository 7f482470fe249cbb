//! Line-by-line driver: component F of the interpreter core.

use std::io::{BufRead, Write};

use tracing::{debug, warn};

use crate::diagnostics;
use crate::evaluator::exec_statement;
use crate::parser::parse;
use crate::runtime::Environment;

/// Drives a whole run: reads lines, parses and executes each one against a
/// persistent environment, and reports errors to the diagnostic stream.
pub struct Driver {
    env: Environment,
    threshold: usize,
    errored: bool,
    line: usize,
}

impl Driver {
    /// Creates a driver with an empty environment and the given
    /// sequential/parallel threshold for map/reduce.
    pub fn new(threshold: usize) -> Self {
        Driver {
            env: Environment::new(),
            threshold,
            errored: false,
            line: 1,
        }
    }

    /// Runs every line from `input`, writing `out`/`print` output to
    /// `stdout` and diagnostics to `stderr`. Returns the process exit code:
    /// `0` on a clean run, `1` if any error was reported.
    pub fn run(
        &mut self,
        input: impl BufRead,
        stdout: &mut impl Write,
        stderr: &mut impl Write,
    ) -> i32 {
        for line_result in input.lines() {
            let line_text = match line_result {
                Ok(text) => text,
                Err(err) => {
                    warn!(error = %err, "failed to read input line");
                    break;
                }
            };
            self.process_line(&line_text, stdout, stderr);
            self.line += 1;
        }
        if self.errored {
            1
        } else {
            0
        }
    }

    fn process_line(&mut self, line_text: &str, stdout: &mut impl Write, stderr: &mut impl Write) {
        if line_text.trim().is_empty() {
            return;
        }

        debug!(line = self.line, text = line_text, "parsing line");
        match parse(line_text, self.line) {
            Ok(stmt) => {
                if self.errored {
                    // Keep parsing to surface further syntax errors, but a
                    // prior error means nothing further executes.
                    return;
                }
                debug!(line = self.line, "executing statement");
                if let Err(err) = exec_statement(&stmt, &mut self.env, self.threshold, stdout) {
                    warn!(line = self.line, error = %err, "statement failed");
                    let _ = diagnostics::report(&err, stderr);
                    self.errored = true;
                }
            }
            Err(err) => {
                warn!(line = self.line, error = %err, "syntax error");
                let _ = diagnostics::report(&err, stderr);
                self.errored = true;
            }
        }
    }
}

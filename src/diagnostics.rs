//! Formats interpreter errors onto the diagnostic stream.

use std::io::Write;

use crate::error::Error;

/// Writes `err` to `writer` in the driver's diagnostic format, followed by
/// a newline. Mirrors the original collaborator's `user_error` routine:
/// `ERROR:<line>,<col>:<msg>`, or with a `-<line>,<col>` suffix when the
/// span covers more than one point, or `ERROR:<line>:<msg>` when only a
/// line is known.
pub fn report(err: &Error, writer: &mut impl Write) -> std::io::Result<()> {
    writeln!(writer, "{}", err.diagnostic())
}

//! Operator confirmation before a benchmark starts.

use std::io::{self, BufRead, Write};

/// Asks `Are you ready? (y/n)` until the operator answers exactly `y`.
///
/// Any other answer asks again. Reaching the end of `input` without a `y` is an
/// [`io::ErrorKind::UnexpectedEof`] error, so a closed stdin cannot spin forever.
pub fn wait_for_confirmation(mut input: impl BufRead, mut output: impl Write) -> io::Result<()> {
    let mut line = String::new();
    loop {
        write!(output, "Are you ready? (y/n)")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before the benchmark was confirmed",
            ));
        }
        if line.trim_end_matches(['\r', '\n']) == "y" {
            return Ok(());
        }
    }
}

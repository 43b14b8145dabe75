//! Count command implementation.

use ngramdb_core::IndexSet;
use std::io::Write;

/// Runs the count command: prints the count of one n-gram.
pub fn run<W: Write>(
    index: &IndexSet,
    tokens: &[String],
    out: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    let count = index.get_count(tokens)?;
    tracing::debug!(?tokens, count, "looked up n-gram");
    writeln!(out, "{count}")?;
    Ok(())
}

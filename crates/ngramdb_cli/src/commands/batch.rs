//! Batch command implementation.
//!
//! Reads one n-gram per line, tokens separated by whitespace, and prints
//! `line<TAB>count` for each. Blank lines are skipped.

use ngramdb_core::IndexSet;
use std::io::{BufRead, Write};

/// Runs the batch command. Returns the number of n-grams looked up.
///
/// Stops at the first failing lookup.
pub fn run<R: BufRead, W: Write>(
    index: &IndexSet,
    input: R,
    out: &mut W,
) -> Result<usize, Box<dyn std::error::Error>> {
    let mut looked_up = 0;
    for line in input.lines() {
        let line = line?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        let count = index.get_count(tokens.as_slice())?;
        writeln!(out, "{}\t{}", index.config().join_key(&tokens), count)?;
        looked_up += 1;
    }
    tracing::info!(looked_up, "batch finished");
    Ok(looked_up)
}

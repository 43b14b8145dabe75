//! Inspect command implementation.

use ngramdb_core::IndexSet;
use serde::Serialize;
use std::io::Write;

/// Corpus inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Corpus root.
    pub root: String,
    /// Opened index directories, as shown by the index set.
    pub opened: String,
    /// Per-size statistics.
    pub sizes: Vec<SizeInfo>,
    /// Total number of n-grams over all sizes.
    pub total_ngrams: u64,
}

/// Statistics for a single n-gram size.
#[derive(Debug, Serialize)]
pub struct SizeInfo {
    /// The n-gram size.
    pub size: usize,
    /// Index directory.
    pub path: String,
    /// Number of n-grams.
    pub ngrams: u64,
}

/// Collects inspection data from an open index set.
pub fn inspect(index: &IndexSet) -> InspectResult {
    let sizes: Vec<SizeInfo> = index
        .stats()
        .into_iter()
        .map(|s| SizeInfo {
            size: s.size,
            path: s.path.display().to_string(),
            ngrams: s.ngrams,
        })
        .collect();

    InspectResult {
        root: index.root().display().to_string(),
        opened: index.to_string(),
        total_ngrams: sizes.iter().map(|s| s.ngrams).sum(),
        sizes,
    }
}

/// Runs the inspect command.
pub fn run<W: Write>(
    index: &IndexSet,
    format: &str,
    out: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = inspect(index);

    match format {
        "json" => {
            writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
        }
        _ => {
            write_text_output(&result, out)?;
        }
    }

    Ok(())
}

fn write_text_output<W: Write>(result: &InspectResult, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "ngramdb Corpus Inspection")?;
    writeln!(out, "=========================")?;
    writeln!(out)?;
    writeln!(out, "Root:   {}", result.root)?;
    writeln!(out, "Opened: {}", result.opened)?;
    writeln!(out)?;
    writeln!(out, "Indexes:")?;
    for size in &result.sizes {
        writeln!(
            out,
            "  [{}grams] {} n-grams ({})",
            size.size, size.ngrams, size.path
        )?;
    }
    writeln!(out)?;
    writeln!(out, "Total n-grams: {}", result.total_ngrams)
}

//! ngramdb CLI
//!
//! Command-line lookups against a prebuilt n-gram corpus.
//!
//! # Commands
//!
//! - `count` - Print the count of one n-gram
//! - `batch` - Count n-grams read from stdin, one per line
//! - `inspect` - Display the opened indexes and their sizes

mod commands;

use clap::{Parser, Subcommand};
use ngramdb_core::{IndexConfig, IndexSet};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// ngramdb command-line corpus tools.
#[derive(Parser)]
#[command(name = "ngramdb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the corpus root (containing 2grams/ and/or 3grams/)
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// N-gram sizes to open
    #[arg(global = true, long, value_delimiter = ',', default_values_t = [2, 3])]
    sizes: Vec<usize>,

    /// Separator joining tokens into a key
    #[arg(global = true, long, default_value_t = ' ')]
    separator: char,

    /// Name of the key field
    #[arg(global = true, long, default_value = "ngram")]
    key_field: String,

    /// Name of the count field
    #[arg(global = true, long, default_value = "count")]
    count_field: String,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the count of one n-gram
    Count {
        /// The tokens of the n-gram
        #[arg(required = true, num_args = 1..)]
        tokens: Vec<String>,
    },

    /// Count n-grams read from stdin, one per line
    Batch,

    /// Display the opened indexes and their sizes
    Inspect {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

impl Cli {
    fn config(&self) -> IndexConfig {
        IndexConfig::new()
            .sizes(self.sizes.iter().copied())
            .separator(self.separator)
            .key_field(self.key_field.as_str())
            .count_field(self.count_field.as_str())
    }

    fn open(&self, command: &str) -> Result<IndexSet, Box<dyn std::error::Error>> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| format!("Corpus path required for {command}"))?;
        let index = IndexSet::open_with_config(path, self.config())?;
        tracing::info!(opened = %index, "opened corpus");
        Ok(index)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut stdout = io::stdout().lock();
    match &cli.command {
        Commands::Count { tokens } => {
            let index = cli.open("count")?;
            let result = commands::count::run(&index, tokens, &mut stdout);
            close_after(index, result)
        }
        Commands::Batch => {
            let index = cli.open("batch")?;
            let result = commands::batch::run(&index, io::stdin().lock(), &mut stdout);
            close_after(index, result).map(|_| ())
        }
        Commands::Inspect { format } => {
            let index = cli.open("inspect")?;
            let result = commands::inspect::run(&index, format, &mut stdout);
            close_after(index, result)
        }
        Commands::Version => {
            writeln!(stdout, "ngramdb CLI v{}", env!("CARGO_PKG_VERSION"))?;
            writeln!(stdout, "ngramdb Core v{}", ngramdb_core::VERSION)?;
            Ok(())
        }
    }
}

/// Closes `index` whether or not the command succeeded.
///
/// A command error takes precedence over a close error.
fn close_after<T>(
    index: IndexSet,
    result: Result<T, Box<dyn std::error::Error>>,
) -> Result<T, Box<dyn std::error::Error>> {
    let closed = index.close();
    let value = result?;
    closed?;
    Ok(value)
}

//! # ngramdb Core
//!
//! N-gram count lookups over prebuilt, read-only corpora.
//!
//! A corpus root holds one index per n-gram size:
//!
//! ```text
//! <root>/
//! ├─ 2grams/     # documents { ngram: "new york", count: "42" }
//! └─ 3grams/     # documents { ngram: "new york city", count: "17" }
//! ```
//!
//! This crate provides:
//! - [`IndexSet`] - opens the indexes found under a root and answers count lookups
//! - [`Discovery`] - resolves which sizes are present, without opening anything
//! - [`LanguageModel`] - the lookup interface consumed by text analysis
//! - [`IndexConfig`] - sizes, field names and token separator

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod discovery;
mod error;
mod handle;
mod index_set;
mod model;

pub use config::{size_dir_name, IndexConfig, DEFAULT_SIZES};
pub use discovery::{resolve, Discovery};
pub use error::{CloseFailure, CoreError, CoreResult};
pub use handle::SizeHandle;
pub use index_set::{IndexSet, SizeStats};
pub use model::LanguageModel;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod runner;

pub use error::{GleanerError, Result};
pub use runner::{KeywordSummary, RunSummary, Runner};

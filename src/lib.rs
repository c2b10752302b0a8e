//! # gleaner
//!
//! Collects posts matching search keywords from a logged-in social feed
//! through a real Chrome session.
//!
//! ## Architecture
//!
//! ```text
//! Session → Navigator → Collection engine → Extractor → Gate → Store
//!                           (scroll loop)     (per post)  (dedup/deny)
//! ```
//!
//! One browser, one page, one keyword at a time. Every wait on the page is
//! bounded except the pause for a human to solve a CAPTCHA.
//!
//! ## Quick Start
//!
//! ```bash
//! # Scrape every keyword in keywords.txt
//! gleaner run --cookies facebook_cookies.json
//!
//! # Show what was stored
//! gleaner list --keyword rust
//!
//! # Dump as JSON lines
//! gleaner export > posts.jsonl
//! ```

/// Run orchestration and error types.
pub mod app;

/// Command-line interface using clap.
///
/// - `run` - log in and scrape every keyword
/// - `list [--keyword K]` - print stored posts
/// - `export [--keyword K]` - stored posts as JSON lines
pub mod cli;

/// Configuration loaded from `~/.config/gleaner/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`PostRecord`](domain::PostRecord): one harvested post
/// - [`CrawlState`](domain::CrawlState): per-keyword bookkeeping
pub mod domain;

/// The bounded scroll-and-scrape state machine.
pub mod engine;

/// Per-post field extraction.
pub mod extractor;

/// Dedup and denylist admission.
pub mod gate;

/// Keyword and denylist files.
pub mod inputs;

pub mod logging;

/// Search submission and infinite-scroll control.
pub mod navigation;

/// Chrome launch and cookie login via chromiumoxide.
pub mod session;

/// SQLite persistence layer.
///
/// - [`PostSink`](store::PostSink): where records go
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
/// - [`BatchWriter`](store::BatchWriter): batched appends
pub mod store;

/// Capability traits over the rendered page and their Chrome adapter.
pub mod surface;

/// Bounded polling waits.
pub mod wait;

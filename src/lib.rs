//! Tablechat – natural-language filtering of tabular data
//!
//! This crate provides:
//! - Translation of a user's request into an equality-only filter through a
//!   chat-completions backend (Ollama, Gemini or Azure OpenAI)
//! - Pure application of that filter to an immutable base dataset
//! - A conversation controller that runs one request cycle at a time and
//!   publishes the filtered view through a reactive cell
//! - Memoized computations that rerun only when an explicit trigger fires,
//!   with tracked and untracked reads of their inputs

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Application configuration
pub mod config;
/// Conversation log and controller
pub mod conversation;
/// Typed datasets, schemas and CSV loading
pub mod dataset;
/// Error types
pub mod error;
/// Filter specifications, decoding and application
pub mod filter;
/// Reactive and memoized cells
pub mod reactive;
/// Slow sample query for memoization
pub mod sample;
/// Prompting and translation backends
pub mod translate;

// Re-export key types for convenience
pub use config::AppConfig;
pub use conversation::{ConversationController, CycleOutcome};
pub use dataset::{Dataset, TableSchema};
pub use filter::FilterSpec;
pub use reactive::{MemoCell, ReactiveCell, Trigger};

/// Current version of tablechat
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

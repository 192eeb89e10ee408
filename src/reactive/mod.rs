//! Reactive cells with explicit dependency tracking
//!
//! - `ReactiveCell`: single-writer value holder that notifies subscribers
//! - `CellReader`: read-only handle handed to renderers
//! - `ReadContext`: tracked and untracked reads inside a computation
//! - `MemoCell`: a computation cached until its `Trigger` fires

pub mod cell;
pub mod context;
pub mod memo;

pub use cell::{CellId, CellReader, ReactiveCell, SubscriptionId};
pub use context::ReadContext;
pub use memo::{MemoCell, Trigger};

//! Data models for the shell.
//!
//! Contains domain types for:
//! - [`Node`], [`File`], [`Directory`], [`DirEntry`] - Virtual filesystem representation
//! - [`HistoryLog`], [`HistoryRecord`] - Display history and command recall

mod filesystem;
mod history;

pub use filesystem::{DirEntry, Directory, File, Node};
pub use history::{HistoryLog, HistoryRecord, RecordId};

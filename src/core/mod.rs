//! Core shell engine.
//!
//! This module provides:
//! - [`Shell`] - the entry point that owns session, registry, and host
//! - [`VirtualFs`] and [`path`] - in-memory filesystem and path resolution
//! - [`CommandRegistry`] and [`dispatch`] - command lookup and execution
//! - [`autocomplete`] - live completion suggestions
//! - [`tutorial`] - the guided tour state machine

pub mod autocomplete;
mod cancel;
pub mod commands;
pub mod dispatch;
pub mod error;
mod filesystem;
pub mod fuzzy;
pub mod host;
pub mod parser;
pub mod path;
mod session;
mod shell;
pub mod tutorial;

pub use cancel::CancellationToken;
pub use commands::{CommandEntry, CommandRegistry, Context, Handler, Output};
pub use error::{FetchError, FsError, StorageError};
pub use filesystem::{Touched, VirtualFs};
pub use host::{Host, LocalBoxFuture, OfflineHost};
pub use parser::{ParsedCommand, parse_input};
pub use session::Session;
pub use shell::{Shell, Submission};
pub use tutorial::{ScheduledAdvance, Tutorial, TutorialState};

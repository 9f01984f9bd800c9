//! A simulated command shell for the browser.
//!
//! One line of input goes in; HTML-annotated output comes out. The crate holds
//! the engine (command dispatch, an in-memory filesystem, completion, and a
//! guided tutorial). Rendering, sound, and network access belong to the host
//! and are reached through [`crate::core::Host`] and [`crate::utils::Storage`].
//!
//! ```
//! use std::rc::Rc;
//!
//! use webterm::config::ShellConfig;
//! use webterm::core::{CancellationToken, OfflineHost, Shell};
//! use webterm::utils::MemoryStorage;
//!
//! let mut shell = Shell::new(
//!     ShellConfig::default(),
//!     Rc::new(OfflineHost),
//!     Rc::new(MemoryStorage::new()),
//! );
//! let submission = shell.submit("pwd", &CancellationToken::new());
//! assert_eq!(submission.output.as_text(), Some("/home/user"));
//! ```

pub mod config;
pub mod core;
pub mod models;
pub mod utils;

#[cfg(target_arch = "wasm32")]
pub mod web;

//! Command registry and handlers.
//!
//! This module provides:
//! - [`CommandRegistry`] mapping names to handlers, composed from groups
//! - [`Context`] giving handlers access to the session and host
//! - [`Output`] for ready or deferred command results
//!
//! # Architecture
//!
//! Each group module (`filesystem`, `network`, `session`) exposes a
//! `commands()` list. [`CommandRegistry::standard`] layers them in order, so a
//! later group overrides an earlier one that registers the same name.

mod filesystem;
mod network;
mod result;
mod session;

pub use result::Output;

use std::collections::HashMap;
use std::rc::Rc;

use crate::config::ShellConfig;
use crate::core::host::Host;
use crate::core::{CancellationToken, Session};
use crate::utils::markup;

/// A command handler.
pub type Handler = fn(&mut Context<'_>, &[String]) -> Output;

/// A registered command.
#[derive(Clone, Copy)]
pub struct CommandEntry {
    pub name: &'static str,
    pub handler: Handler,
    /// One-line description for `help`.
    pub summary: &'static str,
    /// Full usage text shown for `--help`. `None` means no help available.
    pub help: Option<&'static str>,
}

impl CommandEntry {
    /// Hidden commands are dispatchable but never listed or suggested.
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('_')
    }
}

impl std::fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandEntry")
            .field("name", &self.name)
            .field("hidden", &self.is_hidden())
            .finish()
    }
}

/// Name to handler mapping.
#[derive(Clone, Debug, Default)]
pub struct CommandRegistry {
    entries: HashMap<&'static str, CommandEntry>,
}

impl CommandRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The filesystem, network, and session groups, in that order.
    pub fn standard() -> Self {
        Self::new()
            .with_group(filesystem::commands())
            .with_group(network::commands())
            .with_group(session::commands())
    }

    /// Add a group of commands. Existing names are overwritten.
    pub fn with_group(mut self, group: Vec<CommandEntry>) -> Self {
        for entry in group {
            self.entries.insert(entry.name, entry);
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Visible command names, shortest first, then alphabetical.
    pub fn visible_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self
            .entries
            .values()
            .filter(|e| !e.is_hidden())
            .map(|e| e.name)
            .collect();
        names.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
        names
    }

    /// Visible entries in alphabetical order.
    pub fn visible_entries(&self) -> Vec<&CommandEntry> {
        let mut entries: Vec<_> = self.entries.values().filter(|e| !e.is_hidden()).collect();
        entries.sort_by_key(|e| e.name);
        entries
    }

    /// Help markup for `name`, or a generic notice.
    pub fn help_text(&self, name: &str) -> String {
        match self.get(name).and_then(|e| e.help) {
            Some(help) => markup::breaks(help),
            None => markup::info(&format!("{}: no help available", name)),
        }
    }
}

/// Everything a handler may touch while it runs.
pub struct Context<'a> {
    pub session: &'a mut Session,
    pub registry: &'a CommandRegistry,
    pub host: &'a Rc<dyn Host>,
    pub config: &'a ShellConfig,
    pub cancel: &'a CancellationToken,
}

impl Context<'_> {
    /// Report a user-facing error: play the failure cue and render the message.
    pub fn fail(&self, message: impl AsRef<str>) -> Output {
        self.host.failure_cue();
        Output::text(markup::error(message.as_ref()))
    }

    /// Usage error: show the command's help instead of an error.
    pub fn usage(&self, name: &str) -> Output {
        Output::text(self.registry.help_text(name))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Helpers for exercising handlers without a full shell.

    use std::rc::Rc;

    use super::*;
    use crate::core::host::mock::MockHost;
    use crate::core::parser::parse_input;

    /// Owns what a [`Context`] borrows.
    pub struct Harness {
        pub session: Session,
        pub registry: CommandRegistry,
        pub mock: Rc<MockHost>,
        pub host: Rc<dyn Host>,
        pub config: ShellConfig,
        pub cancel: CancellationToken,
    }

    impl Harness {
        pub fn new() -> Self {
            let config = ShellConfig::default();
            let mock = Rc::new(MockHost::default());
            let host: Rc<dyn Host> = mock.clone();
            Self {
                session: Session::new(&config),
                registry: CommandRegistry::standard(),
                mock,
                host,
                config,
                cancel: CancellationToken::new(),
            }
        }

        /// Dispatch a line and return its output.
        pub fn run(&mut self, line: &str) -> Output {
            let command = parse_input(line, &[]).expect("non-empty line");
            let mut ctx = Context {
                session: &mut self.session,
                registry: &self.registry,
                host: &self.host,
                config: &self.config,
                cancel: &self.cancel,
            };
            crate::core::dispatch::dispatch(&mut ctx, &command)
        }

        /// Dispatch a line that must finish synchronously.
        pub fn text(&mut self, line: &str) -> String {
            match self.run(line) {
                Output::Text(text) => text,
                Output::Deferred(_) => panic!("'{line}' produced deferred output"),
            }
        }

        pub fn cues(&self) -> usize {
            self.mock.cues.get()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut Context<'_>, _: &[String]) -> Output {
        Output::text("first")
    }

    fn other(_: &mut Context<'_>, _: &[String]) -> Output {
        Output::text("second")
    }

    fn entry(name: &'static str, handler: Handler) -> CommandEntry {
        CommandEntry {
            name,
            handler,
            summary: "",
            help: None,
        }
    }

    #[test]
    fn test_later_group_wins() {
        let registry = CommandRegistry::new()
            .with_group(vec![CommandEntry {
                summary: "old",
                ..entry("x", noop)
            }])
            .with_group(vec![CommandEntry {
                summary: "new",
                ..entry("x", other)
            }]);
        assert_eq!(registry.get("x").unwrap().summary, "new");
    }

    #[test]
    fn test_visible_names_order_and_hidden() {
        let registry = CommandRegistry::new().with_group(vec![
            entry("clear", noop),
            entry("cd", noop),
            entry("cat", noop),
            entry("_secret", noop),
        ]);
        assert_eq!(registry.visible_names(), vec!["cd", "cat", "clear"]);
        assert!(registry.contains("_secret"));
    }

    #[test]
    fn test_standard_registry() {
        let registry = CommandRegistry::standard();
        let names = registry.visible_names();
        for name in [
            "ls", "cd", "pwd", "cat", "touch", "mkdir", "rm", "echo", "grep", "tree", "weather",
            "stock", "curl", "qr", "help", "clear", "history", "theme", "demo", "reset",
            "whoami",
        ] {
            assert!(names.contains(&name), "missing {name}");
        }
        assert!(!names.contains(&crate::config::TUTORIAL_CHECK_COMMAND));
        assert!(registry.contains(crate::config::TUTORIAL_CHECK_COMMAND));
    }

    #[test]
    fn test_help_text_fallback() {
        let registry = CommandRegistry::new().with_group(vec![entry("x", noop)]);
        assert!(registry.help_text("x").contains("x: no help available"));
        assert!(registry.help_text("nope").contains("nope: no help available"));
    }
}

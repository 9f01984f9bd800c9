//! The shell entry point.
//!
//! [`Shell`] owns the session, the command registry, and the host
//! collaborators. The host calls [`Shell::submit`] once per line, drives any
//! deferred output to completion, and hands the final text back with
//! [`Shell::resolve`]. Tutorial advances come back out of
//! [`Shell::take_scheduled`] and go in again through [`Shell::fire`] after the
//! configured delay.

use std::rc::Rc;

use crate::config::{HISTORY_KEY, RECALL_KEY, ShellConfig, TUTORIAL_CHECK_COMMAND};
use crate::core::autocomplete;
use crate::core::cancel::CancellationToken;
use crate::core::commands::{CommandRegistry, Context, Output};
use crate::core::dispatch::dispatch;
use crate::core::host::Host;
use crate::core::parser::{ParsedCommand, parse_input};
use crate::core::session::Session;
use crate::core::tutorial::ScheduledAdvance;
use crate::models::{HistoryLog, HistoryRecord, RecordId};
use crate::utils::storage::{self, Storage};

/// Result of submitting one line.
#[derive(Debug)]
pub struct Submission {
    /// History record the output belongs to. `None` for blank input, or when
    /// the command removed its own record (`clear`, `reset`).
    pub record: Option<RecordId>,
    pub output: Output,
}

pub struct Shell {
    session: Session,
    registry: CommandRegistry,
    host: Rc<dyn Host>,
    storage: Rc<dyn Storage>,
    config: ShellConfig,
}

impl Shell {
    /// Create a shell, restoring both history logs from `storage`.
    pub fn new(config: ShellConfig, host: Rc<dyn Host>, storage: Rc<dyn Storage>) -> Self {
        let history = restore_history(&config, storage.as_ref());
        Self {
            session: Session::with_history(history),
            registry: CommandRegistry::standard(),
            host,
            storage,
            config,
        }
    }

    // =========================================================================
    // Processing
    // =========================================================================

    /// Process one input line.
    ///
    /// Ready output is already appended to the new history record; deferred
    /// output must be passed back through [`Shell::resolve`] once it settles.
    pub fn submit(&mut self, line: &str, cancel: &CancellationToken) -> Submission {
        let line = line.trim();
        let recall = self.session.history.recall();
        let Some(command) = parse_input(line, &recall) else {
            return Submission {
                record: None,
                output: Output::empty(),
            };
        };

        let command_line = command.line();
        self.session.history.remember(&command_line);
        let id = self.session.history.begin(&command_line);

        let output = self.run(&command, cancel);
        let record = match output {
            Output::Text(ref text) => self
                .session
                .history
                .append_to(id, text.clone())
                .then_some(id),
            Output::Deferred(_) => self.has_record(id).then_some(id),
        };

        if self.session.tutorial.is_active() && !is_tutorial_exempt(&command.name) {
            let check = ParsedCommand {
                name: TUTORIAL_CHECK_COMMAND.to_string(),
                args: std::iter::once(command.name.clone())
                    .chain(command.args.iter().cloned())
                    .collect(),
            };
            self.run(&check, cancel);
        }

        self.persist();
        Submission { record, output }
    }

    /// Attach the settled text of a deferred output to its record.
    pub fn resolve(&mut self, record: RecordId, text: String) {
        if self.session.history.append_to(record, text) {
            self.persist();
        }
    }

    fn run(&mut self, command: &ParsedCommand, cancel: &CancellationToken) -> Output {
        let mut ctx = Context {
            session: &mut self.session,
            registry: &self.registry,
            host: &self.host,
            config: &self.config,
            cancel,
        };
        dispatch(&mut ctx, command)
    }

    fn has_record(&self, id: RecordId) -> bool {
        self.session
            .history
            .last_record()
            .is_some_and(|record| record.id == id)
    }

    // =========================================================================
    // Tutorial
    // =========================================================================

    /// Advances queued by the tutorial since the last call, to be fired after
    /// [`ShellConfig::tutorial_advance_delay_ms`].
    pub fn take_scheduled(&mut self) -> Vec<ScheduledAdvance> {
        std::mem::take(&mut self.session.scheduled)
    }

    /// Fire a scheduled advance.
    ///
    /// The render goes onto whichever record is newest now. Returns it, or
    /// `None` when the advance went stale.
    pub fn fire(&mut self, advance: ScheduledAdvance) -> Option<String> {
        let render = self.session.tutorial.advance(advance)?;
        self.session.history.append_to_latest(render.clone());
        self.persist();
        Some(render)
    }

    /// Handle a user interrupt (Ctrl+C).
    ///
    /// Cancels `cancel` and leaves the tutorial if it is running. Returns the
    /// notice shown to the user, if any.
    pub fn interrupt(&mut self, cancel: &CancellationToken) -> Option<String> {
        cancel.cancel();
        self.session.scheduled.clear();
        let notice = self.session.tutorial.interrupt()?;
        let id = self.session.history.begin("^C");
        self.session.history.append_to(id, notice.clone());
        self.persist();
        Some(notice)
    }

    // =========================================================================
    // Input Assistance
    // =========================================================================

    pub fn suggest(&self, input: &str) -> Vec<String> {
        let commands = self.registry.visible_names();
        autocomplete::suggest(input, &commands, &self.session.fs, &self.session.cwd)
    }

    pub fn hint(&self, input: &str) -> Option<String> {
        let commands = self.registry.visible_names();
        autocomplete::hint(input, &commands, &self.session.fs, &self.session.cwd)
    }

    /// Step through earlier command lines. Negative goes back in time; `None`
    /// means back at a fresh line.
    pub fn recall(&mut self, direction: i32) -> Option<String> {
        self.session.history.navigate(direction)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn prompt(&self) -> String {
        self.session.prompt()
    }

    pub fn theme(&self) -> &str {
        &self.session.theme
    }

    pub fn records(&self) -> Vec<HistoryRecord> {
        self.session.history.records()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Write both history logs. Failures are logged, never shown.
    fn persist(&self) {
        let history = &self.session.history;
        let results = [
            storage::save(self.storage.as_ref(), HISTORY_KEY, &history.records()),
            storage::save(self.storage.as_ref(), RECALL_KEY, &history.recall()),
        ];
        for result in results {
            if let Err(e) = result {
                log::warn!("failed to persist history: {}", e);
            }
        }
    }
}

/// Lines the tutorial never sees: `demo` itself and hidden commands.
fn is_tutorial_exempt(name: &str) -> bool {
    name == "demo" || name.starts_with('_')
}

fn restore_history(config: &ShellConfig, storage: &dyn Storage) -> HistoryLog {
    let records: Vec<HistoryRecord> = storage::load(storage, HISTORY_KEY).unwrap_or_default();
    let recall: Vec<String> = storage::load(storage, RECALL_KEY).unwrap_or_default();
    log::debug!(
        "restored {} history records and {} recall entries",
        records.len(),
        recall.len()
    );
    HistoryLog::restore(
        records,
        recall,
        config.max_history_records,
        config.max_recall_entries,
    )
}

//! Guided tutorial state machine.
//!
//! `demo` starts the tour at the first step. While it is active the shell
//! feeds every submitted line to [`Tutorial::check`]. A match does not advance
//! immediately: it yields a [`ScheduledAdvance`] the host fires after a short
//! delay, so the triggering command's output settles first.
//!
//! Every restart, reset, or interrupt bumps the generation, which turns any
//! advance still in flight into a no-op.

use std::collections::BTreeSet;

use crate::config::HELP_FLAGS;
use crate::core::path::{home, resolve_path};
use crate::utils::markup::{self, Style};

/// What a step waits for.
#[derive(Clone, Copy)]
pub enum ExpectedCommand {
    /// The re-joined command line must equal this exactly.
    Literal(&'static str),
    /// Called with the command line and the visible command names.
    Predicate(fn(&str, &[&str]) -> bool),
}

impl ExpectedCommand {
    pub fn matches(&self, line: &str, commands: &[&str]) -> bool {
        match self {
            Self::Literal(expected) => line == *expected,
            Self::Predicate(predicate) => predicate(line, commands),
        }
    }
}

impl std::fmt::Debug for ExpectedCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(expected) => f.debug_tuple("Literal").field(expected).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// One instructional step.
#[derive(Debug)]
pub struct TutorialStep {
    pub title: &'static str,
    pub description: &'static str,
    pub instruction: &'static str,
    pub expected: ExpectedCommand,
    pub hint: &'static str,
    /// Shown above the next step once this one is completed.
    pub explanation: &'static str,
}

fn is_touch(line: &str, _commands: &[&str]) -> bool {
    let mut words = line.split_whitespace();
    words.next() == Some("touch") && words.next().is_some()
}

fn is_echo_redirect(line: &str, _commands: &[&str]) -> bool {
    let words: Vec<&str> = line.split_whitespace().collect();
    words.first() == Some(&"echo")
        && words
            .iter()
            .position(|w| *w == ">" || *w == ">>")
            .is_some_and(|pos| pos + 2 == words.len())
}

/// A known command followed by a help flag anywhere in its arguments.
fn is_help_request(line: &str, commands: &[&str]) -> bool {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return false;
    };
    commands.contains(&name) && words.any(|w| HELP_FLAGS.contains(&w))
}

fn is_cd_home(line: &str, _commands: &[&str]) -> bool {
    let mut words = line.split_whitespace();
    if words.next() != Some("cd") {
        return false;
    }
    match (words.next(), words.next()) {
        (None, _) => true,
        (Some(path), None) => path.starts_with(['~', '/']) && resolve_path(path, &[]) == home(),
        _ => false,
    }
}

/// The tour, in order.
pub static STEPS: &[TutorialStep] = &[
    TutorialStep {
        title: "Where am I?",
        description: "The shell always has a working directory. Relative paths start from there.",
        instruction: "Type pwd to print the working directory.",
        expected: ExpectedCommand::Literal("pwd"),
        hint: "Just the three letters: pwd",
        explanation: "pwd printed /home/user, your home directory. The prompt shows it as ~.",
    },
    TutorialStep {
        title: "Look around",
        description: "Directories hold files and other directories.",
        instruction: "Type ls to list what is here.",
        expected: ExpectedCommand::Literal("ls"),
        hint: "Try: ls",
        explanation: "Names ending in / are directories. Add -l for sizes and dates, -a for hidden files.",
    },
    TutorialStep {
        title: "Change directory",
        description: "cd moves you into another directory.",
        instruction: "Type cd documents to enter the documents directory.",
        expected: ExpectedCommand::Literal("cd documents"),
        hint: "Try: cd documents",
        explanation: "You are now in ~/documents. cd .. goes back up one level.",
    },
    TutorialStep {
        title: "Read a file",
        description: "cat prints the contents of a file.",
        instruction: "Type cat notes.txt to read the notes.",
        expected: ExpectedCommand::Literal("cat notes.txt"),
        hint: "Try: cat notes.txt",
        explanation: "Press Tab while typing a path to see completions.",
    },
    TutorialStep {
        title: "Create a file",
        description: "touch creates an empty file, or updates the timestamp of an existing one.",
        instruction: "Create a file with touch, for example touch ideas.txt.",
        expected: ExpectedCommand::Predicate(is_touch),
        hint: "Try: touch ideas.txt",
        explanation: "Running touch again on the same file only updates its timestamp.",
    },
    TutorialStep {
        title: "Write to a file",
        description: "echo prints text. Redirect it with > to replace a file, or >> to append.",
        instruction: "Write some text into a file, for example echo \"hello\" > ideas.txt.",
        expected: ExpectedCommand::Predicate(is_echo_redirect),
        hint: "Try: echo \"hello\" > ideas.txt",
        explanation: "Use cat to read back what you wrote.",
    },
    TutorialStep {
        title: "Ask for help",
        description: "Every command explains itself when given --help or -h.",
        instruction: "Ask any command for help, for example ls --help.",
        expected: ExpectedCommand::Predicate(is_help_request),
        hint: "Try: ls --help or cat -h",
        explanation: "Type help to see every available command.",
    },
    TutorialStep {
        title: "Go home",
        description: "cd with no path, or with ~, always brings you home.",
        instruction: "Return to your home directory.",
        expected: ExpectedCommand::Predicate(is_cd_home),
        hint: "Try: cd ~",
        explanation: "You are back in ~.",
    },
];

/// Where the tour is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TutorialState {
    #[default]
    Inactive,
    AwaitingStep(usize),
    Completed,
}

/// A pending advance, valid only for the generation that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledAdvance {
    pub generation: u64,
    pub step: usize,
}

/// Progress through [`STEPS`].
#[derive(Clone, Debug, Default)]
pub struct Tutorial {
    state: TutorialState,
    completed: BTreeSet<usize>,
    pending_success: Option<&'static str>,
    generation: u64,
    /// Step whose advance has been scheduled but not fired.
    queued: Option<usize>,
}

impl Tutorial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TutorialState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, TutorialState::AwaitingStep(_))
    }

    pub fn completed_steps(&self) -> &BTreeSet<usize> {
        &self.completed
    }

    /// Restart from the first step and render it.
    pub fn start(&mut self) -> String {
        self.reset();
        self.state = TutorialState::AwaitingStep(0);
        format!(
            "{}<br><br>{}",
            markup::span(Style::Heading, "Welcome to the guided tour."),
            render_step(0, None)
        )
    }

    /// Forget all progress and invalidate pending advances.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = TutorialState::Inactive;
        self.completed.clear();
        self.pending_success = None;
        self.queued = None;
    }

    /// Match a submitted line against the current step.
    ///
    /// Returns the advance to schedule on a match. A step whose advance is
    /// already queued ignores further matches.
    pub fn check(&mut self, line: &str, commands: &[&str]) -> Option<ScheduledAdvance> {
        let TutorialState::AwaitingStep(index) = self.state else {
            return None;
        };
        if self.queued == Some(index) {
            return None;
        }
        let step = STEPS.get(index)?;
        if !step.expected.matches(line.trim(), commands) {
            return None;
        }

        log::debug!("tutorial step {} matched by '{}'", index, line);
        self.completed.insert(index);
        self.pending_success = Some(step.explanation);
        self.queued = Some(index);
        Some(ScheduledAdvance {
            generation: self.generation,
            step: index,
        })
    }

    /// Apply a scheduled advance and render what comes next.
    ///
    /// Stale advances (older generation, or a step no longer current) return
    /// `None` and change nothing.
    pub fn advance(&mut self, advance: ScheduledAdvance) -> Option<String> {
        if advance.generation != self.generation
            || self.state != TutorialState::AwaitingStep(advance.step)
        {
            return None;
        }

        self.queued = None;
        let success = self.pending_success.take();
        let next = advance.step + 1;
        if next < STEPS.len() {
            self.state = TutorialState::AwaitingStep(next);
            Some(render_step(next, success))
        } else {
            self.state = TutorialState::Completed;
            Some(render_completion(success, self.completed.len()))
        }
    }

    /// Leave the tour. Returns the notice to show, or `None` if inactive.
    pub fn interrupt(&mut self) -> Option<String> {
        if !self.is_active() {
            return None;
        }
        self.reset();
        Some(render_interrupted())
    }
}

fn render_success(success: Option<&str>) -> Option<String> {
    success.map(|text| markup::success(&format!("✓ {}", text)))
}

/// Render step `index`, preceded by the previous step's explanation.
pub fn render_step(index: usize, success: Option<&str>) -> String {
    let Some(step) = STEPS.get(index) else {
        return String::new();
    };

    let mut lines: Vec<String> = render_success(success).into_iter().collect();
    lines.push(markup::span(
        Style::Heading,
        &format!("Step {}/{}: {}", index + 1, STEPS.len(), step.title),
    ));
    lines.push(markup::breaks(step.description));
    lines.push(format!("→ {}", markup::span(Style::Command, step.instruction)));
    lines.push(markup::span(Style::Muted, &format!("Hint: {}", step.hint)));
    lines.push(markup::span(
        Style::Muted,
        "Press Ctrl+C to leave the tour.",
    ));
    markup::lines(lines)
}

/// Render the end-of-tour summary.
pub fn render_completion(success: Option<&str>, completed: usize) -> String {
    let mut lines: Vec<String> = render_success(success).into_iter().collect();
    lines.push(markup::span(Style::Heading, "Tour complete!"));
    lines.push(format!(
        "You finished {} of {} steps. Type {} to see everything else you can do.",
        completed,
        STEPS.len(),
        markup::span(Style::Command, "help")
    ));
    markup::lines(lines)
}

pub fn render_interrupted() -> String {
    markup::info("Tour interrupted. Type 'demo' to start again.")
}

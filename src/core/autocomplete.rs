//! Live completion suggestions for the input line.
//!
//! [`suggest`] is pure: the same input, command list, and filesystem snapshot
//! always produce the same ordered list.
//!
//! Two modes:
//! - A single bare token (no trailing space) yields whole lines, either the
//!   command's common forms (`cd ..`, `theme list`, `weather London`) or
//!   command names starting with the token
//! - Anything longer yields values for the last token, chosen by the first
//!   token and filtered by case-insensitive prefix
//!
//! A last token containing `/` completes relative to its directory part.

use crate::config::{
    CURL_EXAMPLES, QR_EXAMPLES, RECURSIVE_FLAG, STOCK_EXAMPLES, THEME_SUBCOMMANDS, THEMES,
    WEATHER_EXAMPLES,
};
use crate::core::filesystem::VirtualFs;
use crate::core::path::resolve_path;
use crate::models::DirEntry;

// ============================================================================
// Input Position
// ============================================================================

/// Where the cursor sits in the typed line.
struct Position<'a> {
    tokens: Vec<&'a str>,
    /// Token being completed; empty after trailing whitespace.
    last: &'a str,
    trailing: bool,
}

impl<'a> Position<'a> {
    fn parse(input: &'a str) -> Option<Self> {
        let tokens: Vec<&str> = input.split_whitespace().collect();
        if tokens.is_empty() {
            return None;
        }
        let trailing = input.ends_with(char::is_whitespace);
        let last = if trailing {
            ""
        } else {
            tokens.last().copied().unwrap_or("")
        };
        Some(Self {
            tokens,
            last,
            trailing,
        })
    }

    fn is_bare_command(&self) -> bool {
        self.tokens.len() == 1 && !self.trailing
    }

    /// Arguments before the one being completed.
    fn previous_args(&self) -> &[&'a str] {
        let end = if self.trailing {
            self.tokens.len()
        } else {
            self.tokens.len() - 1
        };
        &self.tokens[1..end.max(1)]
    }
}

/// Which filesystem entries a command takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EntryKind {
    Dirs,
    Files,
}

// ============================================================================
// Public API
// ============================================================================

/// Ordered completion candidates for `input`.
///
/// `commands` are the visible command names.
pub fn suggest(input: &str, commands: &[&str], fs: &VirtualFs, cwd: &[String]) -> Vec<String> {
    let Some(position) = Position::parse(input) else {
        return Vec::new();
    };

    if position.is_bare_command() {
        suggest_command(position.tokens[0], commands, fs, cwd)
    } else {
        suggest_argument(&position, fs, cwd)
    }
}

/// Ghost-text hint: the suffix the first suggestion would add to `input`.
pub fn hint(input: &str, commands: &[&str], fs: &VirtualFs, cwd: &[String]) -> Option<String> {
    let position = Position::parse(input)?;
    let stem = &input[..input.len() - position.last.len()];

    suggest(input, commands, fs, cwd)
        .into_iter()
        .map(|candidate| {
            if position.is_bare_command() {
                candidate
            } else {
                format!("{}{}", stem, candidate)
            }
        })
        .find(|line| line.len() > input.len() && line.starts_with(input))
        .map(|line| line[input.len()..].to_string())
}

// ============================================================================
// Command Position
// ============================================================================

fn suggest_command(token: &str, commands: &[&str], fs: &VirtualFs, cwd: &[String]) -> Vec<String> {
    let forms: Vec<String> = match token {
        "theme" => prefixed(token, THEME_SUBCOMMANDS),
        "weather" => prefixed(token, WEATHER_EXAMPLES),
        "qr" => prefixed(token, QR_EXAMPLES),
        "cd" => {
            let mut forms = vec!["cd ..".to_string()];
            forms.extend(prefixed(token, visible(fs, cwd, "", EntryKind::Dirs)));
            forms
        }
        "cat" => prefixed(token, visible(fs, cwd, "", EntryKind::Files)),
        "rm" => {
            let mut forms = prefixed(token, visible(fs, cwd, "", EntryKind::Files));
            forms.extend(
                visible(fs, cwd, "", EntryKind::Dirs)
                    .into_iter()
                    .map(|dir| format!("rm {} {}", RECURSIVE_FLAG, dir)),
            );
            forms
        }
        _ => return complete_name(token, commands),
    };
    forms
}

/// Command names starting with `token`, shortest first.
fn complete_name(token: &str, commands: &[&str]) -> Vec<String> {
    let lower = token.to_lowercase();
    let mut matches: Vec<&str> = commands
        .iter()
        .copied()
        .filter(|name| name.starts_with(&lower))
        .collect();
    matches.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));

    if matches.len() == 1 && matches[0] == token {
        return Vec::new();
    }
    matches.into_iter().map(str::to_string).collect()
}

fn prefixed<S: AsRef<str>>(command: &str, values: impl IntoIterator<Item = S>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| format!("{} {}", command, v.as_ref()))
        .collect()
}

// ============================================================================
// Argument Position
// ============================================================================

fn suggest_argument(position: &Position<'_>, fs: &VirtualFs, cwd: &[String]) -> Vec<String> {
    let command = position.tokens[0];
    let previous = position.previous_args();
    let partial = position.last;

    let candidates: Vec<String> = match command {
        "weather" => owned(WEATHER_EXAMPLES),
        "curl" => owned(CURL_EXAMPLES),
        "qr" => owned(QR_EXAMPLES),
        "stock" => owned(STOCK_EXAMPLES),
        "theme" => match previous {
            [] => owned(THEME_SUBCOMMANDS),
            ["set"] => owned(THEMES),
            _ => Vec::new(),
        },
        "cd" if partial.contains('/') => return entries(fs, cwd, partial, EntryKind::Dirs),
        "cd" => {
            let mut candidates = vec!["..".to_string()];
            candidates.extend(visible(fs, cwd, partial, EntryKind::Dirs));
            candidates
        }
        "ls" | "tree" => return entries(fs, cwd, partial, EntryKind::Dirs),
        "cat" => return entries(fs, cwd, partial, EntryKind::Files),
        "grep" if previous.iter().any(|a| !a.starts_with('-')) => {
            return entries(fs, cwd, partial, EntryKind::Files);
        }
        "rm" if previous.iter().any(|a| is_recursive(a)) => {
            return entries(fs, cwd, partial, EntryKind::Dirs);
        }
        "rm" if partial.contains('/') => return entries(fs, cwd, partial, EntryKind::Files),
        "rm" => {
            let mut candidates = visible(fs, cwd, partial, EntryKind::Files);
            candidates.push(RECURSIVE_FLAG.to_string());
            candidates
        }
        _ => Vec::new(),
    };

    filter_prefix(candidates, partial)
}

fn is_recursive(arg: &str) -> bool {
    arg.strip_prefix('-')
        .is_some_and(|flags| flags.contains(['r', 'R']))
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn filter_prefix(candidates: Vec<String>, partial: &str) -> Vec<String> {
    let lower = partial.to_lowercase();
    candidates
        .into_iter()
        .filter(|c| c.to_lowercase().starts_with(&lower))
        .collect()
}

// ============================================================================
// Filesystem Entries
// ============================================================================

fn matches_kind(entry: &DirEntry, kind: EntryKind) -> bool {
    match kind {
        EntryKind::Dirs => entry.is_dir,
        EntryKind::Files => !entry.is_dir,
    }
}

/// Names of `kind` in the working directory, hidden ones only when asked for.
fn visible(fs: &VirtualFs, cwd: &[String], partial: &str, kind: EntryKind) -> Vec<String> {
    let show_hidden = partial.starts_with('.');
    fs.entries(cwd)
        .into_iter()
        .filter(|e| matches_kind(e, kind) && (show_hidden || !e.is_hidden()))
        .map(|e| e.name)
        .collect()
}

/// Entries completing `partial`, which may carry a directory part.
///
/// Candidates keep the directory part as typed, so they replace the whole
/// last token.
fn entries(fs: &VirtualFs, cwd: &[String], partial: &str, kind: EntryKind) -> Vec<String> {
    let (dir_part, name_part) = match partial.rfind('/') {
        Some(idx) => (&partial[..=idx], &partial[idx + 1..]),
        None => ("", partial),
    };
    let search_dir = if dir_part.is_empty() {
        cwd.to_vec()
    } else {
        resolve_path(dir_part, cwd)
    };

    visible(fs, &search_dir, name_part, kind)
        .into_iter()
        .filter(|name| name.to_lowercase().starts_with(&name_part.to_lowercase()))
        .map(|name| format!("{}{}", dir_part, name))
        .collect()
}

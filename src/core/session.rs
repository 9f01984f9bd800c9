//! Mutable state of one running shell.

use crate::config::{APP_NAME, ShellConfig, THEMES, USER_NAME};
use crate::core::filesystem::VirtualFs;
use crate::core::path::{home, prompt_path};
use crate::core::tutorial::{ScheduledAdvance, Tutorial};
use crate::models::HistoryLog;

/// Everything a command may read or change.
///
/// Commands receive it through [`crate::core::commands::Context`]; nothing is
/// global, so independent sessions never share state.
#[derive(Clone, Debug)]
pub struct Session {
    pub fs: VirtualFs,
    /// Working directory. Always resolves to a directory in `fs`.
    pub cwd: Vec<String>,
    pub tutorial: Tutorial,
    pub history: HistoryLog,
    pub theme: String,
    /// Tutorial advances waiting for the host to fire them.
    pub scheduled: Vec<ScheduledAdvance>,
}

impl Session {
    pub fn new(config: &ShellConfig) -> Self {
        Self::with_history(HistoryLog::new(
            config.max_history_records,
            config.max_recall_entries,
        ))
    }

    /// A fresh session around previously persisted history.
    pub fn with_history(history: HistoryLog) -> Self {
        Self {
            fs: VirtualFs::initial(),
            cwd: home(),
            tutorial: Tutorial::new(),
            history,
            theme: default_theme(),
            scheduled: Vec::new(),
        }
    }

    /// Restore the initial tree, go home, stop the tutorial, and drop both
    /// history logs.
    pub fn reset(&mut self) {
        self.fs = VirtualFs::initial();
        self.cwd = home();
        self.tutorial.reset();
        self.history.clear_all();
        self.theme = default_theme();
        self.scheduled.clear();
    }

    /// Prompt text, e.g. `user@webterm:~/documents$`.
    pub fn prompt(&self) -> String {
        format!("{}@{}:{}$", USER_NAME, APP_NAME, prompt_path(&self.cwd))
    }
}

fn default_theme() -> String {
    THEMES.first().copied().unwrap_or("dark").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_follows_cwd() {
        let mut session = Session::new(&ShellConfig::default());
        assert_eq!(session.prompt(), "user@webterm:~$");
        session.cwd.push("documents".to_string());
        assert_eq!(session.prompt(), "user@webterm:~/documents$");
        session.cwd.clear();
        assert_eq!(session.prompt(), "user@webterm:/$");
    }

    #[test]
    fn test_reset() {
        let config = ShellConfig::default();
        let mut session = Session::new(&config);
        session.theme = "matrix".to_string();
        session.tutorial.start();
        session.history.remember("ls");
        session.reset();
        assert_eq!(session.theme, "dark");
        assert!(!session.tutorial.is_active());
        assert!(session.history.recall().is_empty());
        assert_eq!(session.cwd, home());
    }
}

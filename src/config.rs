//! Shell configuration.
//!
//! Compile-time constants live at the top level of this module. Values a host
//! may want to tune at startup are grouped in [`ShellConfig`], which can be
//! deserialized from JSON.

use serde::{Deserialize, Serialize};

// =============================================================================
// Identity
// =============================================================================

/// Host name shown in the prompt.
pub const APP_NAME: &str = "webterm";

/// User name shown in the prompt and by `whoami`.
pub const USER_NAME: &str = "user";

/// Segments of the home directory (`~`).
pub const HOME_SEGMENTS: &[&str] = &["home", "user"];

// =============================================================================
// Persistence
// =============================================================================

/// Storage key for the display history log.
pub const HISTORY_KEY: &str = "webterm.history";

/// Storage key for the command recall log.
pub const RECALL_KEY: &str = "webterm.recall";

// =============================================================================
// Commands
// =============================================================================

/// Flags that short-circuit any command into its help text.
pub const HELP_FLAGS: &[&str] = &["--help", "-h"];

/// Recursive flag accepted by `rm`.
pub const RECURSIVE_FLAG: &str = "-r";

/// Name of the hidden command the shell uses for tutorial matching.
pub const TUTORIAL_CHECK_COMMAND: &str = "_internalTutorialCheck";

/// Example arguments offered for `weather`.
pub const WEATHER_EXAMPLES: &[&str] = &["London", "New York", "Paris", "Seoul", "Tokyo"];

/// Example arguments offered for `qr`.
pub const QR_EXAMPLES: &[&str] = &["https://example.com", "hello world"];

/// Example arguments offered for `curl`.
pub const CURL_EXAMPLES: &[&str] = &["https://example.com", "https://httpbin.org/get"];

/// Example arguments offered for `stock`.
pub const STOCK_EXAMPLES: &[&str] = &["AAPL", "GOOG", "MSFT", "TSLA"];

/// Subcommands of `theme`.
pub const THEME_SUBCOMMANDS: &[&str] = &["list", "current", "set"];

/// Available color themes. The first one is the default.
pub const THEMES: &[&str] = &["dark", "light", "matrix", "dracula", "solarized"];

/// Number of simulated progress ticks `curl` prints while downloading.
pub const CURL_PROGRESS_TICKS: usize = 4;

/// Browser fetch timeout in milliseconds.
pub const FETCH_TIMEOUT_MS: u32 = 10_000;

// =============================================================================
// Runtime Configuration
// =============================================================================

/// Host-tunable shell settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Base URL externally stored file bodies are fetched from.
    pub content_base_url: String,
    /// Weather service URL; `{query}` is replaced by the city.
    pub weather_url: String,
    /// Stock quote service URL; `{query}` is replaced by the symbol.
    pub stock_url: String,
    /// CORS proxy used by `curl`; `{query}` is replaced by the target URL.
    pub proxy_url: String,
    /// Delay before a matched tutorial step advances.
    pub tutorial_advance_delay_ms: u32,
    /// Delay between `curl` progress ticks.
    pub progress_tick_ms: u32,
    /// Maximum number of display history records kept.
    pub max_history_records: usize,
    /// Maximum number of recall entries kept.
    pub max_recall_entries: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            content_base_url: "/content".to_string(),
            weather_url: "https://wttr.in/{query}?format=3".to_string(),
            stock_url: "https://stooq.com/q/l/?s={query}.us&f=sd2t2ohlcv&h&e=csv".to_string(),
            proxy_url: "https://api.allorigins.win/raw?url={query}".to_string(),
            tutorial_advance_delay_ms: 800,
            progress_tick_ms: 250,
            max_history_records: 500,
            max_recall_entries: 100,
        }
    }
}

impl ShellConfig {
    /// Parse a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Build the URL of an externally stored file body.
    pub fn content_url(&self, source: &str) -> String {
        format!(
            "{}/{}",
            self.content_base_url.trim_end_matches('/'),
            source.trim_start_matches('/')
        )
    }
}

/// Substitute `{query}` in a service URL template, percent-encoding the value.
pub fn fill_template(template: &str, query: &str) -> String {
    template.replace("{query}", &urlencoding::encode(query))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_keeps_defaults() {
        let config = ShellConfig::from_json(r#"{"content_base_url": "https://cdn.test"}"#)
            .expect("valid config");
        assert_eq!(config.content_base_url, "https://cdn.test");
        assert_eq!(config.max_recall_entries, 100);
    }

    #[test]
    fn test_content_url() {
        let config = ShellConfig {
            content_base_url: "https://cdn.test/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.content_url("/docs/a.md"), "https://cdn.test/docs/a.md");
    }

    #[test]
    fn test_fill_template_encodes() {
        assert_eq!(
            fill_template("https://wttr.in/{query}", "New York"),
            "https://wttr.in/New%20York"
        );
        assert_eq!(
            fill_template("https://proxy.test/raw?url={query}", "https://a.b/c?d=é"),
            "https://proxy.test/raw?url=https%3A%2F%2Fa.b%2Fc%3Fd%3D%C3%A9"
        );
    }
}

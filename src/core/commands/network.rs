//! Network-backed commands: `weather`, `stock`, `curl`, and the offline `qr`.
//!
//! Requests go through the [`Host`] and resolve as deferred output. Every
//! suspension point checks the cancellation token; a cancelled request
//! resolves to `<cmd>: cancelled`, a failed one to `<cmd>: failed: <reason>`.

use std::rc::Rc;

use crate::config::{CURL_PROGRESS_TICKS, fill_template};
use crate::core::CancellationToken;
use crate::core::error::FetchError;
use crate::core::host::Host;
use crate::utils::markup::{self, Style};

use super::{CommandEntry, Context, Output};

/// Longest `curl` body shown before truncating.
const CURL_MAX_BODY: usize = 2000;

const WEATHER_HELP: &str = "\
Usage: weather <city>
Show the current weather for a city.

Examples:
  weather London
  weather New York";

const STOCK_HELP: &str = "\
Usage: stock <symbol>
Show the latest quote for a stock symbol.

Example:
  stock AAPL";

const CURL_HELP: &str = "\
Usage: curl <url>
Fetch a URL and print the response body.

Only http:// and https:// URLs are supported.";

const QR_HELP: &str = "\
Usage: qr <text>
Render text or a URL as a QR code.";

pub fn commands() -> Vec<CommandEntry> {
    vec![
        CommandEntry {
            name: "weather",
            handler: weather,
            summary: "Show the weather for a city",
            help: Some(WEATHER_HELP),
        },
        CommandEntry {
            name: "stock",
            handler: stock,
            summary: "Show a stock quote",
            help: Some(STOCK_HELP),
        },
        CommandEntry {
            name: "curl",
            handler: curl,
            summary: "Fetch a URL",
            help: Some(CURL_HELP),
        },
        CommandEntry {
            name: "qr",
            handler: qr,
            summary: "Generate a QR code",
            help: Some(QR_HELP),
        },
    ]
}

/// Why a request produced no body.
enum Failure {
    Cancelled,
    Fetch(FetchError),
    Invalid(String),
}

impl From<FetchError> for Failure {
    fn from(e: FetchError) -> Self {
        Self::Fetch(e)
    }
}

/// Fetch `url`, checking the token before and after the round trip.
async fn fetch_checked(
    host: &Rc<dyn Host>,
    cancel: &CancellationToken,
    url: &str,
) -> Result<String, Failure> {
    if cancel.is_cancelled() {
        return Err(Failure::Cancelled);
    }
    let body = host.fetch(url).await;
    if cancel.is_cancelled() {
        return Err(Failure::Cancelled);
    }
    Ok(body?)
}

/// Final markup of a request that produced no body.
fn render_failure(host: &Rc<dyn Host>, command: &str, failure: Failure) -> String {
    match failure {
        Failure::Cancelled => markup::info(&format!("{}: cancelled", command)),
        Failure::Fetch(e) => {
            log::warn!("{}: request failed: {}", command, e);
            host.failure_cue();
            markup::error(&format!("{}: failed: {}", command, e))
        }
        Failure::Invalid(reason) => {
            host.failure_cue();
            markup::error(&format!("{}: {}", command, reason))
        }
    }
}

fn weather(ctx: &mut Context<'_>, args: &[String]) -> Output {
    if args.is_empty() {
        return ctx.usage("weather");
    }

    let city = args.join(" ");
    let url = fill_template(&ctx.config.weather_url, &city);
    let host = ctx.host.clone();
    let cancel = ctx.cancel.clone();
    Output::deferred(async move {
        match fetch_checked(&host, &cancel, &url).await {
            Ok(body) => markup::breaks(body.trim()),
            Err(failure) => render_failure(&host, "weather", failure),
        }
    })
}

fn stock(ctx: &mut Context<'_>, args: &[String]) -> Output {
    let Some(symbol) = args.first() else {
        return ctx.usage("stock");
    };

    let symbol = symbol.to_uppercase();
    let url = fill_template(&ctx.config.stock_url, &symbol.to_lowercase());
    let host = ctx.host.clone();
    let cancel = ctx.cancel.clone();
    Output::deferred(async move {
        let quote = fetch_checked(&host, &cancel, &url)
            .await
            .and_then(|body| parse_quote(&symbol, &body));
        match quote {
            Ok(quote) => quote.render(),
            Err(failure) => render_failure(&host, "stock", failure),
        }
    })
}

/// One row of the quote service's CSV response.
#[derive(Debug, PartialEq)]
struct Quote {
    symbol: String,
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
}

impl Quote {
    fn render(&self) -> String {
        let change = self.close - self.open;
        let style = if change >= 0.0 {
            Style::Success
        } else {
            Style::Error
        };
        markup::lines([
            format!(
                "{} {}",
                markup::span(Style::Heading, &self.symbol),
                markup::span(Style::Muted, &self.date)
            ),
            format!(
                "close {:.2} {}",
                self.close,
                markup::span(style, &format!("({:+.2})", change))
            ),
            markup::span(
                Style::Muted,
                &format!(
                    "open {:.2}  high {:.2}  low {:.2}",
                    self.open, self.high, self.low
                ),
            ),
        ])
    }
}

/// Parse `Symbol,Date,Time,Open,High,Low,Close,Volume` with a header row.
///
/// The service reports unknown symbols as `N/D` fields.
fn parse_quote(symbol: &str, body: &str) -> Result<Quote, Failure> {
    let row = body
        .lines()
        .nth(1)
        .ok_or_else(|| Failure::Invalid("unexpected response".to_string()))?;
    let fields: Vec<&str> = row.split(',').map(str::trim).collect();
    if fields.len() < 7 {
        return Err(Failure::Invalid("unexpected response".to_string()));
    }
    if fields[6] == "N/D" {
        return Err(Failure::Invalid(format!("unknown symbol '{}'", symbol)));
    }

    let number = |i: usize| {
        fields[i]
            .parse::<f64>()
            .map_err(|_| Failure::Invalid("unexpected response".to_string()))
    };
    Ok(Quote {
        symbol: symbol.to_string(),
        date: fields[1].to_string(),
        open: number(3)?,
        high: number(4)?,
        low: number(5)?,
        close: number(6)?,
    })
}

fn curl(ctx: &mut Context<'_>, args: &[String]) -> Output {
    let Some(target) = args.first() else {
        return ctx.usage("curl");
    };
    if !(target.starts_with("http://") || target.starts_with("https://")) {
        return ctx.fail(format!(
            "curl: invalid URL '{}' (expected http:// or https://)",
            target
        ));
    }

    let url = fill_template(&ctx.config.proxy_url, target);
    let tick_ms = ctx.config.progress_tick_ms;
    let host = ctx.host.clone();
    let cancel = ctx.cancel.clone();
    Output::deferred(async move {
        let mut lines = Vec::new();
        for tick in 1..=CURL_PROGRESS_TICKS {
            if cancel.is_cancelled() {
                lines.push(render_failure(&host, "curl", Failure::Cancelled));
                return markup::lines(lines);
            }
            host.delay(tick_ms).await;
            let percent = tick * 100 / CURL_PROGRESS_TICKS;
            lines.push(markup::span(
                Style::Muted,
                &format!("downloading... {}%", percent),
            ));
        }

        match fetch_checked(&host, &cancel, &url).await {
            Ok(body) => lines.push(truncate_body(&body)),
            Err(failure) => lines.push(render_failure(&host, "curl", failure)),
        }
        markup::lines(lines)
    })
}

fn truncate_body(body: &str) -> String {
    let total = body.chars().count();
    if total <= CURL_MAX_BODY {
        return markup::breaks(body);
    }
    let shown: String = body.chars().take(CURL_MAX_BODY).collect();
    format!(
        "{}<br>{}",
        markup::breaks(&shown),
        markup::span(
            Style::Muted,
            &format!("... truncated ({} of {} characters shown)", CURL_MAX_BODY, total)
        )
    )
}

fn qr(ctx: &mut Context<'_>, args: &[String]) -> Output {
    if args.is_empty() {
        return ctx.usage("qr");
    }

    let text = args.join(" ");
    Output::text(markup::lines([
        markup::info(&format!("QR code for: {}", text)),
        markup::qr_block(&text),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commands::test_support::Harness;

    const QUOTE_CSV: &str = "Symbol,Date,Time,Open,High,Low,Close,Volume\n\
                             AAPL.US,2025-01-02,22:00:00,100.5,110,99.25,105.75,1000";

    #[tokio::test]
    async fn test_weather() {
        let mut h = Harness::new();
        h.mock.respond(
            "https://wttr.in/New%20York?format=3",
            Ok("New York: +5°C\n".to_string()),
        );
        let out = h.run("weather New York").settle().await;
        assert_eq!(out, "New York: +5°C");
    }

    #[tokio::test]
    async fn test_weather_failure_plays_cue() {
        let mut h = Harness::new();
        let out = h.run("weather Atlantis").settle().await;
        assert!(out.contains("weather: failed: HTTP error: 404"));
        assert_eq!(h.cues(), 1);
    }

    #[test]
    fn test_usage_without_arguments() {
        let mut h = Harness::new();
        assert!(h.text("weather").contains("Usage: weather"));
        assert!(h.text("stock").contains("Usage: stock"));
        assert!(h.text("curl").contains("Usage: curl"));
        assert!(h.text("qr").contains("Usage: qr"));
        assert_eq!(h.cues(), 0);
    }

    #[test]
    fn test_parse_quote() {
        let quote = parse_quote("AAPL", QUOTE_CSV).ok().unwrap();
        assert_eq!(quote.date, "2025-01-02");
        assert_eq!(quote.close, 105.75);
        assert!(quote.render().contains("(+5.25)"));
    }

    #[test]
    fn test_parse_quote_unknown_symbol() {
        let body = "Symbol,Date,Time,Open,High,Low,Close,Volume\nXX.US,N/D,N/D,N/D,N/D,N/D,N/D,N/D";
        assert!(matches!(
            parse_quote("XX", body),
            Err(Failure::Invalid(reason)) if reason == "unknown symbol 'XX'"
        ));
        assert!(matches!(parse_quote("XX", "garbage"), Err(Failure::Invalid(_))));
    }

    #[tokio::test]
    async fn test_stock() {
        let mut h = Harness::new();
        h.mock.respond(
            "https://stooq.com/q/l/?s=aapl.us&f=sd2t2ohlcv&h&e=csv",
            Ok(QUOTE_CSV.to_string()),
        );
        let out = h.run("stock aapl").settle().await;
        assert!(out.contains("AAPL"));
        assert!(out.contains("close 105.75"));
    }

    #[test]
    fn test_curl_rejects_non_http() {
        let mut h = Harness::new();
        let out = h.text("curl ftp://example.com");
        assert!(out.contains("curl: invalid URL"));
        assert_eq!(h.cues(), 1);
    }

    #[tokio::test]
    async fn test_curl_progress_and_body() {
        let mut h = Harness::new();
        h.mock.respond(
            "https://api.allorigins.win/raw?url=https%3A%2F%2Fexample.com",
            Ok("<html>".to_string()),
        );
        let out = h.run("curl https://example.com").settle().await;
        assert!(out.contains("downloading... 25%"));
        assert!(out.contains("downloading... 100%"));
        assert!(out.ends_with("&lt;html&gt;"));
    }

    #[tokio::test]
    async fn test_curl_cancelled_mid_progress() {
        let mut h = Harness::new();
        *h.mock.cancel_on_delay.borrow_mut() = Some(h.cancel.clone());
        let out = h.run("curl https://example.com").settle().await;
        assert!(out.contains("downloading... 25%"));
        assert!(!out.contains("50%"));
        assert!(out.contains("curl: cancelled"));
        assert!(h.mock.requests.borrow().is_empty());
        assert_eq!(h.cues(), 0);
    }

    #[test]
    fn test_truncate_body() {
        let long = "x".repeat(CURL_MAX_BODY + 10);
        let out = truncate_body(&long);
        assert!(out.contains(&format!("{} of {}", CURL_MAX_BODY, CURL_MAX_BODY + 10)));
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn test_qr() {
        let mut h = Harness::new();
        let out = h.text("qr hello world");
        assert!(out.contains("QR code for: hello world"));
        assert!(out.contains("data-qr=\"hello world\""));
    }
}

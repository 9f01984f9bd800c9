//! Browser bindings.
//!
//! [`WebShell`] is the JavaScript-facing entry point. It owns a [`Shell`]
//! wired to the browser: `fetch` for network commands, `localStorage` for
//! history, timers for delays and tutorial advances, and the console for logs.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_net::http::Request;
use gloo_timers::callback::Timeout;
use gloo_timers::future::TimeoutFuture;
use js_sys::{Function, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};
use web_sys::AbortController;

use crate::config::{FETCH_TIMEOUT_MS, ShellConfig};
use crate::core::{CancellationToken, FetchError, Host, LocalBoxFuture, Output, Shell, StorageError};
use crate::utils::storage::{MemoryStorage, Storage};

// =============================================================================
// Host
// =============================================================================

/// [`Host`] backed by the browser's `fetch` and timers.
pub struct WebHost {
    failure_cue: Option<Function>,
}

impl WebHost {
    /// `failure_cue` is called with no arguments whenever a command fails.
    pub fn new(failure_cue: Option<Function>) -> Self {
        Self { failure_cue }
    }
}

impl Host for WebHost {
    fn fetch(&self, url: &str) -> LocalBoxFuture<'static, Result<String, FetchError>> {
        let url = url.to_string();
        Box::pin(async move { fetch_text(&url).await })
    }

    fn delay(&self, ms: u32) -> LocalBoxFuture<'static, ()> {
        Box::pin(TimeoutFuture::new(ms))
    }

    fn failure_cue(&self) {
        if let Some(cue) = &self.failure_cue
            && let Err(e) = cue.call0(&JsValue::NULL)
        {
            log::warn!("failure cue threw: {:?}", e);
        }
    }
}

/// GET `url` and read the body as text, aborting after [`FETCH_TIMEOUT_MS`].
async fn fetch_text(url: &str) -> Result<String, FetchError> {
    let controller = AbortController::new()
        .map_err(|_| FetchError::NetworkError("AbortController unavailable".to_string()))?;

    let timed_out = Rc::new(Cell::new(false));
    let timer = {
        let controller = controller.clone();
        let timed_out = timed_out.clone();
        Timeout::new(FETCH_TIMEOUT_MS, move || {
            timed_out.set(true);
            controller.abort();
        })
    };

    let signal = controller.signal();
    let result = Request::get(url).abort_signal(Some(&signal)).send().await;
    // Dropping the timer clears it.
    drop(timer);

    let response = match result {
        Ok(response) => response,
        Err(_) if timed_out.get() => return Err(FetchError::Timeout),
        Err(e) => return Err(FetchError::NetworkError(e.to_string())),
    };

    if !response.ok() {
        return Err(FetchError::HttpError(response.status()));
    }

    response
        .text()
        .await
        .map_err(|_| FetchError::ResponseReadFailed)
}

// =============================================================================
// Storage
// =============================================================================

/// [`Storage`] backed by `window.localStorage`.
pub struct LocalStorage {
    inner: web_sys::Storage,
}

impl LocalStorage {
    pub fn open() -> Result<Self, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .map(|inner| Self { inner })
            .ok_or(StorageError::Unavailable)
    }
}

impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner
            .set_item(key, value)
            .map_err(|_| StorageError::WriteFailed(key.to_string()))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner
            .remove_item(key)
            .map_err(|_| StorageError::WriteFailed(key.to_string()))
    }
}

// =============================================================================
// Logging
// =============================================================================

struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&message),
            log::Level::Warn => web_sys::console::warn_1(&message),
            log::Level::Info => web_sys::console::info_1(&message),
            log::Level::Debug | log::Level::Trace => web_sys::console::debug_1(&message),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

fn init_logging() {
    if log::set_logger(&LOGGER).is_ok() {
        let level = if cfg!(debug_assertions) {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };
        log::set_max_level(level);
    }
}

// =============================================================================
// JavaScript API
// =============================================================================

/// A shell session exported to JavaScript.
///
/// ```js
/// const shell = new WebShell(null, () => beep(), (html) => append(html));
/// const html = await shell.process("ls -l");
/// ```
#[wasm_bindgen]
pub struct WebShell {
    shell: Rc<RefCell<Shell>>,
    /// Token of the most recent submission; `interrupt` cancels it.
    cancel: RefCell<CancellationToken>,
    on_advance: Option<Function>,
}

#[wasm_bindgen]
impl WebShell {
    /// `config_json` overrides [`ShellConfig`] fields. `failure_cue` is called
    /// on every failed command. `on_advance` receives tutorial step markup
    /// that arrives after a delay.
    #[wasm_bindgen(constructor)]
    pub fn new(
        config_json: Option<String>,
        failure_cue: Option<Function>,
        on_advance: Option<Function>,
    ) -> Result<WebShell, JsValue> {
        console_error_panic_hook::set_once();
        init_logging();

        let config = match config_json {
            Some(json) => {
                ShellConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?
            }
            None => ShellConfig::default(),
        };

        let storage: Rc<dyn Storage> = match LocalStorage::open() {
            Ok(storage) => Rc::new(storage),
            Err(e) => {
                log::warn!("{}; history will not persist", e);
                Rc::new(MemoryStorage::new())
            }
        };

        let shell = Shell::new(config, Rc::new(WebHost::new(failure_cue)), storage);
        Ok(Self {
            shell: Rc::new(RefCell::new(shell)),
            cancel: RefCell::new(CancellationToken::new()),
            on_advance,
        })
    }

    /// Run one input line. Resolves to the output markup.
    pub fn process(&self, line: String) -> Promise {
        let token = CancellationToken::new();
        *self.cancel.borrow_mut() = token.clone();

        let submission = self.shell.borrow_mut().submit(&line, &token);
        self.schedule_advances();

        let shell = self.shell.clone();
        future_to_promise(async move {
            let text = match submission.output {
                Output::Text(text) => text,
                Output::Deferred(future) => {
                    let text = future.await;
                    if let Some(record) = submission.record {
                        shell.borrow_mut().resolve(record, text.clone());
                    }
                    text
                }
            };
            Ok(JsValue::from_str(&text))
        })
    }

    /// Cancel the running command (Ctrl+C). Returns markup to show, if any.
    pub fn interrupt(&self) -> Option<String> {
        let token = self.cancel.borrow().clone();
        self.shell.borrow_mut().interrupt(&token)
    }

    /// Tab-completion candidates for `input`.
    pub fn suggest(&self, input: &str) -> Vec<String> {
        self.shell.borrow().suggest(input)
    }

    /// Inline completion hint: the text that would follow `input`.
    pub fn hint(&self, input: &str) -> Option<String> {
        self.shell.borrow().hint(input)
    }

    /// Step through recall history. Negative is older, positive is newer.
    pub fn recall(&self, direction: i32) -> Option<String> {
        self.shell.borrow_mut().recall(direction)
    }

    pub fn prompt(&self) -> String {
        self.shell.borrow().prompt()
    }

    pub fn theme(&self) -> String {
        self.shell.borrow().theme().to_string()
    }

    /// Display history as JSON, for re-rendering after a reload.
    pub fn history(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.shell.borrow().records())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl WebShell {
    /// Fire every queued tutorial advance after the configured delay.
    fn schedule_advances(&self) {
        let (advances, delay) = {
            let mut shell = self.shell.borrow_mut();
            let delay = shell.config().tutorial_advance_delay_ms;
            (shell.take_scheduled(), delay)
        };

        for advance in advances {
            let shell = self.shell.clone();
            let on_advance = self.on_advance.clone();
            spawn_local(async move {
                TimeoutFuture::new(delay).await;
                let Some(markup) = shell.borrow_mut().fire(advance) else {
                    return;
                };
                if let Some(callback) = on_advance
                    && let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&markup))
                {
                    log::warn!("tutorial callback threw: {:?}", e);
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_futures::JsFuture;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_local_storage_round_trip() {
        let storage = LocalStorage::open().unwrap();
        storage.set("webterm.test", "value").unwrap();
        assert_eq!(storage.get("webterm.test").as_deref(), Some("value"));
        storage.remove("webterm.test").unwrap();
        assert_eq!(storage.get("webterm.test"), None);
    }

    #[wasm_bindgen_test]
    async fn test_process_resolves_to_markup() {
        let shell = WebShell::new(None, None, None).unwrap();
        let value = JsFuture::from(shell.process("pwd".to_string()))
            .await
            .unwrap();
        assert_eq!(value.as_string().as_deref(), Some("/home/user"));
        assert_eq!(shell.prompt(), "user@webterm:~$");
    }

    #[wasm_bindgen_test]
    fn test_bad_config_is_rejected() {
        assert!(WebShell::new(Some("{not json".to_string()), None, None).is_err());
    }
}

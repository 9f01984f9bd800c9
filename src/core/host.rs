//! Capabilities the shell borrows from its host environment.

use std::future::Future;
use std::pin::Pin;

use crate::core::error::FetchError;

/// A boxed, non-`Send` future. The shell runs on a single thread.
pub type LocalBoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// External collaborators consumed by the shell core.
pub trait Host {
    /// Fetch a URL and return its body as text.
    fn fetch(&self, url: &str) -> LocalBoxFuture<'static, Result<String, FetchError>>;

    /// Resolve after roughly `ms` milliseconds.
    fn delay(&self, ms: u32) -> LocalBoxFuture<'static, ()>;

    /// Play the audible failure cue.
    fn failure_cue(&self);
}

/// A host with no network and no sound, for headless use.
///
/// Every fetch fails and delays resolve immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineHost;

impl Host for OfflineHost {
    fn fetch(&self, _url: &str) -> LocalBoxFuture<'static, Result<String, FetchError>> {
        Box::pin(std::future::ready(Err(FetchError::NetworkError(
            "offline".to_string(),
        ))))
    }

    fn delay(&self, _ms: u32) -> LocalBoxFuture<'static, ()> {
        Box::pin(std::future::ready(()))
    }

    fn failure_cue(&self) {}
}

#[cfg(test)]
pub(crate) mod mock {
    //! Scripted host for tests.

    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    use super::*;
    use crate::core::CancellationToken;

    /// Answers fetches from a table and counts failure cues.
    #[derive(Default)]
    pub struct MockHost {
        pub responses: RefCell<HashMap<String, Result<String, FetchError>>>,
        pub requests: RefCell<Vec<String>>,
        pub cues: Cell<usize>,
        /// Cancelled by `delay`, to simulate a user interrupt mid-flight.
        pub cancel_on_delay: RefCell<Option<CancellationToken>>,
    }

    impl MockHost {
        pub fn respond(&self, url: &str, response: Result<String, FetchError>) {
            self.responses
                .borrow_mut()
                .insert(url.to_string(), response);
        }
    }

    impl Host for MockHost {
        fn fetch(&self, url: &str) -> LocalBoxFuture<'static, Result<String, FetchError>> {
            self.requests.borrow_mut().push(url.to_string());
            let response = self
                .responses
                .borrow()
                .get(url)
                .cloned()
                .unwrap_or(Err(FetchError::HttpError(404)));
            Box::pin(std::future::ready(response))
        }

        fn delay(&self, _ms: u32) -> LocalBoxFuture<'static, ()> {
            if let Some(token) = self.cancel_on_delay.borrow().as_ref() {
                token.cancel();
            }
            Box::pin(std::future::ready(()))
        }

        fn failure_cue(&self) {
            self.cues.set(self.cues.get() + 1);
        }
    }
}

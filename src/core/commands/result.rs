//! Command output type.

use std::fmt;

use crate::core::host::LocalBoxFuture;

/// Result of running a command handler.
///
/// Most commands finish synchronously. Commands backed by the network return
/// a future the host must drive to completion; it always resolves to a
/// displayable string, including on failure or cancellation.
pub enum Output {
    /// Markup ready for display (may be empty).
    Text(String),
    /// Markup produced later.
    Deferred(LocalBoxFuture<'static, String>),
}

impl Output {
    /// An output that prints nothing.
    pub fn empty() -> Self {
        Self::Text(String::new())
    }

    pub fn text(markup: impl Into<String>) -> Self {
        Self::Text(markup.into())
    }

    pub fn deferred(future: impl Future<Output = String> + 'static) -> Self {
        Self::Deferred(Box::pin(future))
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }

    /// The ready markup, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Deferred(_) => None,
        }
    }

    /// Wait for the final markup.
    pub async fn settle(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Deferred(future) => future.await,
        }
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

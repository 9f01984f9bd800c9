//! Utility modules for output markup, formatting, and persistence.
//!
//! Provides:
//! - [`BoundedLog`] - Capacity-bounded append log
//! - [`markup`] - Escaped, styled HTML fragments
//! - [`format`] - Size and date formatting for listings
//! - [`Storage`], [`MemoryStorage`] - Key-value persistence

mod bounded_log;
pub mod format;
pub mod markup;
pub mod storage;

pub use bounded_log::BoundedLog;
pub use storage::{MemoryStorage, Storage};

/// Current Unix time in seconds.
#[cfg(target_arch = "wasm32")]
pub fn now_secs() -> u64 {
    (js_sys::Date::now() / 1000.0) as u64
}

/// Current Unix time in seconds.
#[cfg(not(target_arch = "wasm32"))]
pub fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

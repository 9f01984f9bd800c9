//! Error types for the shell core.
//!
//! - [`FsError`] - Virtual filesystem lookup and mutation failures
//! - [`FetchError`] - Host network failures
//! - [`StorageError`] - Persistence failures
//!
//! None of these reach the user as errors: command handlers render them into
//! the output string.

use thiserror::Error;

/// Virtual filesystem errors.
///
/// `path` is the path as the user typed it when a handler relabels the error,
/// otherwise the absolute path of the failing node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
    #[error("{path}: No such file or directory{}", did_you_mean(.suggestion))]
    NotFound {
        path: String,
        suggestion: Option<String>,
    },
    #[error("{path}: Not a directory")]
    NotADirectory { path: String },
    #[error("{path}: Is a directory")]
    IsADirectory { path: String },
    #[error("cannot create directory '{path}': File exists")]
    FileExists { path: String },
    #[error("cannot remove '{path}': Directory not empty (use -r)")]
    DirectoryNotEmpty { path: String },
    #[error("cannot remove '{path}': Device or resource busy")]
    Busy { path: String },
    #[error("{path}: Invalid target")]
    InvalidTarget { path: String },
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(name) => format!(". Did you mean '{}'?", name),
        None => String::new(),
    }
}

impl FsError {
    /// Replace the path carried by the error with the user's spelling.
    pub fn relabel(self, path: &str) -> Self {
        let path = path.to_string();
        match self {
            Self::NotFound { suggestion, .. } => Self::NotFound { path, suggestion },
            Self::NotADirectory { .. } => Self::NotADirectory { path },
            Self::IsADirectory { .. } => Self::IsADirectory { path },
            Self::FileExists { .. } => Self::FileExists { path },
            Self::DirectoryNotEmpty { .. } => Self::DirectoryNotEmpty { path },
            Self::Busy { .. } => Self::Busy { path },
            Self::InvalidTarget { .. } => Self::InvalidTarget { path },
        }
    }
}

/// Network/fetch-related errors reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Network request failed (CORS, DNS, offline, ...)
    #[error("network error: {0}")]
    NetworkError(String),
    /// Non-2xx response
    #[error("HTTP error: {0}")]
    HttpError(u16),
    /// Failed to read response body
    #[error("failed to read response")]
    ResponseReadFailed,
    /// Request timed out
    #[error("request timed out")]
    Timeout,
}

/// Persistence errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage not available")]
    Unavailable,
    #[error("failed to serialize: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("failed to write '{0}'")]
    WriteFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = FsError::NotFound {
            path: "docs".to_string(),
            suggestion: None,
        };
        assert_eq!(err.to_string(), "docs: No such file or directory");

        let err = FsError::NotFound {
            path: "Docs".to_string(),
            suggestion: Some("docs".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Docs: No such file or directory. Did you mean 'docs'?"
        );
    }

    #[test]
    fn test_relabel_keeps_suggestion() {
        let err = FsError::NotFound {
            path: "/home/user/Docs".to_string(),
            suggestion: Some("docs".to_string()),
        }
        .relabel("Docs");
        assert_eq!(
            err,
            FsError::NotFound {
                path: "Docs".to_string(),
                suggestion: Some("docs".to_string()),
            }
        );
    }

    #[test]
    fn test_conflict_messages() {
        let err = FsError::DirectoryNotEmpty {
            path: "docs".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "cannot remove 'docs': Directory not empty (use -r)"
        );
        let err = FsError::FileExists {
            path: "docs".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "cannot create directory 'docs': File exists"
        );
    }

    #[test]
    fn test_fetch_error_display() {
        assert_eq!(FetchError::HttpError(404).to_string(), "HTTP error: 404");
        assert_eq!(FetchError::Timeout.to_string(), "request timed out");
    }
}

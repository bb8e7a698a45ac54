//! Error types for directory-service operations.
//!
//! Errors are categorized so callers can decide whether an operation is
//! worth retrying. Rate limiting and network failures are transient; the
//! rest are permanent for the current call.

use thiserror::Error;

/// Categories of directory errors for retry logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Throttled by the service (transient, retryable)
    RateLimited,
    /// Network-related failure (transient, retryable)
    Network,
    /// Account or OU does not exist
    NotFound,
    /// A sibling with the same name already exists
    AlreadyExists,
    /// OU still holds child OUs or accounts
    NotEmpty,
    /// Caller lacks permission for the operation
    Permission,
    /// Request conflicts with current directory state
    Conflict,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Whether this error category is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::Network)
    }
}

/// Errors returned by directory-service operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The service throttled the request
    #[error("rate limited: {message}")]
    RateLimited {
        /// Detail from the throttled call
        message: String,
    },

    /// Connection, timeout, or DNS failure
    #[error("network error: {message}")]
    Network {
        /// Detail from the failed network operation
        message: String,
    },

    /// Account or OU not found
    #[error("not found: {entity}")]
    NotFound {
        /// Identifier or name of the missing entity
        entity: String,
    },

    /// Sibling name collision on create or rename
    #[error("already exists: {name}")]
    AlreadyExists {
        /// The colliding name
        name: String,
    },

    /// Delete refused because the OU is not empty
    #[error("organizational unit not empty: {entity}")]
    NotEmpty {
        /// Identifier of the non-empty OU
        entity: String,
    },

    /// Permission denied
    #[error("permission denied: {message}")]
    Permission {
        /// Details about what permission was denied
        message: String,
    },

    /// The request conflicts with current directory state, e.g. a move
    /// whose source parent no longer matches
    #[error("conflict: {message}")]
    Conflict {
        /// Description of the conflict
        message: String,
    },

    /// IO error (snapshot backend)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error (snapshot backend)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Get the error category for retry logic.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::RateLimited { .. } => ErrorCategory::RateLimited,
            Error::Network { .. } => ErrorCategory::Network,
            Error::NotFound { .. } => ErrorCategory::NotFound,
            Error::AlreadyExists { .. } => ErrorCategory::AlreadyExists,
            Error::NotEmpty { .. } => ErrorCategory::NotEmpty,
            Error::Permission { .. } => ErrorCategory::Permission,
            Error::Conflict { .. } => ErrorCategory::Conflict,
            _ => ErrorCategory::Other,
        }
    }

    /// Whether this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }
}

/// Result type for directory operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_categories() {
        assert!(ErrorCategory::RateLimited.is_retryable());
        assert!(ErrorCategory::Network.is_retryable());
        assert!(!ErrorCategory::NotFound.is_retryable());
        assert!(!ErrorCategory::NotEmpty.is_retryable());
        assert!(!ErrorCategory::Permission.is_retryable());
    }

    #[test]
    fn test_error_category_mapping() {
        let err = Error::RateLimited {
            message: "slow down".into(),
        };
        assert_eq!(err.category(), ErrorCategory::RateLimited);
        assert!(err.is_retryable());

        let err = Error::NotEmpty {
            entity: "ou-1234".into(),
        };
        assert_eq!(err.category(), ErrorCategory::NotEmpty);
        assert!(!err.is_retryable());
    }
}

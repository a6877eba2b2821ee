//! Error types for backend access

use thiserror::Error;

/// Result type alias for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors that can occur while talking to the hosted backend
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend answered with a non-success status
    #[error("backend returned {status} for {operation}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Table or procedure the request targeted
        operation: String,
        /// Message extracted from the response body
        message: String,
    },

    /// A count request came back without a usable `Content-Range`
    #[error("missing or malformed Content-Range for {table}: {header:?}")]
    MissingCount {
        /// Table that was counted
        table: String,
        /// Raw header value, if any
        header: Option<String>,
    },

    /// Invalid client configuration
    #[error("invalid backend configuration: {message}")]
    Configuration {
        /// Error message
        message: String,
    },

    /// HTTP transport error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failure injected by the mock backend
    #[error("mock failure: {0}")]
    Injected(String),
}

impl From<BackendError> for marketplace_core::Error {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Json(e) => Self::Serialization(e),
            BackendError::Configuration { message } => Self::Configuration { message },
            other => Self::Backend(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_error_display() {
        let err = BackendError::Status {
            status: 400,
            operation: "rpc/restore_deleted_product".to_string(),
            message: "product already restored".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "backend returned 400 for rpc/restore_deleted_product: product already restored"
        );
    }

    #[test]
    fn test_conversion_into_core_error() {
        let core: marketplace_core::Error = BackendError::Injected("boom".to_string()).into();
        assert!(matches!(core, marketplace_core::Error::Backend(_)));
        assert_eq!(core.to_string(), "Backend error: mock failure: boom");

        let core: marketplace_core::Error = BackendError::Configuration {
            message: "bad url".to_string(),
        }
        .into();
        assert!(matches!(core, marketplace_core::Error::Configuration { .. }));
    }
}

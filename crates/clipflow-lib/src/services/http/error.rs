// HTTP Client Error Types
// Feature: Unified HTTP Client (001-http-client)

use thiserror::Error;

/// Classified API error.
///
/// Produced exactly once per failed call by the request dispatcher; callers
/// match on the variant (or `kind()`) and must not re-wrap.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never reached the backend (connect failure, timeout, DNS)
    #[error("Network error, please check your connection: {message}")]
    Network { message: String },

    /// 401 at either the transport or the application layer
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// Backend reported a non-success status or envelope code
    #[error("Request failed ({code}): {message}")]
    Application {
        code: i64,
        message: String,
        /// Raw envelope or body for callers that need more than the message
        details: Option<serde_json::Value>,
    },

    /// The caller explicitly aborted the call
    #[error("Request cancelled")]
    Cancelled,

    /// Anything unclassifiable (malformed body on a 2xx, poisoned state)
    #[error("Unknown error occurred: {message}")]
    Unknown { message: String },
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Stable error kinds for frontend consumption
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    Network,
    AuthenticationFailed,
    Application,
    Cancelled,
    Unknown,
}

impl ApiErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiErrorKind::Network => "NETWORK_ERROR",
            ApiErrorKind::AuthenticationFailed => "AUTH_FAILED",
            ApiErrorKind::Application => "APPLICATION_ERROR",
            ApiErrorKind::Cancelled => "REQUEST_CANCELLED",
            ApiErrorKind::Unknown => "UNKNOWN_ERROR",
        }
    }
}

impl ApiError {
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Network { .. } => ApiErrorKind::Network,
            ApiError::AuthenticationFailed => ApiErrorKind::AuthenticationFailed,
            ApiError::Application { .. } => ApiErrorKind::Application,
            ApiError::Cancelled => ApiErrorKind::Cancelled,
            ApiError::Unknown { .. } => ApiErrorKind::Unknown,
        }
    }

    /// Numeric code mirroring the envelope convention: 0 for network
    /// failures, the offending status/code for application failures, 499
    /// (client closed request) for cancellation, -1 for unknown.
    pub fn code(&self) -> i64 {
        match self {
            ApiError::Network { .. } => 0,
            ApiError::AuthenticationFailed => 401,
            ApiError::Application { code, .. } => *code,
            ApiError::Cancelled => 499,
            ApiError::Unknown { .. } => -1,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }

    /// Convert to a user-friendly error message for the frontend
    pub fn to_user_message(&self) -> String {
        self.to_string()
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network {
                message: "request timed out".to_string(),
            }
        } else if let Some(status) = err.status() {
            ApiError::Application {
                code: status.as_u16() as i64,
                message: err.to_string(),
                details: None,
            }
        } else if err.is_connect() || err.is_request() {
            ApiError::Network {
                message: err.to_string(),
            }
        } else {
            ApiError::Unknown {
                message: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Unknown {
            message: format!("response parse error: {}", err),
        }
    }
}

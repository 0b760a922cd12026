// Core API data models
// Feature: Unified HTTP Client (001-http-client)

use serde::{Deserialize, Serialize};

/// Uniform response envelope carried by every backend endpoint.
///
/// Both the transport HTTP status and the application-level `code` must
/// independently indicate success. An absent `code` deserializes to `0`,
/// which the backend uses as a success sentinel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Application-level status code (0 or 2xx on success)
    #[serde(default)]
    pub code: i64,
    /// Human-readable status message
    #[serde(default)]
    pub message: String,
    /// Payload; only well-formed when the envelope indicates success
    pub data: T,
    /// Server-side timestamp, when provided
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Structured error detail some endpoints attach on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ResponseErrorDetail>,
}

/// Nested error detail occasionally present in failure envelopes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseErrorDetail {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub name: String,
}

/// Authenticated user profile as returned by the auth endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Identity-provider subject id
    pub authing_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    /// Display name fallback chain used across the UI
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("")
    }
}

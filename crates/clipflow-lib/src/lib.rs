// ClipFlow client SDK
// API client, typed endpoints, and workspace chat state for the ClipFlow
// AI video-creation backend.

pub mod api;
pub mod models;
pub mod services;

// Re-export the surface most consumers need
pub use models::*;
pub use services::chat::{reconcile, ChatHistorySource, ChatLog, ReconcileDecision};
pub use services::http::{
    ApiClient, ApiError, ApiErrorKind, ApiResult, AuthSessionBridge, ClientConfig, ConfigError,
    LoadingCoordinator, NotificationSink, RequestHandle, RequestOptions,
};

// Client services
// Feature: Unified HTTP Client (001-http-client)

pub mod chat;
pub mod http;

pub use chat::{reconcile, ChatHistorySource, ChatLog, ReconcileDecision};
pub use http::{
    ApiClient, ApiError, ApiErrorKind, ApiResult, AuthSessionBridge, ClientConfig, ConfigError,
    LoadingCoordinator, NotificationSink, RequestHandle, RequestOptions,
};

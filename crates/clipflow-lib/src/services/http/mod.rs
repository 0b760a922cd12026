// Unified HTTP Client
// Feature: Unified HTTP Client (001-http-client)
//
// One dispatch pipeline for every backend call: origin resolution, loading
// coordination, cancellation, and a single error classification pass. The
// session is cookie-based, so the underlying client always carries cookies
// and no auth header is attached.

pub mod classify;
pub mod config;
pub mod error;
pub mod inflight;
pub mod loading;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{multipart, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use classify::{classify, is_http_status_ok, Disposition};
pub use config::{ClientConfig, ConfigError, DEFAULT_REQUEST_TIMEOUT_MS, USER_TARGET_PREFIXES};
pub use error::{ApiError, ApiErrorKind, ApiResult};
pub use inflight::{InflightRegistry, RequestHandle};
pub use loading::{LoadingCoordinator, LOADING_GRACE_MS};

use inflight::InflightGuard;
use loading::LoadingGuard;

use crate::models::ApiResponse;

/// Session-state seam invoked on authentication failure.
///
/// Implemented by the embedding application's auth store; the dispatcher
/// only ever clears the session and asks for a re-login prompt.
pub trait AuthSessionBridge: Send + Sync {
    fn clear_session(&self);
    fn prompt_login(&self);
}

/// Fire-and-forget sink for user-visible error notifications
pub trait NotificationSink: Send + Sync {
    fn notify_error(&self, message: &str);
}

/// Default bridge for headless use: nothing to clear, nowhere to prompt
#[derive(Debug, Default)]
pub struct NoopSessionBridge;

impl AuthSessionBridge for NoopSessionBridge {
    fn clear_session(&self) {}
    fn prompt_login(&self) {}
}

/// Default sink that routes notifications to the log
#[derive(Debug, Default)]
pub struct LogNotificationSink;

impl NotificationSink for LogNotificationSink {
    fn notify_error(&self, message: &str) {
        log::error!("API error: {}", message);
    }
}

/// Per-call option overrides. Immutable once handed to the dispatcher.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Do not surface the login prompt on authentication failure
    pub no_login_modal: bool,
    /// Do not participate in the loading indicator
    pub no_loading: bool,
    /// Do not surface a user-visible error notification on failure
    pub no_error_alert: bool,
    /// Return the envelope unclassified; the caller interprets `code`
    pub raw_response: bool,
    /// Explicit origin override, used verbatim
    pub base_url: Option<String>,
    /// Per-call timeout override
    pub timeout: Option<Duration>,
    /// Cancellation handle; one is created internally when absent
    pub cancel: Option<RequestHandle>,
}

impl RequestOptions {
    pub fn no_login_modal(mut self) -> Self {
        self.no_login_modal = true;
        self
    }

    pub fn no_loading(mut self) -> Self {
        self.no_loading = true;
        self
    }

    pub fn no_error_alert(mut self) -> Self {
        self.no_error_alert = true;
        self
    }

    pub fn raw_response(mut self) -> Self {
        self.raw_response = true;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn cancel_with(mut self, handle: RequestHandle) -> Self {
        self.cancel = Some(handle);
        self
    }
}

/// The backend API client.
///
/// Owns the loading coordinator and the in-flight registry so their
/// lifecycle is scoped to the client rather than to ambient module state.
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    loading: Arc<LoadingCoordinator>,
    inflight: Arc<InflightRegistry>,
    session: Arc<dyn AuthSessionBridge>,
    notifier: Arc<dyn NotificationSink>,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(ApiError::from)?;
        Ok(Self {
            http,
            config,
            loading: Arc::new(LoadingCoordinator::new()),
            inflight: Arc::new(InflightRegistry::new()),
            session: Arc::new(NoopSessionBridge),
            notifier: Arc::new(LogNotificationSink),
        })
    }

    pub fn with_session_bridge(mut self, session: Arc<dyn AuthSessionBridge>) -> Self {
        self.session = session;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Whether any tracked request currently shows the loading indicator
    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    /// Number of calls currently in flight
    pub fn pending_requests(&self) -> usize {
        self.inflight.len()
    }

    /// Abort a pending call. The call's future settles as `Cancelled` and
    /// its registry entry is removed. Aborting a settled call is a no-op.
    pub fn cancel_request(&self, handle: &RequestHandle) -> bool {
        self.inflight.cancel(handle)
    }

    pub async fn get<T, Q>(
        &self,
        path: &str,
        query: Option<&Q>,
        options: RequestOptions,
    ) -> ApiResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let mut builder = self.prepare(Method::GET, path, &options);
        if let Some(query) = query {
            builder = builder.query(query);
        }
        self.send_envelope(builder, options).await
    }

    pub async fn post<T, B>(
        &self,
        path: &str,
        body: Option<&B>,
        options: RequestOptions,
    ) -> ApiResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(Method::POST, path, body, options).await
    }

    pub async fn put<T, B>(
        &self,
        path: &str,
        body: Option<&B>,
        options: RequestOptions,
    ) -> ApiResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(Method::PUT, path, body, options).await
    }

    pub async fn patch<T, B>(
        &self,
        path: &str,
        body: Option<&B>,
        options: RequestOptions,
    ) -> ApiResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(Method::PATCH, path, body, options).await
    }

    pub async fn delete<T>(&self, path: &str, options: RequestOptions) -> ApiResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
    {
        let builder = self.prepare(Method::DELETE, path, &options);
        self.send_envelope(builder, options).await
    }

    /// Single-file convenience: wraps the bytes into a multipart field
    /// named `file`.
    pub async fn upload_file<T>(
        &self,
        path: &str,
        file_name: &str,
        content: Vec<u8>,
        options: RequestOptions,
    ) -> ApiResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
    {
        let part = multipart::Part::bytes(content).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);
        self.upload_form(path, form, options).await
    }

    /// Multipart form submission for callers that build their own form
    pub async fn upload_form<T>(
        &self,
        path: &str,
        form: multipart::Form,
        options: RequestOptions,
    ) -> ApiResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
    {
        let builder = self.prepare(Method::POST, path, &options).multipart(form);
        self.send_envelope(builder, options).await
    }

    /// Blob export: bypasses the envelope. Non-2xx is a hard failure with
    /// the reason phrase as the message; a 2xx body is opaque binary.
    pub async fn download(&self, path: &str, options: RequestOptions) -> ApiResult<Vec<u8>> {
        let builder = self.prepare(Method::GET, path, &options);
        let scope = self.begin_call(&options);

        let outcome = async {
            let response = scope.run(builder.send()).await?;
            let status = response.status();

            if !status.is_success() {
                return Err(ApiError::Application {
                    code: status.as_u16() as i64,
                    message: status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string(),
                    details: None,
                });
            }

            let bytes = scope.run(response.bytes()).await?;
            Ok(bytes.to_vec())
        }
        .await;

        if let Err(err) = &outcome {
            self.report_failure(err, &options);
        }
        outcome
    }

    async fn send_json<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        options: RequestOptions,
    ) -> ApiResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut builder = self.prepare(method, path, &options);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.send_envelope(builder, options).await
    }

    fn prepare(&self, method: Method, path: &str, options: &RequestOptions) -> RequestBuilder {
        let url = self.config.resolve_url(path, options.base_url.as_deref());
        let timeout = options.timeout.unwrap_or(self.config.request_timeout);
        log::debug!("{} {}", method, url);
        self.http.request(method, url).timeout(timeout)
    }

    /// Open the scope for one call: register it in the in-flight registry
    /// and arm the loading guard. The scope must stay alive until the call
    /// truly settles, header and body phases both; its guards deregister
    /// and tear down loading state on every exit path.
    fn begin_call(&self, options: &RequestOptions) -> CallScope {
        let handle = options.cancel.clone().unwrap_or_default();
        let inflight = self.inflight.register(&handle);
        let loading = if options.no_loading {
            None
        } else {
            Some(self.loading.track())
        };
        CallScope {
            handle,
            _inflight: inflight,
            _loading: loading,
        }
    }

    async fn send_envelope<T>(
        &self,
        builder: RequestBuilder,
        options: RequestOptions,
    ) -> ApiResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
    {
        let scope = self.begin_call(&options);
        let outcome = self.dispatch_envelope(&scope, builder, &options).await;
        if let Err(err) = &outcome {
            self.report_failure(err, &options);
        }
        outcome
    }

    async fn dispatch_envelope<T>(
        &self,
        scope: &CallScope,
        builder: RequestBuilder,
        options: &RequestOptions,
    ) -> ApiResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
    {
        let response = scope.run(builder.send()).await?;
        let status = response.status();
        let body = scope.run(response.text()).await?;

        let envelope: ApiResponse<serde_json::Value> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(parse_err) => {
                // A non-JSON body on a failed status is still an
                // application failure, not a parse failure
                let err = if status.is_success() {
                    ApiError::from(parse_err)
                } else {
                    ApiError::Application {
                        code: status.as_u16() as i64,
                        message: status
                            .canonical_reason()
                            .unwrap_or("Request failed")
                            .to_string(),
                        details: Some(serde_json::Value::String(body)),
                    }
                };
                return Err(err);
            }
        };

        if options.raw_response {
            return convert_envelope(envelope);
        }

        let message = effective_message(&envelope, status.as_u16());
        match classify(status.as_u16(), envelope.code, &message) {
            Disposition::Success => convert_envelope(envelope),
            Disposition::AuthFailure => {
                // Session is cleared regardless of prompt suppression
                self.session.clear_session();
                if !options.no_login_modal {
                    self.session.prompt_login();
                }
                Err(ApiError::AuthenticationFailed)
            }
            Disposition::ApplicationFailure { code, message } => Err(ApiError::Application {
                code,
                message,
                details: Some(envelope.data),
            }),
        }
    }

    /// Notification is fire-and-forget; cancellation never surfaces to the
    /// user.
    fn report_failure(&self, err: &ApiError, options: &RequestOptions) {
        if err.is_cancelled() || options.no_error_alert {
            return;
        }
        self.notifier.notify_error(&err.to_user_message());
    }
}

/// One call's registry entry, loading participation, and cancellation
/// signal, held together so they settle together. Dropping the scope
/// deregisters the call and releases the loading guard; both happen only
/// once the whole call, body included, has settled.
struct CallScope {
    handle: RequestHandle,
    _inflight: InflightGuard,
    _loading: Option<LoadingGuard>,
}

impl CallScope {
    /// Race one transport phase against cancellation. The cancel signal is
    /// sticky, so a call cancelled between phases still settles as
    /// `Cancelled` on the next `run`.
    async fn run<T>(&self, fut: impl Future<Output = Result<T, reqwest::Error>>) -> ApiResult<T> {
        tokio::select! {
            _ = self.handle.cancelled() => Err(ApiError::Cancelled),
            result = fut => result.map_err(ApiError::from),
        }
    }
}

/// Re-type the envelope payload once classification has passed, so
/// error-shaped `data` never causes a spurious decode failure.
fn convert_envelope<T: DeserializeOwned>(
    envelope: ApiResponse<serde_json::Value>,
) -> ApiResult<ApiResponse<T>> {
    let data = serde_json::from_value(envelope.data)?;
    Ok(ApiResponse {
        code: envelope.code,
        message: envelope.message,
        data,
        timestamp: envelope.timestamp,
        error: envelope.error,
    })
}

/// Best-effort failure message: envelope message, then nested error detail,
/// then the HTTP reason phrase.
fn effective_message(envelope: &ApiResponse<serde_json::Value>, status: u16) -> String {
    if !envelope.message.is_empty() {
        return envelope.message.clone();
    }
    if let Some(detail) = &envelope.error {
        if !detail.message.is_empty() {
            return detail.message.clone();
        }
    }
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Request failed")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn create_test_client() -> ApiClient {
        ApiClient::new(ClientConfig::new(
            "https://agent.example.com",
            "https://user.example.com",
        ))
        .unwrap()
    }

    struct CountingSink {
        errors: AtomicUsize,
    }

    impl NotificationSink for CountingSink {
        fn notify_error(&self, _message: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_options_builders_compose() {
        let handle = RequestHandle::new();
        let options = RequestOptions::default()
            .no_loading()
            .no_error_alert()
            .base_url("https://override.example.com")
            .timeout(Duration::from_secs(5))
            .cancel_with(handle.clone());
        assert!(options.no_loading);
        assert!(options.no_error_alert);
        assert!(!options.no_login_modal);
        assert_eq!(
            options.base_url.as_deref(),
            Some("https://override.example.com")
        );
        assert_eq!(options.timeout, Some(Duration::from_secs(5)));
        assert_eq!(options.cancel.map(|h| h.id()), Some(handle.id()));
    }

    #[test]
    fn test_effective_message_fallback_chain() {
        let mut envelope: ApiResponse<serde_json::Value> =
            serde_json::from_str(r#"{"code": 500, "data": null}"#).unwrap();
        assert_eq!(effective_message(&envelope, 500), "Internal Server Error");

        envelope.error = Some(crate::models::ResponseErrorDetail {
            message: "disk full".to_string(),
            name: "StorageError".to_string(),
        });
        assert_eq!(effective_message(&envelope, 500), "disk full");

        envelope.message = "render queue unavailable".to_string();
        assert_eq!(effective_message(&envelope, 500), "render queue unavailable");
    }

    #[test]
    fn test_convert_envelope_types_payload_after_classification() {
        let envelope: ApiResponse<serde_json::Value> =
            serde_json::from_str(r#"{"code": 200, "message": "ok", "data": {"availableCredits": 7}}"#)
                .unwrap();
        let typed: ApiResponse<crate::models::WalletInfo> = convert_envelope(envelope).unwrap();
        assert_eq!(typed.data.available_credits, 7);
    }

    #[test]
    fn test_convert_envelope_rejects_mismatched_payload() {
        let envelope: ApiResponse<serde_json::Value> =
            serde_json::from_str(r#"{"code": 200, "data": "not an object"}"#).unwrap();
        let typed: ApiResult<ApiResponse<crate::models::WalletInfo>> = convert_envelope(envelope);
        assert_eq!(typed.unwrap_err().kind(), ApiErrorKind::Unknown);
    }

    #[test]
    fn test_report_failure_respects_suppression_and_cancellation() {
        let sink = Arc::new(CountingSink {
            errors: AtomicUsize::new(0),
        });
        let client = create_test_client().with_notifier(sink.clone());

        let app_err = ApiError::Application {
            code: 500,
            message: "boom".to_string(),
            details: None,
        };
        client.report_failure(&app_err, &RequestOptions::default());
        assert_eq!(sink.errors.load(Ordering::SeqCst), 1);

        client.report_failure(&app_err, &RequestOptions::default().no_error_alert());
        assert_eq!(sink.errors.load(Ordering::SeqCst), 1);

        client.report_failure(&ApiError::Cancelled, &RequestOptions::default());
        assert_eq!(sink.errors.load(Ordering::SeqCst), 1);
    }

    /// Local server that sends response headers plus a partial body and
    /// then stalls, so the client sits in the body-read phase forever.
    async fn stalling_body_server() -> (std::net::SocketAddr, tokio::task::JoinHandle<()>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            let _ = socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100000\r\n\r\npartial")
                .await;
            let _ = socket.flush().await;
            std::future::pending::<()>().await
        });
        (addr, server)
    }

    fn create_local_client(addr: std::net::SocketAddr) -> ApiClient {
        ApiClient::new(ClientConfig::new(
            format!("http://{addr}"),
            format!("http://{addr}"),
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn test_download_stays_pending_and_cancellable_while_body_streams() {
        let (addr, server) = stalling_body_server().await;
        let client = Arc::new(create_local_client(addr));
        let handle = RequestHandle::new();

        let call_client = Arc::clone(&client);
        let options = RequestOptions::default()
            .no_error_alert()
            .cancel_with(handle.clone());
        let call =
            tokio::spawn(async move { call_client.download("/video-project/vp-1/export", options).await });

        // Headers have long arrived and the loading grace period has
        // elapsed; the body read is still blocked on the server
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(!call.is_finished());
        assert_eq!(client.pending_requests(), 1);
        assert!(client.is_loading());

        assert!(client.cancel_request(&handle));
        let settled = call.await.unwrap();
        assert!(matches!(settled, Err(ApiError::Cancelled)));

        // Registry and loading clear only once the call has settled
        assert_eq!(client.pending_requests(), 0);
        assert!(!client.is_loading());

        // Second cancel is a settled-call no-op
        assert!(!client.cancel_request(&handle));
        server.abort();
    }

    #[tokio::test]
    async fn test_envelope_call_stays_pending_and_cancellable_while_body_streams() {
        let (addr, server) = stalling_body_server().await;
        let client = Arc::new(create_local_client(addr));
        let handle = RequestHandle::new();

        let call_client = Arc::clone(&client);
        let options = RequestOptions::default()
            .no_loading()
            .no_error_alert()
            .cancel_with(handle.clone());
        let call = tokio::spawn(async move {
            call_client
                .get::<serde_json::Value, ()>("/video-project/list", None, options)
                .await
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!call.is_finished());
        assert_eq!(client.pending_requests(), 1);

        assert!(client.cancel_request(&handle));
        let settled = call.await.unwrap();
        assert!(matches!(settled, Err(ApiError::Cancelled)));
        assert_eq!(client.pending_requests(), 0);
        server.abort();
    }
}

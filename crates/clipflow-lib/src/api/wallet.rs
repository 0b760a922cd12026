// Wallet endpoints
// Feature: Credits Wallet (004-credits-wallet)

use std::future::Future;
use std::time::Duration;

use crate::models::WalletInfo;
use crate::services::http::{ApiClient, ApiError, ApiResult, RequestOptions};

/// Maximum retries for a 503 from the wallet endpoint
pub const WALLET_MAX_RETRIES: u32 = 2;

/// Linear backoff base; attempt N waits N x this
pub const WALLET_RETRY_BACKOFF_MS: u64 = 500;

/// Fetch the credit balance for a workspace.
///
/// The wallet service 503s briefly while balances settle after a render, so
/// this is the one wrapper that retries: application-level 503 only, up to
/// [`WALLET_MAX_RETRIES`] times with linear backoff. Errors stay silent
/// (`no_error_alert`); the dashboard renders its own fallback.
pub async fn get_wallet_info(client: &ApiClient, workspace_id: &str) -> ApiResult<WalletInfo> {
    retry_on_unavailable(WALLET_MAX_RETRIES, |_attempt| async move {
        client
            .get::<WalletInfo, _>(
                "/wallet/info/",
                Some(&[("workspaceId", workspace_id)]),
                RequestOptions::default().no_error_alert(),
            )
            .await
            .map(|response| response.data)
    })
    .await
}

/// Retry `op` while it fails with an application-level 503, waiting
/// `WALLET_RETRY_BACKOFF_MS x (attempt + 1)` between attempts. Any other
/// outcome is returned as-is.
pub(crate) async fn retry_on_unavailable<T, F, Fut>(max_retries: u32, mut op: F) -> ApiResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = ApiResult<T>>,
{
    let mut attempt = 0;
    loop {
        match op(attempt).await {
            Err(ApiError::Application { code: 503, .. }) if attempt < max_retries => {
                let delay =
                    Duration::from_millis(WALLET_RETRY_BACKOFF_MS * u64::from(attempt + 1));
                log::debug!(
                    "wallet endpoint unavailable, retrying in {:?} (attempt {}/{})",
                    delay,
                    attempt + 1,
                    max_retries
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}

// Auth endpoints
// Feature: Authentication (005-authentication)

use serde::{Deserialize, Serialize};

use crate::models::{ApiResponse, User};
use crate::services::http::{ApiClient, ApiResult, RequestOptions};

/// Profile payload pushed to the backend after an identity-provider login
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncUserProfileRequest {
    pub authing_id: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub token: String,
}

/// Mirror the identity-provider profile into the backend session
pub async fn sync_user_profile(
    client: &ApiClient,
    request: &SyncUserProfileRequest,
) -> ApiResult<ApiResponse<User>> {
    client
        .post("/auth/sync", Some(request), RequestOptions::default())
        .await
}

pub async fn request_logout(client: &ApiClient) -> ApiResult<()> {
    client
        .post::<serde_json::Value, ()>("/auth/logout", None, RequestOptions::default())
        .await
        .map(|_| ())
}

/// Silent session probe used at startup; never pops the login modal itself
pub async fn validate_token(client: &ApiClient) -> ApiResult<User> {
    client
        .get::<User, ()>(
            "/auth/me",
            None,
            RequestOptions::default().no_login_modal().no_error_alert(),
        )
        .await
        .map(|response| response.data)
}

// Video project endpoints
// Feature: Project Dashboard (002-project-dashboard)

use async_trait::async_trait;

use crate::models::{
    ChatHistoryResponse, ChatMessage, VideoProjectListParams, VideoProjectListResponse,
};
use crate::services::chat::ChatHistorySource;
use crate::services::http::{ApiClient, ApiResult, RequestOptions};

/// History fetch scope; the workspace always pulls the full transcript
const CHAT_HISTORY_SCOPE: &str = "all";

fn project_path(project_id: &str, suffix: &str) -> String {
    format!(
        "/video-project/{}{}",
        urlencoding::encode(project_id),
        suffix
    )
}

/// List the current user's video projects, paginated
pub async fn get_user_video_projects(
    client: &ApiClient,
    params: VideoProjectListParams,
) -> ApiResult<VideoProjectListResponse> {
    client
        .get("/video-project/user", Some(&params), RequestOptions::default())
        .await
        .map(|response| response.data)
}

pub async fn delete_video_project(
    client: &ApiClient,
    project_id: &str,
) -> ApiResult<serde_json::Value> {
    client
        .delete(&project_path(project_id, ""), RequestOptions::default())
        .await
        .map(|response| response.data)
}

/// Fetch the project's chat transcript. Polled by the workspace, so it
/// stays out of the loading indicator and the toast stream.
pub async fn get_chat_history(
    client: &ApiClient,
    project_id: &str,
) -> ApiResult<Vec<ChatMessage>> {
    client
        .get::<ChatHistoryResponse, _>(
            &project_path(project_id, "/chat-history"),
            Some(&[("scope", CHAT_HISTORY_SCOPE)]),
            RequestOptions::default().no_loading().no_error_alert(),
        )
        .await
        .map(|response| response.data.chat_history)
}

/// Upload a source material file into a project
pub async fn upload_material(
    client: &ApiClient,
    project_id: &str,
    file_name: &str,
    content: Vec<u8>,
) -> ApiResult<serde_json::Value> {
    client
        .upload_file(
            &project_path(project_id, "/material"),
            file_name,
            content,
            RequestOptions::default(),
        )
        .await
        .map(|response| response.data)
}

/// Export the rendered video as an opaque binary payload
pub async fn export_video(client: &ApiClient, project_id: &str) -> ApiResult<Vec<u8>> {
    client
        .download(&project_path(project_id, "/export"), RequestOptions::default())
        .await
}

#[async_trait]
impl ChatHistorySource for ApiClient {
    async fn fetch_history(&self, project_id: &str) -> ApiResult<Vec<ChatMessage>> {
        get_chat_history(self, project_id).await
    }
}

// Video project data models
// Feature: Project Dashboard (002-project-dashboard)

use serde::{Deserialize, Serialize};

use super::workspace::ChatMessage;

/// Default page size for the project dashboard grid
pub const DEFAULT_PROJECT_PAGE_SIZE: u32 = 12;

/// Mapping from a project-local file to its object-storage URL
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OssMapping {
    pub local_file: String,
    pub oss_url: String,
}

/// A user's video project as listed on the dashboard.
///
/// Field names follow the backend wire format (snake_case), which predates
/// the camelCase convention of the newer endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoProject {
    pub id: String,
    /// Legacy display field still emitted by older records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub project_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_mode: Option<String>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Duration in seconds, once rendered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oss_mapping: Option<Vec<OssMapping>>,
}

/// Pagination block returned alongside project lists
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub total_count: u32,
}

/// Query parameters for the project list endpoint
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoProjectListParams {
    pub page: u32,
    pub page_size: u32,
}

impl Default for VideoProjectListParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PROJECT_PAGE_SIZE,
        }
    }
}

/// Payload of the project list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoProjectListResponse {
    pub projects: Vec<VideoProject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// Payload of the chat-history endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatHistoryResponse {
    #[serde(default)]
    pub chat_history: Vec<ChatMessage>,
}

// Data models shared across the client
// Feature: Unified HTTP Client (001-http-client)

pub mod api;
pub mod project;
pub mod wallet;
pub mod workspace;

pub use api::{ApiResponse, ResponseErrorDetail, User};
pub use project::{
    ChatHistoryResponse, OssMapping, Pagination, VideoProject, VideoProjectListParams,
    VideoProjectListResponse, DEFAULT_PROJECT_PAGE_SIZE,
};
pub use wallet::WalletInfo;
pub use workspace::{AssistantSegment, ChatMessage, MessageRole};

// Workspace chat data models
// Feature: Chat Workspace (003-chat-workspace)

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Message author role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Assistant,
}

/// One segment of an assistant turn.
///
/// The assistant streams its reply as an ordered sequence of segments; every
/// variant carries the `userResponse` text the workspace renders. Segment
/// counts are what the chat reconciler compares, so the variant set is
/// closed on purpose.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AssistantSegment {
    #[serde(rename_all = "camelCase")]
    Text { user_response: String },
    #[serde(rename_all = "camelCase")]
    ToolCall {
        user_response: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tool_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        arguments: Option<serde_json::Value>,
    },
    #[serde(rename_all = "camelCase")]
    ToolCallResponse {
        user_response: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tool_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<serde_json::Value>,
    },
}

impl AssistantSegment {
    /// The renderable text of this segment
    pub fn user_response(&self) -> &str {
        match self {
            AssistantSegment::Text { user_response }
            | AssistantSegment::ToolCall { user_response, .. }
            | AssistantSegment::ToolCallResponse { user_response, .. } => user_response,
        }
    }
}

/// A single chat turn. The role determines the content shape: user turns are
/// plain text, assistant turns are segment sequences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ChatMessage {
    User {
        id: String,
        timestamp: String,
        content: String,
    },
    Assistant {
        id: String,
        timestamp: String,
        content: Vec<AssistantSegment>,
    },
}

impl ChatMessage {
    /// Create a locally-authored (optimistic) user message
    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage::User {
            id: format!("user-{}", Uuid::new_v4()),
            timestamp: Utc::now().to_rfc3339(),
            content: content.into(),
        }
    }

    /// Create a local assistant message holding a single text segment
    pub fn assistant_text(content: impl Into<String>) -> Self {
        ChatMessage::Assistant {
            id: format!("assistant-{}", Uuid::new_v4()),
            timestamp: Utc::now().to_rfc3339(),
            content: vec![AssistantSegment::Text {
                user_response: content.into(),
            }],
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ChatMessage::User { id, .. } | ChatMessage::Assistant { id, .. } => id,
        }
    }

    pub fn timestamp(&self) -> &str {
        match self {
            ChatMessage::User { timestamp, .. } | ChatMessage::Assistant { timestamp, .. } => {
                timestamp
            }
        }
    }

    pub fn role(&self) -> MessageRole {
        match self {
            ChatMessage::User { .. } => MessageRole::User,
            ChatMessage::Assistant { .. } => MessageRole::Assistant,
        }
    }

    /// Segment count for assistant turns; `None` for user turns
    pub fn segment_count(&self) -> Option<usize> {
        match self {
            ChatMessage::User { .. } => None,
            ChatMessage::Assistant { content, .. } => Some(content.len()),
        }
    }
}

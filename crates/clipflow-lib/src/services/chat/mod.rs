// Workspace chat state and history reconciliation
// Feature: Chat Workspace (003-chat-workspace)
//
// The workspace polls chat history while the assistant may still be
// streaming segments into the local list. Reconciliation decides whether a
// fetch is fresh enough to replace local state, so an in-progress optimistic
// exchange is never overwritten by stale server data.

use async_trait::async_trait;

use crate::models::{ChatMessage, MessageRole};
use crate::services::http::ApiResult;

/// Outcome of comparing fetched history against the local message list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileDecision {
    KeepLocal,
    ReplaceWithFetched,
}

/// Decide whether fetched history should replace the local list.
///
/// Heuristic, evaluated in order:
/// - fetched strictly longer: the server has more turns, replace;
/// - fetched strictly shorter: the server is behind, keep local;
/// - equal length: replace only when both lists end in an assistant message
///   and the fetched one has at least as many segments (the server caught
///   up to partially streamed content); every other equal-length case keeps
///   local.
///
/// The segment count is a freshness proxy, not a version comparison; a
/// shorter-but-newer final segment loses. Intentional, matches production
/// behavior. Never fails: an uncomparable pair keeps local.
pub fn reconcile(local: &[ChatMessage], fetched: &[ChatMessage]) -> ReconcileDecision {
    if fetched.len() > local.len() {
        return ReconcileDecision::ReplaceWithFetched;
    }
    if fetched.len() < local.len() {
        return ReconcileDecision::KeepLocal;
    }

    let (Some(last_local), Some(last_fetched)) = (local.last(), fetched.last()) else {
        return ReconcileDecision::KeepLocal;
    };

    match (last_local.segment_count(), last_fetched.segment_count()) {
        (Some(local_segments), Some(fetched_segments)) if local_segments <= fetched_segments => {
            ReconcileDecision::ReplaceWithFetched
        }
        _ => ReconcileDecision::KeepLocal,
    }
}

/// Source of persisted chat history for a project
#[async_trait]
pub trait ChatHistorySource: Send + Sync {
    async fn fetch_history(&self, project_id: &str) -> ApiResult<Vec<ChatMessage>>;
}

/// The workspace view's ordered message list.
///
/// Owns the live sequence; reconciliation only ever replaces the whole list,
/// never an element in place.
#[derive(Debug, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn add_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn add_messages(&mut self, messages: impl IntoIterator<Item = ChatMessage>) {
        self.messages.extend(messages);
    }

    /// Append an optimistic user turn; returns the stamped message
    pub fn push_user(&mut self, content: impl Into<String>) -> ChatMessage {
        let message = ChatMessage::user(content);
        self.messages.push(message.clone());
        message
    }

    /// Append a local single-segment assistant turn
    pub fn push_assistant_text(&mut self, content: impl Into<String>) -> ChatMessage {
        let message = ChatMessage::assistant_text(content);
        self.messages.push(message.clone());
        message
    }

    /// Remove a message by identity; absent ids are ignored
    pub fn remove_message(&mut self, message_id: &str) {
        self.messages.retain(|message| message.id() != message_id);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn latest_by_role(&self, role: MessageRole) -> Option<&ChatMessage> {
        self.messages
            .iter()
            .rev()
            .find(|message| message.role() == role)
    }

    pub fn messages_by_role(&self, role: MessageRole) -> Vec<&ChatMessage> {
        self.messages
            .iter()
            .filter(|message| message.role() == role)
            .collect()
    }

    /// Apply a fetched history snapshot: whole-list replacement when the
    /// fetch is judged fresher, otherwise untouched.
    pub fn apply_fetched(&mut self, fetched: Vec<ChatMessage>) -> ReconcileDecision {
        let decision = reconcile(&self.messages, &fetched);
        if decision == ReconcileDecision::ReplaceWithFetched {
            self.messages = fetched;
        }
        decision
    }

    /// Pull history from the source and reconcile it into the log
    pub async fn refresh(
        &mut self,
        source: &dyn ChatHistorySource,
        project_id: &str,
    ) -> ApiResult<ReconcileDecision> {
        let fetched = source.fetch_history(project_id).await.map_err(|err| {
            log::error!("failed to load chat history for {}: {}", project_id, err);
            err
        })?;
        Ok(self.apply_fetched(fetched))
    }
}

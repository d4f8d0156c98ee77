//! Session memory and prompt context management.
//!
//! [`MemoryService`] wraps the relational store with session semantics: a
//! single active session per user, `session_<user>_<timestamp>` identifiers,
//! and append-only conversation turns. [`ContextWindow`] bounds how much
//! history is spliced into prompts.

use crate::db::StoreClient;
use crate::types::{ConversationTurn, Message, MessageRole, Result};
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::Arc;
use uuid::Uuid;

pub struct MemoryService {
    store: Arc<StoreClient>,
    user_id: String,
}

impl MemoryService {
    pub fn new(store: Arc<StoreClient>, user_id: String) -> Self {
        Self { store, user_id }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Create a new session and make it the active one.
    pub async fn create_session(&self, title: &str) -> Result<String> {
        // Nanosecond precision keeps ids unique even for back-to-back creates
        let session_id = format!(
            "session_{}_{}",
            self.user_id,
            Utc::now().format("%Y%m%d%H%M%S%f")
        );

        self.store.deactivate_all_sessions(&self.user_id).await?;
        self.store
            .create_session(&session_id, &self.user_id, title)
            .await?;

        Ok(session_id)
    }

    pub async fn session_exists(&self, session_id: &str) -> Result<bool> {
        Ok(self.store.get_session(session_id).await?.is_some())
    }

    /// ID of the active session, creating one when none exists.
    pub async fn get_active_session(&self) -> Result<String> {
        if let Some(id) = self.store.get_active_session_id(&self.user_id).await? {
            return Ok(id);
        }
        self.create_session("New Research Session").await
    }

    /// Last `limit` turns of a session, chronological.
    pub async fn get_session_history(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<ConversationTurn>> {
        let turns = self.store.get_session_history(session_id, limit).await?;
        tracing::info!(
            "Retrieved {} messages from session: {}",
            turns.len(),
            session_id
        );
        Ok(turns)
    }

    /// Append a turn to a session's history.
    pub async fn add_message(
        &self,
        session_id: &str,
        role: MessageRole,
        content: &str,
        agent: &str,
        sources: Vec<String>,
        processing_time: f64,
    ) -> Result<()> {
        let turn = ConversationTurn {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
            agent: agent.to_string(),
            sources,
            processing_time,
        };

        self.store.add_turn(&turn).await?;
        tracing::info!("Added {} message to session: {}", role.as_str(), session_id);
        Ok(())
    }
}

/// Bounds prompt history by an estimated token budget.
///
/// Token counts are estimated at 4 chars per token; trimming drops the oldest
/// messages first and never goes below one message.
pub struct ContextWindow {
    max_tokens: usize,
    messages: VecDeque<Message>,
}

impl ContextWindow {
    pub fn new(max_tokens: usize) -> Self {
        Self {
            max_tokens,
            messages: VecDeque::new(),
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push_back(message);
        self.trim_if_needed();
    }

    pub fn extend_from_turns(&mut self, turns: &[ConversationTurn]) {
        for turn in turns {
            self.push(Message {
                role: turn.role,
                content: turn.content.clone(),
                timestamp: turn.timestamp,
            });
        }
    }

    pub fn messages(&self) -> Vec<Message> {
        self.messages.iter().cloned().collect()
    }

    fn trim_if_needed(&mut self) {
        while self.estimate_tokens() > self.max_tokens && self.messages.len() > 1 {
            self.messages.pop_front();
        }
    }

    fn estimate_tokens(&self) -> usize {
        self.messages.iter().map(|m| m.content.len() / 4).sum()
    }
}

//! Chat assistant sessions.
//!
//! Transcripts are append-only, in-memory, and scoped to one session — they
//! are never persisted and die with the process or a "start over". Exactly
//! one assistant message is appended per successful send; a failed send
//! removes the pending user message again, so the transcript length is
//! unchanged and the user must resend.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::ModelClient;
use crate::models::chat::ChatMessage;
use crate::templates::chat_assistant::{self, ChatAssistantInput};

#[derive(Clone, Default)]
pub struct ChatSessions {
    inner: Arc<RwLock<HashMap<Uuid, Vec<ChatMessage>>>>,
}

impl ChatSessions {
    pub fn history(&self, session: Uuid) -> Vec<ChatMessage> {
        self.inner
            .read()
            .expect("chat lock poisoned")
            .get(&session)
            .cloned()
            .unwrap_or_default()
    }

    pub fn clear(&self, session: Uuid) {
        self.inner
            .write()
            .expect("chat lock poisoned")
            .remove(&session);
    }

    fn push(&self, session: Uuid, message: ChatMessage) {
        self.inner
            .write()
            .expect("chat lock poisoned")
            .entry(session)
            .or_default()
            .push(message);
    }

    fn pop(&self, session: Uuid) {
        if let Some(messages) = self
            .inner
            .write()
            .expect("chat lock poisoned")
            .get_mut(&session)
        {
            messages.pop();
        }
    }

    /// Appends the user's message, asks the model, appends the reply. On any
    /// failure the pending user message is rolled back before the error
    /// propagates. Only the current query goes to the model; prior turns are
    /// not sent.
    pub async fn send(
        &self,
        llm: &dyn ModelClient,
        session: Uuid,
        query: &str,
        roadmap: Option<&str>,
        background: Option<&str>,
    ) -> Result<ChatMessage, AppError> {
        self.push(session, ChatMessage::user(query));

        let result = chat_assistant::invoke(
            llm,
            ChatAssistantInput {
                query,
                roadmap,
                background,
            },
        )
        .await;

        match result {
            Ok(response) => {
                let reply = ChatMessage::assistant(response);
                self.push(session, reply.clone());
                Ok(reply)
            }
            Err(e) => {
                self.pop(session);
                Err(e)
            }
        }
    }
}

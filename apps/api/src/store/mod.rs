//! Profile Store — session-scoped key-value persistence.
//!
//! The store owns everything that survives a page transition: the
//! in-progress `UserBackground`, the career suggestion list, and the
//! selected career. The roadmap is deliberately NOT stored; it is
//! regenerated from the selected career on every roadmap load.
//!
//! Failure mode: a read or deserialize failure on `load` is treated as
//! "absent", never fatal. Callers see `None` and redirect the user back to
//! the wizard start.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{CareerSuggestion, UserBackground};

/// Storage keys, one per persisted artifact. Key names are part of the
/// stored-payload contract; renaming one orphans existing sessions.
pub const KEY_BACKGROUND: &str = "userBackground";
pub const KEY_SUGGESTIONS: &str = "careerSuggestions";
pub const KEY_SELECTED_CAREER: &str = "selectedCareer";

const ALL_KEYS: &[&str] = &[KEY_BACKGROUND, KEY_SUGGESTIONS, KEY_SELECTED_CAREER];

/// Sessions idle longer than this are dropped by Redis on their own.
const SESSION_TTL_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable key-value storage scoped to one client session.
///
/// No transactional guarantees across keys; callers serialize related keys
/// together when atomicity matters.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn save(&self, session: Uuid, key: &str, value: String) -> Result<(), StoreError>;
    async fn load(&self, session: Uuid, key: &str) -> Result<Option<String>, StoreError>;
    async fn clear(&self, session: Uuid, key: &str) -> Result<(), StoreError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Redis backend
// ────────────────────────────────────────────────────────────────────────────

/// Redis-backed store used in production. Keys are namespaced per session
/// and expire after [`SESSION_TTL_SECS`].
pub struct RedisStore {
    client: redis::Client,
}

impl RedisStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    fn key(session: Uuid, key: &str) -> String {
        format!("pathfinder:{session}:{key}")
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn save(&self, session: Uuid, key: &str, value: String) -> Result<(), StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set_ex::<_, _, ()>(Self::key(session, key), value, SESSION_TTL_SECS)
            .await?;
        Ok(())
    }

    async fn load(&self, session: Uuid, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(Self::key(session, key)).await?;
        Ok(value)
    }

    async fn clear(&self, session: Uuid, key: &str) -> Result<(), StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del::<_, ()>(Self::key(session, key)).await?;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory backend
// ────────────────────────────────────────────────────────────────────────────

/// HashMap-backed store for tests and local development.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<(Uuid, String), String>>,
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn save(&self, session: Uuid, key: &str, value: String) -> Result<(), StoreError> {
        self.inner
            .write()
            .expect("store lock poisoned")
            .insert((session, key.to_string()), value);
        Ok(())
    }

    async fn load(&self, session: Uuid, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .inner
            .read()
            .expect("store lock poisoned")
            .get(&(session, key.to_string()))
            .cloned())
    }

    async fn clear(&self, session: Uuid, key: &str) -> Result<(), StoreError> {
        self.inner
            .write()
            .expect("store lock poisoned")
            .remove(&(session, key.to_string()));
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Typed wrapper
// ────────────────────────────────────────────────────────────────────────────

/// Typed facade over the raw key-value store. Owns JSON (de)serialization
/// and the absent-on-corruption policy.
#[derive(Clone)]
pub struct ProfileStore {
    inner: Arc<dyn KeyValueStore>,
}

impl ProfileStore {
    pub fn new(inner: Arc<dyn KeyValueStore>) -> Self {
        Self { inner }
    }

    async fn load_json<T: DeserializeOwned>(&self, session: Uuid, key: &str) -> Option<T> {
        let raw = match self.inner.load(session, key).await {
            Ok(v) => v?,
            Err(e) => {
                warn!("Store read failed for {key} (session {session}): {e}; treating as absent");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Stored {key} for session {session} failed to deserialize: {e}; treating as absent");
                None
            }
        }
    }

    async fn save_json<T: Serialize>(
        &self,
        session: Uuid,
        key: &str,
        value: &T,
    ) -> Result<(), AppError> {
        let raw = serde_json::to_string(value).map_err(StoreError::from)?;
        self.inner.save(session, key, raw).await?;
        Ok(())
    }

    pub async fn background(&self, session: Uuid) -> Option<UserBackground> {
        self.load_json(session, KEY_BACKGROUND).await
    }

    pub async fn save_background(
        &self,
        session: Uuid,
        background: &UserBackground,
    ) -> Result<(), AppError> {
        self.save_json(session, KEY_BACKGROUND, background).await
    }

    pub async fn suggestions(&self, session: Uuid) -> Option<Vec<CareerSuggestion>> {
        self.load_json(session, KEY_SUGGESTIONS).await
    }

    pub async fn save_suggestions(
        &self,
        session: Uuid,
        suggestions: &[CareerSuggestion],
    ) -> Result<(), AppError> {
        self.save_json(session, KEY_SUGGESTIONS, &suggestions).await
    }

    pub async fn selected_career(&self, session: Uuid) -> Option<CareerSuggestion> {
        self.load_json(session, KEY_SELECTED_CAREER).await
    }

    pub async fn save_selected_career(
        &self,
        session: Uuid,
        career: &CareerSuggestion,
    ) -> Result<(), AppError> {
        self.save_json(session, KEY_SELECTED_CAREER, career).await
    }

    /// "Start over": drop every key the session owns.
    pub async fn clear_all(&self, session: Uuid) -> Result<(), AppError> {
        for key in ALL_KEYS {
            self.inner.clear(session, key).await?;
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

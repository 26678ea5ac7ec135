use std::sync::Arc;

use crate::chat::ChatSessions;
use crate::jobs::JobListingSource;
use crate::llm_client::ModelClient;
use crate::store::ProfileStore;

/// Shared application state injected into all route handlers via Axum
/// extractors. The model client, job source, and store all sit behind
/// traits so tests run against in-memory fakes.
#[derive(Clone)]
pub struct AppState {
    pub store: ProfileStore,
    pub llm: Arc<dyn ModelClient>,
    pub jobs: Arc<dyn JobListingSource>,
    pub chats: ChatSessions,
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use crate::store::MemoryStore;

    /// `AppState` wired to the in-memory store and caller-provided doubles.
    pub fn test_state(llm: Arc<dyn ModelClient>, jobs: Arc<dyn JobListingSource>) -> AppState {
        AppState {
            store: ProfileStore::new(Arc::new(MemoryStore::default())),
            llm,
            jobs,
            chats: ChatSessions::default(),
        }
    }
}

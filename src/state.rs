//! Application state passed to all handlers.

use std::sync::Arc;

use crate::db::DbPool;
use crate::llm::LlmClient;

#[derive(Clone)]
pub struct AppState {
    /// Shared database (users, sessions, flashcards)
    pub db: DbPool,

    /// Remote grading/hint/distractor client; None when no credential is
    /// configured, which disables the challenge mode's grading and hints.
    pub llm: Option<Arc<LlmClient>>,
}

impl AppState {
    pub fn new(db: DbPool, llm: Option<Arc<LlmClient>>) -> Self {
        Self { db, llm }
    }
}

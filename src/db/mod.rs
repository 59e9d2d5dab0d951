pub mod memory;
pub mod postgres;
pub mod supabase;
pub mod unavailable;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::config::StoreBackend;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use supabase::SupabaseStore;
pub use unavailable::UnavailableStore;

pub const PRACTICE_RESULTS_TABLE: &str = "practice_results";
pub const LEARNING_PROGRESS_TABLE: &str = "learning_progress";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PracticeResultRow {
    pub user_id: Option<String>,
    pub module_code: Option<String>,
    pub question_text: String,
    pub user_answer: String,
    /// Serialized feedback: JSON text for structured feedback, raw text otherwise.
    pub ai_feedback: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearningProgressRow {
    pub user_id: Option<String>,
    pub module_code: Option<String>,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store not configured: {0}")]
    NotConfigured(&'static str),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: reqwest::StatusCode, body: String },
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("{backend} store unavailable: {reason}")]
    Unavailable { backend: &'static str, reason: String },
    #[error("{0}")]
    Rejected(String),
}

/// Append-only sink for graded submissions.
#[async_trait]
pub trait ResultStore: Send + Sync {
    fn name(&self) -> &'static str;

    async fn insert_practice_result(&self, row: &PracticeResultRow) -> Result<(), StoreError>;

    async fn insert_learning_progress(&self, row: &LearningProgressRow) -> Result<(), StoreError>;
}

/// Builds the store selected by `STORE_BACKEND`. A backend that cannot be
/// initialized is replaced by a store that rejects every insert; rows are
/// never redirected to memory unless `memory` was asked for.
pub async fn from_env(backend: StoreBackend) -> Arc<dyn ResultStore> {
    match backend {
        StoreBackend::Supabase => or_unavailable(backend, SupabaseStore::from_env()),
        StoreBackend::Postgres => or_unavailable(backend, PostgresStore::from_env().await),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    }
}

fn or_unavailable<S>(backend: StoreBackend, store: Result<S, StoreError>) -> Arc<dyn ResultStore>
where
    S: ResultStore + 'static,
{
    match store {
        Ok(store) => Arc::new(store),
        Err(err) => {
            tracing::error!(
                backend = backend.as_str(),
                error = %err,
                "result store not initialized, inserts will fail"
            );
            Arc::new(UnavailableStore::new(backend.as_str(), err.to_string()))
        }
    }
}

pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

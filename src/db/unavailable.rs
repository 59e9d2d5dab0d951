use async_trait::async_trait;

use super::{LearningProgressRow, PracticeResultRow, ResultStore, StoreError};

/// Stands in for a backend that failed to initialize. Every insert fails, so
/// batch saves report failure and review writes are logged as lost.
#[derive(Debug, Clone)]
pub struct UnavailableStore {
    backend: &'static str,
    reason: String,
}

impl UnavailableStore {
    pub fn new(backend: &'static str, reason: impl Into<String>) -> Self {
        Self {
            backend,
            reason: reason.into(),
        }
    }

    fn error(&self) -> StoreError {
        StoreError::Unavailable {
            backend: self.backend,
            reason: self.reason.clone(),
        }
    }
}

#[async_trait]
impl ResultStore for UnavailableStore {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    async fn insert_practice_result(&self, _row: &PracticeResultRow) -> Result<(), StoreError> {
        Err(self.error())
    }

    async fn insert_learning_progress(&self, _row: &LearningProgressRow) -> Result<(), StoreError> {
        Err(self.error())
    }
}

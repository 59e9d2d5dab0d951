use std::sync::Mutex;

use async_trait::async_trait;

use super::{LearningProgressRow, PracticeResultRow, ResultStore, StoreError};

/// Process-local store for development runs without database credentials.
#[derive(Debug, Default)]
pub struct MemoryStore {
    practice_results: Mutex<Vec<PracticeResultRow>>,
    learning_progress: Mutex<Vec<LearningProgressRow>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn practice_results(&self) -> Vec<PracticeResultRow> {
        self.practice_results
            .lock()
            .map(|rows| rows.clone())
            .unwrap_or_default()
    }

    pub fn learning_progress(&self) -> Vec<LearningProgressRow> {
        self.learning_progress
            .lock()
            .map(|rows| rows.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn insert_practice_result(&self, row: &PracticeResultRow) -> Result<(), StoreError> {
        let mut rows = self
            .practice_results
            .lock()
            .map_err(|_| StoreError::Rejected("practice_results lock poisoned".into()))?;
        rows.push(row.clone());
        Ok(())
    }

    async fn insert_learning_progress(&self, row: &LearningProgressRow) -> Result<(), StoreError> {
        let mut rows = self
            .learning_progress
            .lock()
            .map_err(|_| StoreError::Rejected("learning_progress lock poisoned".into()))?;
        rows.push(row.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rows_are_appended_not_deduplicated() {
        let store = MemoryStore::new();
        let row = LearningProgressRow {
            user_id: Some("u".into()),
            module_code: Some("m1".into()),
            completed: true,
            language: None,
        };
        store.insert_learning_progress(&row).await.unwrap();
        store.insert_learning_progress(&row).await.unwrap();
        assert_eq!(store.learning_progress().len(), 2);
        assert!(store.practice_results().is_empty());
    }
}

use std::sync::Arc;

use futures::future::join_all;
use tokio::task::JoinHandle;

use crate::db::{LearningProgressRow, PracticeResultRow, ResultStore, StoreError};

/// Result of a write whose outcome is only ever logged.
#[derive(Debug)]
pub enum BestEffort {
    Stored,
    Failed(StoreError),
}

impl BestEffort {
    pub fn from_result(result: Result<(), StoreError>) -> Self {
        match result {
            Ok(()) => Self::Stored,
            Err(err) => Self::Failed(err),
        }
    }

    fn log(&self, what: &'static str) {
        match self {
            Self::Stored => tracing::debug!(what, "best-effort write stored"),
            Self::Failed(err) => tracing::error!(what, error = %err, "best-effort write failed"),
        }
    }
}

/// Writes one graded submission on a detached task. The review response is
/// sent without waiting on the handle; its value exists for logging and tests.
pub fn spawn_practice_result(
    store: Arc<dyn ResultStore>,
    row: PracticeResultRow,
) -> JoinHandle<BestEffort> {
    tokio::spawn(async move {
        let outcome = BestEffort::from_result(store.insert_practice_result(&row).await);
        outcome.log("practice_result");
        outcome
    })
}

pub async fn record_progress(store: &dyn ResultStore, row: &LearningProgressRow) -> BestEffort {
    let outcome = BestEffort::from_result(store.insert_learning_progress(row).await);
    outcome.log("learning_progress");
    outcome
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub saved: usize,
    pub errors: Vec<StoreError>,
}

impl BatchOutcome {
    pub fn all_saved(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Issues every insert at once and waits for all of them. Nothing is rolled
/// back when some fail.
pub async fn save_batch(store: &dyn ResultStore, rows: &[PracticeResultRow]) -> BatchOutcome {
    let settled = join_all(rows.iter().map(|row| store.insert_practice_result(row))).await;

    settled
        .into_iter()
        .fold(BatchOutcome::default(), |mut outcome, result| {
            match result {
                Ok(()) => outcome.saved += 1,
                Err(err) => outcome.errors.push(err),
            }
            outcome
        })
}

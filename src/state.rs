use std::sync::Arc;
use std::time::Instant;

use crate::db::ResultStore;
use crate::services::llm_provider::CompletionClient;
use crate::services::prompt::GradingMode;

/// Per-process settings the handlers read on every request.
#[derive(Debug, Clone, Copy)]
pub struct ReviewSettings {
    pub grading_mode: GradingMode,
    pub record_module_progress: bool,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            grading_mode: GradingMode::default(),
            record_module_progress: true,
        }
    }
}

/// Clients are built once at start-up and shared read-only by every request.
#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    completion: Arc<dyn CompletionClient>,
    store: Arc<dyn ResultStore>,
    settings: ReviewSettings,
}

impl AppState {
    pub fn new(
        completion: Arc<dyn CompletionClient>,
        store: Arc<dyn ResultStore>,
        settings: ReviewSettings,
    ) -> Self {
        Self {
            started_at: Instant::now(),
            completion,
            store,
            settings,
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn completion(&self) -> Arc<dyn CompletionClient> {
        Arc::clone(&self.completion)
    }

    pub fn store(&self) -> Arc<dyn ResultStore> {
        Arc::clone(&self.store)
    }

    pub fn settings(&self) -> ReviewSettings {
        self.settings
    }
}

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use sentence_review_backend::config::{Config, StoreBackend};
use sentence_review_backend::db::{LearningProgressRow, PracticeResultRow, ResultStore, StoreError};
use sentence_review_backend::services::llm_provider::{CompletionClient, LLMError};
use sentence_review_backend::services::prompt::GradingMode;
use sentence_review_backend::state::AppState;

/// Completion client that replays a fixed reply and remembers its prompts.
pub struct ScriptedCompletion {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletion {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    async fn complete(&self, prompt: &str, _temperature: f32) -> Result<String, LLMError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply
            .clone()
            .ok_or(LLMError::NotConfigured("OPENAI_API_KEY"))
    }
}

/// Store that records rows and fails on request.
#[derive(Default)]
pub struct RecordingStore {
    fail_practice_calls: Vec<usize>,
    fail_all_practice: bool,
    fail_progress: bool,
    practice_calls: AtomicUsize,
    practice_rows: Mutex<Vec<PracticeResultRow>>,
    progress_rows: Mutex<Vec<LearningProgressRow>>,
}

impl RecordingStore {
    pub fn healthy() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn broken() -> Arc<Self> {
        Arc::new(Self {
            fail_all_practice: true,
            fail_progress: true,
            ..Self::default()
        })
    }

    /// Fails the practice inserts whose arrival index is listed.
    pub fn failing_calls(calls: &[usize]) -> Arc<Self> {
        Arc::new(Self {
            fail_practice_calls: calls.to_vec(),
            ..Self::default()
        })
    }

    pub fn failing_progress() -> Arc<Self> {
        Arc::new(Self {
            fail_progress: true,
            ..Self::default()
        })
    }

    pub fn practice_calls(&self) -> usize {
        self.practice_calls.load(Ordering::SeqCst)
    }

    pub fn practice_rows(&self) -> Vec<PracticeResultRow> {
        self.practice_rows.lock().unwrap().clone()
    }

    pub fn progress_rows(&self) -> Vec<LearningProgressRow> {
        self.progress_rows.lock().unwrap().clone()
    }

    /// Waits for detached writes to land.
    pub async fn wait_for_practice_calls(&self, expected: usize) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while self.practice_calls() < expected {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("practice insert was never attempted");
    }
}

#[async_trait]
impl ResultStore for RecordingStore {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn insert_practice_result(&self, row: &PracticeResultRow) -> Result<(), StoreError> {
        let call = self.practice_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_all_practice || self.fail_practice_calls.contains(&call) {
            return Err(StoreError::Rejected("insert rejected".into()));
        }
        self.practice_rows.lock().unwrap().push(row.clone());
        Ok(())
    }

    async fn insert_learning_progress(&self, row: &LearningProgressRow) -> Result<(), StoreError> {
        if self.fail_progress {
            return Err(StoreError::Rejected("progress rejected".into()));
        }
        self.progress_rows.lock().unwrap().push(row.clone());
        Ok(())
    }
}

pub fn test_config(mode: GradingMode) -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        log_level: "info".into(),
        grading_mode: mode,
        cors_origins: vec!["http://localhost:5173".into(), "null".into()],
        static_dir: PathBuf::from("does-not-exist"),
        record_module_progress: true,
        store_backend: StoreBackend::Memory,
    }
}

pub fn create_test_app(
    config: &Config,
    completion: Arc<dyn CompletionClient>,
    store: Arc<dyn ResultStore>,
) -> Router {
    let state = AppState::new(
        completion,
        store,
        sentence_review_backend::settings_from(config),
    );
    sentence_review_backend::build_app(state, config)
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use super::{
    LearningProgressRow, PracticeResultRow, ResultStore, StoreError, LEARNING_PROGRESS_TABLE,
    PRACTICE_RESULTS_TABLE,
};

const DEFAULT_TIMEOUT_MS: u64 = 15_000;

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub key: String,
    pub timeout: Duration,
}

impl SupabaseConfig {
    pub fn from_env() -> Result<Self, StoreError> {
        let url = env_string("SUPABASE_URL").ok_or(StoreError::NotConfigured("SUPABASE_URL"))?;
        let key = env_string("SUPABASE_KEY")
            .or_else(|| env_string("SUPABASE_ANON_KEY"))
            .ok_or(StoreError::NotConfigured("SUPABASE_KEY"))?;
        let timeout = Duration::from_millis(
            env_string("SUPABASE_TIMEOUT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_MS),
        );
        Ok(Self { url, key, timeout })
    }
}

/// Inserts rows through the PostgREST endpoint of a hosted Supabase project.
#[derive(Clone)]
pub struct SupabaseStore {
    config: SupabaseConfig,
    client: reqwest::Client,
}

impl SupabaseStore {
    pub fn new(config: SupabaseConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { config, client }
    }

    pub fn from_env() -> Result<Self, StoreError> {
        SupabaseConfig::from_env().map(Self::new)
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.config.url.trim().trim_end_matches('/'))
    }

    async fn insert<T: Serialize + Sync>(&self, table: &str, row: &T) -> Result<(), StoreError> {
        let resp = self
            .client
            .post(self.table_url(table))
            .header("apikey", &self.config.key)
            .bearer_auth(&self.config.key)
            .header("Prefer", "return=minimal")
            .json(&[row])
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let body = resp.text().await.unwrap_or_default();
        Err(StoreError::HttpStatus { status, body })
    }
}

#[async_trait]
impl ResultStore for SupabaseStore {
    fn name(&self) -> &'static str {
        "supabase"
    }

    async fn insert_practice_result(&self, row: &PracticeResultRow) -> Result<(), StoreError> {
        self.insert(PRACTICE_RESULTS_TABLE, row).await
    }

    async fn insert_learning_progress(&self, row: &LearningProgressRow) -> Result<(), StoreError> {
        self.insert(LEARNING_PROGRESS_TABLE, row).await
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

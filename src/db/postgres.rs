use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::{LearningProgressRow, PracticeResultRow, ResultStore, StoreError};

/// Direct Postgres sink for deployments that bypass the Supabase REST layer.
/// Tables are expected to exist; this service never migrates them.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn from_env() -> Result<Self, StoreError> {
        let url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(StoreError::NotConfigured("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(&url)
            .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl ResultStore for PostgresStore {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn insert_practice_result(&self, row: &PracticeResultRow) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO "practice_results"
                ("user_id", "module_code", "question_text", "user_answer", "ai_feedback", "timestamp", "language")
            VALUES ($1, $2, $3, $4, $5, $6::timestamptz, $7)
            "#,
        )
        .bind(&row.user_id)
        .bind(&row.module_code)
        .bind(&row.question_text)
        .bind(&row.user_answer)
        .bind(&row.ai_feedback)
        .bind(&row.timestamp)
        .bind(&row.language)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_learning_progress(&self, row: &LearningProgressRow) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO "learning_progress" ("user_id", "module_code", "completed", "language")
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&row.user_id)
        .bind(&row.module_code)
        .bind(row.completed)
        .bind(&row.language)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

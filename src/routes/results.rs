use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::db::{now_timestamp, LearningProgressRow, PracticeResultRow};
use crate::response::{SaveFailure, SaveResponse};
use crate::services::persistence;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SaveResultRequest {
    pub user_id: Option<String>,
    pub module_code: Option<String>,
    pub results: Option<Vec<GradedAnswer>>,
    pub language: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GradedAnswer {
    pub question_text: String,
    pub user_answer: String,
    /// Passed through as sent; the client owns the scoring scale.
    pub score: Value,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/save-result", post(save_result))
}

async fn save_result(
    State(state): State<AppState>,
    body: Bytes,
) -> Response {
    let req: SaveResultRequest = match super::parse_json_body(&body) {
        Ok(req) => req,
        Err(err) => {
            tracing::error!(error = %err, "save-result body is not valid JSON");
            return SaveFailure::Server.into_response();
        }
    };
    let Some(results) = req.results else {
        tracing::error!("save-result request without results array");
        return SaveFailure::Server.into_response();
    };

    let timestamp = now_timestamp();
    let rows: Vec<PracticeResultRow> = results
        .into_iter()
        .map(|answer| PracticeResultRow {
            user_id: req.user_id.clone(),
            module_code: req.module_code.clone(),
            question_text: answer.question_text,
            user_answer: answer.user_answer,
            ai_feedback: json!({ "score": answer.score }).to_string(),
            timestamp: timestamp.clone(),
            language: req.language.clone(),
        })
        .collect();

    let store = state.store();
    let outcome = persistence::save_batch(store.as_ref(), &rows).await;
    if !outcome.all_saved() {
        for err in &outcome.errors {
            tracing::error!(error = %err, "practice result insert failed");
        }
        tracing::error!(
            failed = outcome.errors.len(),
            saved = outcome.saved,
            "batch save incomplete"
        );
        return SaveFailure::PartialWrite.into_response();
    }

    // A module with no answers is not completed.
    if state.settings().record_module_progress && !rows.is_empty() {
        let progress = LearningProgressRow {
            user_id: req.user_id,
            module_code: req.module_code,
            completed: true,
            language: req.language,
        };
        // Logged inside; a missing progress row does not fail the save.
        persistence::record_progress(store.as_ref(), &progress).await;
    }

    tracing::info!(count = rows.len(), "results saved");
    SaveResponse::saved(rows.len()).into_response()
}

use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use serde::Deserialize;

use crate::db::{now_timestamp, PracticeResultRow};
use crate::response::{FeedbackResponse, ReviewFailure};
use crate::services::grading;
use crate::services::persistence;
use crate::state::AppState;

/// Nothing here is validated; absent text fields grade as empty strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReviewRequest {
    pub sentence: String,
    pub input: String,
    pub user_id: Option<String>,
    pub module_code: Option<String>,
    pub language: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/review", post(review))
}

async fn review(
    State(state): State<AppState>,
    body: Bytes,
) -> Response {
    let req: ReviewRequest = match super::parse_json_body(&body) {
        Ok(req) => req,
        Err(err) => {
            tracing::error!(error = %err, "review body is not valid JSON");
            return ReviewFailure.into_response();
        }
    };

    let mode = state.settings().grading_mode;
    let completion = state.completion();
    let feedback = match grading::grade(completion.as_ref(), mode, &req.sentence, &req.input).await {
        Ok(feedback) => feedback,
        Err(err) => {
            tracing::error!(error = %err, mode = mode.as_str(), "review grading failed");
            return ReviewFailure.into_response();
        }
    };

    let row = PracticeResultRow {
        user_id: req.user_id,
        module_code: req.module_code,
        question_text: req.sentence,
        user_answer: req.input,
        ai_feedback: feedback.to_stored(),
        timestamp: now_timestamp(),
        language: req.language,
    };
    // Detached on purpose: the write's outcome never gates the feedback.
    let _ = persistence::spawn_practice_result(state.store(), row);

    FeedbackResponse { feedback }.into_response()
}

//! The fixed response bodies of the public endpoints. Callers only ever see
//! one success shape and one failure shape per endpoint; causes stay in logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::services::grading::FeedbackResult;

pub const REVIEW_FAILURE_MESSAGE: &str = "AI 처리 중 오류가 발생했습니다.";
pub const SAVE_SUCCESS_MESSAGE: &str = "결과가 성공적으로 저장되었습니다.";
pub const SAVE_PARTIAL_FAILURE_MESSAGE: &str = "일부 결과 저장에 실패했습니다.";
pub const SERVER_ERROR_MESSAGE: &str = "서버 오류가 발생했습니다.";

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub feedback: FeedbackResult,
}

impl IntoResponse for FeedbackResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Any grading failure, whatever the cause.
#[derive(Debug, Clone, Copy)]
pub struct ReviewFailure;

impl IntoResponse for ReviewFailure {
    fn into_response(self) -> Response {
        let body = FeedbackResponse {
            feedback: FeedbackResult::Text(REVIEW_FAILURE_MESSAGE.to_string()),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_count: Option<usize>,
}

impl SaveResponse {
    pub fn saved(count: usize) -> Self {
        Self {
            success: true,
            message: SAVE_SUCCESS_MESSAGE,
            saved_count: Some(count),
        }
    }
}

impl IntoResponse for SaveResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFailure {
    /// At least one insert reported an error.
    PartialWrite,
    /// The request could not be processed at all.
    Server,
}

impl IntoResponse for SaveFailure {
    fn into_response(self) -> Response {
        let message = match self {
            Self::PartialWrite => SAVE_PARTIAL_FAILURE_MESSAGE,
            Self::Server => SERVER_ERROR_MESSAGE,
        };
        let body = SaveResponse {
            success: false,
            message,
            saved_count: None,
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

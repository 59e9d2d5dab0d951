use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::services::llm_provider::{CompletionClient, LLMError};
use crate::services::prompt::{render_prompt, GradingMode};

/// Model feedback in the shape dictated by the grading mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeedbackResult {
    Structured(Value),
    Text(String),
}

impl FeedbackResult {
    /// Text written to the `ai_feedback` column.
    pub fn to_stored(&self) -> String {
        match self {
            Self::Structured(value) => value.to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("completion call failed: {0}")]
    Upstream(#[from] LLMError),
    #[error("completion is not valid JSON: {0}")]
    Format(#[source] serde_json::Error),
}

pub async fn grade(
    client: &dyn CompletionClient,
    mode: GradingMode,
    sentence: &str,
    answer: &str,
) -> Result<FeedbackResult, ReviewError> {
    let prompt = render_prompt(mode, sentence, answer);
    let temperature = client
        .temperature_override()
        .unwrap_or_else(|| mode.default_temperature());

    let text = client.complete(&prompt, temperature).await?;
    parse_feedback(mode, text)
}

/// Parses completion text strictly; malformed JSON is never repaired.
pub fn parse_feedback(mode: GradingMode, text: String) -> Result<FeedbackResult, ReviewError> {
    if !mode.expects_json() {
        return Ok(FeedbackResult::Text(text));
    }
    serde_json::from_str::<Value>(&text)
        .map(FeedbackResult::Structured)
        .map_err(ReviewError::Format)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;

    struct Scripted {
        reply: Result<String, ()>,
        seen: Mutex<Vec<(String, f32)>>,
        forced: Option<f32>,
    }

    impl Scripted {
        fn ok(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                seen: Mutex::new(Vec::new()),
                forced: None,
            }
        }
    }

    #[async_trait]
    impl CompletionClient for Scripted {
        async fn complete(&self, prompt: &str, temperature: f32) -> Result<String, LLMError> {
            self.seen.lock().unwrap().push((prompt.to_string(), temperature));
            self.reply.clone().map_err(|_| LLMError::EmptyChoices)
        }

        fn temperature_override(&self) -> Option<f32> {
            self.forced
        }
    }

    #[tokio::test]
    async fn strict_mode_returns_parsed_object() {
        let client = Scripted::ok(r#"{"종합 평가": {"스코어": 95, "피드백": "정확합니다"}}"#);
        let feedback = grade(&client, GradingMode::Strict, "I am a boy.", "나는 소년이다.")
            .await
            .unwrap();
        assert_eq!(
            feedback,
            FeedbackResult::Structured(json!({"종합 평가": {"스코어": 95, "피드백": "정확합니다"}}))
        );
        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].0.contains("\"I am a boy.\""));
        assert!((seen[0].1 - 0.2).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn fenced_json_is_a_format_failure() {
        let client = Scripted::ok("```json\n{\"총점\": {}}\n```");
        let err = grade(&client, GradingMode::Rubric, "a", "b").await.unwrap_err();
        assert!(matches!(err, ReviewError::Format(_)));
    }

    #[tokio::test]
    async fn critique_mode_keeps_raw_text() {
        let client = Scripted::ok("좋은 번역입니다. 다만 시제가 어색합니다.");
        let feedback = grade(&client, GradingMode::Critique, "a", "b").await.unwrap();
        assert_eq!(
            feedback,
            FeedbackResult::Text("좋은 번역입니다. 다만 시제가 어색합니다.".into())
        );
    }

    #[tokio::test]
    async fn upstream_failure_is_reported() {
        let client = Scripted {
            reply: Err(()),
            seen: Mutex::new(Vec::new()),
            forced: None,
        };
        let err = grade(&client, GradingMode::Rubric, "a", "b").await.unwrap_err();
        assert!(matches!(err, ReviewError::Upstream(LLMError::EmptyChoices)));
    }

    #[tokio::test]
    async fn configured_temperature_wins() {
        let mut client = Scripted::ok("{}");
        client.forced = Some(0.35);
        grade(&client, GradingMode::Rubric, "a", "b").await.unwrap();
        assert!((client.seen.lock().unwrap()[0].1 - 0.35).abs() < f32::EPSILON);
    }

    #[test]
    fn stored_feedback_serialization() {
        let structured = FeedbackResult::Structured(json!({"score": 80}));
        assert_eq!(structured.to_stored(), r#"{"score":80}"#);
        assert_eq!(FeedbackResult::Text("ok".into()).to_stored(), "ok");
        assert_eq!(serde_json::to_value(&FeedbackResult::Text("ok".into())).unwrap(), json!("ok"));
    }
}

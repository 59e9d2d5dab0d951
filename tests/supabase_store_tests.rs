use std::time::Duration;

use serde_json::Value;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sentence_review_backend::db::supabase::SupabaseConfig;
use sentence_review_backend::db::{
    now_timestamp, LearningProgressRow, PracticeResultRow, ResultStore, StoreError, SupabaseStore,
};

fn store_for(server: &MockServer) -> SupabaseStore {
    SupabaseStore::new(SupabaseConfig {
        url: format!("{}/", server.uri()),
        key: "anon-key".to_string(),
        timeout: Duration::from_secs(5),
    })
}

fn practice_row() -> PracticeResultRow {
    PracticeResultRow {
        user_id: Some("user-1".into()),
        module_code: Some("M01".into()),
        question_text: "I am a boy.".into(),
        user_answer: "나는 소년이다.".into(),
        ai_feedback: r#"{"score":95}"#.into(),
        timestamp: now_timestamp(),
        language: Some("ko".into()),
    }
}

#[tokio::test]
async fn test_practice_insert_posts_array_with_auth_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/practice_results"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer anon-key"))
        .and(header("prefer", "return=minimal"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    store_for(&server)
        .insert_practice_result(&practice_row())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["question_text"], "I am a boy.");
    assert_eq!(rows[0]["user_answer"], "나는 소년이다.");
    assert_eq!(rows[0]["ai_feedback"], r#"{"score":95}"#);
    assert_eq!(rows[0]["language"], "ko");
}

#[tokio::test]
async fn test_progress_insert_targets_progress_table() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/learning_progress"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let row = LearningProgressRow {
        user_id: Some("user-1".into()),
        module_code: Some("M01".into()),
        completed: true,
        language: None,
    };
    store_for(&server).insert_learning_progress(&row).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();
    assert_eq!(body[0]["completed"], true);
    assert!(body[0].get("language").is_none());
}

#[tokio::test]
async fn test_rejected_insert_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/practice_results"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string(r#"{"message":"Invalid API key"}"#),
        )
        .mount(&server)
        .await;

    let err = store_for(&server)
        .insert_practice_result(&practice_row())
        .await
        .unwrap_err();
    match err {
        StoreError::HttpStatus { status, body } => {
            assert_eq!(status.as_u16(), 401);
            assert!(body.contains("Invalid API key"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use fyyur_db::entities::{category, question};
use fyyur_db::AppState;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower::ServiceExt;

fn app(db: DatabaseConnection) -> Router {
    fyyur_trivia::router(Arc::new(AppState { db }))
}

fn offline_app() -> Router {
    app(DatabaseConnection::Disconnected)
}

fn make_question(id: i32, category: i32) -> question::Model {
    question::Model {
        id,
        question: format!("Trivia question {id}?"),
        answer: format!("Answer {id}"),
        category,
        difficulty: 1,
    }
}

fn make_category(id: i32, kind: &str) -> category::Model {
    category::Model {
        id,
        kind: kind.to_string(),
    }
}

fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", Value::BigInt(Some(n)))])
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn categories_are_keyed_by_id() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![make_category(1, "Science"), make_category(2, "Art")]])
        .into_connection();

    let (status, json) = send(app(db), get("/categories")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["categories"]["1"], "Science");
    assert_eq!(json["categories"]["2"], "Art");
}

#[tokio::test]
async fn questions_page_includes_totals_and_categories() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(12)]])
        .append_query_results([vec![make_question(11, 1), make_question(12, 2)]])
        .append_query_results([vec![make_category(1, "Science"), make_category(2, "Art")]])
        .into_connection();

    let (status, json) = send(app(db), get("/questions?page=2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_questions"], 12);
    assert_eq!(json["questions"].as_array().unwrap().len(), 2);
    assert_eq!(json["questions"][0]["id"], 11);
    assert_eq!(json["categories"]["2"], "Art");
    assert!(json["current_category"].is_null());
}

#[tokio::test]
async fn page_past_the_end_is_empty() {
    // Count, then categories: no page query is issued.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(12)]])
        .append_query_results([vec![make_category(1, "Science")]])
        .into_connection();

    let (status, json) = send(app(db), get("/questions?page=1000000000000000000")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_questions"], 12);
    assert!(json["questions"].as_array().unwrap().is_empty());
    assert_eq!(json["categories"]["1"], "Science");
}

#[tokio::test]
async fn largest_page_number_is_empty() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(12)]])
        .append_query_results([vec![make_category(1, "Science")]])
        .into_connection();

    let (status, json) = send(app(db), get("/questions?page=9223372036854775807")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["questions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn delete_missing_question_is_404() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<question::Model>::new()])
        .into_connection();

    let (status, json) = send(
        app(db),
        Request::builder()
            .method("DELETE")
            .uri("/questions/1000")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], true);
    assert_eq!(json["msg"], "Question not found");
}

#[tokio::test]
async fn delete_non_numeric_id_is_404() {
    let (status, json) = send(
        offline_app(),
        Request::builder()
            .method("DELETE")
            .uri("/questions/abc")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], 404);
    assert_eq!(json["msg"], "Page Not Found");
}

#[tokio::test]
async fn delete_existing_question() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![make_question(5, 4)]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let (status, json) = send(
        app(db),
        Request::builder()
            .method("DELETE")
            .uri("/questions/5")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json, serde_json::json!({"error": false}));
}

#[tokio::test]
async fn create_question_rejects_short_answer() {
    let (status, json) = send(
        offline_app(),
        json_request(
            "POST",
            "/questions/create",
            r#"{"question": "What is the chemical symbol for gold?", "answer": "A", "category": 1, "difficulty": 2}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], true);
    assert_eq!(json["msg"], "Failed to add question");
}

#[tokio::test]
async fn create_question_rejects_malformed_body() {
    let (status, json) = send(
        offline_app(),
        json_request("POST", "/questions/create", "{not json"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["msg"], "Failed to add question");
}

#[tokio::test]
async fn create_question_accepts_numeric_strings() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![question::Model {
            id: 24,
            question: "What is the chemical symbol for gold?".into(),
            answer: "Au".into(),
            category: 1,
            difficulty: 2,
        }]])
        .into_connection();

    let (status, json) = send(
        app(db),
        json_request(
            "POST",
            "/questions/create",
            r#"{"question": "What is the chemical symbol for gold?", "answer": "Au", "category": "1", "difficulty": "2"}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json, serde_json::json!({"error": false}));
}

#[tokio::test]
async fn search_returns_matches_and_total() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(19)]])
        .append_query_results([vec![make_question(2, 4), make_question(4, 4)]])
        .into_connection();

    let (status, json) = send(
        app(db),
        json_request("POST", "/questions/search", r#"{"searchTerm": "title"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_questions"], 19);
    assert_eq!(json["questions"].as_array().unwrap().len(), 2);
    assert!(json["current_category"].is_null());
}

#[tokio::test]
async fn category_questions() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(19)]])
        .append_query_results([vec![make_question(20, 1), make_question(21, 1)]])
        .into_connection();

    let (status, json) = send(app(db), get("/categories/1/questions")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["questions"][1]["id"], 21);
    assert_eq!(json["questions"][1]["category"], 1);
}

#[tokio::test]
async fn quiz_returns_unseen_question() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![make_question(22, 1)]])
        .into_connection();

    let (status, json) = send(
        app(db),
        json_request(
            "POST",
            "/quizzes",
            r#"{"previous_questions": [20, 21], "quiz_category": {"type": "Science", "id": 1}}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["question"]["id"], 22);
}

#[tokio::test]
async fn quiz_exhausted_returns_null() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<question::Model>::new()])
        .into_connection();

    let (status, json) = send(
        app(db),
        json_request(
            "POST",
            "/quizzes",
            r#"{"previous_questions": [20, 21, 22], "quiz_category": {"type": "Science", "id": 1}}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["question"].is_null());
}

#[tokio::test]
async fn quiz_malformed_body_is_invalid_data() {
    let (status, json) = send(offline_app(), json_request("POST", "/quizzes", "[")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], 400);
    assert_eq!(json["msg"], "Invalid Data");
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let (status, json) = send(offline_app(), get("/nowhere")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], 404);
    assert_eq!(json["error"], true);
    assert_eq!(json["msg"], "Page Not Found");
}

#[tokio::test]
async fn wrong_method_is_json_405() {
    let (status, json) = send(
        offline_app(),
        json_request("PUT", "/categories", "{}"),
    )
    .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(json["msg"], "Method Not Allowed");
}

//! HTTP-level integration tests for the orchestrator's REST façade
//! (§6.1). Runs against an in-process sqlite database and drives the
//! task graph with an inline fake agent instead of a real gRPC client,
//! proving the end-to-end arithmetic scenarios from the original spec's
//! worked examples.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use calc_core::delay::DelayConfig;
use calc_core::ports::{ExpressionStore, UserStore};
use calc_core::registry::TaskRegistry;
use calc_orchestrator::auth::JwtConfig;
use calc_orchestrator::router::build_router;
use calc_orchestrator::state::AppState;
use calc_store::SqliteStores;
use http_body_util::BodyExt;
use hyper::{Request, StatusCode};
use serde_json::Value;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

const JWT_SECRET: &[u8] = b"integration-test-secret";

async fn build_test_app() -> (axum::Router, TaskRegistry) {
    let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
    calc_store::migrate(&pool).await.unwrap();
    let stores = SqliteStores::new(pool);

    let users: Arc<dyn UserStore> = Arc::new(stores.users);
    let expressions: Arc<dyn ExpressionStore> = Arc::new(stores.expressions);
    let registry = TaskRegistry::new();

    let state = AppState {
        users,
        expressions,
        registry: registry.clone(),
        delay: DelayConfig {
            add_ms: 0,
            sub_ms: 0,
            mul_ms: 0,
            div_ms: 0,
        },
        shutdown: CancellationToken::new(),
    };
    let jwt_config = JwtConfig::from_secret(JWT_SECRET);
    (build_router(state, jwt_config), registry)
}

/// Drains the Task Registry as a bare-bones agent would: take a ready
/// task, compute it, resolve it, repeat — until the expression settles.
fn spawn_fake_agent(registry: TaskRegistry) {
    tokio::spawn(async move {
        loop {
            match registry.take_one().await {
                Some(task) => {
                    let result = task.operator.apply(task.arg1, task.arg2);
                    registry.resolve(&task.id, result).await;
                }
                None => tokio::time::sleep(Duration::from_millis(5)).await,
            }
        }
    });
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn register_and_login(app: &axum::Router, login: &str) -> String {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/register")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "login": login, "password": "hunter2" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/login")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "login": login, "password": "hunter2" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    body["token"].as_str().unwrap().to_string()
}

async fn submit(app: &axum::Router, token: &str, expression: &str) -> String {
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/calculate")
                .header("content-type", "application/json")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::from(
                    serde_json::json!({ "expression": expression }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    body["id"].as_str().unwrap().to_string()
}

async fn poll_until_terminal(app: &axum::Router, token: &str, id: &str) -> Value {
    for _ in 0..200 {
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/expressions/{id}"))
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(resp).await;
        if body["status"] != "processing" && body["status"] != "pending" {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("expression {id} never reached a terminal state");
}

#[tokio::test]
async fn health_requires_no_auth() {
    let (app, _registry) = build_test_app().await;
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn calculate_requires_auth() {
    let (app, _registry) = build_test_app().await;
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/calculate")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::json!({ "expression": "2+2" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn precedence_and_parens_resolve_correctly() {
    let (app, registry) = build_test_app().await;
    spawn_fake_agent(registry);
    let token = register_and_login(&app, "alice").await;

    let id = submit(&app, &token, "2+2*2").await;
    let result = poll_until_terminal(&app, &token, &id).await;
    assert_eq!(result["status"], "completed");
    assert_eq!(result["result"], 6.0);

    let id = submit(&app, &token, "2*(3+4)").await;
    let result = poll_until_terminal(&app, &token, &id).await;
    assert_eq!(result["status"], "completed");
    assert_eq!(result["result"], 14.0);
}

#[tokio::test]
async fn list_wraps_expressions_in_an_object() {
    let (app, registry) = build_test_app().await;
    spawn_fake_agent(registry);
    let token = register_and_login(&app, "erin").await;

    let id = submit(&app, &token, "1+1").await;
    poll_until_terminal(&app, &token, &id).await;

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/expressions")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let expressions = body["expressions"].as_array().expect("expressions field must be an array");
    assert_eq!(expressions.len(), 1);
    assert_eq!(expressions[0]["id"], id);
    assert_eq!(expressions[0]["status"], "completed");
    assert_eq!(expressions[0]["result"], 2.0);
}

#[tokio::test]
async fn division_by_zero_fails_the_expression() {
    let (app, registry) = build_test_app().await;
    spawn_fake_agent(registry);
    let token = register_and_login(&app, "bob").await;

    let id = submit(&app, &token, "10/0").await;
    let result = poll_until_terminal(&app, &token, &id).await;
    assert_eq!(result["status"].as_str().unwrap(), "failed: division by zero");
}

#[tokio::test]
async fn malformed_expressions_fail_without_reaching_an_agent() {
    let (app, registry) = build_test_app().await;
    spawn_fake_agent(registry);
    let token = register_and_login(&app, "carol").await;

    let id = submit(&app, &token, "2+").await;
    let result = poll_until_terminal(&app, &token, &id).await;
    assert!(result["status"].as_str().unwrap().starts_with("failed:"));

    let id = submit(&app, &token, "2..2+3").await;
    let result = poll_until_terminal(&app, &token, &id).await;
    assert!(result["status"].as_str().unwrap().starts_with("failed:"));
}

#[tokio::test]
async fn empty_expression_is_rejected_synchronously() {
    let (app, _registry) = build_test_app().await;
    let token = register_and_login(&app, "dave").await;

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/calculate")
                .header("content-type", "application/json")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::from(serde_json::json!({ "expression": "" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn one_user_cannot_see_another_users_expression() {
    let (app, registry) = build_test_app().await;
    spawn_fake_agent(registry);
    let token_a = register_and_login(&app, "owner").await;
    let token_b = register_and_login(&app, "intruder").await;

    let id = submit(&app, &token_a, "1+1").await;
    poll_until_terminal(&app, &token_a, &id).await;

    let resp = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/expressions/{id}"))
                .header("authorization", format!("Bearer {token_b}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

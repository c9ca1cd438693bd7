//! End-to-end handler tests over an in-memory database. Requests go through
//! the full router, so status mapping and unit-of-work commits are covered
//! alongside the happy paths.

use std::collections::HashMap;
use std::sync::Arc;

use api_adapters::{router, AppState};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use domains::{CreditRule, CreditRules, MemberRole, Permission, RolePermissions, WordThreshold};
use serde_json::{json, Value};
use services::critiques::CritiqueLimits;
use storage_adapters::{connect, SqliteUnitOfWork};
use tower::ServiceExt;

fn test_roles() -> RolePermissions {
    let mut grants = HashMap::new();
    grants.insert(
        MemberRole::Admin,
        vec![Permission {
            action: "write".into(),
            resource: "works".into(),
        }],
    );
    grants.insert(
        MemberRole::Member,
        vec![Permission {
            action: "read".into(),
            resource: "works".into(),
        }],
    );
    RolePermissions::new(grants)
}

fn test_rules() -> CreditRules {
    let group = |low: f64, high: f64| {
        vec![
            CreditRule {
                max_words: WordThreshold::Words(3000),
                credits: low,
            },
            CreditRule {
                max_words: WordThreshold::Max,
                credits: high,
            },
        ]
    };
    let mut bonuses = HashMap::new();
    bonuses.insert("new_member".to_string(), 2.0);
    CreditRules::new(group(3.0, 5.0), group(1.0, 2.5), bonuses).unwrap()
}

async fn test_app() -> Router {
    let (app, _) = test_app_with_pool().await;
    app
}

async fn test_app_with_pool() -> (Router, sqlx::SqlitePool) {
    let pool = connect("sqlite::memory:").await.unwrap();
    let app = router(AppState {
        pool: pool.clone(),
        roles: Arc::new(test_roles()),
        credit_rules: Arc::new(test_rules()),
        work_max_words: 10_000,
        critique_limits: CritiqueLimits::default(),
    });
    (app, pool)
}

/// Registration only produces plain members, so moderators are seeded
/// straight through the storage layer.
async fn seed_admin(pool: &sqlx::SqlitePool) -> String {
    let admin = domains::Member::create(
        "admin",
        "admin@example.com",
        "Str0ng!pass",
        MemberRole::Admin,
    )
    .unwrap();
    let uow = SqliteUnitOfWork::begin(pool).await.unwrap();
    domains::MemberRepository::add(&mut uow.members(), &admin)
        .await
        .unwrap();
    uow.commit().await.unwrap();
    admin.id.to_string()
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(value) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register(app: &Router, username: &str, email: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/members",
        Some(json!({
            "username": username,
            "email": email,
            "password": "Str0ng!pass",
            "confirm_password": "Str0ng!pass",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

async fn submit_work(app: &Router, member_id: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/works",
        Some(json!({
            "title": "The Lighthouse",
            "content": "word ".repeat(120).trim(),
            "member_id": member_id,
            "genre": "LITERARY",
            "age_restriction": "NONE",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

fn words(n: usize) -> String {
    "word ".repeat(n).trim().to_string()
}

#[tokio::test]
async fn healthcheck_reports_ok() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::GET, "/healthcheck", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn registration_returns_the_member_without_credentials() {
    let app = test_app().await;
    let body = register(&app, "alice", "alice@example.com").await;
    assert_eq!(body["username"], "alice");
    assert_eq!(body["status"], "INACTIVE");
    assert!(body.get("password").is_none());

    let (status, fetched) = send(
        &app,
        Method::GET,
        &format!("/members/{}", body["id"].as_str().unwrap()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["email"], "alice@example.com");
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let app = test_app().await;
    register(&app, "alice", "alice@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/members",
        Some(json!({
            "username": "bob",
            "email": "alice@example.com",
            "password": "Str0ng!pass",
            "confirm_password": "Str0ng!pass",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn weak_password_is_unprocessable() {
    let app = test_app().await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/members",
        Some(json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "short",
            "confirm_password": "short",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn login_rejects_a_wrong_password() {
    let app = test_app().await;
    register(&app, "alice", "alice@example.com").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/members/login",
        Some(json!({ "email": "alice@example.com", "password": "Wr0ng!pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        Method::POST,
        "/members/login",
        Some(json!({ "email": "alice@example.com", "password": "Str0ng!pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["username"], "alice");
}

#[tokio::test]
async fn registration_awards_the_welcome_bonus() {
    let app = test_app().await;
    let member = register(&app, "alice", "alice@example.com").await;
    let member_id = member["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/members/{member_id}/credits"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], json!(2.0));
    assert_eq!(body["transactions"][0]["transaction_type"], "new_member_bonus");
}

#[tokio::test]
async fn submitted_work_is_listed_and_credited() {
    let app = test_app().await;
    let member = register(&app, "alice", "alice@example.com").await;
    let member_id = member["id"].as_str().unwrap();

    let work = submit_work(&app, member_id).await;
    assert_eq!(work["status"], "PENDING REVIEW");
    assert_eq!(work["word_count"], 120);

    let (status, listed) = send(&app, Method::GET, "/works", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (_, credits) = send(
        &app,
        Method::GET,
        &format!("/members/{member_id}/credits"),
        None,
    )
    .await;
    // welcome bonus plus the small-work award
    assert_eq!(credits["balance"], json!(5.0));
}

#[tokio::test]
async fn invalid_genre_is_unprocessable() {
    let app = test_app().await;
    let member = register(&app, "alice", "alice@example.com").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/works",
        Some(json!({
            "title": "T",
            "content": "some words",
            "member_id": member["id"],
            "genre": "POETRY",
            "age_restriction": "NONE",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn unknown_work_is_not_found() {
    let app = test_app().await;
    let (status, _) = send(
        &app,
        Method::GET,
        "/works/00000000-0000-0000-0000-000000000000",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn moderation_requires_the_write_grant() {
    let app = test_app().await;
    let member = register(&app, "alice", "alice@example.com").await;
    let member_id = member["id"].as_str().unwrap();
    let work = submit_work(&app, member_id).await;
    let work_id = work["id"].as_str().unwrap();

    // plain members only hold the read grant
    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/works/{work_id}/approve"),
        Some(json!({ "actor_id": member_id })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN, "{body}");

    let (_, fetched) = send(&app, Method::GET, &format!("/works/{work_id}"), None).await;
    assert_eq!(fetched["status"], "PENDING REVIEW");
}

#[tokio::test]
async fn critique_and_rating_flow_round_trips() {
    let (app, pool) = test_app_with_pool().await;
    let admin_id = seed_admin(&pool).await;
    let author = register(&app, "alice", "alice@example.com").await;
    let critic = register(&app, "bob", "bob@example.com").await;
    let author_id = author["id"].as_str().unwrap();
    let critic_id = critic["id"].as_str().unwrap();

    let work = submit_work(&app, author_id).await;
    let work_id = work["id"].as_str().unwrap();

    // a pending work cannot be critiqued yet
    let critique_body = json!({
        "about": words(20),
        "successes": words(40),
        "weaknesses": words(40),
        "ideas": words(40),
        "member_id": critic_id,
    });
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/works/{work_id}/critiques"),
        Some(critique_body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, approved) = send(
        &app,
        Method::POST,
        &format!("/works/{work_id}/approve"),
        Some(json!({ "actor_id": admin_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{approved}");
    assert_eq!(approved["status"], "ACTIVE");

    let (status, critique) = send(
        &app,
        Method::POST,
        &format!("/works/{work_id}/critiques"),
        Some(critique_body),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{critique}");
    let critique_id = critique["id"].as_str().unwrap();

    let (status, rating) = send(
        &app,
        Method::POST,
        &format!("/critiques/{critique_id}/ratings"),
        Some(json!({ "score": 4, "comment": "sharp and useful", "member_id": author_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{rating}");
    assert_eq!(rating["score"], 4);

    let (_, fetched) = send(&app, Method::GET, &format!("/works/{work_id}"), None).await;
    assert_eq!(fetched["critique_count"], 1);

    // the critique award landed alongside the critic's welcome bonus
    let (_, credits) = send(
        &app,
        Method::GET,
        &format!("/members/{critic_id}/credits"),
        None,
    )
    .await;
    assert_eq!(credits["balance"], json!(3.0));
}

#[tokio::test]
async fn out_of_range_score_is_unprocessable() {
    let app = test_app().await;
    let member = register(&app, "alice", "alice@example.com").await;
    let (status, _) = send(
        &app,
        Method::POST,
        &format!(
            "/critiques/{}/ratings",
            "00000000-0000-0000-0000-000000000000"
        ),
        Some(json!({ "score": 6, "comment": null, "member_id": member["id"] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

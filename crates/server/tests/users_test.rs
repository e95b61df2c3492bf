mod common;

use axum::http::StatusCode;
use common::{auth_header, setup};

#[tokio::test]
async fn search_matches_substring_and_excludes_caller() {
    let (server, pool) = setup().await;
    let (_, token) = common::create_test_user(&pool, "alice@test.com", "alice", "pass123").await;
    common::create_test_user(&pool, "malik@test.com", "malik", "pass123").await;
    common::create_test_user(&pool, "bob@test.com", "bob", "pass123").await;

    let (h, v) = auth_header(&token);
    let res = server
        .get("/search_users")
        .add_query_param("username", "LI")
        .add_header(h, v)
        .await;

    res.assert_status_ok();
    let body: serde_json::Value = res.json();
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], "malik");
    assert!(users[0]["_id"].as_str().is_some());
    assert!(users[0].get("password").is_none());
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
    let (server, pool) = setup().await;
    let (_, token) = common::create_test_user(&pool, "alice@test.com", "alice", "pass123").await;
    common::create_test_user(&pool, "bob@test.com", "bob", "pass123").await;

    let (h, v) = auth_header(&token);
    let res = server
        .get("/search_users")
        .add_query_param("username", "%")
        .add_header(h, v)
        .await;

    res.assert_status_ok();
    let body: serde_json::Value = res.json();
    assert_eq!(body["users"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn search_requires_query() {
    let (server, pool) = setup().await;
    let (_, token) = common::create_test_user(&pool, "alice@test.com", "alice", "pass123").await;

    let (h, v) = auth_header(&token);
    let res = server
        .get("/search_users")
        .add_query_param("username", "  ")
        .add_header(h, v)
        .await;
    res.assert_status(StatusCode::BAD_REQUEST);

    let (h, v) = auth_header(&token);
    server
        .get("/search_users")
        .add_header(h, v)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_returns_every_match() {
    let (server, pool) = setup().await;
    let (_, token) = common::create_test_user(&pool, "alice@test.com", "alice", "pass123").await;

    let now = pigeon_server::models::format_timestamp(chrono::Utc::now());
    for i in 0..30 {
        sqlx::query(
            r#"INSERT INTO "user" (id, username, email, password, created_at, updated_at)
               VALUES (?, ?, ?, 'unused', ?, ?)"#,
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(format!("match{:02}", i))
        .bind(format!("match{:02}@test.com", i))
        .bind(&now)
        .bind(&now)
        .execute(&pool)
        .await
        .unwrap();
    }

    let (h, v) = auth_header(&token);
    let res = server
        .get("/search_users")
        .add_query_param("username", "match")
        .add_header(h, v)
        .await;

    res.assert_status_ok();
    let body: serde_json::Value = res.json();
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 30);
    assert_eq!(users[0]["username"], "match00");
    assert_eq!(users[29]["username"], "match29");
}

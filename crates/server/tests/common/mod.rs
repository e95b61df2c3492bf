#![allow(dead_code)]

use argon2::PasswordHasher;
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use axum_test::TestServer;
use pigeon_server::{config::Config, db, routes, store::Stores, AppState};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;

/// Create an in-memory SQLite pool with schema applied.
pub async fn setup_test_db() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to create in-memory SQLite pool");

    db::apply_schema(&pool).await.unwrap();

    pool
}

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".into(),
        port: 0,
        database_path: ":memory:".into(),
        session_ttl_days: 30,
        cors_allow_any_origin: true,
    }
}

/// Build a test Axum app with the given pool.
pub fn create_test_app(pool: SqlitePool) -> Router {
    let state = Arc::new(AppState {
        stores: Stores::sqlite(pool),
        config: test_config(),
    });

    routes::build_router(state)
}

pub async fn setup() -> (TestServer, SqlitePool) {
    let pool = setup_test_db().await;
    let app = create_test_app(pool.clone());
    let server = TestServer::new(app).unwrap();
    (server, pool)
}

pub fn auth_header(token: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("authorization"),
        format!("Bearer {}", token).parse().unwrap(),
    )
}

/// Create a test user directly in the database. Returns (user_id, session_token).
pub async fn create_test_user(
    pool: &SqlitePool,
    email: &str,
    username: &str,
    password: &str,
) -> (String, String) {
    let user_id = uuid::Uuid::new_v4().to_string();
    let now = pigeon_server::models::format_timestamp(chrono::Utc::now());

    let salt = argon2::password_hash::SaltString::generate(&mut rand::rngs::OsRng);
    let password_hash = argon2::Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .unwrap()
        .to_string();

    sqlx::query(
        r#"INSERT INTO "user" (id, username, email, password, first_name, last_name, created_at, updated_at)
           VALUES (?, ?, ?, ?, NULL, NULL, ?, ?)"#,
    )
    .bind(&user_id)
    .bind(username)
    .bind(email)
    .bind(&password_hash)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await
    .unwrap();

    // Create session
    let session_token = uuid::Uuid::new_v4().simple().to_string();
    let expires_at = pigeon_server::models::format_timestamp(
        chrono::Utc::now() + chrono::Duration::days(30),
    );

    sqlx::query(
        r#"INSERT INTO "session" (id, user_id, token, expires_at, created_at)
           VALUES (?, ?, ?, ?, ?)"#,
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(&user_id)
    .bind(&session_token)
    .bind(&expires_at)
    .bind(&now)
    .execute(pool)
    .await
    .unwrap();

    (user_id, session_token)
}

/// Create a group through the API and return its id.
pub async fn create_test_group(
    server: &TestServer,
    token: &str,
    name: &str,
    members: &[&str],
) -> String {
    let (h, v) = auth_header(token);
    let res = server
        .post("/groups/create")
        .add_header(h, v)
        .json(&serde_json::json!({ "name": name, "members": members }))
        .await;
    res.assert_status(axum::http::StatusCode::CREATED);
    let body: serde_json::Value = res.json();
    body["group_id"].as_str().unwrap().to_string()
}

pub async fn count_messages(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM "messages""#)
        .fetch_one(pool)
        .await
        .unwrap()
}

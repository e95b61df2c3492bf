use axum::http::{HeaderName, Method};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};

use pigeon_server::{config::Config, db, routes, store::Stores, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pigeon_server=info".into()),
        )
        .init();

    let config = Config::from_env();

    let pool = db::init_pool(&config.database_path)
        .await
        .expect("Failed to initialize database");

    let state = Arc::new(AppState {
        stores: Stores::sqlite(pool),
        config: config.clone(),
    });

    let allow_origin = if config.cors_allow_any_origin {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::exact(
            format!("http://{}:{}", config.host, config.port)
                .parse()
                .expect("Invalid origin"),
        )
    };

    let app = routes::build_router(state).layer(
        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([
                HeaderName::from_static("content-type"),
                HeaderName::from_static("cookie"),
                HeaderName::from_static("authorization"),
            ])
            .allow_credentials(true),
    );

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await.expect("Failed to bind");

    tracing::info!("Pigeon server running on {}", addr);

    axum::serve(listener, app).await.expect("Server error");
}

use axum::{
    Json, Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use http::{Method, header};
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};

use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod state;
mod db;

mod crypto {
    pub mod hash;
    pub mod token;
}

mod models {
    pub mod user;
    pub mod session;
    pub mod stream_key;
}

mod repositories {
    pub mod user;
    pub mod stream_key;
}

mod services {
    pub mod auth;
    pub mod session;
    pub mod stream_key;
    pub mod playback_token;
}

mod handlers {
    pub mod auth;
    pub mod stream_key;
    pub mod tokens;
    pub mod validate;
}

mod middleware_layer {
    pub mod auth;
    pub mod rate_limit;
}

mod validation {
    pub mod auth;
}

use config::Config;
use state::AppState;

/// The health-check payload.
#[derive(serde::Serialize)]
struct Health {
    status: &'static str,
}

/// Tiny endpoint used by load balancers / Docker healthchecks.
async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    tracing::info!("✅ Configuration loaded successfully");

    let state = AppState::new(&config).await?;
    tracing::info!("✅ AppState initialized");

    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:3000".parse().unwrap(),
            "http://127.0.0.1:3000".parse().unwrap(),
            "http://[::1]:3000".parse().unwrap(),
        ])
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            "x-session-id".parse().unwrap(),
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400));

    let register_routes = Router::new()
        .route("/api/auth/register", post(handlers::auth::register))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::rate_limit::rate_limit_register,
        ))
        .with_state(state.clone());

    let login_routes = Router::new()
        .route("/api/auth/login", post(handlers::auth::login))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::rate_limit::rate_limit_login,
        ))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/stream-key", get(handlers::stream_key::get_stream_key))
        .route(
            "/api/stream-key/new",
            post(handlers::stream_key::new_stream_key),
        )
        .route("/api/tokens", post(handlers::tokens::issue_token))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_auth,
        ))
        .with_state(state.clone());

    // Validation endpoints for the RTMP ingest server and the edge
    // proxy. They bypass the session layer entirely.
    let validation_routes = Router::new()
        .route("/api/validate-key", get(handlers::validate::validate_key))
        .route(
            "/api/validate-token",
            get(handlers::validate::validate_token),
        )
        .with_state(state.clone());

    let app = Router::new()
        .merge(register_routes)
        .merge(login_routes)
        .merge(protected_routes)
        .merge(validation_routes)
        .route("/health", get(health))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

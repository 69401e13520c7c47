pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::database::AppointmentStore;

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub pool: PgPool,
    pub store: AppointmentStore,
}

impl AppState {
    pub fn new(config: AppConfig, pool: PgPool) -> Self {
        let store = AppointmentStore::new(pool.clone());
        Self { config, pool, store }
    }
}

/// Build the application router
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/oauth/token", post(handlers::auth::token_post))
        // Protected (bearer token required)
        .merge(protected_routes(state.clone()))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/me", get(handlers::auth::me_get))
        .route("/appointments", post(handlers::appointments::create))
        .route(
            "/appointments/:id",
            get(handlers::appointments::show).delete(handlers::appointments::destroy),
        )
        .route(
            "/appointments/year/:year/week/:week",
            get(handlers::appointments::week),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::jwt_auth_middleware,
        ))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Agenda API",
            "version": version,
            "description": "Appointment booking API built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "token": "/oauth/token (public - token acquisition)",
                "me": "/me (protected)",
                "appointments": "/appointments[/:id] (protected)",
                "week": "/appointments/year/:year/week/:week (protected)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match database::manager::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}

use crate::constants::API_VERSION;
use crate::handlers;
use axum::http::{HeaderValue, Method};
use axum::response::Json;
use axum::routing::{get, post, put};
use axum::Router;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};

pub fn create_router(pool: SqlitePool) -> Router {
    let cors_layer = create_cors_layer();

    Router::new()
        .route("/health", get(health_check))
        .route("/", get(root))
        // Auth
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/me", get(handlers::auth::me))
        // Users
        .route("/api/users/me", put(handlers::users::update_me))
        .route("/api/users/{id}", get(handlers::users::get_profile))
        // Skill catalog
        .route(
            "/api/skills",
            get(handlers::skills::list).post(handlers::skills::create),
        )
        .route(
            "/api/skills/{id}",
            get(handlers::skills::get).delete(handlers::skills::delete),
        )
        // Request ledger
        .route(
            "/api/requests",
            get(handlers::requests::list).post(handlers::requests::create),
        )
        .route(
            "/api/requests/{id}",
            get(handlers::requests::get).delete(handlers::requests::remove),
        )
        .route("/api/requests/{id}/accept", put(handlers::requests::accept))
        .route(
            "/api/requests/{id}/decline",
            put(handlers::requests::decline),
        )
        .route(
            "/api/requests/{id}/complete",
            put(handlers::requests::complete),
        )
        // Reviews
        .route("/api/reviews", post(handlers::reviews::create))
        .route(
            "/api/reviews/{user_id}",
            get(handlers::reviews::list_for_user),
        )
        .layer(cors_layer)
        .with_state(pool)
}

fn create_cors_layer() -> CorsLayer {
    let mut cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .allow_credentials(false);

    // Check if ALLOWED_ORIGINS environment variable is set for multiple domains
    if let Ok(cors_origins) = std::env::var("ALLOWED_ORIGINS") {
        let origins: Vec<HeaderValue> = cors_origins
            .split(',')
            .filter_map(|origin| {
                let trimmed = origin.trim();
                if !trimmed.is_empty() {
                    trimmed.parse().ok()
                } else {
                    None
                }
            })
            .collect();

        if !origins.is_empty() {
            cors = cors.allow_origin(origins);
        } else {
            // Fallback to permissive if parsing fails
            cors = cors.allow_origin(Any);
        }
    } else {
        // Default to permissive for development
        cors = cors.allow_origin(Any);
    }

    cors
}

async fn health_check() -> &'static str {
    "OK"
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "SwapSkillz API is running!",
        "version": API_VERSION,
    }))
}

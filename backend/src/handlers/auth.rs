use crate::auth::{self, AuthUser};
use crate::db::{sessions, users};
use crate::error::ApiError;
use crate::models::OwnUser;
use crate::utils::validate;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: OwnUser,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub success: bool,
    pub user: OwnUser,
}

pub async fn register(
    State(pool): State<SqlitePool>,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let mut errors = Vec::new();
    validate::check_name(&body.name, &mut errors);
    validate::check_email(body.email.trim(), &mut errors);
    validate::check_password(&body.password, &mut errors);
    validate::finish(errors)?;

    let email = validate::normalize_email(&body.email);
    if users::get_user_by_email(&pool, &email).await?.is_some() {
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let password_hash = auth::hash_password(&body.password)?;
    let user = users::create_user(&pool, body.name.trim(), &email, &password_hash).await?;

    let token = auth::generate_token();
    sessions::create_session(&pool, &user.id, &token).await?;

    tracing::info!(user_id = %user.id, "registered new user");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            token,
            user: user.into_own(),
        }),
    ))
}

pub async fn login(
    State(pool): State<SqlitePool>,
    Json(body): Json<LoginBody>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = validate::normalize_email(&body.email);

    // Same error for unknown email and bad password.
    let invalid = || ApiError::Unauthorized("Invalid credentials".to_string());

    let user = users::get_user_by_email(&pool, &email)
        .await?
        .ok_or_else(invalid)?;

    if !auth::verify_password(&body.password, &user.password_hash) {
        return Err(invalid());
    }

    let token = auth::generate_token();
    sessions::create_session(&pool, &user.id, &token).await?;

    Ok(Json(AuthResponse {
        success: true,
        token,
        user: user.into_own(),
    }))
}

pub async fn me(
    State(pool): State<SqlitePool>,
    caller: AuthUser,
) -> Result<Json<MeResponse>, ApiError> {
    let user = users::get_user_by_id(&pool, &caller.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(MeResponse {
        success: true,
        user: user.into_own(),
    }))
}

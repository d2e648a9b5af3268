use crate::auth::AuthUser;
use crate::db::users;
use crate::error::ApiError;
use crate::models::{OwnUser, PublicUser};
use crate::utils::validate;
use axum::extract::{Path, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub success: bool,
    pub user: OwnUser,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileBody {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
}

pub async fn get_profile(
    State(pool): State<SqlitePool>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = users::get_public_profile(&pool, &user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(ProfileResponse {
        success: true,
        user,
    }))
}

pub async fn update_me(
    State(pool): State<SqlitePool>,
    caller: AuthUser,
    Json(body): Json<UpdateProfileBody>,
) -> Result<Json<UpdateResponse>, ApiError> {
    let mut errors = Vec::new();
    if let Some(name) = &body.name {
        validate::check_name(name, &mut errors);
    }
    validate::finish(errors)?;

    let user = users::update_profile(
        &pool,
        &caller.id,
        body.name.as_deref().map(str::trim),
        body.avatar.as_deref(),
        body.bio.as_deref(),
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UpdateResponse {
        success: true,
        user: user.into_own(),
    }))
}

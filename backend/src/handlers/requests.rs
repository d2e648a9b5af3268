use crate::auth::AuthUser;
use crate::db::{requests, users};
use crate::error::{ApiError, FieldError};
use crate::models::{Direction, RequestStatus, SwapRequestDetails};
use crate::utils::validate;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sqlx::SqlitePool;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestBody {
    pub receiver_id: String,
    pub skill_offered: String,
    pub skill_wanted: String,
    pub message: Option<String>,
    pub scheduled_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct RequestListQuery {
    /// `sent` or `received`; anything else means both sides.
    #[serde(rename = "type")]
    pub direction: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RequestResponse {
    pub success: bool,
    pub request: SwapRequestDetails,
}

#[derive(Debug, Serialize)]
pub struct RequestListResponse {
    pub success: bool,
    pub count: usize,
    pub requests: Vec<SwapRequestDetails>,
}

pub async fn list(
    State(pool): State<SqlitePool>,
    caller: AuthUser,
    Query(query): Query<RequestListQuery>,
) -> Result<Json<RequestListResponse>, ApiError> {
    let direction = Direction::from_query(query.direction.as_deref());
    let requests = requests::list_for_user(&pool, &caller.id, direction).await?;

    Ok(Json(RequestListResponse {
        success: true,
        count: requests.len(),
        requests,
    }))
}

pub async fn get(
    State(pool): State<SqlitePool>,
    caller: AuthUser,
    Path(request_id): Path<String>,
) -> Result<Json<RequestResponse>, ApiError> {
    let details = requests::get_with_parties(&pool, &request_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Request not found".to_string()))?;

    if !details.request.is_party(&caller.id) {
        return Err(ApiError::Forbidden(
            "Not authorized to view this request".to_string(),
        ));
    }

    Ok(Json(RequestResponse {
        success: true,
        request: details,
    }))
}

pub async fn create(
    State(pool): State<SqlitePool>,
    caller: AuthUser,
    Json(body): Json<CreateRequestBody>,
) -> Result<(StatusCode, Json<RequestResponse>), ApiError> {
    let mut errors = Vec::new();
    if body.skill_offered.trim().is_empty() {
        errors.push(FieldError::new("skillOffered", "Please name a skill to offer"));
    }
    if body.skill_wanted.trim().is_empty() {
        errors.push(FieldError::new("skillWanted", "Please name a skill you want"));
    }
    validate::finish(errors)?;

    if body.receiver_id == caller.id {
        return Err(ApiError::InvalidOperation(
            "Cannot send request to yourself".to_string(),
        ));
    }

    if users::get_user_by_id(&pool, &body.receiver_id).await?.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    if requests::pending_exists(&pool, &caller.id, &body.receiver_id).await? {
        return Err(ApiError::Conflict(
            "You already have a pending request with this user".to_string(),
        ));
    }

    let created = requests::create(
        &pool,
        &requests::NewSwapRequest {
            sender_id: &caller.id,
            receiver_id: &body.receiver_id,
            skill_offered: body.skill_offered.trim(),
            skill_wanted: body.skill_wanted.trim(),
            message: body.message.as_deref(),
            scheduled_date: body.scheduled_date,
        },
    )
    .await?;

    tracing::info!(request_id = %created.id, sender = %caller.id, "swap request created");

    let details = requests::get_with_parties(&pool, &created.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Request not found".to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(RequestResponse {
            success: true,
            request: details,
        }),
    ))
}

pub async fn accept(
    state: State<SqlitePool>,
    caller: AuthUser,
    path: Path<String>,
) -> Result<Json<RequestResponse>, ApiError> {
    respond(state, caller, path, RequestStatus::Accepted).await
}

pub async fn decline(
    state: State<SqlitePool>,
    caller: AuthUser,
    path: Path<String>,
) -> Result<Json<RequestResponse>, ApiError> {
    respond(state, caller, path, RequestStatus::Declined).await
}

/// Shared accept/decline path: receiver-only, and only from `pending`.
async fn respond(
    State(pool): State<SqlitePool>,
    caller: AuthUser,
    Path(request_id): Path<String>,
    status: RequestStatus,
) -> Result<Json<RequestResponse>, ApiError> {
    let action = match status {
        RequestStatus::Accepted => "accept",
        _ => "decline",
    };

    let request = requests::get(&pool, &request_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Request not found".to_string()))?;

    if request.receiver_id != caller.id {
        return Err(ApiError::Forbidden(format!(
            "Not authorized to {action} this request"
        )));
    }

    let updated = requests::mark_responded(&pool, &request_id, status, Utc::now()).await?;
    if !updated {
        return Err(ApiError::InvalidState(
            "Request is no longer pending".to_string(),
        ));
    }

    let details = requests::get_with_parties(&pool, &request_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Request not found".to_string()))?;

    Ok(Json(RequestResponse {
        success: true,
        request: details,
    }))
}

pub async fn complete(
    State(pool): State<SqlitePool>,
    caller: AuthUser,
    Path(request_id): Path<String>,
) -> Result<Json<RequestResponse>, ApiError> {
    let request = requests::get(&pool, &request_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Request not found".to_string()))?;

    if !request.is_party(&caller.id) {
        return Err(ApiError::Forbidden("Not authorized".to_string()));
    }

    let updated = requests::mark_completed(&pool, &request_id).await?;
    if !updated {
        return Err(ApiError::InvalidState(
            "Only an accepted request can be completed".to_string(),
        ));
    }

    let details = requests::get_with_parties(&pool, &request_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Request not found".to_string()))?;

    Ok(Json(RequestResponse {
        success: true,
        request: details,
    }))
}

pub async fn remove(
    State(pool): State<SqlitePool>,
    caller: AuthUser,
    Path(request_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let request = requests::get(&pool, &request_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Request not found".to_string()))?;

    if request.sender_id != caller.id {
        return Err(ApiError::Forbidden(
            "Not authorized to delete this request".to_string(),
        ));
    }

    requests::delete(&pool, &request_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Request cancelled successfully",
    })))
}

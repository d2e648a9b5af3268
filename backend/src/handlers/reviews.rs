use crate::auth::AuthUser;
use crate::constants::{MAX_RATING, MAX_REVIEW_COMMENT_LEN, MIN_RATING};
use crate::db::{requests, reviews};
use crate::error::{ApiError, FieldError};
use crate::models::{RequestStatus, Review, ReviewWithReviewer};
use crate::utils::validate;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewBody {
    pub request_id: String,
    pub rating: i64,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReviewListResponse {
    pub success: bool,
    pub count: usize,
    pub reviews: Vec<ReviewWithReviewer>,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub success: bool,
    pub review: Review,
}

pub async fn list_for_user(
    State(pool): State<SqlitePool>,
    Path(user_id): Path<String>,
) -> Result<Json<ReviewListResponse>, ApiError> {
    let reviews = reviews::list_for_user(&pool, &user_id).await?;

    Ok(Json(ReviewListResponse {
        success: true,
        count: reviews.len(),
        reviews,
    }))
}

/// Feedback hangs off a completed swap: the caller must be one of its two
/// parties, and each party reviews a given swap at most once.
pub async fn create(
    State(pool): State<SqlitePool>,
    caller: AuthUser,
    Json(body): Json<CreateReviewBody>,
) -> Result<(StatusCode, Json<ReviewResponse>), ApiError> {
    let mut errors = Vec::new();
    if !(MIN_RATING..=MAX_RATING).contains(&body.rating) {
        errors.push(FieldError::new(
            "rating",
            format!("Rating must be between {MIN_RATING} and {MAX_RATING}"),
        ));
    }
    if let Some(comment) = &body.comment {
        if comment.chars().count() > MAX_REVIEW_COMMENT_LEN {
            errors.push(FieldError::new(
                "comment",
                format!("Comment cannot be more than {MAX_REVIEW_COMMENT_LEN} characters"),
            ));
        }
    }
    validate::finish(errors)?;

    let request = requests::get(&pool, &body.request_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Request not found".to_string()))?;

    if !request.is_party(&caller.id) {
        return Err(ApiError::Forbidden(
            "Not authorized to review this swap".to_string(),
        ));
    }

    if request.status != RequestStatus::Completed {
        return Err(ApiError::InvalidState(
            "Only a completed swap can be reviewed".to_string(),
        ));
    }

    if reviews::exists_for_request(&pool, &body.request_id, &caller.id).await? {
        return Err(ApiError::Conflict(
            "You already reviewed this swap".to_string(),
        ));
    }

    let reviewed_user_id = if request.sender_id == caller.id {
        request.receiver_id.clone()
    } else {
        request.sender_id.clone()
    };

    let review = reviews::create(
        &pool,
        &body.request_id,
        &caller.id,
        &reviewed_user_id,
        body.rating,
        body.comment.as_deref().map(str::trim),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ReviewResponse {
            success: true,
            review,
        }),
    ))
}

use crate::models::{Review, ReviewWithReviewer, Reviewer};
use anyhow::Result;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

pub async fn create(
    pool: &SqlitePool,
    request_id: &str,
    reviewer_id: &str,
    reviewed_user_id: &str,
    rating: i64,
    comment: Option<&str>,
) -> Result<Review> {
    let now = Utc::now();
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO reviews (id, request_id, reviewer_id, reviewed_user_id, rating, comment, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(request_id)
    .bind(reviewer_id)
    .bind(reviewed_user_id)
    .bind(rating)
    .bind(comment)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(Review {
        id,
        request_id: request_id.to_string(),
        reviewer_id: reviewer_id.to_string(),
        reviewed_user_id: reviewed_user_id.to_string(),
        rating,
        comment: comment.map(str::to_string),
        created_at: now,
    })
}

/// One review per (request, reviewer).
pub async fn exists_for_request(
    pool: &SqlitePool,
    request_id: &str,
    reviewer_id: &str,
) -> Result<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM reviews WHERE request_id = ? AND reviewer_id = ?",
    )
    .bind(request_id)
    .bind(reviewer_id)
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}

/// Reviews received by a user, newest first.
pub async fn list_for_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<ReviewWithReviewer>> {
    let rows = sqlx::query(
        r#"
        SELECT v.id, v.request_id, v.reviewer_id, v.reviewed_user_id, v.rating, v.comment, v.created_at,
               u.name AS reviewer_name, u.avatar AS reviewer_avatar
        FROM reviews v
        JOIN users u ON v.reviewer_id = u.id
        WHERE v.reviewed_user_id = ?
        ORDER BY v.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut reviews = Vec::with_capacity(rows.len());
    for row in &rows {
        reviews.push(with_reviewer_from_row(row)?);
    }

    Ok(reviews)
}

fn with_reviewer_from_row(row: &SqliteRow) -> Result<ReviewWithReviewer, sqlx::Error> {
    let review = Review {
        id: row.try_get("id")?,
        request_id: row.try_get("request_id")?,
        reviewer_id: row.try_get("reviewer_id")?,
        reviewed_user_id: row.try_get("reviewed_user_id")?,
        rating: row.try_get("rating")?,
        comment: row.try_get("comment")?,
        created_at: row.try_get("created_at")?,
    };

    let reviewer = Reviewer {
        id: review.reviewer_id.clone(),
        name: row.try_get("reviewer_name")?,
        avatar: row.try_get("reviewer_avatar")?,
    };

    Ok(ReviewWithReviewer { review, reviewer })
}

use crate::models::{Direction, Party, RequestStatus, SwapRequest, SwapRequestDetails};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

pub struct NewSwapRequest<'a> {
    pub sender_id: &'a str,
    pub receiver_id: &'a str,
    pub skill_offered: &'a str,
    pub skill_wanted: &'a str,
    pub message: Option<&'a str>,
    pub scheduled_date: Option<DateTime<Utc>>,
}

pub async fn create(pool: &SqlitePool, new: &NewSwapRequest<'_>) -> Result<SwapRequest> {
    let now = Utc::now();
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO swap_requests
            (id, sender_id, receiver_id, skill_offered, skill_wanted, message, scheduled_date, status, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, 'pending', ?)
        "#,
    )
    .bind(&id)
    .bind(new.sender_id)
    .bind(new.receiver_id)
    .bind(new.skill_offered)
    .bind(new.skill_wanted)
    .bind(new.message)
    .bind(new.scheduled_date)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(SwapRequest {
        id,
        sender_id: new.sender_id.to_string(),
        receiver_id: new.receiver_id.to_string(),
        skill_offered: new.skill_offered.to_string(),
        skill_wanted: new.skill_wanted.to_string(),
        message: new.message.map(str::to_string),
        scheduled_date: new.scheduled_date,
        status: RequestStatus::Pending,
        created_at: now,
        responded_at: None,
    })
}

pub async fn get(pool: &SqlitePool, request_id: &str) -> Result<Option<SwapRequest>> {
    let request = sqlx::query_as::<_, SwapRequest>(
        r#"
        SELECT id, sender_id, receiver_id, skill_offered, skill_wanted,
               message, scheduled_date, status, created_at, responded_at
        FROM swap_requests
        WHERE id = ?
        "#,
    )
    .bind(request_id)
    .fetch_optional(pool)
    .await?;

    Ok(request)
}

/// Duplicate-pending check for Create: at most one `pending` request may
/// exist per (sender, receiver) ordered pair.
pub async fn pending_exists(pool: &SqlitePool, sender_id: &str, receiver_id: &str) -> Result<bool> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM swap_requests
        WHERE sender_id = ? AND receiver_id = ? AND status = 'pending'
        "#,
    )
    .bind(sender_id)
    .bind(receiver_id)
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}

const DETAILS_SELECT: &str = r#"
    SELECT r.id, r.sender_id, r.receiver_id, r.skill_offered, r.skill_wanted,
           r.message, r.scheduled_date, r.status, r.created_at, r.responded_at,
           s.name AS sender_name, s.avatar AS sender_avatar, s.verified AS sender_verified,
           rc.name AS receiver_name, rc.avatar AS receiver_avatar, rc.verified AS receiver_verified
    FROM swap_requests r
    JOIN users s ON r.sender_id = s.id
    JOIN users rc ON r.receiver_id = rc.id
"#;

fn details_from_row(row: &SqliteRow) -> Result<SwapRequestDetails, sqlx::Error> {
    let request = SwapRequest {
        id: row.try_get("id")?,
        sender_id: row.try_get("sender_id")?,
        receiver_id: row.try_get("receiver_id")?,
        skill_offered: row.try_get("skill_offered")?,
        skill_wanted: row.try_get("skill_wanted")?,
        message: row.try_get("message")?,
        scheduled_date: row.try_get("scheduled_date")?,
        status: row.try_get("status")?,
        created_at: row.try_get("created_at")?,
        responded_at: row.try_get("responded_at")?,
    };

    let sender = Party {
        id: request.sender_id.clone(),
        name: row.try_get("sender_name")?,
        avatar: row.try_get("sender_avatar")?,
        verified: row.try_get("sender_verified")?,
    };

    let receiver = Party {
        id: request.receiver_id.clone(),
        name: row.try_get("receiver_name")?,
        avatar: row.try_get("receiver_avatar")?,
        verified: row.try_get("receiver_verified")?,
    };

    Ok(SwapRequestDetails {
        request,
        sender,
        receiver,
    })
}

pub async fn get_with_parties(
    pool: &SqlitePool,
    request_id: &str,
) -> Result<Option<SwapRequestDetails>> {
    let sql = format!("{DETAILS_SELECT} WHERE r.id = ?");
    let row = sqlx::query(&sql).bind(request_id).fetch_optional(pool).await?;

    match row {
        Some(row) => Ok(Some(details_from_row(&row)?)),
        None => Ok(None),
    }
}

/// Lists the caller's requests, most recent first. Never returns records
/// where the caller is neither party.
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: &str,
    direction: Direction,
) -> Result<Vec<SwapRequestDetails>> {
    let clause = match direction {
        Direction::Sent => "r.sender_id = ?",
        Direction::Received => "r.receiver_id = ?",
        Direction::Both => "(r.sender_id = ? OR r.receiver_id = ?)",
    };
    let sql = format!("{DETAILS_SELECT} WHERE {clause} ORDER BY r.created_at DESC");

    let mut query = sqlx::query(&sql).bind(user_id);
    if direction == Direction::Both {
        query = query.bind(user_id);
    }

    let rows = query.fetch_all(pool).await?;
    let mut requests = Vec::with_capacity(rows.len());
    for row in &rows {
        requests.push(details_from_row(row)?);
    }

    Ok(requests)
}

/// Accept or decline: the pending precondition is inside the UPDATE itself,
/// so two racing responders cannot both win. Returns false when the record
/// was no longer pending.
pub async fn mark_responded(
    pool: &SqlitePool,
    request_id: &str,
    status: RequestStatus,
    responded_at: DateTime<Utc>,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE swap_requests
        SET status = ?, responded_at = ?
        WHERE id = ? AND status = 'pending'
        "#,
    )
    .bind(status)
    .bind(responded_at)
    .bind(request_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Completion is only legal from `accepted`. Returns false otherwise.
pub async fn mark_completed(pool: &SqlitePool, request_id: &str) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE swap_requests
        SET status = 'completed'
        WHERE id = ? AND status = 'accepted'
        "#,
    )
    .bind(request_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Removes a request permanently. The sender may cancel at any point in the
/// lifecycle; any reviews hanging off it go with it (FK cascade).
pub async fn delete(pool: &SqlitePool, request_id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM swap_requests WHERE id = ?")
        .bind(request_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

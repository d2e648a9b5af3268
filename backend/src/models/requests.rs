use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle status of a swap request.
///
/// `pending` is the sole initial state and the only one a response can leave
/// from; `declined` and `completed` are terminal. No transition ever returns
/// to `pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Declined,
    Completed,
}

/// A proposal from one user to trade skill instruction with another.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub skill_offered: String,
    pub skill_wanted: String,
    pub message: Option<String>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl SwapRequest {
    pub fn is_party(&self, user_id: &str) -> bool {
        self.sender_id == user_id || self.receiver_id == user_id
    }
}

/// Display attributes of one side of a swap.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub id: String,
    pub name: String,
    pub avatar: Option<String>,
    pub verified: bool,
}

/// Swap request with both parties resolved for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequestDetails {
    #[serde(flatten)]
    pub request: SwapRequest,
    pub sender: Party,
    pub receiver: Party,
}

/// Which side of the ledger a listing call asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Sent,
    Received,
    Both,
}

impl Direction {
    /// `?type=sent|received`, anything else (or nothing) means both.
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("sent") => Direction::Sent,
            Some("received") => Direction::Received,
            _ => Direction::Both,
        }
    }
}

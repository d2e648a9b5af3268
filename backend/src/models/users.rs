use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row. Only ever serialized on the owner's own `/api/auth/me`;
/// the password hash never leaves the database layer's callers.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public-facing profile. Email is deliberately absent.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Caller's own view, returned on register/login/me.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn into_public(self) -> PublicUser {
        PublicUser {
            id: self.id,
            name: self.name,
            avatar: self.avatar,
            bio: self.bio,
            verified: self.verified,
            created_at: self.created_at,
        }
    }

    pub fn into_own(self) -> OwnUser {
        OwnUser {
            id: self.id,
            name: self.name,
            email: self.email,
            avatar: self.avatar,
            bio: self.bio,
            verified: self.verified,
            created_at: self.created_at,
        }
    }
}

/// Session row backing a bearer token.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

use crate::constants::SESSION_TTL_DAYS;
use crate::models::{Session, User};
use anyhow::Result;
use chrono::{Duration, Utc};
use sqlx::SqlitePool;

pub async fn create_session(pool: &SqlitePool, user_id: &str, token: &str) -> Result<Session> {
    let now = Utc::now();
    let expires_at = now + Duration::days(SESSION_TTL_DAYS);

    sqlx::query(
        r#"
        INSERT INTO sessions (token, user_id, created_at, expires_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(token)
    .bind(user_id)
    .bind(now)
    .bind(expires_at)
    .execute(pool)
    .await?;

    Ok(Session {
        token: token.to_string(),
        user_id: user_id.to_string(),
        created_at: now,
        expires_at,
    })
}

/// Resolves a bearer token to its user. Expired sessions are removed on sight
/// and resolve to `None`.
pub async fn resolve_token(pool: &SqlitePool, token: &str) -> Result<Option<User>> {
    let session = sqlx::query_as::<_, Session>(
        r#"
        SELECT token, user_id, created_at, expires_at
        FROM sessions
        WHERE token = ?
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    let Some(session) = session else {
        return Ok(None);
    };

    if session.is_expired(Utc::now()) {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(pool)
            .await?;
        return Ok(None);
    }

    crate::db::users::get_user_by_id(pool, &session.user_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{test_pool, users};

    #[tokio::test]
    async fn token_resolves_to_its_user() {
        let pool = test_pool().await;
        let user = users::create_user(&pool, "Ana", "ana@example.com", "hash")
            .await
            .unwrap();

        create_session(&pool, &user.id, "tok-1").await.unwrap();

        let resolved = resolve_token(&pool, "tok-1").await.unwrap().unwrap();
        assert_eq!(resolved.id, user.id);

        assert!(resolve_token(&pool, "unknown").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_session_is_evicted() {
        let pool = test_pool().await;
        let user = users::create_user(&pool, "Ana", "ana@example.com", "hash")
            .await
            .unwrap();

        // Insert a session that expired an hour ago.
        let past = Utc::now() - Duration::hours(1);
        sqlx::query("INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)")
            .bind("stale")
            .bind(&user.id)
            .bind(past - Duration::days(30))
            .bind(past)
            .execute(&pool)
            .await
            .unwrap();

        assert!(resolve_token(&pool, "stale").await.unwrap().is_none());

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }
}

use crate::models::{PublicUser, User};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

pub async fn create_user(
    pool: &SqlitePool,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<User> {
    let now = Utc::now();
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO users (id, name, email, password_hash, verified, created_at, updated_at)
        VALUES (?, ?, ?, ?, 0, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(User {
        id,
        name: name.to_string(),
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        avatar: None,
        bio: None,
        verified: false,
        created_at: now,
        updated_at: now,
    })
}

pub async fn get_user_by_id(pool: &SqlitePool, user_id: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password_hash, avatar, bio, verified, created_at, updated_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn get_user_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password_hash, avatar, bio, verified, created_at, updated_at
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn get_public_profile(pool: &SqlitePool, user_id: &str) -> Result<Option<PublicUser>> {
    let user = sqlx::query_as::<_, PublicUser>(
        r#"
        SELECT id, name, avatar, bio, verified, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Partial profile update; `None` fields keep their current value.
pub async fn update_profile(
    pool: &SqlitePool,
    user_id: &str,
    name: Option<&str>,
    avatar: Option<&str>,
    bio: Option<&str>,
) -> Result<Option<User>> {
    sqlx::query(
        r#"
        UPDATE users
        SET name = COALESCE(?, name),
            avatar = COALESCE(?, avatar),
            bio = COALESCE(?, bio),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(name)
    .bind(avatar)
    .bind(bio)
    .bind(Utc::now())
    .bind(user_id)
    .execute(pool)
    .await?;

    get_user_by_id(pool, user_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn create_and_fetch_user() {
        let pool = test_pool().await;
        let user = create_user(&pool, "Ana", "ana@example.com", "hash")
            .await
            .unwrap();

        let by_id = get_user_by_id(&pool, &user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "ana@example.com");
        assert!(!by_id.verified);

        let by_email = get_user_by_email(&pool, "ana@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);

        assert!(get_user_by_email(&pool, "nobody@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn duplicate_email_rejected_by_schema() {
        let pool = test_pool().await;
        create_user(&pool, "Ana", "ana@example.com", "hash")
            .await
            .unwrap();
        assert!(create_user(&pool, "Other", "ana@example.com", "hash")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn partial_update_keeps_missing_fields() {
        let pool = test_pool().await;
        let user = create_user(&pool, "Ana", "ana@example.com", "hash")
            .await
            .unwrap();

        let updated = update_profile(&pool, &user.id, None, Some("pic.png"), Some("hi"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Ana");
        assert_eq!(updated.avatar.as_deref(), Some("pic.png"));

        let updated = update_profile(&pool, &user.id, Some("Ana B"), None, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Ana B");
        assert_eq!(updated.bio.as_deref(), Some("hi"));
    }
}

use crate::models::{
    Proficiency, Skill, SkillCategory, SkillOwner, SkillStatus, SkillWithOwner,
};
use anyhow::Result;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::types::Json;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

pub struct NewSkill<'a> {
    pub user_id: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub category: SkillCategory,
    pub proficiency: Proficiency,
    pub skills_wanted: Vec<String>,
    pub availability: &'a str,
}

pub async fn create(pool: &SqlitePool, new: NewSkill<'_>) -> Result<Skill> {
    let now = Utc::now();
    let id = Uuid::new_v4().to_string();
    let skills_wanted = Json(new.skills_wanted);

    sqlx::query(
        r#"
        INSERT INTO skills
            (id, user_id, title, description, category, proficiency, skills_wanted, availability, status, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, 'active', ?)
        "#,
    )
    .bind(&id)
    .bind(new.user_id)
    .bind(new.title)
    .bind(new.description)
    .bind(new.category)
    .bind(new.proficiency)
    .bind(&skills_wanted)
    .bind(new.availability)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(Skill {
        id,
        user_id: new.user_id.to_string(),
        title: new.title.to_string(),
        description: new.description.to_string(),
        category: new.category,
        proficiency: new.proficiency,
        skills_wanted,
        availability: new.availability.to_string(),
        status: SkillStatus::Active,
        created_at: now,
    })
}

pub async fn get(pool: &SqlitePool, skill_id: &str) -> Result<Option<SkillWithOwner>> {
    let sql = format!("{OWNER_SELECT} WHERE s.id = ?");
    let row = sqlx::query(&sql).bind(skill_id).fetch_optional(pool).await?;

    match row {
        Some(row) => Ok(Some(with_owner_from_row(&row)?)),
        None => Ok(None),
    }
}

const OWNER_SELECT: &str = r#"
    SELECT s.id, s.user_id, s.title, s.description, s.category, s.proficiency,
           s.skills_wanted, s.availability, s.status, s.created_at,
           u.name AS owner_name, u.avatar AS owner_avatar
    FROM skills s
    JOIN users u ON s.user_id = u.id
"#;

fn with_owner_from_row(row: &SqliteRow) -> Result<SkillWithOwner, sqlx::Error> {
    let skill = Skill {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        category: row.try_get("category")?,
        proficiency: row.try_get("proficiency")?,
        skills_wanted: row.try_get("skills_wanted")?,
        availability: row.try_get("availability")?,
        status: row.try_get("status")?,
        created_at: row.try_get("created_at")?,
    };

    let owner = SkillOwner {
        id: skill.user_id.clone(),
        name: row.try_get("owner_name")?,
        avatar: row.try_get("owner_avatar")?,
    };

    Ok(SkillWithOwner { skill, owner })
}

/// Active catalog listings, newest first, with optional substring search on
/// title/description and an optional category filter.
pub async fn list(
    pool: &SqlitePool,
    search: Option<&str>,
    category: Option<SkillCategory>,
) -> Result<Vec<SkillWithOwner>> {
    let mut sql = format!("{OWNER_SELECT} WHERE s.status = 'active'");
    if search.is_some() {
        sql.push_str(" AND (s.title LIKE ? OR s.description LIKE ?)");
    }
    if category.is_some() {
        sql.push_str(" AND s.category = ?");
    }
    sql.push_str(" ORDER BY s.created_at DESC");

    let mut query = sqlx::query(&sql);
    if let Some(term) = search {
        let pattern = format!("%{term}%");
        query = query.bind(pattern.clone()).bind(pattern);
    }
    if let Some(category) = category {
        query = query.bind(category);
    }

    let rows = query.fetch_all(pool).await?;
    let mut skills = Vec::with_capacity(rows.len());
    for row in &rows {
        skills.push(with_owner_from_row(row)?);
    }

    Ok(skills)
}

/// Owner-only removal. Returns false when nothing matched, either because
/// the skill is absent or it belongs to someone else.
pub async fn delete_owned(pool: &SqlitePool, skill_id: &str, user_id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM skills WHERE id = ? AND user_id = ?")
        .bind(skill_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

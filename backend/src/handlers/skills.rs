use crate::auth::AuthUser;
use crate::db::skills;
use crate::error::ApiError;
use crate::models::{Proficiency, SkillCategory, SkillWithOwner};
use crate::utils::validate;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sqlx::SqlitePool;

#[derive(Debug, Deserialize)]
pub struct SkillListQuery {
    pub q: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSkillBody {
    pub title: String,
    pub description: String,
    pub category: SkillCategory,
    #[serde(default = "default_proficiency")]
    pub proficiency: Proficiency,
    #[serde(default, rename = "skillsWanted")]
    pub skills_wanted: Vec<String>,
    #[serde(default = "default_availability")]
    pub availability: String,
}

fn default_proficiency() -> Proficiency {
    Proficiency::Intermediate
}

fn default_availability() -> String {
    "Flexible".to_string()
}

#[derive(Debug, Serialize)]
pub struct SkillListResponse {
    pub success: bool,
    pub count: usize,
    pub skills: Vec<SkillWithOwner>,
}

#[derive(Debug, Serialize)]
pub struct SkillResponse {
    pub success: bool,
    pub skill: SkillWithOwner,
}

pub async fn list(
    State(pool): State<SqlitePool>,
    Query(query): Query<SkillListQuery>,
) -> Result<Json<SkillListResponse>, ApiError> {
    let category = match query.category.as_deref() {
        Some(raw) => Some(
            raw.parse::<SkillCategory>()
                .map_err(ApiError::InvalidOperation)?,
        ),
        None => None,
    };

    let search = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
    let skills = skills::list(&pool, search, category).await?;

    Ok(Json(SkillListResponse {
        success: true,
        count: skills.len(),
        skills,
    }))
}

pub async fn get(
    State(pool): State<SqlitePool>,
    Path(skill_id): Path<String>,
) -> Result<Json<SkillResponse>, ApiError> {
    let skill = skills::get(&pool, &skill_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Skill not found".to_string()))?;

    Ok(Json(SkillResponse {
        success: true,
        skill,
    }))
}

pub async fn create(
    State(pool): State<SqlitePool>,
    caller: AuthUser,
    Json(body): Json<CreateSkillBody>,
) -> Result<(StatusCode, Json<SkillResponse>), ApiError> {
    let mut errors = Vec::new();
    validate::check_skill_title(&body.title, &mut errors);
    validate::check_skill_description(&body.description, &mut errors);
    validate::finish(errors)?;

    let skill = skills::create(
        &pool,
        skills::NewSkill {
            user_id: &caller.id,
            title: body.title.trim(),
            description: body.description.trim(),
            category: body.category,
            proficiency: body.proficiency,
            skills_wanted: body.skills_wanted,
            availability: &body.availability,
        },
    )
    .await?;

    let skill = skills::get(&pool, &skill.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Skill not found".to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(SkillResponse {
            success: true,
            skill,
        }),
    ))
}

pub async fn delete(
    State(pool): State<SqlitePool>,
    caller: AuthUser,
    Path(skill_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let skill = skills::get(&pool, &skill_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Skill not found".to_string()))?;

    if skill.skill.user_id != caller.id {
        return Err(ApiError::Forbidden(
            "Not authorized to delete this skill".to_string(),
        ));
    }

    skills::delete_owned(&pool, &skill_id, &caller.id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Skill removed successfully",
    })))
}

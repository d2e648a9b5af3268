use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Tech,
    Creative,
    Language,
    Business,
    Other,
}

impl FromStr for SkillCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tech" => Ok(SkillCategory::Tech),
            "creative" => Ok(SkillCategory::Creative),
            "language" => Ok(SkillCategory::Language),
            "business" => Ok(SkillCategory::Business),
            "other" => Ok(SkillCategory::Other),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum Proficiency {
    Beginner,
    Intermediate,
    Expert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SkillStatus {
    Active,
    Paused,
    Inactive,
}

/// A skill listing in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub category: SkillCategory,
    pub proficiency: Proficiency,
    pub skills_wanted: Json<Vec<String>>,
    pub availability: String,
    pub status: SkillStatus,
    pub created_at: DateTime<Utc>,
}

/// Display attributes of a listing's owner.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillOwner {
    pub id: String,
    pub name: String,
    pub avatar: Option<String>,
}

/// Skill listing with its owner resolved for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillWithOwner {
    #[serde(flatten)]
    pub skill: Skill,
    pub owner: SkillOwner,
}

use orgst_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `skills` catalog table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Skill {
    pub id: DbId,
    pub name: String,
    pub category: String,
    pub created_at: Timestamp,
    #[serde(skip_serializing)]
    pub updated_at: Timestamp,
}

/// A user's proficiency in one skill, joined with the skill row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserSkill {
    #[serde(skip_serializing)]
    pub user_id: DbId,
    pub skill_id: DbId,
    pub skill_name: String,
    pub skill_category: String,
    pub level: i32,
    pub years_exp: i32,
    pub can_mentor: bool,
}

/// DTO for upserting one entry in the caller's skill profile.
#[derive(Debug, Deserialize)]
pub struct SetUserSkill {
    pub skill_id: DbId,
    #[serde(default = "default_level")]
    pub level: i32,
    #[serde(default)]
    pub years_exp: i32,
    #[serde(default)]
    pub can_mentor: bool,
}

fn default_level() -> i32 {
    1
}

//! Repository for the `skills` and `user_skills` tables.

use orgst_core::types::DbId;
use sqlx::PgPool;

use crate::models::skill::{SetUserSkill, Skill, UserSkill};

const SKILL_COLUMNS: &str = "id, name, category, created_at, updated_at";

/// Column list for user_skills joined with skills.
const USER_SKILL_COLUMNS: &str = "\
    us.user_id, us.skill_id, s.name AS skill_name, s.category AS skill_category, \
    us.level, us.years_exp, us.can_mentor";

/// Provides the skill catalog and per-user skill profiles.
pub struct SkillRepo;

impl SkillRepo {
    /// List the skill catalog, alphabetically.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Skill>, sqlx::Error> {
        let query = format!("SELECT {SKILL_COLUMNS} FROM skills ORDER BY name");
        sqlx::query_as::<_, Skill>(&query).fetch_all(pool).await
    }

    /// Find a skill by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Skill>, sqlx::Error> {
        let query = format!("SELECT {SKILL_COLUMNS} FROM skills WHERE id = $1");
        sqlx::query_as::<_, Skill>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Upsert one entry in a user's skill profile.
    pub async fn set_user_skill(
        pool: &PgPool,
        user_id: DbId,
        input: &SetUserSkill,
    ) -> Result<UserSkill, sqlx::Error> {
        sqlx::query(
            "INSERT INTO user_skills (user_id, skill_id, level, years_exp, can_mentor)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (user_id, skill_id) DO UPDATE SET
                level = EXCLUDED.level,
                years_exp = EXCLUDED.years_exp,
                can_mentor = EXCLUDED.can_mentor,
                updated_at = NOW()",
        )
        .bind(user_id)
        .bind(input.skill_id)
        .bind(input.level)
        .bind(input.years_exp)
        .bind(input.can_mentor)
        .execute(pool)
        .await?;

        let query = format!(
            "SELECT {USER_SKILL_COLUMNS} FROM user_skills us
             JOIN skills s ON s.id = us.skill_id
             WHERE us.user_id = $1 AND us.skill_id = $2"
        );
        sqlx::query_as::<_, UserSkill>(&query)
            .bind(user_id)
            .bind(input.skill_id)
            .fetch_one(pool)
            .await
    }

    /// Full skill profile for one user.
    pub async fn skills_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<UserSkill>, sqlx::Error> {
        let query = format!(
            "SELECT {USER_SKILL_COLUMNS} FROM user_skills us
             JOIN skills s ON s.id = us.skill_id
             WHERE us.user_id = $1
             ORDER BY s.name"
        );
        sqlx::query_as::<_, UserSkill>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Skill names for many users at once, for the member directory.
    pub async fn skill_names_for_users(
        pool: &PgPool,
        user_ids: &[DbId],
    ) -> Result<Vec<(DbId, String)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT us.user_id, s.name FROM user_skills us
             JOIN skills s ON s.id = us.skill_id
             WHERE us.user_id = ANY($1)
             ORDER BY s.name",
        )
        .bind(user_ids)
        .fetch_all(pool)
        .await
    }

    /// Seed helper used by tests and admin tooling: create a catalog skill.
    pub async fn create(pool: &PgPool, name: &str, category: &str) -> Result<Skill, sqlx::Error> {
        let query = format!(
            "INSERT INTO skills (name, category) VALUES ($1, $2) RETURNING {SKILL_COLUMNS}"
        );
        sqlx::query_as::<_, Skill>(&query)
            .bind(name)
            .bind(category)
            .fetch_one(pool)
            .await
    }
}

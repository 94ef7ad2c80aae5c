use async_trait::async_trait;
use chrono::Utc;
use folio_core::{
    Error,
    content::{Profile, ProfileInput},
    repositories::ProfileRepository,
};
use sqlx::{SqlitePool, types::Json};

use crate::{db_error, from_unix};

/// The profile is a single row pinned to `id = 1`.
pub struct SqliteProfileRepository {
    pool: SqlitePool,
}

impl SqliteProfileRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SqliteProfile {
    name: String,
    title: String,
    bio: String,
    avatar: Option<String>,
    resume_url: Option<String>,
    skills: Json<Vec<String>>,
    socials: Option<Json<serde_json::Value>>,
    updated_at: i64,
}

impl From<SqliteProfile> for Profile {
    fn from(row: SqliteProfile) -> Self {
        Profile {
            name: row.name,
            title: row.title,
            bio: row.bio,
            avatar: row.avatar,
            resume_url: row.resume_url,
            skills: row.skills.0,
            socials: row
                .socials
                .map(|socials| socials.0)
                .unwrap_or_else(|| serde_json::Value::Object(Default::default())),
            updated_at: from_unix(row.updated_at),
        }
    }
}

#[async_trait]
impl ProfileRepository for SqliteProfileRepository {
    async fn get(&self) -> Result<Option<Profile>, Error> {
        let row = sqlx::query_as::<_, SqliteProfile>(
            r#"
            SELECT name, title, bio, avatar, resume_url, skills, socials, updated_at
            FROM profile WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error(e, "Failed to load profile"))?;

        Ok(row.map(Profile::from))
    }

    async fn upsert(&self, profile: ProfileInput) -> Result<Profile, Error> {
        let row = sqlx::query_as::<_, SqliteProfile>(
            r#"
            INSERT INTO profile (id, name, title, bio, avatar, resume_url, skills, socials, updated_at)
            VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                title = excluded.title,
                bio = excluded.bio,
                avatar = excluded.avatar,
                resume_url = excluded.resume_url,
                skills = excluded.skills,
                socials = excluded.socials,
                updated_at = excluded.updated_at
            RETURNING name, title, bio, avatar, resume_url, skills, socials, updated_at
            "#,
        )
        .bind(&profile.name)
        .bind(&profile.title)
        .bind(&profile.bio)
        .bind(&profile.avatar)
        .bind(&profile.resume_url)
        .bind(Json(&profile.skills))
        .bind(profile.socials.as_ref().map(Json))
        .bind(Utc::now().timestamp())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error(e, "Failed to save profile"))?;

        Ok(row.into())
    }
}

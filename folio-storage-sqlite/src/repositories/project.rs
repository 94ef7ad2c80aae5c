use async_trait::async_trait;
use chrono::Utc;
use folio_core::{
    Error,
    content::{Page, Project, ProjectFilter, ProjectInput},
    error::StorageError,
    id::generate_prefixed_id,
    repositories::ProjectRepository,
};
use sqlx::{SqlitePool, types::Json};

use crate::{db_error, from_unix};

pub struct SqliteProjectRepository {
    pool: SqlitePool,
}

impl SqliteProjectRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SqliteProject {
    id: String,
    title: String,
    slug: String,
    summary: Option<String>,
    description: Option<String>,
    content: Option<String>,
    image: Option<String>,
    github_url: Option<String>,
    live_url: Option<String>,
    tech_stack: Json<Vec<String>>,
    featured: bool,
    is_personal: bool,
    sort_order: i64,
    created_at: i64,
    updated_at: i64,
}

impl From<SqliteProject> for Project {
    fn from(row: SqliteProject) -> Self {
        Project {
            id: row.id,
            title: row.title,
            slug: row.slug,
            summary: row.summary,
            description: row.description,
            content: row.content,
            image: row.image,
            github_url: row.github_url,
            live_url: row.live_url,
            tech_stack: row.tech_stack.0,
            featured: row.featured,
            is_personal: row.is_personal,
            order: row.sort_order,
            created_at: from_unix(row.created_at),
            updated_at: from_unix(row.updated_at),
        }
    }
}

const FILTER: &str = "(?1 IS NULL OR featured = ?1) AND (?2 IS NULL OR is_personal = ?2)";

#[async_trait]
impl ProjectRepository for SqliteProjectRepository {
    async fn create(&self, project: ProjectInput) -> Result<Project, Error> {
        let now = Utc::now().timestamp();

        let row = sqlx::query_as::<_, SqliteProject>(
            r#"
            INSERT INTO projects (
                id, title, slug, summary, description, content, image, github_url, live_url,
                tech_stack, featured, is_personal, sort_order, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?14)
            RETURNING *
            "#,
        )
        .bind(generate_prefixed_id("prj"))
        .bind(&project.title)
        .bind(&project.slug)
        .bind(&project.summary)
        .bind(&project.description)
        .bind(&project.content)
        .bind(&project.image)
        .bind(&project.github_url)
        .bind(&project.live_url)
        .bind(Json(&project.tech_stack))
        .bind(project.featured)
        .bind(project.is_personal)
        .bind(project.order)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error(e, "Failed to create project"))?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Project>, Error> {
        let row = sqlx::query_as::<_, SqliteProject>("SELECT * FROM projects WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error(e, "Failed to find project"))?;

        Ok(row.map(Project::from))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Project>, Error> {
        let row = sqlx::query_as::<_, SqliteProject>("SELECT * FROM projects WHERE slug = ?1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error(e, "Failed to find project by slug"))?;

        Ok(row.map(Project::from))
    }

    async fn list(&self, filter: ProjectFilter, page: Page) -> Result<Vec<Project>, Error> {
        let rows = sqlx::query_as::<_, SqliteProject>(&format!(
            r#"
            SELECT * FROM projects
            WHERE {FILTER}
            ORDER BY sort_order ASC, created_at DESC, rowid DESC
            LIMIT ?3 OFFSET ?4
            "#
        ))
        .bind(filter.featured)
        .bind(filter.is_personal)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error(e, "Failed to list projects"))?;

        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn update(&self, id: &str, project: ProjectInput) -> Result<Project, Error> {
        let row = sqlx::query_as::<_, SqliteProject>(
            r#"
            UPDATE projects SET
                title = ?2, slug = ?3, summary = ?4, description = ?5, content = ?6,
                image = ?7, github_url = ?8, live_url = ?9, tech_stack = ?10,
                featured = ?11, is_personal = ?12, sort_order = ?13, updated_at = ?14
            WHERE id = ?1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&project.title)
        .bind(&project.slug)
        .bind(&project.summary)
        .bind(&project.description)
        .bind(&project.content)
        .bind(&project.image)
        .bind(&project.github_url)
        .bind(&project.live_url)
        .bind(Json(&project.tech_stack))
        .bind(project.featured)
        .bind(project.is_personal)
        .bind(project.order)
        .bind(Utc::now().timestamp())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error(e, "Failed to update project"))?
        .ok_or(StorageError::NotFound)?;

        Ok(row.into())
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error(e, "Failed to delete project"))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound.into());
        }
        Ok(())
    }

    async fn count(&self, filter: ProjectFilter) -> Result<u64, Error> {
        let count: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM projects WHERE {FILTER}"))
                .bind(filter.featured)
                .bind(filter.is_personal)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_error(e, "Failed to count projects"))?;

        Ok(count as u64)
    }
}

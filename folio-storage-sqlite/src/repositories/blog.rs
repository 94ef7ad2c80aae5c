use async_trait::async_trait;
use chrono::Utc;
use folio_core::{
    Error,
    content::{BlogFilter, BlogPost, BlogPostInput, Page},
    error::StorageError,
    id::generate_prefixed_id,
    repositories::BlogPostRepository,
};
use sqlx::{SqlitePool, types::Json};

use crate::{db_error, from_unix};

pub struct SqliteBlogPostRepository {
    pool: SqlitePool,
}

impl SqliteBlogPostRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SqliteBlogPost {
    id: String,
    title: String,
    slug: String,
    excerpt: Option<String>,
    content: String,
    cover_image: Option<String>,
    tags: Json<Vec<String>>,
    published: bool,
    read_time: Option<i64>,
    views: i64,
    created_at: i64,
    updated_at: i64,
}

impl From<SqliteBlogPost> for BlogPost {
    fn from(row: SqliteBlogPost) -> Self {
        BlogPost {
            id: row.id,
            title: row.title,
            slug: row.slug,
            excerpt: row.excerpt,
            content: row.content,
            cover_image: row.cover_image,
            tags: row.tags.0,
            published: row.published,
            read_time: row.read_time,
            views: row.views,
            created_at: from_unix(row.created_at),
            updated_at: from_unix(row.updated_at),
        }
    }
}

fn published_only(filter: BlogFilter) -> bool {
    matches!(filter, BlogFilter::PublishedOnly)
}

#[async_trait]
impl BlogPostRepository for SqliteBlogPostRepository {
    async fn create(&self, post: BlogPostInput) -> Result<BlogPost, Error> {
        let row = sqlx::query_as::<_, SqliteBlogPost>(
            r#"
            INSERT INTO blog_posts (
                id, title, slug, excerpt, content, cover_image, tags, published, read_time,
                views, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0, ?10, ?10)
            RETURNING *
            "#,
        )
        .bind(generate_prefixed_id("post"))
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.cover_image)
        .bind(Json(&post.tags))
        .bind(post.published)
        .bind(post.read_time)
        .bind(Utc::now().timestamp())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error(e, "Failed to create blog post"))?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<BlogPost>, Error> {
        let row = sqlx::query_as::<_, SqliteBlogPost>("SELECT * FROM blog_posts WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error(e, "Failed to find blog post"))?;

        Ok(row.map(BlogPost::from))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, Error> {
        let row = sqlx::query_as::<_, SqliteBlogPost>("SELECT * FROM blog_posts WHERE slug = ?1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error(e, "Failed to find blog post by slug"))?;

        Ok(row.map(BlogPost::from))
    }

    async fn list(&self, filter: BlogFilter, page: Page) -> Result<Vec<BlogPost>, Error> {
        let rows = sqlx::query_as::<_, SqliteBlogPost>(
            r#"
            SELECT * FROM blog_posts
            WHERE (?1 = 0 OR published = 1)
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?2 OFFSET ?3
            "#,
        )
        .bind(published_only(filter))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error(e, "Failed to list blog posts"))?;

        Ok(rows.into_iter().map(BlogPost::from).collect())
    }

    async fn update(&self, id: &str, post: BlogPostInput) -> Result<BlogPost, Error> {
        let row = sqlx::query_as::<_, SqliteBlogPost>(
            r#"
            UPDATE blog_posts SET
                title = ?2, slug = ?3, excerpt = ?4, content = ?5, cover_image = ?6,
                tags = ?7, published = ?8, read_time = ?9, updated_at = ?10
            WHERE id = ?1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.cover_image)
        .bind(Json(&post.tags))
        .bind(post.published)
        .bind(post.read_time)
        .bind(Utc::now().timestamp())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error(e, "Failed to update blog post"))?
        .ok_or(StorageError::NotFound)?;

        Ok(row.into())
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error(e, "Failed to delete blog post"))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound.into());
        }
        Ok(())
    }

    async fn count(&self, filter: BlogFilter) -> Result<u64, Error> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM blog_posts WHERE (?1 = 0 OR published = 1)")
                .bind(published_only(filter))
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_error(e, "Failed to count blog posts"))?;

        Ok(count as u64)
    }

    async fn increment_views(&self, id: &str) -> Result<(), Error> {
        let result = sqlx::query("UPDATE blog_posts SET views = views + 1 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error(e, "Failed to record blog post view"))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound.into());
        }
        Ok(())
    }

    async fn total_views(&self) -> Result<u64, Error> {
        let total: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(views), 0) FROM blog_posts")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error(e, "Failed to sum blog post views"))?;

        Ok(total as u64)
    }
}

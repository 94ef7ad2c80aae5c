//! Profile, projects and blog posts.
//!
//! Every write validates its input first; nothing reaches the repository with field
//! errors outstanding.

use std::sync::Arc;

use tracing::instrument;

use crate::{
    Error,
    content::{
        BlogFilter, BlogPost, BlogPostInput, Page, Profile, ProfileInput, Project, ProjectFilter,
        ProjectInput,
    },
    error::{StorageError, utilities::FoundExt},
    repositories::{BlogPostRepository, ProfileRepository, ProjectRepository},
};

pub struct ProfileService<R: ProfileRepository> {
    repository: Arc<R>,
}

impl<R: ProfileRepository> ProfileService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn get(&self) -> Result<Option<Profile>, Error> {
        self.repository.get().await
    }

    /// Replace the profile, creating it on first save.
    pub async fn save(&self, input: ProfileInput) -> Result<Profile, Error> {
        let input = input.validate()?;
        self.repository.upsert(input).await
    }
}

pub struct ProjectService<R: ProjectRepository> {
    repository: Arc<R>,
}

impl<R: ProjectRepository> ProjectService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip_all, fields(slug = %input.slug))]
    pub async fn create(&self, input: ProjectInput) -> Result<Project, Error> {
        let project = self.repository.create(input.validate()?).await?;
        tracing::info!(project_id = %project.id, "Created project");
        Ok(project)
    }

    pub async fn get(&self, id: &str) -> Result<Project, Error> {
        self.repository.find_by_id(id).await.or_not_found()
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Project, Error> {
        self.repository.find_by_slug(slug).await.or_not_found()
    }

    pub async fn list(&self, filter: ProjectFilter, page: Page) -> Result<Vec<Project>, Error> {
        self.repository.list(filter, page).await
    }

    pub async fn update(&self, id: &str, input: ProjectInput) -> Result<Project, Error> {
        self.repository.update(id, input.validate()?).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        self.repository.delete(id).await?;
        tracing::info!(project_id = %id, "Deleted project");
        Ok(())
    }

    pub async fn count(&self, filter: ProjectFilter) -> Result<u64, Error> {
        self.repository.count(filter).await
    }
}

pub struct BlogService<R: BlogPostRepository> {
    repository: Arc<R>,
}

impl<R: BlogPostRepository> BlogService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip_all, fields(slug = %input.slug))]
    pub async fn create(&self, input: BlogPostInput) -> Result<BlogPost, Error> {
        let post = self.repository.create(input.validate()?).await?;
        tracing::info!(post_id = %post.id, published = post.published, "Created blog post");
        Ok(post)
    }

    pub async fn get(&self, id: &str) -> Result<BlogPost, Error> {
        self.repository.find_by_id(id).await.or_not_found()
    }

    /// Public read of a post. Drafts are reported as missing and every hit counts as a view.
    pub async fn read_published(&self, slug: &str) -> Result<BlogPost, Error> {
        let mut post = self
            .repository
            .find_by_slug(slug)
            .await?
            .filter(|post| post.published)
            .ok_or(Error::Storage(StorageError::NotFound))?;

        self.repository.increment_views(&post.id).await?;
        post.views += 1;
        Ok(post)
    }

    pub async fn list(&self, filter: BlogFilter, page: Page) -> Result<Vec<BlogPost>, Error> {
        self.repository.list(filter, page).await
    }

    pub async fn update(&self, id: &str, input: BlogPostInput) -> Result<BlogPost, Error> {
        self.repository.update(id, input.validate()?).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        self.repository.delete(id).await?;
        tracing::info!(post_id = %id, "Deleted blog post");
        Ok(())
    }

    pub async fn count(&self, filter: BlogFilter) -> Result<u64, Error> {
        self.repository.count(filter).await
    }

    pub async fn total_views(&self) -> Result<u64, Error> {
        self.repository.total_views().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockBlogPostRepository {
        posts: Mutex<Vec<BlogPost>>,
    }

    impl MockBlogPostRepository {
        fn post(&self, id: &str) -> Option<BlogPost> {
            self.posts.lock().unwrap().iter().find(|p| p.id == id).cloned()
        }
    }

    fn stored(id: &str, input: BlogPostInput) -> BlogPost {
        let now = Utc::now();
        BlogPost {
            id: id.to_string(),
            title: input.title,
            slug: input.slug,
            excerpt: input.excerpt,
            content: input.content,
            cover_image: input.cover_image,
            tags: input.tags,
            published: input.published,
            read_time: input.read_time,
            views: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[async_trait]
    impl BlogPostRepository for MockBlogPostRepository {
        async fn create(&self, post: BlogPostInput) -> Result<BlogPost, Error> {
            let mut posts = self.posts.lock().unwrap();
            if posts.iter().any(|p| p.slug == post.slug) {
                return Err(Error::Storage(StorageError::Constraint("slug".into())));
            }
            let mut post = stored(&format!("post_{}", posts.len()), post);
            post.created_at -= Duration::seconds(100 - posts.len() as i64);
            posts.push(post.clone());
            Ok(post)
        }

        async fn find_by_id(&self, id: &str) -> Result<Option<BlogPost>, Error> {
            Ok(self.post(id))
        }

        async fn find_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, Error> {
            Ok(self
                .posts
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.slug == slug)
                .cloned())
        }

        async fn list(&self, filter: BlogFilter, page: Page) -> Result<Vec<BlogPost>, Error> {
            let mut posts: Vec<_> = self
                .posts
                .lock()
                .unwrap()
                .iter()
                .filter(|p| filter == BlogFilter::All || p.published)
                .cloned()
                .collect();
            posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(posts
                .into_iter()
                .skip(page.offset() as usize)
                .take(page.limit() as usize)
                .collect())
        }

        async fn update(&self, id: &str, post: BlogPostInput) -> Result<BlogPost, Error> {
            let mut posts = self.posts.lock().unwrap();
            let existing = posts
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or(Error::Storage(StorageError::NotFound))?;
            let views = existing.views;
            *existing = BlogPost {
                views,
                ..stored(id, post)
            };
            Ok(existing.clone())
        }

        async fn delete(&self, id: &str) -> Result<(), Error> {
            let mut posts = self.posts.lock().unwrap();
            let before = posts.len();
            posts.retain(|p| p.id != id);
            if before == posts.len() {
                return Err(Error::Storage(StorageError::NotFound));
            }
            Ok(())
        }

        async fn count(&self, filter: BlogFilter) -> Result<u64, Error> {
            Ok(self.list(filter, Page::new(1, 100)).await?.len() as u64)
        }

        async fn increment_views(&self, id: &str) -> Result<(), Error> {
            let mut posts = self.posts.lock().unwrap();
            if let Some(post) = posts.iter_mut().find(|p| p.id == id) {
                post.views += 1;
            }
            Ok(())
        }

        async fn total_views(&self) -> Result<u64, Error> {
            Ok(self
                .posts
                .lock()
                .unwrap()
                .iter()
                .map(|p| p.views as u64)
                .sum())
        }
    }

    fn input(slug: &str, published: bool) -> BlogPostInput {
        BlogPostInput {
            title: format!("Post {slug}"),
            slug: slug.to_string(),
            content: "Body".to_string(),
            published,
            ..BlogPostInput::default()
        }
    }

    fn service() -> (Arc<MockBlogPostRepository>, BlogService<MockBlogPostRepository>) {
        let repo = Arc::new(MockBlogPostRepository::default());
        (repo.clone(), BlogService::new(repo))
    }

    #[tokio::test]
    async fn test_create_validates_before_storing() {
        let (repo, service) = service();
        let err = service
            .create(BlogPostInput {
                content: " ".to_string(),
                ..input("empty", true)
            })
            .await
            .unwrap_err();

        assert!(err.is_validation_error());
        assert!(repo.posts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_conflict() {
        let (_, service) = service();
        service.create(input("hello", true)).await.unwrap();
        let err = service.create(input("hello", true)).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_reading_published_post_counts_views() {
        let (repo, service) = service();
        let post = service.create(input("hello", true)).await.unwrap();

        assert_eq!(service.read_published("hello").await.unwrap().views, 1);
        assert_eq!(service.read_published("hello").await.unwrap().views, 2);
        assert_eq!(repo.post(&post.id).unwrap().views, 2);
        assert_eq!(service.total_views().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_drafts_are_hidden_from_public_reads() {
        let (repo, service) = service();
        let draft = service.create(input("draft", false)).await.unwrap();
        service.create(input("live", true)).await.unwrap();

        assert!(service.read_published("draft").await.unwrap_err().is_not_found());
        assert_eq!(repo.post(&draft.id).unwrap().views, 0);

        let public = service
            .list(BlogFilter::PublishedOnly, Page::first(9))
            .await
            .unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(service.count(BlogFilter::All).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_post() {
        let (_, service) = service();
        assert!(
            service
                .update("post_missing", input("x", true))
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(service.delete("post_missing").await.unwrap_err().is_not_found());
    }
}

//! Storage for the portfolio content managed from the admin area.
//!
//! Inputs reaching these traits have already been validated. Updates and deletes of a
//! missing id fail with [`crate::error::StorageError::NotFound`]; a duplicate slug fails
//! with [`crate::error::StorageError::Constraint`].
use async_trait::async_trait;

use crate::{
    Error,
    content::{
        BlogFilter, BlogPost, BlogPostInput, Certification, CertificationFields, Education,
        EducationFields, Experience, ExperienceFields, Page, Profile, ProfileInput, Project,
        ProjectFilter, ProjectInput,
    },
};

#[async_trait]
pub trait ProfileRepository: Send + Sync + 'static {
    async fn get(&self) -> Result<Option<Profile>, Error>;

    /// Create the profile or replace the existing one.
    async fn upsert(&self, profile: ProfileInput) -> Result<Profile, Error>;
}

#[async_trait]
pub trait ProjectRepository: Send + Sync + 'static {
    async fn create(&self, project: ProjectInput) -> Result<Project, Error>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Project>, Error>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Project>, Error>;

    /// Ordered by `order` ascending, newest first within the same order.
    async fn list(&self, filter: ProjectFilter, page: Page) -> Result<Vec<Project>, Error>;

    async fn update(&self, id: &str, project: ProjectInput) -> Result<Project, Error>;

    async fn delete(&self, id: &str) -> Result<(), Error>;

    async fn count(&self, filter: ProjectFilter) -> Result<u64, Error>;
}

#[async_trait]
pub trait BlogPostRepository: Send + Sync + 'static {
    async fn create(&self, post: BlogPostInput) -> Result<BlogPost, Error>;

    async fn find_by_id(&self, id: &str) -> Result<Option<BlogPost>, Error>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, Error>;

    /// Newest first.
    async fn list(&self, filter: BlogFilter, page: Page) -> Result<Vec<BlogPost>, Error>;

    async fn update(&self, id: &str, post: BlogPostInput) -> Result<BlogPost, Error>;

    async fn delete(&self, id: &str) -> Result<(), Error>;

    async fn count(&self, filter: BlogFilter) -> Result<u64, Error>;

    async fn increment_views(&self, id: &str) -> Result<(), Error>;

    async fn total_views(&self) -> Result<u64, Error>;
}

#[async_trait]
pub trait ExperienceRepository: Send + Sync + 'static {
    async fn create(&self, experience: ExperienceFields) -> Result<Experience, Error>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Experience>, Error>;

    /// Ordered by `order` ascending, most recent start first.
    async fn list(&self) -> Result<Vec<Experience>, Error>;

    async fn update(&self, id: &str, experience: ExperienceFields) -> Result<Experience, Error>;

    async fn delete(&self, id: &str) -> Result<(), Error>;
}

#[async_trait]
pub trait EducationRepository: Send + Sync + 'static {
    async fn create(&self, education: EducationFields) -> Result<Education, Error>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Education>, Error>;

    /// Ordered by `order` ascending, most recent start first.
    async fn list(&self) -> Result<Vec<Education>, Error>;

    async fn update(&self, id: &str, education: EducationFields) -> Result<Education, Error>;

    async fn delete(&self, id: &str) -> Result<(), Error>;
}

#[async_trait]
pub trait CertificationRepository: Send + Sync + 'static {
    async fn create(&self, certification: CertificationFields) -> Result<Certification, Error>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Certification>, Error>;

    /// Ordered by `order` ascending, most recent first.
    async fn list(&self) -> Result<Vec<Certification>, Error>;

    async fn update(
        &self,
        id: &str,
        certification: CertificationFields,
    ) -> Result<Certification, Error>;

    async fn delete(&self, id: &str) -> Result<(), Error>;
}

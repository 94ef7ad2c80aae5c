//! Repository implementations for SQLite storage

pub mod blog;
pub mod contact;
pub mod login_attempts;
pub mod password;
pub mod profile;
pub mod project;
pub mod resume;
pub mod user;

pub use blog::SqliteBlogPostRepository;
pub use contact::SqliteContactRepository;
pub use login_attempts::SqliteLoginAttemptRepository;
pub use password::SqlitePasswordRepository;
pub use profile::SqliteProfileRepository;
pub use project::SqliteProjectRepository;
pub use resume::{
    SqliteCertificationRepository, SqliteEducationRepository, SqliteExperienceRepository,
};
pub use user::SqliteUserRepository;

use async_trait::async_trait;
use folio_core::{Error, error::StorageError, repositories::RepositoryProvider};
use folio_migration::MigrationManager;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::migrations::{self, SqliteMigrationManager};

/// Every folio repository over one shared pool.
pub struct SqliteRepositoryProvider {
    pub(crate) pool: SqlitePool,
    user: Arc<SqliteUserRepository>,
    password: Arc<SqlitePasswordRepository>,
    login_attempts: Arc<SqliteLoginAttemptRepository>,
    contact: Arc<SqliteContactRepository>,
    profile: Arc<SqliteProfileRepository>,
    project: Arc<SqliteProjectRepository>,
    blog_post: Arc<SqliteBlogPostRepository>,
    experience: Arc<SqliteExperienceRepository>,
    education: Arc<SqliteEducationRepository>,
    certification: Arc<SqliteCertificationRepository>,
}

impl SqliteRepositoryProvider {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            user: Arc::new(SqliteUserRepository::new(pool.clone())),
            password: Arc::new(SqlitePasswordRepository::new(pool.clone())),
            login_attempts: Arc::new(SqliteLoginAttemptRepository::new(pool.clone())),
            contact: Arc::new(SqliteContactRepository::new(pool.clone())),
            profile: Arc::new(SqliteProfileRepository::new(pool.clone())),
            project: Arc::new(SqliteProjectRepository::new(pool.clone())),
            blog_post: Arc::new(SqliteBlogPostRepository::new(pool.clone())),
            experience: Arc::new(SqliteExperienceRepository::new(pool.clone())),
            education: Arc::new(SqliteEducationRepository::new(pool.clone())),
            certification: Arc::new(SqliteCertificationRepository::new(pool.clone())),
            pool,
        }
    }
}

#[async_trait]
impl RepositoryProvider for SqliteRepositoryProvider {
    type User = SqliteUserRepository;
    type Password = SqlitePasswordRepository;
    type LoginAttempts = SqliteLoginAttemptRepository;
    type Contact = SqliteContactRepository;
    type Profile = SqliteProfileRepository;
    type Project = SqliteProjectRepository;
    type BlogPost = SqliteBlogPostRepository;
    type Experience = SqliteExperienceRepository;
    type Education = SqliteEducationRepository;
    type Certification = SqliteCertificationRepository;

    fn user(&self) -> &Self::User {
        &self.user
    }

    fn password(&self) -> &Self::Password {
        &self.password
    }

    fn login_attempts(&self) -> &Self::LoginAttempts {
        &self.login_attempts
    }

    fn contact(&self) -> &Self::Contact {
        &self.contact
    }

    fn profile(&self) -> &Self::Profile {
        &self.profile
    }

    fn project(&self) -> &Self::Project {
        &self.project
    }

    fn blog_post(&self) -> &Self::BlogPost {
        &self.blog_post
    }

    fn experience(&self) -> &Self::Experience {
        &self.experience
    }

    fn education(&self) -> &Self::Education {
        &self.education
    }

    fn certification(&self) -> &Self::Certification {
        &self.certification
    }

    async fn migrate(&self) -> Result<(), Error> {
        let manager = SqliteMigrationManager::new(self.pool.clone());
        manager.initialize().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to initialize migrations");
            StorageError::Migration("Failed to initialize migrations".to_string())
        })?;

        manager.up(&migrations::all()).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to run migrations");
            StorageError::Migration("Failed to run migrations".to_string())
        })?;

        Ok(())
    }

    async fn health_check(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Database(e.to_string()))?;
        Ok(())
    }
}

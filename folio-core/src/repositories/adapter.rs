//! Per-repository views over a [`RepositoryProvider`].
//!
//! Services are generic over a single repository trait and hold it in an `Arc`. These
//! adapters let every service share one provider instead of owning separate handles.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    Error, User, UserId,
    content::{
        BlogFilter, BlogPost, BlogPostInput, Certification, CertificationFields, ContactMessage,
        Education, EducationFields, Experience, ExperienceFields, NewContactMessage, Page,
        Profile, ProfileInput, Project, ProjectFilter, ProjectInput,
    },
    repositories::{
        BlogPostRepository, CertificationRepository, ContactRepository, EducationRepository,
        ExperienceRepository, LoginAttemptRepository, PasswordRepository, ProfileRepository,
        ProjectRepository, RepositoryProvider, UserRepository,
    },
    storage::{AttemptStats, FailedLogin},
    user::NewUser,
};

macro_rules! adapter {
    ($name:ident) => {
        pub struct $name<R: RepositoryProvider> {
            provider: Arc<R>,
        }

        impl<R: RepositoryProvider> $name<R> {
            pub fn new(provider: Arc<R>) -> Self {
                Self { provider }
            }
        }
    };
}

adapter!(UserRepositoryAdapter);
adapter!(PasswordRepositoryAdapter);
adapter!(LoginAttemptRepositoryAdapter);
adapter!(ContactRepositoryAdapter);
adapter!(ProfileRepositoryAdapter);
adapter!(ProjectRepositoryAdapter);
adapter!(BlogPostRepositoryAdapter);
adapter!(ExperienceRepositoryAdapter);
adapter!(EducationRepositoryAdapter);
adapter!(CertificationRepositoryAdapter);

#[async_trait]
impl<R: RepositoryProvider> UserRepository for UserRepositoryAdapter<R> {
    async fn create(&self, user: NewUser) -> Result<User, Error> {
        self.provider.user().create(user).await
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, Error> {
        self.provider.user().find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        self.provider.user().find_by_email(email).await
    }

    async fn update_account(&self, id: &UserId, name: &str, email: &str) -> Result<User, Error> {
        self.provider.user().update_account(id, name, email).await
    }

    async fn count(&self) -> Result<u64, Error> {
        self.provider.user().count().await
    }
}

#[async_trait]
impl<R: RepositoryProvider> PasswordRepository for PasswordRepositoryAdapter<R> {
    async fn store_password_hash(&self, user_id: &UserId, hash: &str) -> Result<(), Error> {
        self.provider.password().store_password_hash(user_id, hash).await
    }

    async fn password_hash(&self, user_id: &UserId) -> Result<Option<String>, Error> {
        self.provider.password().password_hash(user_id).await
    }
}

#[async_trait]
impl<R: RepositoryProvider> LoginAttemptRepository for LoginAttemptRepositoryAdapter<R> {
    async fn record_failure(
        &self,
        email: &str,
        ip_address: Option<&str>,
    ) -> Result<FailedLogin, Error> {
        self.provider
            .login_attempts()
            .record_failure(email, ip_address)
            .await
    }

    async fn failure_stats(
        &self,
        email: &str,
        since: DateTime<Utc>,
    ) -> Result<AttemptStats, Error> {
        self.provider.login_attempts().failure_stats(email, since).await
    }

    async fn clear_failures(&self, email: &str) -> Result<u64, Error> {
        self.provider.login_attempts().clear_failures(email).await
    }

    async fn purge_before(&self, before: DateTime<Utc>) -> Result<u64, Error> {
        self.provider.login_attempts().purge_before(before).await
    }

    async fn mark_locked(&self, email: &str, locked_at: Option<DateTime<Utc>>) -> Result<(), Error> {
        self.provider.login_attempts().mark_locked(email, locked_at).await
    }
}

#[async_trait]
impl<R: RepositoryProvider> ContactRepository for ContactRepositoryAdapter<R> {
    async fn count_submissions(&self, email: &str, since: DateTime<Utc>) -> Result<u64, Error> {
        self.provider.contact().count_submissions(email, since).await
    }

    async fn create_submission(&self, message: NewContactMessage) -> Result<ContactMessage, Error> {
        self.provider.contact().create_submission(message).await
    }

    async fn list(&self, page: Page) -> Result<Vec<ContactMessage>, Error> {
        self.provider.contact().list(page).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ContactMessage>, Error> {
        self.provider.contact().find_by_id(id).await
    }

    async fn set_read(&self, id: &str, read: bool) -> Result<ContactMessage, Error> {
        self.provider.contact().set_read(id, read).await
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        self.provider.contact().delete(id).await
    }

    async fn count(&self) -> Result<u64, Error> {
        self.provider.contact().count().await
    }

    async fn count_unread(&self) -> Result<u64, Error> {
        self.provider.contact().count_unread().await
    }
}

#[async_trait]
impl<R: RepositoryProvider> ProfileRepository for ProfileRepositoryAdapter<R> {
    async fn get(&self) -> Result<Option<Profile>, Error> {
        self.provider.profile().get().await
    }

    async fn upsert(&self, profile: ProfileInput) -> Result<Profile, Error> {
        self.provider.profile().upsert(profile).await
    }
}

#[async_trait]
impl<R: RepositoryProvider> ProjectRepository for ProjectRepositoryAdapter<R> {
    async fn create(&self, project: ProjectInput) -> Result<Project, Error> {
        self.provider.project().create(project).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Project>, Error> {
        self.provider.project().find_by_id(id).await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Project>, Error> {
        self.provider.project().find_by_slug(slug).await
    }

    async fn list(&self, filter: ProjectFilter, page: Page) -> Result<Vec<Project>, Error> {
        self.provider.project().list(filter, page).await
    }

    async fn update(&self, id: &str, project: ProjectInput) -> Result<Project, Error> {
        self.provider.project().update(id, project).await
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        self.provider.project().delete(id).await
    }

    async fn count(&self, filter: ProjectFilter) -> Result<u64, Error> {
        self.provider.project().count(filter).await
    }
}

#[async_trait]
impl<R: RepositoryProvider> BlogPostRepository for BlogPostRepositoryAdapter<R> {
    async fn create(&self, post: BlogPostInput) -> Result<BlogPost, Error> {
        self.provider.blog_post().create(post).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<BlogPost>, Error> {
        self.provider.blog_post().find_by_id(id).await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, Error> {
        self.provider.blog_post().find_by_slug(slug).await
    }

    async fn list(&self, filter: BlogFilter, page: Page) -> Result<Vec<BlogPost>, Error> {
        self.provider.blog_post().list(filter, page).await
    }

    async fn update(&self, id: &str, post: BlogPostInput) -> Result<BlogPost, Error> {
        self.provider.blog_post().update(id, post).await
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        self.provider.blog_post().delete(id).await
    }

    async fn count(&self, filter: BlogFilter) -> Result<u64, Error> {
        self.provider.blog_post().count(filter).await
    }

    async fn increment_views(&self, id: &str) -> Result<(), Error> {
        self.provider.blog_post().increment_views(id).await
    }

    async fn total_views(&self) -> Result<u64, Error> {
        self.provider.blog_post().total_views().await
    }
}

#[async_trait]
impl<R: RepositoryProvider> ExperienceRepository for ExperienceRepositoryAdapter<R> {
    async fn create(&self, experience: ExperienceFields) -> Result<Experience, Error> {
        self.provider.experience().create(experience).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Experience>, Error> {
        self.provider.experience().find_by_id(id).await
    }

    async fn list(&self) -> Result<Vec<Experience>, Error> {
        self.provider.experience().list().await
    }

    async fn update(&self, id: &str, experience: ExperienceFields) -> Result<Experience, Error> {
        self.provider.experience().update(id, experience).await
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        self.provider.experience().delete(id).await
    }
}

#[async_trait]
impl<R: RepositoryProvider> EducationRepository for EducationRepositoryAdapter<R> {
    async fn create(&self, education: EducationFields) -> Result<Education, Error> {
        self.provider.education().create(education).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Education>, Error> {
        self.provider.education().find_by_id(id).await
    }

    async fn list(&self) -> Result<Vec<Education>, Error> {
        self.provider.education().list().await
    }

    async fn update(&self, id: &str, education: EducationFields) -> Result<Education, Error> {
        self.provider.education().update(id, education).await
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        self.provider.education().delete(id).await
    }
}

#[async_trait]
impl<R: RepositoryProvider> CertificationRepository for CertificationRepositoryAdapter<R> {
    async fn create(&self, certification: CertificationFields) -> Result<Certification, Error> {
        self.provider.certification().create(certification).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Certification>, Error> {
        self.provider.certification().find_by_id(id).await
    }

    async fn list(&self) -> Result<Vec<Certification>, Error> {
        self.provider.certification().list().await
    }

    async fn update(
        &self,
        id: &str,
        certification: CertificationFields,
    ) -> Result<Certification, Error> {
        self.provider.certification().update(id, certification).await
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        self.provider.certification().delete(id).await
    }
}

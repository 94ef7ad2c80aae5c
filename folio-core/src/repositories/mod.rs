//! Repository traits for the data access layer.
//!
//! Services depend on these traits only. Storage backends implement each one and expose
//! them together through [`RepositoryProvider`].

pub mod adapter;
pub mod contact;
pub mod content;
pub mod login_attempts;
pub mod password;
pub mod user;

pub use adapter::{
    BlogPostRepositoryAdapter, CertificationRepositoryAdapter, ContactRepositoryAdapter,
    EducationRepositoryAdapter, ExperienceRepositoryAdapter, LoginAttemptRepositoryAdapter,
    PasswordRepositoryAdapter, ProfileRepositoryAdapter, ProjectRepositoryAdapter,
    UserRepositoryAdapter,
};
pub use contact::ContactRepository;
pub use content::{
    BlogPostRepository, CertificationRepository, EducationRepository, ExperienceRepository,
    ProfileRepository, ProjectRepository,
};
pub use login_attempts::LoginAttemptRepository;
pub use password::PasswordRepository;
pub use user::UserRepository;

use async_trait::async_trait;

use crate::Error;

/// Everything a storage backend has to offer, plus lifecycle hooks.
#[async_trait]
pub trait RepositoryProvider: Send + Sync + 'static {
    type User: UserRepository;
    type Password: PasswordRepository;
    type LoginAttempts: LoginAttemptRepository;
    type Contact: ContactRepository;
    type Profile: ProfileRepository;
    type Project: ProjectRepository;
    type BlogPost: BlogPostRepository;
    type Experience: ExperienceRepository;
    type Education: EducationRepository;
    type Certification: CertificationRepository;

    fn user(&self) -> &Self::User;
    fn password(&self) -> &Self::Password;
    fn login_attempts(&self) -> &Self::LoginAttempts;
    fn contact(&self) -> &Self::Contact;
    fn profile(&self) -> &Self::Profile;
    fn project(&self) -> &Self::Project;
    fn blog_post(&self) -> &Self::BlogPost;
    fn experience(&self) -> &Self::Experience;
    fn education(&self) -> &Self::Education;
    fn certification(&self) -> &Self::Certification;

    /// Apply pending schema migrations.
    async fn migrate(&self) -> Result<(), Error>;

    /// Cheap round trip to the store.
    async fn health_check(&self) -> Result<(), Error>;
}

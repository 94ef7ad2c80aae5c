//! Portfolio content: the entities managed from the admin area.
pub mod blog;
pub mod contact;
pub mod profile;
pub mod project;
pub mod resume;

pub use blog::{BlogFilter, BlogPost, BlogPostInput};
pub use contact::{ContactMessage, NewContactMessage};
pub use profile::{Profile, ProfileInput};
pub use project::{Project, ProjectFilter, ProjectInput};
pub use resume::{
    Certification, CertificationFields, CertificationInput, Education, EducationFields,
    EducationInput, Experience, ExperienceFields, ExperienceInput,
};

use serde::{Deserialize, Serialize};

/// One page of a listing, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub page: u32,
    pub per_page: u32,
}

impl Page {
    pub const MAX_PER_PAGE: u32 = 100;

    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, Self::MAX_PER_PAGE),
        }
    }

    pub fn first(per_page: u32) -> Self {
        Self::new(1, per_page)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }
}

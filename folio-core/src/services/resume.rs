//! Experience, education and certification entries for the about page.

use std::sync::Arc;

use crate::{
    Error,
    content::{
        Certification, CertificationInput, Education, EducationInput, Experience,
        ExperienceInput,
    },
    error::utilities::FoundExt,
    repositories::{CertificationRepository, EducationRepository, ExperienceRepository},
};

pub struct ExperienceService<R: ExperienceRepository> {
    repository: Arc<R>,
}

impl<R: ExperienceRepository> ExperienceService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, input: ExperienceInput) -> Result<Experience, Error> {
        self.repository.create(input.validate()?).await
    }

    pub async fn get(&self, id: &str) -> Result<Experience, Error> {
        self.repository.find_by_id(id).await.or_not_found()
    }

    pub async fn list(&self) -> Result<Vec<Experience>, Error> {
        self.repository.list().await
    }

    pub async fn update(&self, id: &str, input: ExperienceInput) -> Result<Experience, Error> {
        self.repository.update(id, input.validate()?).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        self.repository.delete(id).await
    }
}

pub struct EducationService<R: EducationRepository> {
    repository: Arc<R>,
}

impl<R: EducationRepository> EducationService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, input: EducationInput) -> Result<Education, Error> {
        self.repository.create(input.validate()?).await
    }

    pub async fn get(&self, id: &str) -> Result<Education, Error> {
        self.repository.find_by_id(id).await.or_not_found()
    }

    pub async fn list(&self) -> Result<Vec<Education>, Error> {
        self.repository.list().await
    }

    pub async fn update(&self, id: &str, input: EducationInput) -> Result<Education, Error> {
        self.repository.update(id, input.validate()?).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        self.repository.delete(id).await
    }
}

pub struct CertificationService<R: CertificationRepository> {
    repository: Arc<R>,
}

impl<R: CertificationRepository> CertificationService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, input: CertificationInput) -> Result<Certification, Error> {
        self.repository.create(input.validate()?).await
    }

    pub async fn get(&self, id: &str) -> Result<Certification, Error> {
        self.repository.find_by_id(id).await.or_not_found()
    }

    pub async fn list(&self) -> Result<Vec<Certification>, Error> {
        self.repository.list().await
    }

    pub async fn update(
        &self,
        id: &str,
        input: CertificationInput,
    ) -> Result<Certification, Error> {
        self.repository.update(id, input.validate()?).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        self.repository.delete(id).await
    }
}

//! Experience, education and certifications. Dates are stored as `YYYY-MM-DD` text.

use async_trait::async_trait;
use chrono::NaiveDate;
use folio_core::{
    Error,
    content::{
        Certification, CertificationFields, Education, EducationFields, Experience,
        ExperienceFields,
    },
    error::StorageError,
    id::generate_prefixed_id,
    repositories::{CertificationRepository, EducationRepository, ExperienceRepository},
};
use sqlx::{SqlitePool, sqlite::SqliteQueryResult, types::Json};

use crate::db_error;

fn ensure_deleted(result: SqliteQueryResult) -> Result<(), Error> {
    if result.rows_affected() == 0 {
        return Err(StorageError::NotFound.into());
    }
    Ok(())
}

pub struct SqliteExperienceRepository {
    pool: SqlitePool,
}

impl SqliteExperienceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SqliteExperience {
    id: String,
    position: String,
    company: String,
    location: Option<String>,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    description: Option<String>,
    technologies: Json<Vec<String>>,
    sort_order: i64,
}

impl From<SqliteExperience> for Experience {
    fn from(row: SqliteExperience) -> Self {
        Experience {
            id: row.id,
            position: row.position,
            company: row.company,
            location: row.location,
            start_date: row.start_date,
            end_date: row.end_date,
            description: row.description,
            technologies: row.technologies.0,
            order: row.sort_order,
        }
    }
}

#[async_trait]
impl ExperienceRepository for SqliteExperienceRepository {
    async fn create(&self, experience: ExperienceFields) -> Result<Experience, Error> {
        let row = sqlx::query_as::<_, SqliteExperience>(
            r#"
            INSERT INTO experience (
                id, position, company, location, start_date, end_date, description,
                technologies, sort_order
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            RETURNING *
            "#,
        )
        .bind(generate_prefixed_id("exp"))
        .bind(&experience.position)
        .bind(&experience.company)
        .bind(&experience.location)
        .bind(experience.start_date)
        .bind(experience.end_date)
        .bind(&experience.description)
        .bind(Json(&experience.technologies))
        .bind(experience.order)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error(e, "Failed to create experience"))?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Experience>, Error> {
        let row = sqlx::query_as::<_, SqliteExperience>("SELECT * FROM experience WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error(e, "Failed to find experience"))?;

        Ok(row.map(Experience::from))
    }

    async fn list(&self) -> Result<Vec<Experience>, Error> {
        let rows = sqlx::query_as::<_, SqliteExperience>(
            "SELECT * FROM experience ORDER BY sort_order ASC, start_date DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error(e, "Failed to list experience"))?;

        Ok(rows.into_iter().map(Experience::from).collect())
    }

    async fn update(&self, id: &str, experience: ExperienceFields) -> Result<Experience, Error> {
        let row = sqlx::query_as::<_, SqliteExperience>(
            r#"
            UPDATE experience SET
                position = ?2, company = ?3, location = ?4, start_date = ?5, end_date = ?6,
                description = ?7, technologies = ?8, sort_order = ?9
            WHERE id = ?1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&experience.position)
        .bind(&experience.company)
        .bind(&experience.location)
        .bind(experience.start_date)
        .bind(experience.end_date)
        .bind(&experience.description)
        .bind(Json(&experience.technologies))
        .bind(experience.order)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error(e, "Failed to update experience"))?
        .ok_or(StorageError::NotFound)?;

        Ok(row.into())
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM experience WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error(e, "Failed to delete experience"))?;
        ensure_deleted(result)
    }
}

pub struct SqliteEducationRepository {
    pool: SqlitePool,
}

impl SqliteEducationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SqliteEducation {
    id: String,
    degree: String,
    institution: String,
    location: Option<String>,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    description: Option<String>,
    sort_order: i64,
}

impl From<SqliteEducation> for Education {
    fn from(row: SqliteEducation) -> Self {
        Education {
            id: row.id,
            degree: row.degree,
            institution: row.institution,
            location: row.location,
            start_date: row.start_date,
            end_date: row.end_date,
            description: row.description,
            order: row.sort_order,
        }
    }
}

#[async_trait]
impl EducationRepository for SqliteEducationRepository {
    async fn create(&self, education: EducationFields) -> Result<Education, Error> {
        let row = sqlx::query_as::<_, SqliteEducation>(
            r#"
            INSERT INTO education (
                id, degree, institution, location, start_date, end_date, description, sort_order
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            RETURNING *
            "#,
        )
        .bind(generate_prefixed_id("edu"))
        .bind(&education.degree)
        .bind(&education.institution)
        .bind(&education.location)
        .bind(education.start_date)
        .bind(education.end_date)
        .bind(&education.description)
        .bind(education.order)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error(e, "Failed to create education"))?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Education>, Error> {
        let row = sqlx::query_as::<_, SqliteEducation>("SELECT * FROM education WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error(e, "Failed to find education"))?;

        Ok(row.map(Education::from))
    }

    async fn list(&self) -> Result<Vec<Education>, Error> {
        let rows = sqlx::query_as::<_, SqliteEducation>(
            "SELECT * FROM education ORDER BY sort_order ASC, start_date DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error(e, "Failed to list education"))?;

        Ok(rows.into_iter().map(Education::from).collect())
    }

    async fn update(&self, id: &str, education: EducationFields) -> Result<Education, Error> {
        let row = sqlx::query_as::<_, SqliteEducation>(
            r#"
            UPDATE education SET
                degree = ?2, institution = ?3, location = ?4, start_date = ?5, end_date = ?6,
                description = ?7, sort_order = ?8
            WHERE id = ?1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&education.degree)
        .bind(&education.institution)
        .bind(&education.location)
        .bind(education.start_date)
        .bind(education.end_date)
        .bind(&education.description)
        .bind(education.order)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error(e, "Failed to update education"))?
        .ok_or(StorageError::NotFound)?;

        Ok(row.into())
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM education WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error(e, "Failed to delete education"))?;
        ensure_deleted(result)
    }
}

pub struct SqliteCertificationRepository {
    pool: SqlitePool,
}

impl SqliteCertificationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SqliteCertification {
    id: String,
    name: String,
    issuer: String,
    date: NaiveDate,
    url: Option<String>,
    sort_order: i64,
}

impl From<SqliteCertification> for Certification {
    fn from(row: SqliteCertification) -> Self {
        Certification {
            id: row.id,
            name: row.name,
            issuer: row.issuer,
            date: row.date,
            url: row.url,
            order: row.sort_order,
        }
    }
}

#[async_trait]
impl CertificationRepository for SqliteCertificationRepository {
    async fn create(&self, certification: CertificationFields) -> Result<Certification, Error> {
        let row = sqlx::query_as::<_, SqliteCertification>(
            r#"
            INSERT INTO certifications (id, name, issuer, date, url, sort_order)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING *
            "#,
        )
        .bind(generate_prefixed_id("cert"))
        .bind(&certification.name)
        .bind(&certification.issuer)
        .bind(certification.date)
        .bind(&certification.url)
        .bind(certification.order)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error(e, "Failed to create certification"))?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Certification>, Error> {
        let row =
            sqlx::query_as::<_, SqliteCertification>("SELECT * FROM certifications WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error(e, "Failed to find certification"))?;

        Ok(row.map(Certification::from))
    }

    async fn list(&self) -> Result<Vec<Certification>, Error> {
        let rows = sqlx::query_as::<_, SqliteCertification>(
            "SELECT * FROM certifications ORDER BY sort_order ASC, date DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error(e, "Failed to list certifications"))?;

        Ok(rows.into_iter().map(Certification::from).collect())
    }

    async fn update(
        &self,
        id: &str,
        certification: CertificationFields,
    ) -> Result<Certification, Error> {
        let row = sqlx::query_as::<_, SqliteCertification>(
            r#"
            UPDATE certifications SET
                name = ?2, issuer = ?3, date = ?4, url = ?5, sort_order = ?6
            WHERE id = ?1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&certification.name)
        .bind(&certification.issuer)
        .bind(certification.date)
        .bind(&certification.url)
        .bind(certification.order)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error(e, "Failed to update certification"))?
        .ok_or(StorageError::NotFound)?;

        Ok(row.into())
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM certifications WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error(e, "Failed to delete certification"))?;
        ensure_deleted(result)
    }
}

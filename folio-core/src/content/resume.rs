//! Experience, education and certifications shown on the about page.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::validation::{
    FieldErrors, Validated, clean_list, optional_text, optional_url, required_text,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: String,
    pub position: String,
    pub company: String,
    pub location: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub technologies: Vec<String>,
    pub order: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceInput {
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub company: String,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub order: i64,
}

/// Validated experience fields, ready to store.
#[derive(Debug, Clone)]
pub struct ExperienceFields {
    pub position: String,
    pub company: String,
    pub location: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub technologies: Vec<String>,
    pub order: i64,
}

impl ExperienceInput {
    pub fn validate(self) -> Validated<ExperienceFields> {
        let mut errors = FieldErrors::new();
        let position = required_text(&mut errors, "position", self.position, "Position is required");
        let company = required_text(&mut errors, "company", self.company, "Company is required");
        let start_date = check_dates(&mut errors, self.start_date, self.end_date);

        match start_date {
            Some(start_date) => errors.into_result(ExperienceFields {
                position,
                company,
                location: optional_text(self.location),
                start_date,
                end_date: self.end_date,
                description: optional_text(self.description),
                technologies: clean_list(self.technologies),
                order: self.order,
            }),
            None => Err(errors),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: String,
    pub degree: String,
    pub institution: String,
    pub location: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub order: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationInput {
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub institution: String,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
    #[serde(default)]
    pub order: i64,
}

#[derive(Debug, Clone)]
pub struct EducationFields {
    pub degree: String,
    pub institution: String,
    pub location: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub order: i64,
}

impl EducationInput {
    pub fn validate(self) -> Validated<EducationFields> {
        let mut errors = FieldErrors::new();
        let degree = required_text(&mut errors, "degree", self.degree, "Degree is required");
        let institution = required_text(
            &mut errors,
            "institution",
            self.institution,
            "Institution is required",
        );
        let start_date = check_dates(&mut errors, self.start_date, self.end_date);

        match start_date {
            Some(start_date) => errors.into_result(EducationFields {
                degree,
                institution,
                location: optional_text(self.location),
                start_date,
                end_date: self.end_date,
                description: optional_text(self.description),
                order: self.order,
            }),
            None => Err(errors),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub id: String,
    pub name: String,
    pub issuer: String,
    pub date: NaiveDate,
    pub url: Option<String>,
    pub order: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub issuer: String,
    pub date: Option<NaiveDate>,
    pub url: Option<String>,
    #[serde(default)]
    pub order: i64,
}

#[derive(Debug, Clone)]
pub struct CertificationFields {
    pub name: String,
    pub issuer: String,
    pub date: NaiveDate,
    pub url: Option<String>,
    pub order: i64,
}

impl CertificationInput {
    pub fn validate(self) -> Validated<CertificationFields> {
        let mut errors = FieldErrors::new();
        let name = required_text(&mut errors, "name", self.name, "Name is required");
        let issuer = required_text(&mut errors, "issuer", self.issuer, "Issuer is required");
        let url = optional_url(&mut errors, "url", self.url);
        if self.date.is_none() {
            errors.add("date", "Date is required");
        }

        match self.date {
            Some(date) => errors.into_result(CertificationFields {
                name,
                issuer,
                date,
                url,
                order: self.order,
            }),
            None => Err(errors),
        }
    }
}

fn check_dates(
    errors: &mut FieldErrors,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Option<NaiveDate> {
    let Some(start) = start_date else {
        errors.add("startDate", "Start date is required");
        return None;
    };

    if matches!(end_date, Some(end) if end < start) {
        errors.add("endDate", "End date must be after the start date");
    }

    Some(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_experience_requires_start_date() {
        let input: ExperienceInput =
            serde_json::from_value(json!({"position": "Engineer", "company": "Acme"})).unwrap();
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.get("startDate").unwrap(), ["Start date is required"]);
    }

    #[test]
    fn test_experience_end_before_start() {
        let input: ExperienceInput = serde_json::from_value(json!({
            "position": "Engineer", "company": "Acme",
            "startDate": "2024-05-01", "endDate": "2023-01-01"
        }))
        .unwrap();
        assert!(input.validate().unwrap_err().contains("endDate"));
    }

    #[test]
    fn test_education_ok() {
        let input: EducationInput = serde_json::from_value(json!({
            "degree": "BSc", "institution": "Uni", "startDate": "2015-09-01",
            "endDate": "2019-06-30", "location": ""
        }))
        .unwrap();
        let fields = input.validate().unwrap();
        assert_eq!(fields.location, None);
        assert_eq!(fields.end_date, NaiveDate::from_ymd_opt(2019, 6, 30));
    }

    #[test]
    fn test_certification_requires_date_and_issuer() {
        let input = CertificationInput {
            name: "CKA".into(),
            ..CertificationInput::default()
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.contains("date"));
        assert!(errors.contains("issuer"));
    }
}

//! Allow-listed form input for the create and edit operations.
//!
//! Each form binds exactly the fields its operation accepts; anything else
//! the client sends is dropped at deserialization. Values stay as raw text
//! until [`CreatePhotoForm::validate`] / [`EditPhotoForm::validate`] turn
//! them into typed fields, so an invalid submission can be echoed back
//! unchanged.

use chrono::NaiveDate;
use kennel_core::{DogId, PhotoId};
use serde::{Deserialize, Serialize};

/// Date format accepted for `date_taken`.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fields submitted with a new photograph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreatePhotoForm {
    /// Date the photograph was taken (`YYYY-MM-DD`).
    pub date_taken: Option<String>,
    pub location: Option<String>,
    pub dog_id: Option<String>,
}

/// Fields submitted when editing a photograph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct EditPhotoForm {
    pub id: Option<String>,
    /// Stored image name, normally echoed back unchanged from the edit form.
    pub file_name: Option<String>,
    /// Date the photograph was taken (`YYYY-MM-DD`).
    pub date_taken: Option<String>,
    pub location: Option<String>,
    pub dog_id: Option<String>,
}

/// Validated values shared by both forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoFields {
    pub dog_id: DogId,
    pub date_taken: NaiveDate,
    pub location: String,
}

impl CreatePhotoForm {
    /// Check every field, collecting all problems rather than stopping at the first.
    pub fn validate(&self) -> Result<PhotoFields, Vec<String>> {
        validate_fields(
            self.date_taken.as_deref(),
            self.location.as_deref(),
            self.dog_id.as_deref(),
        )
    }
}

impl EditPhotoForm {
    /// The record ID carried in the payload, if it parses.
    pub fn photo_id(&self) -> Option<PhotoId> {
        self.id.as_deref().and_then(|s| s.parse().ok())
    }

    /// Stored file name, with an empty value meaning "no file".
    pub fn file_name(&self) -> Option<String> {
        self.file_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    }

    /// Check the record fields. The ID is checked separately by the caller.
    pub fn validate(&self) -> Result<PhotoFields, Vec<String>> {
        validate_fields(
            self.date_taken.as_deref(),
            self.location.as_deref(),
            self.dog_id.as_deref(),
        )
    }
}

fn validate_fields(
    date_taken: Option<&str>,
    location: Option<&str>,
    dog_id: Option<&str>,
) -> Result<PhotoFields, Vec<String>> {
    let mut errors = Vec::new();

    let date_taken = match date_taken.map(str::trim).filter(|s| !s.is_empty()) {
        None => {
            errors.push("date_taken is required".to_string());
            None
        }
        Some(raw) => match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                errors.push(format!("date_taken {raw:?} is not a valid YYYY-MM-DD date"));
                None
            }
        },
    };

    let location = match location.map(str::trim).filter(|s| !s.is_empty()) {
        None => {
            errors.push("location is required".to_string());
            None
        }
        Some(loc) => Some(loc.to_string()),
    };

    let dog_id = match dog_id.map(str::trim).filter(|s| !s.is_empty()) {
        None => {
            errors.push("dog_id is required".to_string());
            None
        }
        Some(raw) => match raw.parse::<DogId>() {
            Ok(id) if id.get() > 0 => Some(id),
            _ => {
                errors.push(format!("dog_id {raw:?} is not a valid dog identifier"));
                None
            }
        },
    };

    match (date_taken, location, dog_id) {
        (Some(date_taken), Some(location), Some(dog_id)) if errors.is_empty() => Ok(PhotoFields {
            dog_id,
            date_taken,
            location,
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_form(date: &str, location: &str, dog: &str) -> CreatePhotoForm {
        CreatePhotoForm {
            date_taken: Some(date.into()),
            location: Some(location.into()),
            dog_id: Some(dog.into()),
        }
    }

    #[test]
    fn valid_create_form() {
        let fields = create_form("2024-02-29", " Évora ", "4").validate().unwrap();
        assert_eq!(fields.dog_id, DogId::from(4));
        assert_eq!(fields.date_taken, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(fields.location, "Évora");
    }

    #[test]
    fn missing_fields_are_all_reported() {
        let errors = CreatePhotoForm::default().validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.contains("date_taken")));
        assert!(errors.iter().any(|e| e.contains("location")));
        assert!(errors.iter().any(|e| e.contains("dog_id")));
    }

    #[test]
    fn malformed_values_are_rejected() {
        let errors = create_form("2023-02-30", "Faro", "rex").validate().unwrap_err();
        assert_eq!(errors.len(), 2);

        let errors = create_form("2023-02-01", "   ", "0").validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.contains("location")));
        assert!(errors.iter().any(|e| e.contains("dog_id")));
    }

    #[test]
    fn edit_form_id_and_file_name() {
        let form = EditPhotoForm {
            id: Some("12".into()),
            file_name: Some("  ".into()),
            date_taken: Some("2022-10-10".into()),
            location: Some("Braga".into()),
            dog_id: Some("3".into()),
        };
        assert_eq!(form.photo_id(), Some(PhotoId::from(12)));
        assert_eq!(form.file_name(), None);
        assert!(form.validate().is_ok());

        let form = EditPhotoForm {
            id: Some("twelve".into()),
            file_name: Some("3_kept.png".into()),
            ..Default::default()
        };
        assert_eq!(form.photo_id(), None);
        assert_eq!(form.file_name().as_deref(), Some("3_kept.png"));
        assert!(form.validate().is_err());
    }
}

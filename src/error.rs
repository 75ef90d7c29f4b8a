use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum HotelError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationErrors),
    #[error("hotel id is required")]
    MissingIdentifier,
    #[error("hotel not found: {0}")]
    NotFound(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),
}

pub type HotelResult<T> = Result<T, HotelError>;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<ValidationErrors>,
}

impl HotelError {
    /// Names of the fields that failed validation, sorted.
    pub fn invalid_fields(&self) -> Vec<&'static str> {
        match self {
            HotelError::InvalidInput(errors) => {
                let mut fields: Vec<_> = errors.field_errors().into_keys().collect();
                fields.sort_unstable();
                fields
            }
            _ => Vec::new(),
        }
    }
}

impl ResponseError for HotelError {
    fn status_code(&self) -> StatusCode {
        match self {
            HotelError::InvalidInput(_) | HotelError::MissingIdentifier => StatusCode::BAD_REQUEST,
            HotelError::NotFound(_) => StatusCode::NOT_FOUND,
            HotelError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            HotelError::InvalidInput(errors) => ErrorResponse {
                error: "Invalid hotel fields".to_string(),
                fields: Some(errors.clone()),
            },
            HotelError::MissingIdentifier => ErrorResponse {
                error: "id is required".to_string(),
                fields: None,
            },
            HotelError::NotFound(_) => ErrorResponse {
                error: "Hotel not found".to_string(),
                fields: None,
            },
            // Detail goes to the logs only.
            HotelError::StoreUnavailable(_) => ErrorResponse {
                error: "Something went wrong!".to_string(),
                fields: None,
            },
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn maps_status_codes() {
        let mut errors = ValidationErrors::new();
        errors.add("name", ValidationError::new("length"));
        assert_eq!(
            HotelError::InvalidInput(errors).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            HotelError::MissingIdentifier.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            HotelError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            HotelError::StoreUnavailable(sqlx::Error::PoolClosed).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn lists_invalid_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("price_per_night", ValidationError::new("range"));
        errors.add("address", ValidationError::new("length"));
        assert_eq!(
            HotelError::InvalidInput(errors).invalid_fields(),
            vec!["address", "price_per_night"]
        );
        assert!(HotelError::MissingIdentifier.invalid_fields().is_empty());
    }
}

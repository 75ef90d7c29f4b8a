use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::query::parse::coerce_number;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub address: String,
    pub rating: f64,
    pub price_per_night: f64,
    pub photos: Json<Vec<String>>,
    #[sqlx(skip)]
    #[serde(default)]
    pub rooms: Vec<Room>,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub hotel_id: String,
    pub name: String,
    pub capacity: i64,
    pub price_per_night: f64,
}

/// One page of hotels plus the number of hotels matching the same filter.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HotelPage {
    pub hotels: Vec<Hotel>,
    pub total_count: i64,
}

/// Create/update body as it arrives over the wire.
///
/// Numbers may come in as JSON numbers or numeric strings, and `photos` may be
/// any JSON value; [`HotelPayload::normalize`] turns this into [`HotelFields`].
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HotelPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Value>,
    #[serde(default)]
    pub price_per_night: Option<Value>,
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub photos: Option<Value>,
}

// Keeps an explicit `null` distinguishable from an absent key.
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq)]
pub enum PhotoUpdate {
    Keep,
    Replace(Vec<String>),
}

impl PhotoUpdate {
    fn from_value(value: Option<&Value>) -> Self {
        match value {
            None => PhotoUpdate::Keep,
            Some(Value::Array(items)) => PhotoUpdate::Replace(
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
            ),
            Some(_) => PhotoUpdate::Replace(Vec::new()),
        }
    }

    /// Photos to store for a brand new record.
    pub fn for_create(&self) -> Vec<String> {
        match self {
            PhotoUpdate::Keep => Vec::new(),
            PhotoUpdate::Replace(photos) => photos.clone(),
        }
    }
}

/// Normalized hotel fields, checked before anything touches the store.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct HotelFields {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "location is required"))]
    pub location: String,
    #[validate(length(min = 5, message = "address must be at least 5 characters"))]
    pub address: String,
    #[validate(range(min = 0.0, max = 5.0, message = "rating must be between 0 and 5"))]
    pub rating: f64,
    #[validate(
        required(message = "pricePerNight is required"),
        range(min = 0.0, message = "pricePerNight must not be negative")
    )]
    pub price_per_night: Option<f64>,
    pub photos: PhotoUpdate,
}

/// Fields that passed validation and are ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidHotel {
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub address: String,
    pub rating: f64,
    pub price_per_night: f64,
    pub photos: PhotoUpdate,
}

impl HotelPayload {
    pub fn normalize(&self) -> HotelFields {
        HotelFields {
            name: trimmed(self.name.as_deref()),
            description: self
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            location: trimmed(self.location.as_deref()),
            address: trimmed(self.address.as_deref()),
            rating: self.rating.as_ref().and_then(coerce_number).unwrap_or(0.0),
            price_per_night: self.price_per_night.as_ref().and_then(coerce_number),
            photos: PhotoUpdate::from_value(self.photos.as_ref()),
        }
    }

    /// The record id, treating an empty or blank id as absent.
    pub fn identifier(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }
}

impl HotelFields {
    pub fn into_valid(self) -> Result<ValidHotel, ValidationErrors> {
        self.validate()?;
        let Some(price_per_night) = self.price_per_night else {
            let mut errors = ValidationErrors::new();
            errors.add("price_per_night", ValidationError::new("required"));
            return Err(errors);
        };
        Ok(ValidHotel {
            name: self.name,
            description: self.description,
            location: self.location,
            address: self.address,
            rating: self.rating,
            price_per_night,
            photos: self.photos,
        })
    }
}

fn trimmed(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> HotelPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn missing_rating_defaults_to_zero() {
        let fields = payload(json!({
            "name": "The Grand",
            "location": "Paris",
            "address": "12 Rue de Rivoli",
            "pricePerNight": 150
        }))
        .normalize();
        assert_eq!(fields.rating, 0.0);
        assert_eq!(fields.price_per_night, Some(150.0));
        assert!(fields.into_valid().is_ok());
    }

    #[test]
    fn numeric_strings_are_coerced_and_text_trimmed() {
        let fields = payload(json!({
            "name": "  Seaside  ",
            "description": "   ",
            "location": "Nice",
            "address": "1 Promenade",
            "rating": "4.5",
            "pricePerNight": "99.9"
        }))
        .normalize();
        assert_eq!(fields.name, "Seaside");
        assert_eq!(fields.description, None);
        assert_eq!(fields.rating, 4.5);
        assert_eq!(fields.price_per_night, Some(99.9));
    }

    #[test]
    fn negative_price_is_rejected() {
        let errors = payload(json!({
            "name": "Budget",
            "location": "Rome",
            "address": "Via Roma 1",
            "pricePerNight": -5
        }))
        .normalize()
        .into_valid()
        .unwrap_err();
        assert!(errors.field_errors().contains_key("price_per_night"));
    }

    #[test]
    fn unparseable_price_is_missing() {
        let errors = payload(json!({
            "name": "Budget",
            "location": "Rome",
            "address": "Via Roma 1",
            "pricePerNight": "cheap"
        }))
        .normalize()
        .into_valid()
        .unwrap_err();
        assert!(errors.field_errors().contains_key("price_per_night"));
    }

    #[test]
    fn reports_every_failing_field() {
        let errors = payload(json!({
            "name": "   ",
            "location": "",
            "address": "abc",
            "rating": 7,
            "pricePerNight": 10
        }))
        .normalize()
        .into_valid()
        .unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("location"));
        assert!(fields.contains_key("address"));
        assert!(fields.contains_key("rating"));
        assert!(!fields.contains_key("price_per_night"));
    }

    #[test]
    fn photos_normalization() {
        assert_eq!(PhotoUpdate::from_value(None), PhotoUpdate::Keep);
        assert_eq!(
            PhotoUpdate::from_value(Some(&json!(["a.jpg", 3, "b.jpg"]))),
            PhotoUpdate::Replace(vec!["a.jpg".into(), "b.jpg".into()])
        );
        assert_eq!(
            PhotoUpdate::from_value(Some(&json!("a.jpg"))),
            PhotoUpdate::Replace(Vec::new())
        );
        assert_eq!(
            PhotoUpdate::from_value(Some(&Value::Null)),
            PhotoUpdate::Replace(Vec::new())
        );
    }

    #[test]
    fn explicit_null_photos_differ_from_absent() {
        let absent = payload(json!({ "name": "x" }));
        assert_eq!(absent.photos, None);
        let null = payload(json!({ "name": "x", "photos": null }));
        assert_eq!(null.photos, Some(Value::Null));
        assert_eq!(null.normalize().photos, PhotoUpdate::Replace(Vec::new()));
    }

    #[test]
    fn blank_identifier_is_absent() {
        let mut p = HotelPayload::default();
        assert_eq!(p.identifier(), None);
        p.id = Some("  ".into());
        assert_eq!(p.identifier(), None);
        p.id = Some("abc".into());
        assert_eq!(p.identifier(), Some("abc"));
    }
}

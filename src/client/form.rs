use serde_json::Value;
use validator::Validate;

use crate::models::hotel::{Hotel, HotelPayload};

/// Values behind the create/edit dialogs, with the immediate field checks the
/// user sees before anything is submitted. The server re-validates.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct HotelForm {
    #[validate(length(min = 2, message = "Name must be at least 2 characters."))]
    pub name: String,
    pub description: String,
    #[validate(length(min = 2, message = "Location is required."))]
    pub location: String,
    #[validate(length(
        min = 5,
        message = "Address is required and must be at least 5 characters."
    ))]
    pub address: String,
    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5."))]
    pub rating: f64,
    #[validate(range(min = 0.0, message = "Price must be a positive number."))]
    pub price_per_night: f64,
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

impl HotelForm {
    /// Seeds the edit form from an existing record.
    pub fn from_hotel(hotel: &Hotel) -> Self {
        Self {
            name: hotel.name.clone(),
            description: hotel.description.clone().unwrap_or_default(),
            location: hotel.location.clone(),
            address: hotel.address.clone(),
            rating: finite_or_zero(hotel.rating),
            price_per_night: finite_or_zero(hotel.price_per_night),
        }
    }

    pub fn to_payload(&self, id: Option<String>, photos: Vec<String>) -> HotelPayload {
        HotelPayload {
            id,
            name: Some(self.name.clone()),
            description: Some(self.description.clone()),
            location: Some(self.location.clone()),
            address: Some(self.address.clone()),
            rating: Some(Value::from(finite_or_zero(self.rating))),
            price_per_night: Some(Value::from(self.price_per_night)),
            photos: Some(Value::from(photos)),
        }
    }
}

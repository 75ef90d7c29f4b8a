use sqlx::SqlitePool;

use crate::db::hotels;
use crate::error::{HotelError, HotelResult};
use crate::models::hotel::{Hotel, HotelPayload};

/// Validates `payload` and stores it as a new hotel. Validation runs before
/// the store is touched; any `id` in the payload is ignored.
pub async fn create_hotel(pool: &SqlitePool, payload: &HotelPayload) -> HotelResult<Hotel> {
    let valid = payload.normalize().into_valid()?;
    let hotel = hotels::insert(pool, &valid).await?;
    log::info!("created hotel {} ({})", hotel.id, hotel.name);
    Ok(hotel)
}

pub async fn update_hotel(pool: &SqlitePool, payload: &HotelPayload) -> HotelResult<Hotel> {
    let id = payload.identifier().ok_or(HotelError::MissingIdentifier)?;
    let valid = payload.normalize().into_valid()?;

    match hotels::update(pool, id, &valid).await? {
        Some(hotel) => {
            log::info!("updated hotel {}", hotel.id);
            Ok(hotel)
        }
        None => Err(HotelError::NotFound(id.to_string())),
    }
}

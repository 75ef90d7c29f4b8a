#![allow(dead_code)]

use hotel_directory::db;
use hotel_directory::models::{Hotel, HotelPayload};
use hotel_directory::services;
use serde_json::json;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Single-connection in-memory database with the schema applied. Each
/// in-memory connection is its own database, so the pool never recycles it.
pub async fn pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    db::run_migrations(&pool).await.expect("migrations");
    pool
}

/// Rooms are read-only to the service, so tests write them directly.
pub async fn add_room(pool: &SqlitePool, hotel_id: &str, name: &str, capacity: i64, price: f64) {
    sqlx::query(
        "INSERT INTO rooms (id, hotel_id, name, capacity, price_per_night) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(hotel_id)
    .bind(name)
    .bind(capacity)
    .bind(price)
    .execute(pool)
    .await
    .expect("insert room");
}

pub fn payload(name: &str, price_per_night: f64, rating: Option<f64>) -> HotelPayload {
    HotelPayload {
        name: Some(name.to_string()),
        location: Some("Paris".to_string()),
        address: Some("12 Rue de Rivoli".to_string()),
        rating: rating.map(|r| json!(r)),
        price_per_night: Some(json!(price_per_night)),
        ..HotelPayload::default()
    }
}

/// Creates `count` hotels named `Hotel 00`, `Hotel 01`, ... in that order.
pub async fn seed(pool: &SqlitePool, count: usize) -> Vec<Hotel> {
    let mut created = Vec::with_capacity(count);
    for i in 0..count {
        let hotel = services::create_hotel(pool, &payload(&format!("Hotel {i:02}"), 100.0, None))
            .await
            .expect("seed hotel");
        created.push(hotel);
    }
    created
}

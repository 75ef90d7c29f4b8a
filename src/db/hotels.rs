use std::collections::HashMap;

use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::models::hotel::{Hotel, HotelPage, PhotoUpdate, Room, ValidHotel};
use crate::query::{fold_name, HotelFilter, PageWindow};

// Newest first; rowid breaks ties between rows created in the same millisecond.
const ORDER_BY: &str = " ORDER BY created_at DESC, rowid DESC";

/// Appends the WHERE clause for `filter`. Page and count queries both go
/// through here so they always agree on the predicate.
fn push_predicate(builder: &mut QueryBuilder<'_, Sqlite>, filter: &HotelFilter) {
    builder.push(" WHERE 1=1");

    if let Some(name) = &filter.name_contains {
        builder
            .push(" AND instr(name_folded, ")
            .push_bind(fold_name(name))
            .push(") > 0");
    }

    if let Some(min) = filter.price_min {
        builder.push(" AND price_per_night >= ").push_bind(min);
    }

    if let Some(max) = filter.price_max {
        builder.push(" AND price_per_night <= ").push_bind(max);
    }

    if let Some(rating) = filter.rating_at_least {
        builder.push(" AND rating >= ").push_bind(rating);
    }
}

/// Page of matching hotels with rooms attached, plus the count under the same
/// predicate. Both reads share one transaction.
pub async fn fetch_page(
    pool: &SqlitePool,
    filter: &HotelFilter,
    window: PageWindow,
) -> Result<HotelPage, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let mut select = QueryBuilder::<Sqlite>::new("SELECT * FROM hotels");
    push_predicate(&mut select, filter);
    select
        .push(ORDER_BY)
        .push(" LIMIT ")
        .push_bind(i64::from(window.limit))
        .push(" OFFSET ")
        .push_bind(i64::try_from(window.offset).unwrap_or(i64::MAX));
    let mut hotels = select
        .build_query_as::<Hotel>()
        .fetch_all(&mut *tx)
        .await?;

    let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM hotels");
    push_predicate(&mut count, filter);
    let total_count = count
        .build_query_scalar::<i64>()
        .fetch_one(&mut *tx)
        .await?;

    attach_rooms(&mut tx, &mut hotels).await?;
    tx.commit().await?;

    Ok(HotelPage {
        hotels,
        total_count,
    })
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Hotel>, sqlx::Error> {
    let mut conn = pool.acquire().await?;
    let hotel = sqlx::query_as::<_, Hotel>("SELECT * FROM hotels WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    match hotel {
        Some(hotel) => {
            let mut hotels = vec![hotel];
            attach_rooms(&mut conn, &mut hotels).await?;
            Ok(hotels.pop())
        }
        None => Ok(None),
    }
}

pub async fn insert(pool: &SqlitePool, hotel: &ValidHotel) -> Result<Hotel, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let photos = hotel.photos.for_create();

    sqlx::query(
        r#"
        INSERT INTO hotels (id, name, name_folded, description, location, address, rating, price_per_night, photos)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&hotel.name)
    .bind(fold_name(&hotel.name))
    .bind(&hotel.description)
    .bind(&hotel.location)
    .bind(&hotel.address)
    .bind(hotel.rating)
    .bind(hotel.price_per_night)
    .bind(Json(&photos))
    .execute(pool)
    .await?;

    find_by_id(pool, &id).await?.ok_or(sqlx::Error::RowNotFound)
}

/// Rewrites the editable columns of `id`. Returns `None` when no such hotel
/// exists; `id` and `created_at` are never touched.
pub async fn update(
    pool: &SqlitePool,
    id: &str,
    hotel: &ValidHotel,
) -> Result<Option<Hotel>, sqlx::Error> {
    let photos = match &hotel.photos {
        PhotoUpdate::Keep => None,
        PhotoUpdate::Replace(photos) => Some(Json(photos)),
    };

    let result = sqlx::query(
        r#"
        UPDATE hotels
        SET name = ?, name_folded = ?, description = ?, location = ?, address = ?,
            rating = ?, price_per_night = ?, photos = COALESCE(?, photos)
        WHERE id = ?
        "#,
    )
    .bind(&hotel.name)
    .bind(fold_name(&hotel.name))
    .bind(&hotel.description)
    .bind(&hotel.location)
    .bind(&hotel.address)
    .bind(hotel.rating)
    .bind(hotel.price_per_night)
    .bind(photos)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    find_by_id(pool, id).await
}

async fn attach_rooms(conn: &mut SqliteConnection, hotels: &mut [Hotel]) -> Result<(), sqlx::Error> {
    if hotels.is_empty() {
        return Ok(());
    }

    let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM rooms WHERE hotel_id IN (");
    let mut ids = builder.separated(", ");
    for hotel in hotels.iter() {
        ids.push_bind(hotel.id.clone());
    }
    ids.push_unseparated(") ORDER BY name, id");

    let rooms = builder.build_query_as::<Room>().fetch_all(&mut *conn).await?;

    let mut by_hotel: HashMap<String, Vec<Room>> = HashMap::new();
    for room in rooms {
        by_hotel.entry(room.hotel_id.clone()).or_default().push(room);
    }
    for hotel in hotels.iter_mut() {
        hotel.rooms = by_hotel.remove(&hotel.id).unwrap_or_default();
    }

    Ok(())
}

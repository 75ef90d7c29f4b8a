use sqlx::SqlitePool;

use crate::db::hotels;
use crate::error::HotelResult;
use crate::models::hotel::HotelPage;
use crate::query::{compile, HotelQuery};

/// Compiles the raw query and reads the matching page. Store failures surface
/// as `StoreUnavailable`.
pub async fn list_hotels(pool: &SqlitePool, query: &HotelQuery) -> HotelResult<HotelPage> {
    let compiled = compile(query);
    log::debug!(
        "listing hotels: filter={:?} page={} offset={}",
        compiled.filter,
        compiled.window.page,
        compiled.window.offset
    );

    let page = hotels::fetch_page(pool, &compiled.filter, compiled.window).await?;
    Ok(page)
}

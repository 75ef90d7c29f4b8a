use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::db::hotels;
use crate::error::HotelError;
use crate::models::hotel::HotelPayload;
use crate::query::HotelQuery;
use crate::services;

fn logged(tag: &str, err: HotelError) -> HotelError {
    match &err {
        HotelError::StoreUnavailable(source) => log::error!("[{tag}] {source}"),
        other => log::warn!("[{tag}] {other}"),
    }
    err
}

pub async fn get_hotels(
    pool: web::Data<SqlitePool>,
    params: web::Query<HotelQuery>,
) -> Result<HttpResponse, HotelError> {
    let page = services::list_hotels(pool.get_ref(), &params)
        .await
        .map_err(|err| logged("HOTEL_GET", err))?;

    Ok(HttpResponse::Ok().json(page))
}

pub async fn get_hotel_by_id(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
) -> Result<HttpResponse, HotelError> {
    let id = path.into_inner();

    match hotels::find_by_id(pool.get_ref(), &id).await {
        Ok(Some(hotel)) => Ok(HttpResponse::Ok().json(hotel)),
        Ok(None) => Err(HotelError::NotFound(id)),
        Err(err) => Err(logged("HOTEL_GET", err.into())),
    }
}

pub async fn create_hotel(
    pool: web::Data<SqlitePool>,
    body: web::Json<HotelPayload>,
) -> Result<HttpResponse, HotelError> {
    let hotel = services::create_hotel(pool.get_ref(), &body)
        .await
        .map_err(|err| logged("HOTEL_POST", err))?;

    Ok(HttpResponse::Created().json(hotel))
}

pub async fn update_hotel(
    pool: web::Data<SqlitePool>,
    body: web::Json<HotelPayload>,
) -> Result<HttpResponse, HotelError> {
    let hotel = services::update_hotel(pool.get_ref(), &body)
        .await
        .map_err(|err| logged("HOTEL_PUT", err))?;

    Ok(HttpResponse::Ok().json(hotel))
}

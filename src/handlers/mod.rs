use actix_web::web;

pub mod hotels;

/// Mounts the hotel routes under `/api/hotels`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/hotels")
            .route("", web::get().to(hotels::get_hotels))
            .route("", web::post().to(hotels::create_hotel))
            .route("", web::put().to(hotels::update_hotel))
            .route("/{id}", web::get().to(hotels::get_hotel_by_id)),
    );
}

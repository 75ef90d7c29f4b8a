use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use std::io;

use hotel_directory::config::AppConfig;
use hotel_directory::{db, handlers};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

    log::info!("Connecting to database...");
    let pool = db::get_db_pool(&config).await.map_err(io::Error::other)?;

    log::info!("Running migrations...");
    db::run_migrations(&pool).await.map_err(io::Error::other)?;

    log::info!("Starting server at http://{}", config.bind_addr);

    let pool_data = web::Data::new(pool);

    HttpServer::new(move || {
        App::new()
            .app_data(pool_data.clone())
            .wrap(middleware::Logger::default())
            .configure(handlers::configure)
    })
    .bind(config.bind_addr)?
    .run()
    .await
}

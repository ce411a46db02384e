use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use auction_desk::config::Config;
use auction_desk::web::app::{configure_app, init_app_state};
use log::info;
use std::io::{Error, ErrorKind};

// Main application
pub async fn run_app(config: Config) -> std::io::Result<()> {
    let app_state = init_app_state(&config).map_err(|e| Error::new(ErrorKind::Other, e))?;

    info!("Starting server on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(Logger::default())
            .configure(configure_app)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| Error::new(ErrorKind::InvalidInput, e))?;
    run_app(config).await
}

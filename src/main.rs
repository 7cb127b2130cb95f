use std::io;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use log::info;

use tickbox::{config::Config, routes, AppState};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    info!("loaded configuration: {:?}", config);

    // One state for all workers; the stores live as long as the process.
    let state = web::Data::new(AppState::from_config(&config));

    info!("Starting tickbox server at {}", config.server_url());
    HttpServer::new(move || {
        let tokens = state.tokens.clone();
        App::new()
            .app_data(state.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::new(routes::LOG_FORMAT))
            .service(routes::info::health)
            .service(routes::info::home)
            .service(web::scope("/api/v1").configure(move |cfg| routes::config(cfg, tokens)))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}

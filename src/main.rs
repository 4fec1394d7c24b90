use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};

use quizgen_server::{
    app_state::AppState,
    config::Config,
    handlers::{configure_routes, json_config},
    middleware::{RequestIdMiddleware, REQUEST_ID_HEADER},
};

fn cors(origins: &[String]) -> Cors {
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers(vec![REQUEST_ID_HEADER])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    let bind_address = (config.web_server_host.clone(), config.web_server_port);

    let state = AppState::new(config)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    log::info!(
        "Starting HTTP server on {}:{} with {:?} storage",
        bind_address.0,
        bind_address.1,
        state.config.storage_backend
    );

    HttpServer::new(move || {
        let upload_limit = state.config.max_upload_bytes;

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(json_config(upload_limit))
            .wrap(cors(&state.config.cors_allowed_origins))
            .wrap(Logger::default())
            .wrap(RequestIdMiddleware)
            .configure(configure_routes)
    })
    .bind(bind_address)?
    .run()
    .await
}

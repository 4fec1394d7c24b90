pub mod document_handler;
pub mod health_handler;
pub mod quiz_handler;

use actix_web::web;

use crate::errors::AppError;

pub use document_handler::process_pdf;
pub use health_handler::health_check;
pub use quiz_handler::{generate_quiz, get_quiz, submit_quiz};

/// Mounts every endpoint under `/api`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health_check)
            .service(generate_quiz)
            .service(get_quiz)
            .service(submit_quiz)
            .service(process_pdf),
    );
}

/// Malformed JSON bodies become validation errors with the usual error body.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            AppError::ValidationError(format!("Invalid request body: {}", err)).into()
        })
}

//! CORS middleware configuration for cross-origin requests.
//!
//! Development accepts any origin. Elsewhere only the origins listed in
//! `CORS_ALLOWED_ORIGINS` are accepted.

use actix_cors::Cors;
use actix_web::http::{header, Method};

use otp_shared::config::CorsConfig;

/// Creates a CORS middleware instance from configuration.
pub fn create_cors(config: &CorsConfig) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-request-id"),
        ])
        // Clients read these after a rejected generate or verify
        .expose_headers(vec![
            header::RETRY_AFTER,
            header::HeaderName::from_static("x-request-id"),
            header::HeaderName::from_static("x-remaining-attempts"),
        ])
        .max_age(config.max_age);

    if config.allows_any_origin() {
        tracing::info!("Configuring permissive CORS");
        return cors.allow_any_origin();
    }

    config
        .allowed_origins
        .iter()
        .fold(cors, |cors, origin| {
            tracing::info!(origin = %origin, "Adding allowed origin");
            cors.allowed_origin(origin)
        })
}

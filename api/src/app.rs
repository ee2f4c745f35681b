//! Application state and factory
//!
//! This module holds the state shared by all workers and builds the
//! Actix-web application around it.

use std::sync::Arc;

use actix_web::{web, App, HttpResponse};
use tracing_actix_web::TracingLogger;

use otp_core::services::otp::{CodeNotifier, OtpService, TransactionLookup};
use otp_shared::config::CorsConfig;
use otp_shared::{error_codes, ErrorResponse};

use crate::handlers::json_error_handler;
use crate::middleware::create_cors;
use crate::routes::health::health_check;
use crate::routes::otp::{generate_otp, resend_otp, verify_otp};

/// Application state that holds shared services
pub struct AppState<L: TransactionLookup, N: CodeNotifier> {
    pub otp_service: Arc<OtpService<L, N>>,
}

impl<L: TransactionLookup, N: CodeNotifier> AppState<L, N> {
    pub fn new(otp_service: Arc<OtpService<L, N>>) -> Self {
        Self { otp_service }
    }
}

/// Register routes and extractor configuration
pub fn configure<L, N>(cfg: &mut web::ServiceConfig)
where
    L: TransactionLookup + 'static,
    N: CodeNotifier + 'static,
{
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/health", web::get().to(health_check::<L, N>))
        .service(
            web::scope("/otp")
                .route("/generate", web::post().to(generate_otp::<L, N>))
                .route("/verify", web::post().to(verify_otp::<L, N>))
                .route("/resend", web::post().to(resend_otp::<L, N>)),
        );
}

/// Create and configure the application with all dependencies
pub fn create_app<L, N>(
    app_state: web::Data<AppState<L, N>>,
    cors: &CorsConfig,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    L: TransactionLookup + 'static,
    N: CodeNotifier + 'static,
{
    App::new()
        .app_data(app_state)
        // The last middleware registered runs first, so request spans cover CORS rejections
        .wrap(create_cors(cors))
        .wrap(TracingLogger::default())
        .configure(configure::<L, N>)
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}

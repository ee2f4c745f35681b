use actix_web::{web, HttpResponse};
use chrono::Utc;

use otp_core::services::otp::{CodeNotifier, TransactionLookup};
use otp_shared::{HealthResponse, HealthStatus};

use crate::app::AppState;

/// Handler for GET /health
pub async fn health_check<L, N>(state: web::Data<AppState<L, N>>) -> HttpResponse
where
    L: TransactionLookup + 'static,
    N: CodeNotifier + 'static,
{
    HttpResponse::Ok().json(HealthResponse {
        status: HealthStatus::Healthy,
        service: "txotp".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        active_otps: state.otp_service.store().len(),
        timestamp: Utc::now(),
    })
}

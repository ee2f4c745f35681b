use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use otp_core::domain::entities::TransactionId;
use otp_core::services::otp::{CodeNotifier, TransactionLookup};
use otp_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::{GenerateOtpData, GenerateOtpRequest};
use crate::handlers::{handle_domain_error, validation_error_response};

use super::request_id;

/// Handler for POST /otp/resend
///
/// Discards any existing code for the transaction, whatever its state, and
/// delivers a fresh one. Same request and response shape as `/otp/generate`.
pub async fn resend_otp<L, N>(
    req: HttpRequest,
    state: web::Data<AppState<L, N>>,
    request: web::Json<GenerateOtpRequest>,
) -> HttpResponse
where
    L: TransactionLookup + 'static,
    N: CodeNotifier + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(errors);
    }

    let transaction_id = match TransactionId::new(request.transaction_id) {
        Ok(id) => id,
        Err(error) => return handle_domain_error(error),
    };

    match state.otp_service.resend(transaction_id).await {
        Ok(result) => {
            let mut response = ApiResponse::success("OTP resent", GenerateOtpData::from(result));
            if let Some(id) = request_id(&req) {
                response = response.with_request_id(id);
            }
            HttpResponse::Ok().json(response)
        }
        Err(error) => handle_domain_error(error),
    }
}

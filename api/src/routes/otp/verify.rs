use actix_web::{web, HttpResponse};
use validator::Validate;

use otp_core::domain::entities::TransactionId;
use otp_core::services::otp::{CodeNotifier, TransactionLookup};

use crate::app::AppState;
use crate::dto::{VerifyOtpRequest, VerifyOtpResponse};
use crate::handlers::{handle_domain_error, validation_error_response};

/// Handler for POST /otp/verify
///
/// # Request Body
///
/// ```json
/// { "transaction_id": 42, "otp_code": "123456" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "success": true,
///     "verified": true,
///     "message": "OTP verified",
///     "remaining_attempts": null
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: wrong code (`X-Remaining-Attempts` is set), code
///   already used, or invalid body
/// - 410 Gone: no live code for the transaction
/// - 429 Too Many Requests: attempt limit reached; the code is discarded
pub async fn verify_otp<L, N>(
    state: web::Data<AppState<L, N>>,
    request: web::Json<VerifyOtpRequest>,
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

    match state.otp_service.verify(transaction_id, &request.otp_code) {
        Ok(_) => HttpResponse::Ok().json(VerifyOtpResponse::verified()),
        Err(error) => handle_domain_error(error),
    }
}

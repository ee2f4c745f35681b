use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use otp_core::domain::entities::TransactionId;
use otp_core::services::otp::{CodeNotifier, TransactionLookup};
use otp_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::{GenerateOtpData, GenerateOtpRequest};
use crate::handlers::{handle_domain_error, validation_error_response};

use super::request_id;

/// Handler for POST /otp/generate
///
/// Issues a code for the transaction and delivers it to the customer.
///
/// # Request Body
///
/// ```json
/// { "transaction_id": 42 }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "success": true,
///     "message": "OTP generated",
///     "data": {
///         "transaction_id": 42,
///         "expires_in_seconds": 300,
///         "recipient": "a****@bank.com"
///     }
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: a code is already pending (`Retry-After` is set),
///   the transaction is not eligible, or the body is invalid
/// - 503 Service Unavailable: the code could not be delivered
pub async fn generate_otp<L, N>(
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

    match state.otp_service.generate(transaction_id).await {
        Ok(result) => {
            let mut response = ApiResponse::success("OTP generated", GenerateOtpData::from(result));
            if let Some(id) = request_id(&req) {
                response = response.with_request_id(id);
            }
            HttpResponse::Ok().json(response)
        }
        Err(error) => handle_domain_error(error),
    }
}

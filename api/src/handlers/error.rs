use actix_web::{
    error::{InternalError, JsonPayloadError},
    http::{header, StatusCode},
    HttpRequest, HttpResponse, HttpResponseBuilder,
};
use validator::ValidationErrors;

use otp_core::errors::{DomainError, OtpError};
use otp_shared::{error_codes, ErrorResponse};

/// Header carrying the attempts left after a wrong code
pub const REMAINING_ATTEMPTS_HEADER: &str = "X-Remaining-Attempts";

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    let code = error.code();

    match error {
        DomainError::Otp(otp_error) => handle_otp_error(otp_error),
        DomainError::Validation { message } => {
            tracing::debug!(error_code = code, %message, "Rejected invalid request");
            HttpResponse::BadRequest().json(ErrorResponse::new(code, message))
        }
        DomainError::TransactionNotEligible { reason } => {
            tracing::info!(error_code = code, %reason, "Transaction not eligible for OTP");
            HttpResponse::BadRequest().json(ErrorResponse::new(code, reason))
        }
        DomainError::Delivery { message } => {
            tracing::error!(error_code = code, %message, "OTP delivery failed");
            HttpResponse::ServiceUnavailable().json(ErrorResponse::new(
                code,
                "Could not deliver the OTP. Please try again",
            ))
        }
        DomainError::Internal { message } => {
            tracing::error!(error_code = code, %message, "Internal error");
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new(code, "An internal error occurred"))
        }
    }
}

fn handle_otp_error(error: OtpError) -> HttpResponse {
    let code = error.code();

    match error {
        OtpError::AlreadyPending { remaining_seconds } => HttpResponse::BadRequest()
            .insert_header((header::RETRY_AFTER, remaining_seconds.to_string()))
            .json(
                ErrorResponse::new(code, error.to_string())
                    .add_detail("remaining_seconds", remaining_seconds),
            ),
        OtpError::NotFoundOrExpired => {
            HttpResponse::Gone().json(ErrorResponse::new(code, "OTP expired or invalid"))
        }
        OtpError::AttemptsExhausted => {
            HttpResponse::TooManyRequests().json(ErrorResponse::new(code, "Too many attempts"))
        }
        OtpError::InvalidCode { remaining_attempts } => HttpResponse::BadRequest()
            .insert_header((REMAINING_ATTEMPTS_HEADER, remaining_attempts.to_string()))
            .json(
                ErrorResponse::new(code, error.to_string())
                    .add_detail("remaining_attempts", remaining_attempts),
            ),
        OtpError::AlreadyUsed => {
            HttpResponse::BadRequest().json(ErrorResponse::new(code, error.to_string()))
        }
    }
}

/// Response for request bodies that fail `validator` rules
pub fn validation_error_response(errors: ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(
        ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request data")
            .add_detail("validation_errors", &errors),
    )
}

/// Error handler for malformed JSON bodies, registered via `web::JsonConfig`
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponseBuilder::new(StatusCode::BAD_REQUEST).json(ErrorResponse::new(
        error_codes::VALIDATION_ERROR,
        format!("Invalid request body: {}", err),
    ));
    InternalError::from_response(err, response).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_json(response: HttpResponse) -> serde_json::Value {
        let bytes = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn test_already_pending_sets_retry_after() {
        let response = handle_domain_error(OtpError::AlreadyPending { remaining_seconds: 42 }.into());
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "42");

        let body = body_json(response).await;
        assert_eq!(body["error"], error_codes::OTP_ALREADY_PENDING);
        assert_eq!(body["message"], "Wait 42s");
    }

    #[actix_web::test]
    async fn test_invalid_code_sets_remaining_attempts() {
        let response = handle_domain_error(OtpError::InvalidCode { remaining_attempts: 3 }.into());
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(REMAINING_ATTEMPTS_HEADER).unwrap(),
            "3"
        );

        let body = body_json(response).await;
        assert_eq!(body["details"]["remaining_attempts"], 3);
    }

    #[test]
    fn test_status_codes() {
        let cases: Vec<(DomainError, StatusCode)> = vec![
            (OtpError::NotFoundOrExpired.into(), StatusCode::GONE),
            (OtpError::AttemptsExhausted.into(), StatusCode::TOO_MANY_REQUESTS),
            (OtpError::AlreadyUsed.into(), StatusCode::BAD_REQUEST),
            (
                DomainError::Validation { message: "bad".to_string() },
                StatusCode::BAD_REQUEST,
            ),
            (
                DomainError::TransactionNotEligible { reason: "closed".to_string() },
                StatusCode::BAD_REQUEST,
            ),
            (
                DomainError::Delivery { message: "smtp".to_string() },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                DomainError::Internal { message: "boom".to_string() },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(handle_domain_error(error).status(), expected);
        }
    }

    #[actix_web::test]
    async fn test_internal_error_hides_details() {
        let response = handle_domain_error(DomainError::Internal {
            message: "connection refused to 10.0.0.3".to_string(),
        });
        let body = body_json(response).await;
        assert_eq!(body["message"], "An internal error occurred");
    }
}

use serde::{Deserialize, Serialize};
use validator::Validate;

use otp_core::services::otp::GenerateResult;

/// Body of `POST /otp/generate` and `POST /otp/resend`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerateOtpRequest {
    #[validate(range(min = 1, message = "transaction_id must be positive"))]
    pub transaction_id: i64,
}

/// Body of `POST /otp/verify`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(range(min = 1, message = "transaction_id must be positive"))]
    pub transaction_id: i64,
    #[validate(length(equal = 6, message = "otp_code must be exactly 6 characters"))]
    pub otp_code: String,
}

/// Payload returned when a code has been issued
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOtpData {
    pub transaction_id: i64,
    pub expires_in_seconds: u64,
    /// Masked delivery address
    pub recipient: String,
}

impl From<GenerateResult> for GenerateOtpData {
    fn from(result: GenerateResult) -> Self {
        Self {
            transaction_id: result.transaction_id.get(),
            expires_in_seconds: result.expires_in_seconds,
            recipient: result.recipient_masked,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpResponse {
    pub success: bool,
    pub verified: bool,
    pub message: String,
    pub remaining_attempts: Option<u32>,
}

impl VerifyOtpResponse {
    pub fn verified() -> Self {
        Self {
            success: true,
            verified: true,
            message: "OTP verified".to_string(),
            remaining_attempts: None,
        }
    }
}

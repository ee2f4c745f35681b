//! OTP lifecycle outcomes that are reported back to the caller
//!
//! Every variant here is an expected, recoverable condition that the end user can
//! act on (wait, retry, request a new code). Infrastructure failures never appear
//! in this enum; they travel as [`super::DomainError`] instead.

use otp_shared::error_codes;
use thiserror::Error;

/// Failure outcomes of the OTP store operations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpError {
    /// A live code already exists for the transaction
    #[error("Wait {remaining_seconds}s")]
    AlreadyPending { remaining_seconds: u64 },

    /// No code exists, or it has expired; the two cases are deliberately identical
    #[error("OTP not found or expired")]
    NotFoundOrExpired,

    /// The code was already verified successfully
    #[error("OTP already used")]
    AlreadyUsed,

    /// All attempts were spent; the code has been discarded
    #[error("Max attempts exceeded")]
    AttemptsExhausted,

    /// The submitted code did not match
    #[error("Invalid OTP")]
    InvalidCode { remaining_attempts: u32 },
}

impl OtpError {
    /// Stable error code for API clients
    pub fn code(&self) -> &'static str {
        match self {
            OtpError::AlreadyPending { .. } => error_codes::OTP_ALREADY_PENDING,
            OtpError::NotFoundOrExpired => error_codes::OTP_EXPIRED,
            OtpError::AlreadyUsed => error_codes::OTP_ALREADY_USED,
            OtpError::AttemptsExhausted => error_codes::OTP_ATTEMPTS_EXHAUSTED,
            OtpError::InvalidCode { .. } => error_codes::OTP_INVALID,
        }
    }
}

/// Result of an OTP store operation
pub type OtpResult<T> = Result<T, OtpError>;

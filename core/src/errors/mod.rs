//! Domain-specific error types and error handling.

mod types;


pub use types::{OtpError, OtpResult};

use otp_shared::error_codes;
use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Transaction not eligible for OTP: {reason}")]
    TransactionNotEligible { reason: String },

    #[error("Code delivery failed: {message}")]
    Delivery { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to the OTP lifecycle outcomes
    #[error(transparent)]
    Otp(#[from] OtpError),
}

impl DomainError {
    /// Stable error code for API clients
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => error_codes::VALIDATION_ERROR,
            DomainError::TransactionNotEligible { .. } => error_codes::TRANSACTION_NOT_ELIGIBLE,
            DomainError::Delivery { .. } => error_codes::DELIVERY_FAILED,
            DomainError::Internal { .. } => error_codes::INTERNAL_ERROR,
            DomainError::Otp(otp) => otp.code(),
        }
    }

    /// The OTP outcome carried by this error, if any
    pub fn as_otp(&self) -> Option<&OtpError> {
        match self {
            DomainError::Otp(otp) => Some(otp),
            _ => None,
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

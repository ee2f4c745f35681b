//! Types for OTP store and service results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use otp_shared::utils::is_valid_email;

use crate::domain::entities::TransactionId;
use crate::errors::{DomainError, DomainResult};

/// Recipient used when the transaction service cannot provide one
pub const FALLBACK_RECIPIENT_EMAIL: &str = "user@example.com";

/// Name used when the transaction service cannot provide one
pub const FALLBACK_RECIPIENT_NAME: &str = "Customer";

/// Transaction statuses for which a code may be issued
pub const ELIGIBLE_STATUSES: [&str; 2] = ["PENDING", "INITIATED"];

/// A freshly issued code, returned by `generate` and `resend`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedOtp {
    /// Transaction the code is bound to
    pub transaction_id: TransactionId,
    /// The passcode to deliver
    pub code: String,
    /// Configured lifetime in seconds
    pub expires_in_seconds: u64,
    /// Absolute expiry time
    pub expires_at: DateTime<Utc>,
}

/// A successful verification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedOtp {
    /// Transaction that was confirmed
    pub transaction_id: TransactionId,
    /// When the code was accepted
    pub verified_at: DateTime<Utc>,
    /// Attempts consumed, including the successful one
    pub attempts_used: u32,
}

/// Read-only view of a transaction's OTP state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OtpStatus {
    /// Whether a live record exists
    pub exists: bool,
    /// Whether the live record has been verified
    pub verified: bool,
    /// Seconds until expiry (0 when absent)
    pub remaining_seconds: u64,
    /// Attempts consumed so far (0 when absent)
    pub attempts_used: u32,
}

/// Transaction details as reported by the transaction service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDetails {
    /// Transaction identifier
    pub transaction_id: Option<i64>,
    /// Customer email address
    #[serde(default)]
    pub customer_email: Option<String>,
    /// Customer display name
    #[serde(default)]
    pub customer_name: Option<String>,
    /// Transaction status, e.g. `PENDING`
    #[serde(default)]
    pub status: Option<String>,
}

impl TransactionDetails {
    /// Check that an OTP may be issued for this transaction
    ///
    /// Requires an identifier, a customer email, a customer name, and a status
    /// of `PENDING` or `INITIATED` (case-insensitive).
    pub fn ensure_eligible(&self) -> DomainResult<()> {
        fn missing(value: &Option<String>) -> bool {
            value.as_deref().map_or(true, |v| v.trim().is_empty())
        }

        let reason = if self.transaction_id.is_none() {
            Some("Transaction ID is required".to_string())
        } else if missing(&self.customer_email) {
            Some("Customer email is required".to_string())
        } else if !self.customer_email.as_deref().is_some_and(is_valid_email) {
            Some("Customer email is not a valid address".to_string())
        } else if missing(&self.customer_name) {
            Some("Customer name is required".to_string())
        } else {
            let status = self.status.as_deref().unwrap_or_default().to_uppercase();
            if ELIGIBLE_STATUSES.contains(&status.as_str()) {
                None
            } else {
                Some(format!("Transaction status \"{}\" is not eligible for OTP", status))
            }
        };

        match reason {
            Some(reason) => Err(DomainError::TransactionNotEligible { reason }),
            None => Ok(()),
        }
    }
}

/// Who receives the code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    /// Delivery address
    pub email: String,
    /// Display name used in the message
    pub name: String,
}

impl Recipient {
    /// Placeholder recipient for transactions the lookup could not resolve
    pub fn fallback() -> Self {
        Self {
            email: FALLBACK_RECIPIENT_EMAIL.to_string(),
            name: FALLBACK_RECIPIENT_NAME.to_string(),
        }
    }
}

/// Payload handed to a [`super::CodeNotifier`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OtpDelivery {
    /// Transaction the code confirms
    pub transaction_id: TransactionId,
    /// Delivery address
    pub to: String,
    /// Customer display name
    pub customer_name: String,
    /// The passcode
    pub otp_code: String,
    /// Lifetime of the code in seconds
    pub expires_in_seconds: u64,
}

/// Result of generating or resending a code through the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateResult {
    /// Transaction the code is bound to
    pub transaction_id: TransactionId,
    /// Configured lifetime in seconds
    pub expires_in_seconds: u64,
    /// Masked delivery address, safe to show to the user
    pub recipient_masked: String,
    /// Identifier returned by the notifier
    pub message_id: String,
}

/// Result of a successful verification through the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VerifyResult {
    /// Transaction that was confirmed
    pub transaction_id: TransactionId,
    /// When the code was accepted
    pub verified_at: DateTime<Utc>,
}

impl From<VerifiedOtp> for VerifyResult {
    fn from(verified: VerifiedOtp) -> Self {
        Self {
            transaction_id: verified.transaction_id,
            verified_at: verified.verified_at,
        }
    }
}

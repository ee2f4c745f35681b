//! OTP service orchestrating lookup, issue, delivery and verification

use std::sync::Arc;

use otp_shared::utils::{is_otp_code_format, mask_email};

use crate::domain::entities::TransactionId;
use crate::errors::{DomainError, DomainResult, OtpError};

use super::store::OtpStore;
use super::traits::{CodeNotifier, TransactionLookup};
use super::types::{
    GenerateResult, IssuedOtp, OtpDelivery, OtpStatus, Recipient, VerifyResult,
};

/// Transaction OTP service
pub struct OtpService<L: TransactionLookup, N: CodeNotifier> {
    /// Shared record store
    store: Arc<OtpStore>,
    /// Transaction service client
    lookup: Arc<L>,
    /// Code delivery channel
    notifier: Arc<N>,
}

impl<L: TransactionLookup, N: CodeNotifier> OtpService<L, N> {
    /// Create a new OTP service
    ///
    /// # Arguments
    ///
    /// * `store` - Shared OTP store, also handed to the sweeper
    /// * `lookup` - Transaction lookup implementation
    /// * `notifier` - Code delivery implementation
    pub fn new(store: Arc<OtpStore>, lookup: Arc<L>, notifier: Arc<N>) -> Self {
        Self {
            store,
            lookup,
            notifier,
        }
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<OtpStore> {
        &self.store
    }

    /// Issue and deliver a code for a transaction
    ///
    /// This method:
    /// 1. Refuses early if a live code already exists
    /// 2. Resolves the recipient from the transaction service
    /// 3. Issues the code in the store
    /// 4. Delivers it, revoking the code if delivery fails
    ///
    /// # Errors
    ///
    /// * `AlreadyPending` - A live code exists for the transaction
    /// * `TransactionNotEligible` - The transaction cannot receive a code
    /// * `Delivery` - The notifier failed; no code is left behind
    pub async fn generate(&self, transaction_id: TransactionId) -> DomainResult<GenerateResult> {
        // Saves a lookup round-trip; the store re-checks under its lock
        let status = self.store.status(transaction_id);
        if status.exists {
            return Err(OtpError::AlreadyPending {
                remaining_seconds: status.remaining_seconds,
            }
            .into());
        }

        let recipient = self.resolve_recipient(transaction_id).await?;
        let issued = self.store.generate(transaction_id, &recipient.email)?;
        self.deliver(issued, &recipient).await
    }

    /// Replace any existing code with a fresh one and deliver it
    ///
    /// # Errors
    ///
    /// * `TransactionNotEligible` - The transaction cannot receive a code
    /// * `Delivery` - The notifier failed; the fresh code is revoked
    pub async fn resend(&self, transaction_id: TransactionId) -> DomainResult<GenerateResult> {
        let recipient = self.resolve_recipient(transaction_id).await?;
        let issued = self.store.resend(transaction_id, &recipient.email);
        self.deliver(issued, &recipient).await
    }

    /// Verify a submitted code
    ///
    /// Malformed codes are rejected before they reach the store and do not
    /// consume an attempt.
    pub fn verify(&self, transaction_id: TransactionId, code: &str) -> DomainResult<VerifyResult> {
        if !is_otp_code_format(code) {
            tracing::warn!(
                transaction_id = %transaction_id,
                code_length = code.len(),
                event = "invalid_code_format",
                "Invalid OTP code format provided"
            );
            return Err(DomainError::Validation {
                message: "OTP code must be exactly 6 digits".to_string(),
            });
        }

        let verified = self.store.verify(transaction_id, code)?;
        Ok(verified.into())
    }

    /// Current OTP state of a transaction
    pub fn status(&self, transaction_id: TransactionId) -> OtpStatus {
        self.store.status(transaction_id)
    }

    async fn resolve_recipient(&self, transaction_id: TransactionId) -> DomainResult<Recipient> {
        match self.lookup.fetch_transaction(transaction_id).await {
            Ok(Some(details)) => {
                details.ensure_eligible().map_err(|e| {
                    tracing::warn!(
                        transaction_id = %transaction_id,
                        error = %e,
                        event = "transaction_not_eligible",
                        "Transaction rejected for OTP"
                    );
                    e
                })?;
                Ok(Recipient {
                    email: details.customer_email.unwrap_or_default(),
                    name: details.customer_name.unwrap_or_default(),
                })
            }
            Ok(None) => {
                tracing::warn!(
                    transaction_id = %transaction_id,
                    event = "transaction_not_found",
                    "Transaction unknown to lookup; using fallback recipient"
                );
                Ok(Recipient::fallback())
            }
            Err(e) => {
                tracing::warn!(
                    transaction_id = %transaction_id,
                    error = %e,
                    event = "transaction_lookup_failed",
                    "Transaction lookup failed; using fallback recipient"
                );
                Ok(Recipient::fallback())
            }
        }
    }

    async fn deliver(&self, issued: IssuedOtp, recipient: &Recipient) -> DomainResult<GenerateResult> {
        let delivery = OtpDelivery {
            transaction_id: issued.transaction_id,
            to: recipient.email.clone(),
            customer_name: recipient.name.clone(),
            otp_code: issued.code,
            expires_in_seconds: issued.expires_in_seconds,
        };

        let recipient_masked = mask_email(&recipient.email);

        match self.notifier.send_code(&delivery).await {
            Ok(message_id) => {
                tracing::info!(
                    transaction_id = %issued.transaction_id,
                    recipient = %recipient_masked,
                    message_id = %message_id,
                    event = "otp_delivered",
                    "OTP delivered"
                );
                Ok(GenerateResult {
                    transaction_id: issued.transaction_id,
                    expires_in_seconds: issued.expires_in_seconds,
                    recipient_masked,
                    message_id,
                })
            }
            Err(e) => {
                self.store.revoke(issued.transaction_id, &delivery.otp_code);
                tracing::error!(
                    transaction_id = %issued.transaction_id,
                    recipient = %recipient_masked,
                    error = %e,
                    event = "otp_delivery_failed",
                    "Failed to deliver OTP; code revoked"
                );
                Err(match e {
                    DomainError::Delivery { .. } => e,
                    other => DomainError::Delivery {
                        message: other.to_string(),
                    },
                })
            }
        }
    }
}

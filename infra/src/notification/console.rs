//! Console notifier for development
//!
//! Writes issued codes to the application log instead of sending them. Never
//! enable it where the log is shared.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use otp_core::errors::{DomainError, DomainResult};
use otp_core::services::otp::{CodeNotifier, OtpDelivery};
use otp_shared::mask::mask_email;

/// Logs codes and counts deliveries
#[derive(Clone, Default)]
pub struct ConsoleNotifier {
    /// Number of codes delivered so far
    sent_count: Arc<AtomicU64>,
    /// Whether to simulate failures (for testing)
    simulate_failure: bool,
}

impl ConsoleNotifier {
    /// Create a new console notifier
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a notifier that fails every delivery
    pub fn failing() -> Self {
        Self {
            sent_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: true,
        }
    }

    /// Total number of codes delivered
    pub fn sent_count(&self) -> u64 {
        self.sent_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CodeNotifier for ConsoleNotifier {
    async fn send_code(&self, delivery: &OtpDelivery) -> DomainResult<String> {
        if self.simulate_failure {
            warn!(
                transaction_id = %delivery.transaction_id,
                recipient = %mask_email(&delivery.to),
                "Console notifier simulating failure"
            );
            return Err(DomainError::Delivery {
                message: "Simulated delivery failure".to_string(),
            });
        }

        let message_id = format!("console-{}", Uuid::new_v4());
        self.sent_count.fetch_add(1, Ordering::SeqCst);

        info!(
            transaction_id = %delivery.transaction_id,
            recipient = %mask_email(&delivery.to),
            otp_code = %delivery.otp_code,
            expires_in_seconds = delivery.expires_in_seconds,
            message_id = %message_id,
            event = "otp_console_delivery",
            "OTP for transaction {}: {}",
            delivery.transaction_id,
            delivery.otp_code
        );

        Ok(message_id)
    }
}

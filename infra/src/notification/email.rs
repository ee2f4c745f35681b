//! Email delivery through the email microservice

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error};
use uuid::Uuid;

use otp_core::errors::{DomainError, DomainResult};
use otp_core::services::otp::{CodeNotifier, OtpDelivery};
use otp_shared::config::ServicesConfig;
use otp_shared::mask::mask_email;

use crate::{build_http_client, join_url, InfrastructureError};

#[derive(Debug, Default, Deserialize)]
struct EmailAccepted {
    #[serde(default)]
    message_id: Option<String>,
}

/// Posts codes to `POST {base_url}/email/otp`
#[derive(Debug, Clone)]
pub struct HttpEmailNotifier {
    client: reqwest::Client,
    base_url: String,
}

impl HttpEmailNotifier {
    /// Create a notifier against `base_url` using an existing client
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Create from the services configuration
    pub fn from_config(config: &ServicesConfig) -> Result<Self, InfrastructureError> {
        let client = build_http_client(config.http_timeout_seconds)?;
        Ok(Self::new(client, config.email_url.clone()))
    }

    /// Delivery endpoint
    pub fn endpoint(&self) -> String {
        join_url(&self.base_url, "email/otp")
    }

    async fn post(&self, delivery: &OtpDelivery) -> Result<String, InfrastructureError> {
        let response = self
            .client
            .post(self.endpoint())
            .json(delivery)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(InfrastructureError::UnexpectedStatus {
                service: "email service",
                status: status.as_u16(),
            });
        }

        // The email service may answer with an empty body
        let accepted: EmailAccepted = response.json().await.unwrap_or_default();
        Ok(accepted
            .message_id
            .unwrap_or_else(|| format!("email-{}", Uuid::new_v4())))
    }
}

#[async_trait]
impl CodeNotifier for HttpEmailNotifier {
    async fn send_code(&self, delivery: &OtpDelivery) -> DomainResult<String> {
        let recipient = mask_email(&delivery.to);
        debug!(
            transaction_id = %delivery.transaction_id,
            recipient = %recipient,
            "Posting OTP to email service"
        );

        self.post(delivery).await.map_err(|e| {
            error!(
                transaction_id = %delivery.transaction_id,
                recipient = %recipient,
                error = %e,
                event = "email_delivery_error",
                "Email service request failed"
            );
            DomainError::Delivery {
                message: e.to_string(),
            }
        })
    }
}

//! HTTP client for the transaction service

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use otp_core::domain::entities::TransactionId;
use otp_core::errors::DomainResult;
use otp_core::services::otp::{TransactionDetails, TransactionLookup};
use otp_shared::config::ServicesConfig;

use crate::{build_http_client, join_url, InfrastructureError};

/// The transaction service answers with the transaction itself or wraps it
/// in a `data` envelope
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TransactionBody {
    Enveloped { data: TransactionDetails },
    Bare(TransactionDetails),
}

impl From<TransactionBody> for TransactionDetails {
    fn from(body: TransactionBody) -> Self {
        match body {
            TransactionBody::Enveloped { data } => data,
            TransactionBody::Bare(details) => details,
        }
    }
}

/// Looks transactions up via `GET {base_url}/transactions/{id}`
#[derive(Debug, Clone)]
pub struct HttpTransactionLookup {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransactionLookup {
    /// Create a lookup against `base_url` using an existing client
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Create from the services configuration
    pub fn from_config(config: &ServicesConfig) -> Result<Self, InfrastructureError> {
        let client = build_http_client(config.http_timeout_seconds)?;
        Ok(Self::new(client, config.transaction_url.clone()))
    }

    /// URL of a single transaction
    pub fn transaction_url(&self, id: TransactionId) -> String {
        join_url(&self.base_url, &format!("transactions/{}", id))
    }

    async fn fetch(&self, id: TransactionId) -> Result<Option<TransactionDetails>, InfrastructureError> {
        let url = self.transaction_url(id);
        debug!(transaction_id = %id, url = %url, "Fetching transaction");

        let response = self.client.get(&url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let body: TransactionBody = response.json().await?;
                Ok(Some(body.into()))
            }
            status => Err(InfrastructureError::UnexpectedStatus {
                service: "transaction service",
                status: status.as_u16(),
            }),
        }
    }
}

#[async_trait]
impl TransactionLookup for HttpTransactionLookup {
    async fn fetch_transaction(&self, id: TransactionId) -> DomainResult<Option<TransactionDetails>> {
        self.fetch(id).await.map_err(|e| {
            warn!(
                transaction_id = %id,
                error = %e,
                event = "transaction_lookup_error",
                "Transaction service request failed"
            );
            e.into()
        })
    }
}

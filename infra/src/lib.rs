//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the TxOTP service.
//! It provides concrete implementations of the collaborator traits declared
//! in `otp_core`:
//!
//! - **Transaction**: HTTP client for the transaction service
//! - **Notification**: email delivery over HTTP and a console notifier for
//!   development

use std::time::Duration;

use otp_core::errors::DomainError;

/// Transaction service integration
pub mod transaction;

/// Code delivery channels
pub mod notification;

pub use notification::{create_notifier, ConsoleNotifier, HttpEmailNotifier};
pub use transaction::HttpTransactionLookup;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Unexpected response from an external service
    #[error("Unexpected response from {service}: HTTP {status}")]
    UnexpectedStatus { service: &'static str, status: u16 },

    /// Configuration rejected for the running environment
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        DomainError::Internal {
            message: err.to_string(),
        }
    }
}

/// Build the HTTP client shared by the service integrations
pub fn build_http_client(timeout_seconds: u64) -> Result<reqwest::Client, InfrastructureError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(concat!("txotp/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(InfrastructureError::Http)
}

/// Join a base URL and a path without doubling the slash
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
pub(crate) mod test_server;

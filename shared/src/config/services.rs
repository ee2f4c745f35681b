//! External service configuration (transaction lookup and code delivery)

use serde::{Deserialize, Serialize};

use super::env_or;

/// How issued codes reach the customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    /// Write the code to the application log (development)
    #[default]
    Console,
    /// Post the code to the email service
    Email,
}

impl std::str::FromStr for NotifierKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" | "mock" => Ok(NotifierKind::Console),
            "email" => Ok(NotifierKind::Email),
            _ => Err(format!("Invalid notifier: {}", s)),
        }
    }
}

/// Endpoints of the collaborating microservices
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServicesConfig {
    /// Base URL of the transaction service
    pub transaction_url: String,

    /// Base URL of the email service
    pub email_url: String,

    /// Per-request timeout for outbound calls
    #[serde(default = "default_http_timeout_seconds")]
    pub http_timeout_seconds: u64,

    /// Delivery channel for issued codes
    #[serde(default)]
    pub notifier: NotifierKind,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            transaction_url: String::from("http://127.0.0.1:8000"),
            email_url: String::from("http://127.0.0.1:8003"),
            http_timeout_seconds: default_http_timeout_seconds(),
            notifier: NotifierKind::default(),
        }
    }
}

impl ServicesConfig {
    /// Load from `TRANSACTION_URL`, `EMAIL_URL`, `HTTP_TIMEOUT_SECONDS` and `OTP_NOTIFIER`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            transaction_url: std::env::var("TRANSACTION_URL").unwrap_or(defaults.transaction_url),
            email_url: std::env::var("EMAIL_URL").unwrap_or(defaults.email_url),
            http_timeout_seconds: env_or("HTTP_TIMEOUT_SECONDS", defaults.http_timeout_seconds),
            notifier: env_or("OTP_NOTIFIER", defaults.notifier),
        }
    }
}

fn default_http_timeout_seconds() -> u64 {
    10
}

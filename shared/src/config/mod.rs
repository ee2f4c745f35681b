//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `environment` - Environment detection and logging configuration
//! - `otp` - Code lifetime, attempt limit and sweeper settings
//! - `server` - HTTP server and CORS configuration
//! - `services` - Transaction and email service endpoints

pub mod environment;
pub mod otp;
pub mod server;
pub mod services;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

// Re-export commonly used types
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use otp::OtpConfig;
pub use server::{CorsConfig, ServerConfig};
pub use services::{NotifierKind, ServicesConfig};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// OTP lifecycle configuration
    pub otp: OtpConfig,

    /// External service endpoints
    pub services: ServicesConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            otp: OtpConfig::default(),
            services: ServicesConfig::default(),
            cors: CorsConfig::development(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Callers are expected to have loaded any `.env` file beforehand.
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        let cors = if environment.is_development() {
            CorsConfig::development()
        } else {
            CorsConfig::from_env()
        };

        Self {
            environment,
            server: ServerConfig::from_env(),
            otp: OtpConfig::from_env(),
            services: ServicesConfig::from_env(),
            cors,
            logging: LoggingConfig::for_environment(environment),
        }
    }

    /// Validate the sections that have hard constraints
    pub fn validate(&self) -> Result<(), String> {
        self.otp.validate()
    }
}

/// Read and parse an environment variable, falling back on absence or parse failure
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

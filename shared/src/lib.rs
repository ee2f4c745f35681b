//! Shared utilities and common types for the TxOTP server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Error types and response structures
//! - Utility functions (masking, validation)

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CorsConfig, Environment, LogFormat, LoggingConfig, NotifierKind, OtpConfig,
    ServerConfig, ServicesConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use types::{ApiResponse, HealthResponse, HealthStatus};
pub use utils::{mask, validation};

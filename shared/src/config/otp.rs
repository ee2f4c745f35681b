//! OTP lifecycle configuration

use serde::{Deserialize, Serialize};

use super::env_or;

/// Default lifetime of an issued code (5 minutes)
pub const DEFAULT_TTL_SECONDS: u64 = 300;

/// Default number of verification attempts per code
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default interval between expired-record sweeps
pub const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = 30;

/// Longest lifetime a code may be configured with (one day)
pub const MAX_TTL_SECONDS: u64 = 86_400;

/// Default bound on waiting for the sweeper to stop
pub const DEFAULT_SHUTDOWN_TIMEOUT_MS: u64 = 5_000;

/// Settings for the OTP store and its background sweeper
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Seconds a code stays valid after it is issued
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,

    /// Verification attempts allowed before the code is discarded
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Seconds between sweeps of expired records
    #[serde(default = "default_sweep_interval_seconds")]
    pub sweep_interval_seconds: u64,

    /// Milliseconds to wait for the sweeper to stop on shutdown
    #[serde(default = "default_shutdown_timeout_ms")]
    pub shutdown_timeout_ms: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_TTL_SECONDS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            sweep_interval_seconds: DEFAULT_SWEEP_INTERVAL_SECONDS,
            shutdown_timeout_ms: DEFAULT_SHUTDOWN_TIMEOUT_MS,
        }
    }
}

impl OtpConfig {
    /// Create a configuration with the given TTL and attempt limit
    pub fn new(ttl_seconds: u64, max_attempts: u32) -> Self {
        Self {
            ttl_seconds,
            max_attempts,
            ..Default::default()
        }
    }

    /// Load from `OTP_TTL_SECONDS`, `MAX_OTP_ATTEMPTS`,
    /// `OTP_SWEEP_INTERVAL_SECONDS` and `OTP_SHUTDOWN_TIMEOUT_MS`
    pub fn from_env() -> Self {
        Self {
            ttl_seconds: env_or("OTP_TTL_SECONDS", DEFAULT_TTL_SECONDS),
            max_attempts: env_or("MAX_OTP_ATTEMPTS", DEFAULT_MAX_ATTEMPTS),
            sweep_interval_seconds: env_or(
                "OTP_SWEEP_INTERVAL_SECONDS",
                DEFAULT_SWEEP_INTERVAL_SECONDS,
            ),
            shutdown_timeout_ms: env_or("OTP_SHUTDOWN_TIMEOUT_MS", DEFAULT_SHUTDOWN_TIMEOUT_MS),
        }
    }

    /// Reject values the store cannot work with
    pub fn validate(&self) -> Result<(), String> {
        if self.ttl_seconds == 0 {
            return Err("OTP_TTL_SECONDS must be a positive integer".to_string());
        }
        if self.ttl_seconds > MAX_TTL_SECONDS {
            return Err(format!("OTP_TTL_SECONDS must not exceed {}", MAX_TTL_SECONDS));
        }
        if self.max_attempts == 0 {
            return Err("MAX_OTP_ATTEMPTS must be a positive integer".to_string());
        }
        if self.sweep_interval_seconds == 0 {
            return Err("OTP_SWEEP_INTERVAL_SECONDS must be a positive integer".to_string());
        }
        Ok(())
    }
}

fn default_ttl_seconds() -> u64 {
    DEFAULT_TTL_SECONDS
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_sweep_interval_seconds() -> u64 {
    DEFAULT_SWEEP_INTERVAL_SECONDS
}

fn default_shutdown_timeout_ms() -> u64 {
    DEFAULT_SHUTDOWN_TIMEOUT_MS
}

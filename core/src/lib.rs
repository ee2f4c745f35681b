//! # TxOTP Core
//!
//! Core business logic for the transaction OTP service.
//! This crate contains the OTP record entity, the concurrent in-memory store,
//! the expiry sweeper, the service layer with its collaborator traits,
//! and the error types shared by the infrastructure and API crates.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;

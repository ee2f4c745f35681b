//! Domain layer containing the OTP entity and its identifier.

pub mod entities;

// Re-export commonly used domain types
pub use entities::*;

//! Common utility functions

pub mod mask;
pub mod validation;

// Re-export commonly used utilities
pub use mask::*;
pub use validation::*;

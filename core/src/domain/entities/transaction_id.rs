//! Transaction identifier that scopes one OTP lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// Caller-supplied transaction identifier; always strictly positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct TransactionId(i64);

impl TransactionId {
    /// Create a transaction identifier, rejecting zero and negative values
    pub fn new(value: i64) -> Result<Self, DomainError> {
        if value <= 0 {
            return Err(DomainError::Validation {
                message: format!("transaction_id must be positive, got {}", value),
            });
        }
        Ok(Self(value))
    }

    /// The raw identifier value
    pub fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for TransactionId {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TransactionId> for i64 {
    fn from(id: TransactionId) -> Self {
        id.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

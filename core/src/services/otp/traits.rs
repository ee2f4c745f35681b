//! Traits for transaction lookup and code delivery integration

use async_trait::async_trait;

use crate::domain::entities::TransactionId;
use crate::errors::DomainResult;

use super::types::{OtpDelivery, TransactionDetails};

/// Trait for the transaction service integration
#[async_trait]
pub trait TransactionLookup: Send + Sync {
    /// Fetch a transaction; `Ok(None)` when the service does not know it
    async fn fetch_transaction(&self, id: TransactionId) -> DomainResult<Option<TransactionDetails>>;
}

/// Trait for delivering issued codes to the customer
#[async_trait]
pub trait CodeNotifier: Send + Sync {
    /// Deliver a code, returning the provider's message identifier
    async fn send_code(&self, delivery: &OtpDelivery) -> DomainResult<String>;
}

#[async_trait]
impl<T: CodeNotifier + ?Sized> CodeNotifier for Box<T> {
    async fn send_code(&self, delivery: &OtpDelivery) -> DomainResult<String> {
        (**self).send_code(delivery).await
    }
}

#[async_trait]
impl<T: TransactionLookup + ?Sized> TransactionLookup for Box<T> {
    async fn fetch_transaction(&self, id: TransactionId) -> DomainResult<Option<TransactionDetails>> {
        (**self).fetch_transaction(id).await
    }
}

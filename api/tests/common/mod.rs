//! Shared fixtures for API tests

use actix_web::web;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use otp_api::AppState;
use otp_core::domain::entities::TransactionId;
use otp_core::errors::{DomainError, DomainResult};
use otp_core::services::otp::{
    CodeNotifier, OtpDelivery, OtpService, OtpStore, TransactionDetails, TransactionLookup,
};
use otp_shared::config::OtpConfig;

#[derive(Default)]
pub struct StubLookup {
    pub transactions: HashMap<i64, TransactionDetails>,
}

impl StubLookup {
    pub fn with_status(id: i64, status: &str) -> Self {
        let mut transactions = HashMap::new();
        transactions.insert(
            id,
            TransactionDetails {
                transaction_id: Some(id),
                customer_email: Some("alice@bank.com".to_string()),
                customer_name: Some("Alice".to_string()),
                status: Some(status.to_string()),
            },
        );
        Self { transactions }
    }
}

#[async_trait]
impl TransactionLookup for StubLookup {
    async fn fetch_transaction(&self, id: TransactionId) -> DomainResult<Option<TransactionDetails>> {
        Ok(self.transactions.get(&id.get()).cloned())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub codes: Mutex<HashMap<i64, String>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn code_for(&self, id: i64) -> String {
        self.codes.lock().unwrap().get(&id).cloned().unwrap()
    }
}

#[async_trait]
impl CodeNotifier for RecordingNotifier {
    async fn send_code(&self, delivery: &OtpDelivery) -> DomainResult<String> {
        if self.fail {
            return Err(DomainError::Delivery {
                message: "email service down".to_string(),
            });
        }
        self.codes
            .lock()
            .unwrap()
            .insert(delivery.transaction_id.get(), delivery.otp_code.clone());
        Ok("msg-1".to_string())
    }
}

pub type TestState = AppState<StubLookup, RecordingNotifier>;

pub fn app_state(
    lookup: StubLookup,
    notifier: RecordingNotifier,
) -> (web::Data<TestState>, Arc<RecordingNotifier>) {
    let store = Arc::new(OtpStore::with_system_clock(&OtpConfig::new(300, 5)));
    let notifier = Arc::new(notifier);
    let service = OtpService::new(store, Arc::new(lookup), notifier.clone());
    (web::Data::new(AppState::new(Arc::new(service))), notifier)
}

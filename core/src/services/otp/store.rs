//! In-memory OTP lifecycle store
//!
//! Maps each transaction to at most one OTP record and drives the per-record
//! state machine `ABSENT -> PENDING -> {VERIFIED, EXPIRED, EXHAUSTED}`. Terminal
//! records are dropped, never archived.
//!
//! Every operation runs inside one short, CPU-only critical section over the
//! whole map. `verify` holds it across check, increment and compare so two
//! concurrent attempts can never both pass the attempt limit. Callers only ever
//! receive copies of record data.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

use otp_shared::config::otp::{OtpConfig, MAX_TTL_SECONDS};

use crate::domain::entities::{OtpRecord, TransactionId};
use crate::errors::{OtpError, OtpResult};

use super::clock::{Clock, SystemClock};
use super::types::{IssuedOtp, OtpStatus, VerifiedOtp};

type Records = HashMap<TransactionId, OtpRecord>;

/// Concurrent OTP store shared by all request handlers
pub struct OtpStore {
    records: Mutex<Records>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    ttl_seconds: u64,
    max_attempts: u32,
}

impl OtpStore {
    /// Create a store with an explicit time source
    ///
    /// The TTL is clamped to [`MAX_TTL_SECONDS`].
    pub fn new(config: &OtpConfig, clock: Arc<dyn Clock>) -> Self {
        let ttl_seconds = config.ttl_seconds.min(MAX_TTL_SECONDS);
        Self {
            records: Mutex::new(HashMap::new()),
            clock,
            ttl: Duration::seconds(ttl_seconds as i64),
            ttl_seconds,
            max_attempts: config.max_attempts,
        }
    }

    /// Create a store driven by the wall clock
    pub fn with_system_clock(config: &OtpConfig) -> Self {
        Self::new(config, Arc::new(SystemClock))
    }

    /// Configured code lifetime in seconds
    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Configured attempt limit
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Issue a code for a transaction that has no live record
    ///
    /// # Errors
    ///
    /// [`OtpError::AlreadyPending`] with the seconds left on the live record.
    /// A verified but unexpired record also counts as live.
    pub fn generate(&self, transaction_id: TransactionId, recipient: &str) -> OtpResult<IssuedOtp> {
        let now = self.clock.now();
        let mut records = self.lock();

        if let Some(existing) = records.get(&transaction_id) {
            if !existing.is_expired_at(now) {
                let remaining_seconds = existing.remaining_seconds_at(now);
                drop(records);
                debug!(
                    transaction_id = %transaction_id,
                    remaining_seconds,
                    event = "otp_already_pending",
                    "Refused to issue a second live code"
                );
                return Err(OtpError::AlreadyPending { remaining_seconds });
            }
        }

        let issued = self.issue_locked(&mut records, transaction_id, recipient, now);
        drop(records);

        info!(
            transaction_id = %transaction_id,
            expires_at = %issued.expires_at,
            event = "otp_generated",
            "Issued new OTP"
        );
        Ok(issued)
    }

    /// Verify a submitted code
    ///
    /// Checks run in the order expiry, already used, attempts exhausted, then
    /// the attempt is counted and compared. Expired and exhausted records are
    /// removed as a side effect.
    pub fn verify(&self, transaction_id: TransactionId, submitted: &str) -> OtpResult<VerifiedOtp> {
        let now = self.clock.now();
        let mut records = self.lock();

        let Some(record) = records.get_mut(&transaction_id) else {
            return Err(OtpError::NotFoundOrExpired);
        };

        let outcome = record
            .attempt(submitted, now, self.max_attempts)
            .map(|verified_at| VerifiedOtp {
                transaction_id,
                verified_at,
                attempts_used: record.attempts,
            });

        if matches!(
            outcome,
            Err(OtpError::NotFoundOrExpired) | Err(OtpError::AttemptsExhausted)
        ) {
            records.remove(&transaction_id);
        }
        drop(records);

        match &outcome {
            Ok(verified) => info!(
                transaction_id = %transaction_id,
                attempts_used = verified.attempts_used,
                event = "otp_verified",
                "OTP verified"
            ),
            Err(OtpError::InvalidCode { remaining_attempts }) => warn!(
                transaction_id = %transaction_id,
                remaining_attempts,
                event = "otp_invalid_code",
                "OTP verification failed"
            ),
            Err(OtpError::AttemptsExhausted) => warn!(
                transaction_id = %transaction_id,
                event = "otp_attempts_exhausted",
                "OTP discarded after too many attempts"
            ),
            Err(other) => debug!(
                transaction_id = %transaction_id,
                outcome = %other,
                event = "otp_verify_rejected",
                "OTP verification rejected"
            ),
        }

        outcome
    }

    /// Replace whatever record exists with a fresh code
    ///
    /// Skips the pending check: a verified code is invalidated and a pending
    /// code's cool-down is bypassed. Delete and issue happen in one critical
    /// section, so a concurrent `generate` cannot slip in between.
    pub fn resend(&self, transaction_id: TransactionId, recipient: &str) -> IssuedOtp {
        let now = self.clock.now();
        let mut records = self.lock();
        let replaced = records.remove(&transaction_id).is_some();
        let issued = self.issue_locked(&mut records, transaction_id, recipient, now);
        drop(records);

        info!(
            transaction_id = %transaction_id,
            replaced,
            expires_at = %issued.expires_at,
            event = "otp_resent",
            "Issued replacement OTP"
        );
        issued
    }

    /// Report the current state without consuming an attempt
    ///
    /// An expired record discovered here is removed.
    pub fn status(&self, transaction_id: TransactionId) -> OtpStatus {
        let now = self.clock.now();
        let mut records = self.lock();

        let live = records
            .get(&transaction_id)
            .filter(|record| !record.is_expired_at(now))
            .map(|record| OtpStatus {
                exists: true,
                verified: record.verified,
                remaining_seconds: record.remaining_seconds_at(now),
                attempts_used: record.attempts,
            });

        match live {
            Some(status) => status,
            None => {
                records.remove(&transaction_id);
                OtpStatus::default()
            }
        }
    }

    /// Remove a transaction's record; returns whether one existed
    pub fn delete(&self, transaction_id: TransactionId) -> bool {
        let removed = self.lock().remove(&transaction_id).is_some();
        if removed {
            debug!(transaction_id = %transaction_id, event = "otp_deleted", "OTP deleted");
        }
        removed
    }

    /// Remove a record only if it still holds `code`
    ///
    /// Used to roll back an issue whose delivery failed without clobbering a
    /// newer code issued concurrently.
    pub fn revoke(&self, transaction_id: TransactionId, code: &str) -> bool {
        let mut records = self.lock();
        let matches = records
            .get(&transaction_id)
            .is_some_and(|record| record.code == code);
        if matches {
            records.remove(&transaction_id);
        }
        matches
    }

    /// Copy of the live record, if any
    pub fn snapshot(&self, transaction_id: TransactionId) -> Option<OtpRecord> {
        let now = self.clock.now();
        let mut records = self.lock();
        let live = records
            .get(&transaction_id)
            .filter(|record| !record.is_expired_at(now))
            .cloned();
        if live.is_none() {
            records.remove(&transaction_id);
        }
        live
    }

    /// Drop every expired record; returns how many were removed
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let mut records = self.lock();
        let before = records.len();
        records.retain(|_, record| !record.is_expired_at(now));
        before - records.len()
    }

    /// Number of records currently held, expired or not
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn issue_locked(
        &self,
        records: &mut Records,
        transaction_id: TransactionId,
        recipient: &str,
        now: DateTime<Utc>,
    ) -> IssuedOtp {
        let record = OtpRecord::issue(transaction_id, recipient, now, self.ttl);
        let issued = IssuedOtp {
            transaction_id,
            code: record.code.clone(),
            expires_in_seconds: self.ttl_seconds,
            expires_at: record.expires_at,
        };
        records.insert(transaction_id, record);
        issued
    }

    // No operation can panic half-way through a record update, so the map is
    // consistent even when a panic elsewhere poisoned the lock.
    fn lock(&self) -> MutexGuard<'_, Records> {
        self.records.lock().unwrap_or_else(|poisoned| {
            error!(
                event = "otp_store_lock_poisoned",
                "OTP store lock was poisoned; continuing with recovered state"
            );
            poisoned.into_inner()
        })
    }
}

impl std::fmt::Debug for OtpStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtpStore")
            .field("ttl_seconds", &self.ttl_seconds)
            .field("max_attempts", &self.max_attempts)
            .field("records", &self.len())
            .finish()
    }
}

//! One-time passcode record bound to a single transaction.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};

use otp_shared::utils::OTP_CODE_LENGTH;

use crate::errors::{OtpError, OtpResult};

use super::transaction_id::TransactionId;

/// OTP record owned by the store
///
/// `verified` only ever moves from `false` to `true`, and once it is set the
/// attempt counter is frozen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    /// Transaction this code confirms
    pub transaction_id: TransactionId,

    /// The 6-digit passcode, leading zeros allowed
    pub code: String,

    /// Where the code was sent (email address); display only
    pub recipient: String,

    /// Timestamp when the code was issued
    pub created_at: DateTime<Utc>,

    /// Timestamp after which the code is no longer accepted
    pub expires_at: DateTime<Utc>,

    /// Number of verification attempts made
    pub attempts: u32,

    /// Whether the code has been successfully verified
    pub verified: bool,

    /// Timestamp of the successful verification
    pub verified_at: Option<DateTime<Utc>>,
}

impl OtpRecord {
    /// Issue a fresh record with a random code
    ///
    /// # Arguments
    ///
    /// * `transaction_id` - Transaction the code is bound to
    /// * `recipient` - Address the code is delivered to
    /// * `now` - Issue time
    /// * `ttl` - Lifetime of the code
    pub fn issue(
        transaction_id: TransactionId,
        recipient: impl Into<String>,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            transaction_id,
            code: Self::generate_code(),
            recipient: recipient.into(),
            created_at: now,
            expires_at: now + ttl,
            attempts: 0,
            verified: false,
            verified_at: None,
        }
    }

    /// Generate a 6-digit code from independent uniform digit draws
    ///
    /// Each digit is drawn separately from the OS CSPRNG so every position,
    /// including a leading zero, is equally likely.
    pub fn generate_code() -> String {
        let mut rng = OsRng;
        (0..OTP_CODE_LENGTH)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect()
    }

    /// Checks if the code has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Whole seconds until expiry, floored at zero
    pub fn remaining_seconds_at(&self, now: DateTime<Utc>) -> u64 {
        let remaining = (self.expires_at - now).num_seconds();
        u64::try_from(remaining).unwrap_or(0)
    }

    /// Number of attempts left under `max_attempts`
    pub fn remaining_attempts(&self, max_attempts: u32) -> u32 {
        max_attempts.saturating_sub(self.attempts)
    }

    /// Run one verification attempt against this record
    ///
    /// Checks happen in a fixed order: expiry, already used, attempts exhausted,
    /// then the attempt is counted and the code compared. On
    /// [`OtpError::NotFoundOrExpired`] and [`OtpError::AttemptsExhausted`] the
    /// record is dead and the caller must discard it.
    ///
    /// # Returns
    ///
    /// The verification timestamp on success
    pub fn attempt(
        &mut self,
        submitted: &str,
        now: DateTime<Utc>,
        max_attempts: u32,
    ) -> OtpResult<DateTime<Utc>> {
        if self.is_expired_at(now) {
            return Err(OtpError::NotFoundOrExpired);
        }

        if self.verified {
            return Err(OtpError::AlreadyUsed);
        }

        if self.attempts >= max_attempts {
            return Err(OtpError::AttemptsExhausted);
        }

        self.attempts += 1;

        if Self::codes_match(&self.code, submitted) {
            self.verified = true;
            self.verified_at = Some(now);
            Ok(now)
        } else {
            Err(OtpError::InvalidCode {
                remaining_attempts: self.remaining_attempts(max_attempts),
            })
        }
    }

    /// Exact, case-sensitive comparison that does not short-circuit on content
    fn codes_match(stored: &str, submitted: &str) -> bool {
        if stored.len() != submitted.len() {
            return false;
        }
        constant_time_eq(stored.as_bytes(), submitted.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const MAX: u32 = 5;

    fn record_at(now: DateTime<Utc>) -> OtpRecord {
        OtpRecord::issue(
            TransactionId::new(1).unwrap(),
            "a@b.com",
            now,
            Duration::seconds(300),
        )
    }

    #[test]
    fn test_issue_record() {
        let now = Utc::now();
        let record = record_at(now);

        assert_eq!(record.code.len(), OTP_CODE_LENGTH);
        assert_eq!(record.recipient, "a@b.com");
        assert_eq!(record.attempts, 0);
        assert!(!record.verified);
        assert!(record.verified_at.is_none());
        assert_eq!(record.expires_at, now + Duration::seconds(300));
    }

    #[test]
    fn test_generate_code_format() {
        for _ in 0..200 {
            let code = OtpRecord::generate_code();
            assert_eq!(code.len(), OTP_CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_generated_codes_vary_and_cover_leading_zero() {
        let codes: Vec<String> = (0..2000).map(|_| OtpRecord::generate_code()).collect();
        let unique: HashSet<_> = codes.iter().collect();
        assert!(unique.len() > 1);

        // Roughly 200 expected; zero would mean leading zeros are never produced
        let leading_zeros = codes.iter().filter(|c| c.starts_with('0')).count();
        assert!(leading_zeros > 0);
    }

    #[test]
    fn test_expiry_is_strict() {
        let now = Utc::now();
        let record = record_at(now);

        assert!(!record.is_expired_at(record.expires_at));
        assert!(record.is_expired_at(record.expires_at + Duration::milliseconds(1)));
    }

    #[test]
    fn test_remaining_seconds_floors_at_zero() {
        let now = Utc::now();
        let record = record_at(now);

        assert_eq!(record.remaining_seconds_at(now), 300);
        assert_eq!(record.remaining_seconds_at(now + Duration::milliseconds(1500)), 298);
        assert_eq!(record.remaining_seconds_at(now + Duration::seconds(400)), 0);
    }

    #[test]
    fn test_attempt_success() {
        let now = Utc::now();
        let mut record = record_at(now);
        let code = record.code.clone();

        let verified_at = record.attempt(&code, now, MAX).unwrap();
        assert_eq!(verified_at, now);
        assert!(record.verified);
        assert_eq!(record.verified_at, Some(now));
        assert_eq!(record.attempts, 1);
    }

    #[test]
    fn test_attempt_wrong_code_counts_down() {
        let now = Utc::now();
        let mut record = record_at(now);
        record.code = "482913".to_string();

        for expected in (0..MAX).rev() {
            assert_eq!(
                record.attempt("000000", now, MAX),
                Err(OtpError::InvalidCode {
                    remaining_attempts: expected
                })
            );
        }
        assert_eq!(record.attempts, MAX);
        assert_eq!(
            record.attempt("482913", now, MAX),
            Err(OtpError::AttemptsExhausted)
        );
        assert_eq!(record.attempts, MAX);
    }

    #[test]
    fn test_attempt_on_verified_record_does_not_count() {
        let now = Utc::now();
        let mut record = record_at(now);
        let code = record.code.clone();

        record.attempt(&code, now, MAX).unwrap();
        assert_eq!(record.attempt(&code, now, MAX), Err(OtpError::AlreadyUsed));
        assert_eq!(record.attempt("000000", now, MAX), Err(OtpError::AlreadyUsed));
        assert_eq!(record.attempts, 1);
    }

    #[test]
    fn test_expiry_wins_over_exhaustion() {
        let now = Utc::now();
        let mut record = record_at(now);
        record.attempts = MAX;

        let later = record.expires_at + Duration::seconds(1);
        assert_eq!(
            record.attempt("000000", later, MAX),
            Err(OtpError::NotFoundOrExpired)
        );
    }

    #[test]
    fn test_comparison_is_exact() {
        let now = Utc::now();
        let mut record = record_at(now);
        record.code = "012345".to_string();

        assert!(record.attempt("12345", now, MAX).is_err());
        assert!(record.attempt("0123456", now, MAX).is_err());
        assert!(record.attempt(" 012345", now, MAX).is_err());
        assert_eq!(record.attempt("012345", now, MAX), Ok(now));
    }

    #[test]
    fn test_serialization() {
        let record = record_at(Utc::now());
        let json = serde_json::to_string(&record).unwrap();
        let deserialized: OtpRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, deserialized);
    }
}

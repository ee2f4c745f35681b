//! Unit tests for the OTP store

use chrono::Duration;
use std::sync::{Arc, Barrier};
use std::thread;

use otp_shared::utils::OTP_CODE_LENGTH;
use crate::errors::OtpError;

use super::mocks::{manual_store, tx, wrong_code};

#[test]
fn test_generate_then_verify_success() {
    let (store, _clock) = manual_store(300, 5);

    let issued = store.generate(tx(1), "alice@bank.com").unwrap();
    assert_eq!(issued.code.len(), OTP_CODE_LENGTH);
    assert!(issued.code.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(issued.expires_in_seconds, 300);

    let verified = store.verify(tx(1), &issued.code).unwrap();
    assert_eq!(verified.transaction_id, tx(1));
    assert_eq!(verified.attempts_used, 1);

    let status = store.status(tx(1));
    assert!(status.exists);
    assert!(status.verified);
}

#[test]
fn test_second_generate_is_already_pending() {
    let (store, clock) = manual_store(300, 5);
    store.generate(tx(1), "alice@bank.com").unwrap();

    clock.advance(Duration::seconds(100));
    match store.generate(tx(1), "alice@bank.com") {
        Err(OtpError::AlreadyPending { remaining_seconds }) => {
            assert_eq!(remaining_seconds, 200);
        }
        other => panic!("Expected AlreadyPending, got {:?}", other),
    }
}

#[test]
fn test_generate_allowed_after_expiry() {
    let (store, clock) = manual_store(60, 5);
    let first = store.generate(tx(1), "alice@bank.com").unwrap();

    clock.advance(Duration::seconds(61));
    let second = store.generate(tx(1), "alice@bank.com").unwrap();
    assert!(second.expires_at > first.expires_at);
}

#[test]
fn test_verified_record_blocks_generate_until_expiry() {
    let (store, _clock) = manual_store(300, 5);
    let issued = store.generate(tx(1), "alice@bank.com").unwrap();
    store.verify(tx(1), &issued.code).unwrap();

    assert!(matches!(
        store.generate(tx(1), "alice@bank.com"),
        Err(OtpError::AlreadyPending { .. })
    ));
}

#[test]
fn test_wrong_then_right_then_reuse() {
    let (store, _clock) = manual_store(300, 5);
    let issued = store.generate(tx(1), "alice@bank.com").unwrap();

    assert_eq!(
        store.verify(tx(1), &wrong_code(&issued.code)),
        Err(OtpError::InvalidCode { remaining_attempts: 4 })
    );
    assert!(store.verify(tx(1), &issued.code).is_ok());

    assert_eq!(store.verify(tx(1), &issued.code), Err(OtpError::AlreadyUsed));
    // Reuse does not consume attempts
    assert_eq!(store.snapshot(tx(1)).unwrap().attempts, 2);
}

#[test]
fn test_attempts_exhausted_purges_record() {
    let (store, _clock) = manual_store(300, 5);
    let issued = store.generate(tx(1), "alice@bank.com").unwrap();
    let wrong = wrong_code(&issued.code);

    for expected in [4, 3, 2, 1, 0] {
        assert_eq!(
            store.verify(tx(1), &wrong),
            Err(OtpError::InvalidCode { remaining_attempts: expected })
        );
    }
    // Still present after the last allowed attempt
    assert_eq!(store.snapshot(tx(1)).unwrap().attempts, 5);

    // Even the right code is refused once the limit is reached
    assert_eq!(store.verify(tx(1), &issued.code), Err(OtpError::AttemptsExhausted));
    assert!(store.snapshot(tx(1)).is_none());
    assert_eq!(store.verify(tx(1), &issued.code), Err(OtpError::NotFoundOrExpired));
}

#[test]
fn test_verify_unknown_transaction() {
    let (store, _clock) = manual_store(300, 5);
    assert_eq!(store.verify(tx(42), "123456"), Err(OtpError::NotFoundOrExpired));
}

#[test]
fn test_lazy_expiry_without_sweep() {
    let (store, clock) = manual_store(300, 5);
    let issued = store.generate(tx(1), "alice@bank.com").unwrap();

    clock.advance(Duration::seconds(300));
    // Expiry is strict: the last second is still valid
    assert!(store.status(tx(1)).exists);

    clock.advance(Duration::seconds(1));
    assert_eq!(store.verify(tx(1), &issued.code), Err(OtpError::NotFoundOrExpired));
    assert!(!store.status(tx(1)).exists);
    assert!(store.is_empty());
}

#[test]
fn test_status_purges_expired_record() {
    let (store, clock) = manual_store(30, 5);
    store.generate(tx(1), "alice@bank.com").unwrap();
    assert_eq!(store.len(), 1);

    clock.advance(Duration::seconds(31));
    let status = store.status(tx(1));
    assert!(!status.exists);
    assert_eq!(status.remaining_seconds, 0);
    assert_eq!(store.len(), 0);
}

#[test]
fn test_resend_replaces_in_every_state() {
    let (store, clock) = manual_store(300, 3);

    // Absent
    store.resend(tx(1), "alice@bank.com");
    assert!(store.status(tx(1)).exists);

    // Pending
    let second = store.resend(tx(1), "alice@bank.com");
    assert_eq!(store.snapshot(tx(1)).unwrap().code, second.code);

    // Verified
    store.verify(tx(1), &second.code).unwrap();
    let third = store.resend(tx(1), "alice@bank.com");
    let status = store.status(tx(1));
    assert!(!status.verified);
    assert_eq!(status.attempts_used, 0);

    // Exhausted
    let wrong = wrong_code(&third.code);
    for _ in 0..3 {
        let _ = store.verify(tx(1), &wrong);
    }
    let fourth = store.resend(tx(1), "alice@bank.com");
    assert!(store.verify(tx(1), &fourth.code).is_ok());

    // Expired
    clock.advance(Duration::seconds(301));
    let fifth = store.resend(tx(1), "alice@bank.com");
    assert!(store.verify(tx(1), &fifth.code).is_ok());
}

#[test]
fn test_delete_and_revoke() {
    let (store, _clock) = manual_store(300, 5);
    let issued = store.generate(tx(1), "alice@bank.com").unwrap();

    assert!(!store.revoke(tx(1), &wrong_code(&issued.code)));
    assert!(store.status(tx(1)).exists);
    assert!(store.revoke(tx(1), &issued.code));
    assert!(!store.status(tx(1)).exists);

    store.generate(tx(1), "alice@bank.com").unwrap();
    assert!(store.delete(tx(1)));
    assert!(!store.delete(tx(1)));
}

#[test]
fn test_snapshot_is_a_copy() {
    let (store, _clock) = manual_store(300, 5);
    let issued = store.generate(tx(1), "alice@bank.com").unwrap();

    let mut copy = store.snapshot(tx(1)).unwrap();
    copy.attempts = 99;
    copy.verified = true;

    let fresh = store.snapshot(tx(1)).unwrap();
    assert_eq!(fresh.attempts, 0);
    assert!(!fresh.verified);
    assert_eq!(fresh.recipient, "alice@bank.com");
    assert_eq!(fresh.code, issued.code);
}

#[test]
fn test_sweep_expired_removes_only_expired() {
    let (store, clock) = manual_store(60, 5);
    store.generate(tx(1), "a@bank.com").unwrap();
    store.generate(tx(2), "b@bank.com").unwrap();

    clock.advance(Duration::seconds(45));
    store.generate(tx(3), "c@bank.com").unwrap();

    clock.advance(Duration::seconds(20));
    assert_eq!(store.sweep_expired(), 2);
    assert_eq!(store.len(), 1);
    assert!(store.status(tx(3)).exists);
    assert_eq!(store.sweep_expired(), 0);
}

#[test]
fn test_transactions_are_independent() {
    let (store, _clock) = manual_store(300, 5);
    let one = store.generate(tx(1), "a@bank.com").unwrap();
    let two = store.generate(tx(2), "b@bank.com").unwrap();

    let _ = store.verify(tx(1), &wrong_code(&one.code));
    assert_eq!(store.status(tx(2)).attempts_used, 0);
    assert!(store.verify(tx(2), &two.code).is_ok());
}

#[test]
fn test_concurrent_wrong_verifies_respect_attempt_limit() {
    const THREADS: usize = 16;
    const MAX_ATTEMPTS: u32 = 5;

    let (store, _clock) = manual_store(300, MAX_ATTEMPTS);
    let issued = store.generate(tx(7), "alice@bank.com").unwrap();
    let wrong = wrong_code(&issued.code);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            let wrong = wrong.clone();
            thread::spawn(move || {
                barrier.wait();
                store.verify(tx(7), &wrong)
            })
        })
        .collect();

    let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let invalid = outcomes
        .iter()
        .filter(|o| matches!(o, Err(OtpError::InvalidCode { .. })))
        .count();
    let exhausted = outcomes
        .iter()
        .filter(|o| matches!(o, Err(OtpError::AttemptsExhausted)))
        .count();
    let gone = outcomes
        .iter()
        .filter(|o| matches!(o, Err(OtpError::NotFoundOrExpired)))
        .count();

    assert_eq!(invalid, MAX_ATTEMPTS as usize);
    assert_eq!(exhausted, 1);
    assert_eq!(gone, THREADS - MAX_ATTEMPTS as usize - 1);
    assert!(store.snapshot(tx(7)).is_none());
}

#[test]
fn test_concurrent_wrong_verifies_below_attempt_limit() {
    const THREADS: usize = 3;
    const MAX_ATTEMPTS: u32 = 5;

    let (store, _clock) = manual_store(300, MAX_ATTEMPTS);
    let issued = store.generate(tx(8), "alice@bank.com").unwrap();
    let wrong = wrong_code(&issued.code);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            let wrong = wrong.clone();
            thread::spawn(move || {
                barrier.wait();
                store.verify(tx(8), &wrong)
            })
        })
        .collect();

    let mut remaining: Vec<u32> = handles
        .into_iter()
        .map(|h| match h.join().unwrap() {
            Err(OtpError::InvalidCode { remaining_attempts }) => remaining_attempts,
            other => panic!("Expected InvalidCode, got {:?}", other),
        })
        .collect();
    remaining.sort_unstable();

    assert_eq!(remaining, vec![2, 3, 4]);
    assert_eq!(store.status(tx(8)).attempts_used, THREADS as u32);
    assert!(store.verify(tx(8), &issued.code).is_ok());
}

#[test]
fn test_concurrent_generate_issues_one_code() {
    const THREADS: usize = 8;

    let (store, _clock) = manual_store(300, 5);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                store.generate(tx(3), "alice@bank.com")
            })
        })
        .collect();

    let issued = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|o| o.is_ok())
        .count();
    assert_eq!(issued, 1);
}

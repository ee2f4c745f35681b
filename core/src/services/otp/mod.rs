//! Transaction OTP lifecycle
//!
//! This module provides:
//! - An in-memory store issuing and verifying one code per transaction
//! - A background sweeper that removes expired records
//! - A service that resolves the recipient and delivers codes
//! - A pluggable clock so expiry can be tested without sleeping

mod clock;
mod service;
mod store;
mod sweeper;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use clock::{Clock, ManualClock, SystemClock};
pub use service::OtpService;
pub use store::OtpStore;
pub use sweeper::{OtpSweeper, SweeperHandle};
pub use traits::{CodeNotifier, TransactionLookup};
pub use types::{
    GenerateResult, IssuedOtp, OtpDelivery, OtpStatus, Recipient, TransactionDetails,
    VerifiedOtp, VerifyResult, ELIGIBLE_STATUSES, FALLBACK_RECIPIENT_EMAIL,
    FALLBACK_RECIPIENT_NAME,
};

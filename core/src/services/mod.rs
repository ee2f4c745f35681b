//! Business services containing domain logic and use cases.

pub mod otp;

// Re-export commonly used types
pub use otp::{
    Clock, CodeNotifier, GenerateResult, ManualClock, OtpDelivery, OtpService, OtpStatus,
    OtpStore, OtpSweeper, SweeperHandle, SystemClock, TransactionDetails, TransactionLookup,
    VerifyResult,
};

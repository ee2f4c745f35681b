//! Domain entities representing core business objects.

pub mod otp_record;
pub mod transaction_id;

// Re-export commonly used types
pub use otp_record::OtpRecord;
pub use transaction_id::TransactionId;

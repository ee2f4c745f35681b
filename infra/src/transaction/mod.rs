//! Transaction service integration
//!
//! Fetches transaction details so the OTP service can check eligibility and
//! address the code to the right customer.

pub mod http_lookup;

pub use http_lookup::HttpTransactionLookup;

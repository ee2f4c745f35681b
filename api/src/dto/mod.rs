//! Request and response bodies

pub mod otp;

pub use otp::{GenerateOtpData, GenerateOtpRequest, VerifyOtpRequest, VerifyOtpResponse};

//! Common validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

/// Number of digits in an issued code, shared by issue and input checks
pub const OTP_CODE_LENGTH: usize = 6;

// Pragmatic address check; the email service does the real validation
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").unwrap()
});

/// Check if an email address looks deliverable
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email.trim())
}

/// Check that a submitted code has the shape of an issued one
pub fn is_otp_code_format(code: &str) -> bool {
    code.len() == OTP_CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}

//! OTP route handlers
//!
//! - `POST /otp/generate` issues and delivers a code
//! - `POST /otp/verify` checks a submitted code
//! - `POST /otp/resend` replaces any code with a fresh one

pub mod generate;
pub mod resend;
pub mod verify;

use actix_web::{HttpMessage, HttpRequest};
use tracing_actix_web::RequestId;

pub use generate::generate_otp;
pub use resend::resend_otp;
pub use verify::verify_otp;

/// Request ID assigned by the tracing middleware, if it is installed
pub(crate) fn request_id(req: &HttpRequest) -> Option<String> {
    req.extensions().get::<RequestId>().map(ToString::to_string)
}

//! Code delivery channels
//!
//! - **Email**: production delivery through the email microservice
//! - **Console**: logs the code, for local development

pub mod console;
pub mod email;

pub use console::ConsoleNotifier;
pub use email::HttpEmailNotifier;

use otp_core::services::otp::CodeNotifier;
use otp_shared::config::{Environment, NotifierKind, ServicesConfig};

use crate::InfrastructureError;

#[cfg(test)]
mod tests;

/// Create the notifier selected by `OTP_NOTIFIER`
///
/// The console notifier writes codes to the log, so it is refused in
/// environments where [`Environment::is_debug`] is false.
pub fn create_notifier(
    config: &ServicesConfig,
    environment: Environment,
) -> Result<Box<dyn CodeNotifier>, InfrastructureError> {
    match config.notifier {
        NotifierKind::Email => {
            tracing::info!(email_url = %config.email_url, "Delivering OTPs by email");
            Ok(Box::new(HttpEmailNotifier::from_config(config)?))
        }
        NotifierKind::Console if !environment.is_debug() => Err(InfrastructureError::Config(
            format!("OTP_NOTIFIER=console is not allowed in {}", environment),
        )),
        NotifierKind::Console => {
            tracing::warn!("Delivering OTPs to the console; do not use in production");
            Ok(Box::new(ConsoleNotifier::new()))
        }
    }
}

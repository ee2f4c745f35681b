//! # TxOTP API
//!
//! Actix-web front end for the transaction OTP service. The binary in
//! `main.rs` wires configuration, the shared store, the sweeper and the
//! infrastructure adapters together; everything else lives here so it can be
//! exercised by tests.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use app::{configure, create_app, AppState};

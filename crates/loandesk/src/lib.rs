//! Core library for the loandesk lending console: configuration, telemetry,
//! and the loan origination workflow (pricing engine, booking service, and
//! HTTP router).

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

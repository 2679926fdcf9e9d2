pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod finance;
pub mod response;
pub mod signup;
pub mod telemetry;

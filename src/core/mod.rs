//! Core building blocks shared by every command
//!
//! - **config**: importance override files (nwbinspector.toml)
//! - **error**: error types with contextual help messages and exit codes

pub mod config;
pub mod error;

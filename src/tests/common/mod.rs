//! Common Test Utilities
//!
//! Shared fixtures for campaigns, drafts and HTTP clients pointed at a
//! wiremock server.

pub mod fixtures;

pub use fixtures::*;

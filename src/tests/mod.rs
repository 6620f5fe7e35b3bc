//! Crate-level test suites that span several modules.
//!
//! Unit tests live next to the code in `#[cfg(test)]` modules; this tree
//! holds shared fixtures, proptest properties and wiremock-backed HTTP tests.

mod common;
mod integration;
mod property;

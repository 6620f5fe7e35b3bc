//! Campaign Domain
//!
//! Server-owned campaign records as read by the review desk and search, and
//! the client-side creation wizard that assembles new campaigns.
//!
//! # Lifecycle
//!
//! A campaign is created by the remote API when a wizard draft is submitted
//! and starts out `pending`. An operator on the review desk either approves
//! it (`pending -> active`) or rejects it, which deletes it server-side.
//! Search only ever reads campaigns.

mod types;
pub mod wizard;

pub use types::*;

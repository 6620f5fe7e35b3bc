//! Remote Campaign API
//!
//! The platform's REST API is an external collaborator: it owns campaign
//! storage, moderation state and payment handling. This module holds the
//! request/response contracts, the error taxonomy, and the authentication
//! capability injected into components that call protected endpoints.

mod auth;
mod client;
mod error;
mod models;

pub use auth::*;
pub use client::*;
pub use error::*;
pub use models::*;

/// Fundraiser - campaign creation, review and search client (TUI Edition)
///
/// Core library for the fundraising platform's client side: the campaign
/// creation wizard, the submission gateway, the moderation desk and the
/// incremental campaign search, all talking to the remote campaign API.

pub mod config;
pub mod core;
pub mod tui;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

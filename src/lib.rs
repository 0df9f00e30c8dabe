//! Typed client for the Gerrit projects REST API

pub mod config;
pub mod gerrit;

pub use gerrit::client::GerritClient;
pub use gerrit::http::{format_gerrit_error, ApiError};

//! Gerrit REST API interaction module
//!
//! This module provides a typed client for the Gerrit code-review server's
//! projects REST resource, together with the HTTP transport it runs on.
//!
//! # Module Structure
//!
//! - [`auth`] - HTTP basic credentials and the `/a/` authenticated prefix
//! - [`client`] - Client context: base URL, credentials and transport
//! - [`http`] - HTTP transport, XSSI prefix handling and error formatting
//! - [`query`] - Query string encoding for endpoint options
//! - [`projects`] - Projects, branches, tags, dashboards and configuration
//! - [`types`] - Entities shared between resources
//!
//! # Example
//!
//! ```no_run
//! use gerrit_projects::gerrit::client::GerritClient;
//! use gerrit_projects::gerrit::projects::ProjectOptions;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = GerritClient::new("https://review.example.com", None)?;
//!     let options = ProjectOptions {
//!         prefix: Some("plugins/".to_string()),
//!         ..Default::default()
//!     };
//!     let projects = client.projects().list_projects(Some(&options)).await?;
//!     for name in projects.keys() {
//!         println!("{}", name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;
pub mod projects;
pub mod query;
pub mod types;

//! Synchronous typed client for a versioned service-configuration API.
//!
//! # Overview
//! Services own numbered configuration versions; versions own resources such
//! as logging endpoints. Every operation formats a path, optionally encodes a
//! JSON body, hands the request to a `Transport`, and decodes the answer.
//! List results are stably ordered by each type's natural key.
//!
//! # Design
//! - `Client` is stateless apart from its config and a shared transport.
//! - Each operation has a pure `build_*` / `parse_*` pair next to the
//!   convenience method, so request building and decoding are testable
//!   without I/O.
//! - One generic `ResourceClient` serves every version-scoped resource type;
//!   a type only supplies its collection path and natural key.
//! - Every call is a single attempt. Errors are returned, never retried.
//!
//! ```no_run
//! use cdnconf_core::{Client, ClientConfig};
//!
//! let client = Client::new(ClientConfig::from_env()?);
//! let sinks = client.bigquery().list("SU1Z0isxPaozGVKXdv0eY", 1)?;
//! for sink in &sinks.data {
//!     println!("{} -> {}.{}", sink.name, sink.dataset, sink.table);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod resource;
mod serde_util;
pub mod sort;
#[cfg(feature = "ureq-transport")]
pub mod transport;
pub mod types;
pub mod version;

pub use client::{ApiResponse, Client};
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use resource::{ResourceClient, VersionedResource};
#[cfg(feature = "ureq-transport")]
pub use transport::UreqTransport;
pub use types::{BigQuery, Version, S3};
pub use version::{VersionAction, VersionClient};

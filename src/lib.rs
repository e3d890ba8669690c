//! # Dateno - client SDK for the Dateno data search API
//!
//! Typed access to the Dateno statistics database, dataset search, data
//! catalog registry, raw index records and service health endpoints, built on
//! top of `reqwest`. Every call runs through the same pipeline: request
//! construction, security, lifecycle hooks, optional retries with backoff, and
//! a mapping of the response onto either a typed model or a typed [`Error`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use dateno::{Dateno, models::SearchParams};
//! use futures::TryStreamExt;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), dateno::Error> {
//!     let sdk = Dateno::builder()
//!         .api_key_query("my-key")
//!         .timeout(Duration::from_secs(30))
//!         .build()?;
//!
//!     let health = sdk.service().get_healthz(None).await?;
//!     println!("service is {}", health.data.status);
//!
//!     // Walk every namespace of the statistics database, 50 at a time
//!     let stats = sdk.statistics();
//!     let namespaces: Vec<_> = stats.paginate_namespaces(0, 50, None).try_collect().await?;
//!     println!("{} namespaces", namespaces.len());
//!
//!     let hits = sdk
//!         .search()
//!         .search_datasets(&SearchParams::query("environment"), None)
//!         .await?;
//!     println!("Request took {:?}", hits.latency);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Failed calls keep the status code and body of the response that caused them:
//!
//! ```no_run
//! use dateno::{Dateno, Error};
//!
//! # async fn example() -> Result<(), Error> {
//! # let sdk = Dateno::builder().build()?;
//! match sdk.statistics().get_namespace("wb", None).await {
//!     Ok(ns) => println!("Success: {:?}", ns.data),
//!     Err(Error::ResponseValidation { raw_response, source, status, .. }) => {
//!         eprintln!("Failed to deserialize (status {}):", status);
//!         eprintln!("  Raw response: {}", raw_response);
//!         eprintln!("  Error: {}", source);
//!     }
//!     Err(Error::Api { status, raw_response, .. }) => {
//!         eprintln!("HTTP error {}: {}", status, raw_response);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Retries
//!
//! ```no_run
//! use dateno::{Dateno, retry::{BackoffStrategy, RetryConfig}};
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), dateno::Error> {
//! let sdk = Dateno::builder()
//!     .retry_config(RetryConfig::backoff(
//!         BackoffStrategy {
//!             initial_interval: Duration::from_millis(200),
//!             max_interval: Duration::from_secs(10),
//!             exponent: 2.0,
//!             max_elapsed_time: Duration::from_secs(60),
//!         },
//!         true, // also retry connection failures
//!     ))
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! A blocking facade with the same surface lives in [`blocking`].

pub mod apis;
pub mod base;
pub mod blocking;
mod client;
pub mod config;
mod error;
pub mod ext;
pub mod hooks;
pub mod matcher;
pub mod models;
pub mod pagination;
pub mod request;
mod response;
pub mod retry;
pub mod security;

pub use client::{Dateno, DatenoBuilder};
pub use error::{Error, Result};
pub use request::CallOptions;
pub use response::{read_body_preview, Response, BODY_PREVIEW_LIMIT};
pub use retry::{RetryConfig, RetryStrategy};
pub use security::Security;

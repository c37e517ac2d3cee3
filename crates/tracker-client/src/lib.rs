//! HTTP client library for the TrainTracker API.
//!
//! This crate provides a typed HTTP client for the TrainTracker backend. It
//! covers the health check, both catalog listings and every price endpoint.
//!
//! # Example
//!
//! ```no_run
//! use tracker_client::{ClientConfig, TrackerClient};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tracker_client::Error> {
//!     let client = TrackerClient::new(ClientConfig {
//!         base_url: "http://localhost:3000".into(),
//!         timeout: Duration::from_secs(30),
//!     })?;
//!
//!     let fare = client.get_train("paris-lyon").await?;
//!     println!("{}: {}", fare.route, fare.summary.current);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::{ClientConfig, TrackerClient};
pub use error::Error;
pub use types::*;

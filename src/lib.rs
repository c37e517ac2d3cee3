//! # TrainTracker Backend - REST API Server
//!
//! A REST API backend that simulates and serves synthetic price histories for
//! two independent catalogs: French train routes and tech products. Built with
//! [Axum](https://crates.io/crates/axum) for async HTTP handling and provides
//! OpenAPI/Swagger documentation via [utoipa](https://crates.io/crates/utoipa).
//!
//! ## Key Features
//!
//! - **Price Simulation**: Prices drift along superimposed sine waves of
//!   wall-clock time with random jitter, floored at 40% of the base price.
//!
//! - **Bounded History**: Every instrument keeps at most 200 samples; the
//!   oldest are evicted first. Each series starts with 50 backfilled minutes.
//!
//! - **Minute Refresh**: A background task appends one sample per instrument
//!   on every minute boundary.
//!
//! - **On-Demand Statistics**: Current price, change, change percent, high,
//!   low and open are computed per request from a consistent snapshot.
//!
//! - **Static Frontend**: Unmatched paths are served from the configured
//!   frontend directory.
//!
//! ## Architecture
//!
//! ```text
//! CatalogRegistry ──seed──▶ SeriesStore ◀──append── PriceSimulator (tick)
//!                                │
//!                              read
//!                                ▼
//!                           MarketData ──summarize──▶ HTTP handlers
//! ```
//!
//! ## Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`api`] | Route handlers and router configuration |
//! | [`catalog`] | Route and product catalogs, history backfill |
//! | [`config`] | TOML and environment configuration |
//! | [`error`] | Engine and API error types |
//! | [`generator`] | Synthetic price generation |
//! | [`market`] | Read-only query façade |
//! | [`models`] | Response DTOs with OpenAPI schemas |
//! | [`series`] | Bounded price series store |
//! | [`simulation`] | Periodic price refresh |
//! | [`state`] | Application state management |
//! | [`summary`] | Summary statistics |
//!
//! ## API Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/routes` | List train routes |
//! | GET | `/api/train/{route}` | Route price summary (case-insensitive) |
//! | GET | `/api/trains-batch` | Summaries of every route |
//! | GET | `/api/products` | List tech products |
//! | GET | `/api/tech` | Summaries of every product (last 60 samples) |
//! | GET | `/api/tech/{product}` | Product price summary (URL-encoded name) |
//!
//! ## Example Usage
//!
//! ```bash
//! # Development mode
//! cargo run
//!
//! # With custom host/port
//! HOST=127.0.0.1 PORT=8080 cargo run
//!
//! # With a configuration file
//! CONFIG_PATH=tracker.toml cargo run
//!
//! curl http://localhost:3000/api/train/paris-lyon
//! curl http://localhost:3000/api/tech/RTX%204090
//! ```
//!
//! ## Dependencies
//!
//! - **axum** (0.8): Async web framework
//! - **tower-http** (0.6): HTTP middleware (CORS, tracing, compression, static files)
//! - **utoipa** (5.4): OpenAPI documentation generation
//! - **tokio** (1.49): Async runtime
//! - **dashmap** (6.1): Concurrent series storage
//! - **rust_decimal** (1.40): Exact cent prices
//! - **tracing** (0.1): Structured logging

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod generator;
pub mod market;
pub mod models;
pub mod series;
pub mod simulation;
pub mod state;
pub mod summary;

//! Integration tests for the TrainTracker API.
//!
//! Each test starts its own server on an ephemeral local port, backed by a
//! deterministically seeded state, and talks to it through `tracker-client`.
//! The background refresh loop is not started; tests advance prices by
//! calling [`TestServer::tick`].

use chrono::{DateTime, Duration, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracker_client::{ClientConfig, TrackerClient};
use traintracker_backend::api::create_router;
use traintracker_backend::config::Config;
use traintracker_backend::simulation::TickReport;
use traintracker_backend::state::AppState;

/// Seed shared by every test server.
pub const TEST_SEED: u64 = 42;

/// A running server and the state behind it.
pub struct TestServer {
    /// Base URL of the server (e.g., "http://127.0.0.1:41234").
    pub base_url: String,
    /// State served by the router.
    pub state: Arc<AppState>,
    /// Time the history was seeded at.
    pub seeded_at: DateTime<Utc>,
    ticks: i64,
}

impl TestServer {
    /// Appends one sample per instrument, one refresh interval after the
    /// previous sample.
    pub fn tick(&mut self) -> TickReport {
        self.ticks += 1;
        let interval = self.state.config.simulation.interval_secs as i64;
        self.state
            .simulator
            .tick_at(self.seeded_at + Duration::seconds(interval * self.ticks))
    }

    /// Creates a client for this server.
    ///
    /// # Errors
    /// Returns error if client creation fails.
    pub fn client(&self) -> Result<TrackerClient, tracker_client::Error> {
        create_test_client(&self.base_url)
    }
}

/// Starts a server with the default catalogs on `127.0.0.1` and an
/// OS-assigned port.
///
/// # Errors
/// Returns error if the state cannot be seeded or the port cannot be bound.
pub async fn spawn_test_server() -> anyhow::Result<TestServer> {
    let seeded_at = Utc::now();
    let state = AppState::from_parts(Config::default(), StdRng::seed_from_u64(TEST_SEED), seeded_at)?;
    let state = Arc::new(state);

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = create_router(Arc::clone(&state));

    tokio::spawn(async move { axum::serve(listener, app).await });

    Ok(TestServer {
        base_url: format!("http://{}", addr),
        state,
        seeded_at,
        ticks: 0,
    })
}

/// Creates a test client for the given base URL.
///
/// # Errors
/// Returns error if client creation fails.
pub fn create_test_client(base_url: &str) -> Result<TrackerClient, tracker_client::Error> {
    TrackerClient::new(ClientConfig {
        base_url: base_url.to_string(),
        timeout: std::time::Duration::from_secs(10),
    })
}

//! HTTP client for the TrainTracker API.

use crate::error::Error;
use crate::types::*;
use reqwest::Client;
use std::time::Duration;
use url::Url;


/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "http://localhost:3000").
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for the TrainTracker API.
#[derive(Debug, Clone)]
pub struct TrackerClient {
    client: Client,
    base_url: Url,
}

impl TrackerClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    /// Returns error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidRequest(format!(
                "base URL cannot carry paths: {}",
                config.base_url
            )));
        }
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { client, base_url })
    }

    /// Creates a new client with default configuration.
    ///
    /// # Errors
    /// Returns error if the base URL is invalid or the HTTP client cannot be built.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::new(ClientConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        })
    }

    // ========================================================================
    // Health
    // ========================================================================

    /// Performs a health check.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn health_check(&self) -> Result<HealthResponse, Error> {
        self.get(&["health"]).await
    }

    // ========================================================================
    // Trains
    // ========================================================================

    /// Lists all train routes.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn list_routes(&self) -> Result<Vec<RouteInfo>, Error> {
        self.get(&["api", "routes"]).await
    }

    /// Gets the fare history of a route. The key is matched case-insensitively.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] for unknown routes.
    pub async fn get_train(&self, route: &str) -> Result<RouteSummary, Error> {
        self.get(&["api", "train", route]).await
    }

    /// Gets the fare histories of every route.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn get_trains_batch(&self) -> Result<SummaryBatch, Error> {
        self.get(&["api", "trains-batch"]).await
    }

    // ========================================================================
    // Tech
    // ========================================================================

    /// Lists all tech products.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn list_products(&self) -> Result<Vec<ProductInfo>, Error> {
        self.get(&["api", "products"]).await
    }

    /// Gets the recent price histories of every product.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn get_tech_all(&self) -> Result<SummaryBatch, Error> {
        self.get(&["api", "tech"]).await
    }

    /// Gets the full price history of a product. The name is percent-encoded
    /// and matched exactly.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] for unknown products.
    pub async fn get_tech(&self, product: &str) -> Result<ProductSummary, Error> {
        self.get(&["api", "tech", product]).await
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Builds an endpoint URL, percent-encoding each segment.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                Error::InvalidRequest(format!("base URL cannot carry paths: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, segments: &[&str]) -> Result<T, Error> {
        let url = self.endpoint(segments)?;
        let resp = self.client.get(url).send().await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();

        if status.is_success() {
            Ok(resp.json().await?)
        } else if status.as_u16() == 404 {
            let text = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            Err(Error::NotFound(message))
        } else {
            let text = resp.text().await.unwrap_or_default();
            Err(Error::Api {
                status: status.as_u16(),
                message: text,
            })
        }
    }
}

//! [`CenterFetcher`] backed by the Overpass API.
//!
//! Each tile becomes one `GET {endpoint}?data=<query>` request where the
//! query selects multipolygon relations inside the tile and asks for their
//! centres:
//!
//! ```text
//! [out:json];relation(south,west,north,east)[type=multipolygon];out center;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use placegrain_core::{BoundingBox, Point};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::{CenterFetcher, LocateError, RelationCenter, TransportError};

/// Public Overpass interpreter endpoint.
pub const DEFAULT_OVERPASS_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

/// Default user agent for Overpass requests.
pub const DEFAULT_USER_AGENT: &str = "placegrain-locate/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 180;

/// Configuration for [`OverpassFetcher`].
#[derive(Debug, Clone)]
pub struct OverpassConfig {
    /// Interpreter endpoint URL.
    pub endpoint: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_OVERPASS_ENDPOINT.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl OverpassConfig {
    /// Create a configuration for the given endpoint.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Set the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Interpreter answer; runtime errors arrive with status 200 and a `remark`.
#[derive(Debug, Deserialize)]
struct OverpassResponse {
    elements: Vec<OverpassElement>,
    remark: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    id: i64,
    center: Option<OverpassCenter>,
}

#[derive(Debug, Deserialize)]
struct OverpassCenter {
    lat: f64,
    lon: f64,
}

impl OverpassResponse {
    fn parse(body: &str, url: &str) -> Result<Vec<RelationCenter>, TransportError> {
        let decode_error = |message: String| TransportError::Decode {
            url: url.to_owned(),
            message,
        };
        let response: Self =
            serde_json::from_str(body).map_err(|err| decode_error(err.to_string()))?;
        match response.remark {
            Some(remark) => Err(decode_error(format!("interpreter reported: {remark}"))),
            None => Ok(response.into_centers()),
        }
    }

    fn into_centers(self) -> Vec<RelationCenter> {
        self.elements
            .into_iter()
            .filter_map(|element| {
                element.center.map(|center| RelationCenter {
                    id: element.id,
                    center: Point {
                        lon: center.lon,
                        lat: center.lat,
                    },
                })
            })
            .collect()
    }
}

/// HTTP client issuing Overpass tile queries.
#[derive(Debug, Clone)]
pub struct OverpassFetcher {
    client: Client,
    config: OverpassConfig,
}

impl OverpassFetcher {
    /// Create a fetcher for `endpoint` with default settings.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, LocateError> {
        Self::with_config(OverpassConfig::new(endpoint))
    }

    /// Create a fetcher with explicit configuration.
    pub fn with_config(config: OverpassConfig) -> Result<Self, LocateError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(LocateError::HttpClient)?;
        Ok(Self { client, config })
    }

    /// Overpass QL query selecting multipolygon centres inside `tile`.
    fn query(tile: &BoundingBox) -> String {
        format!(
            "[out:json];relation({},{},{},{})[type=multipolygon];out center;",
            tile.south, tile.west, tile.north, tile.east
        )
    }

    /// Full request URL for `tile`.
    fn tile_url(&self, tile: &BoundingBox) -> Result<Url, TransportError> {
        Url::parse_with_params(&self.config.endpoint, &[("data", Self::query(tile))]).map_err(
            |source| TransportError::Endpoint {
                endpoint: self.config.endpoint.clone(),
                source,
            },
        )
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }
        if let Some(status) = error.status() {
            return TransportError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }
        if error.is_decode() {
            return TransportError::Decode {
                url: url.to_owned(),
                message: error.to_string(),
            };
        }
        TransportError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

#[async_trait(?Send)]
impl CenterFetcher for OverpassFetcher {
    async fn fetch_tile(&self, tile: &BoundingBox) -> Result<Vec<RelationCenter>, TransportError> {
        let url = self.tile_url(tile)?;
        let url_text = url.to_string();

        let body = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url_text))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, &url_text))?
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url_text))?;

        OverpassResponse::parse(&body, &url_text)
    }
}

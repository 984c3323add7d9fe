//! One rate-limited request per (entity, season, team) key.

use std::fmt;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::FetchError;
use crate::rate_limit::RateLimiter;
use crate::raw::Envelope;

/// Something that can GET an endpoint and hand back the body.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn get(&self, endpoint: &Endpoint) -> Result<String, FetchError>;
}

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    host: String,
    key: String,
}

impl HttpTransport {
    /// Talks to `https://{host}` and authenticates with the host/key header pair.
    pub fn new(host: &str, key: &str, timeout: Duration) -> Result<Self, FetchError> {
        Self::with_base_url(format!("https://{host}"), host, key, timeout)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        host: &str,
        key: &str,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(2)
            .build()
            .map_err(FetchError::ClientBuild)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            host: host.to_string(),
            key: key.to_string(),
        })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, endpoint: &Endpoint) -> Result<String, FetchError> {
        let url = format!("{}{}", self.base_url, endpoint.path);
        let transport = |source: reqwest::Error| FetchError::Transport {
            path: endpoint.to_string(),
            source,
        };

        let response = self
            .client
            .get(&url)
            .query(&endpoint.query)
            .header("x-rapidapi-host", &self.host)
            .header("x-rapidapi-key", &self.key)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                path: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(transport)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub path: &'static str,
    pub query: Vec<(&'static str, String)>,
}

impl Endpoint {
    pub fn teams() -> Self {
        Self {
            path: "/teams",
            query: vec![("league", "standard".to_string())],
        }
    }

    pub fn games(season: i64) -> Self {
        Self {
            path: "/games",
            query: vec![
                ("league", "standard".to_string()),
                ("season", season.to_string()),
            ],
        }
    }

    pub fn players(season: i64, team_id: i64) -> Self {
        Self {
            path: "/players",
            query: vec![("season", season.to_string()), ("team", team_id.to_string())],
        }
    }

    pub fn player_stats(season: i64, team_id: i64) -> Self {
        Self {
            path: "/players/statistics",
            query: vec![("season", season.to_string()), ("team", team_id.to_string())],
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)?;
        for (i, (key, value)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{key}={value}")?;
        }
        Ok(())
    }
}

pub struct Fetcher<T> {
    transport: T,
    limiter: RateLimiter,
    requests: u64,
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T, limiter: RateLimiter) -> Self {
        Self {
            transport,
            limiter,
            requests: 0,
        }
    }

    /// The envelope's `response` array, or nothing if the payload has none.
    /// A body that is not a valid envelope aborts with [`FetchError::Parse`].
    pub async fn fetch<R: DeserializeOwned>(
        &mut self,
        endpoint: &Endpoint,
    ) -> Result<Vec<R>, FetchError> {
        self.limiter.acquire().await;
        self.requests += 1;

        let body = self.transport.get(endpoint).await?;
        let envelope: Envelope<R> = serde_json::from_str(&body).map_err(|source| FetchError::Parse {
            path: endpoint.to_string(),
            source,
        })?;

        let records = envelope.response.unwrap_or_default();
        debug!("{endpoint}: {} records", records.len());
        Ok(records)
    }

    pub fn requests(&self) -> u64 {
        self.requests
    }
}

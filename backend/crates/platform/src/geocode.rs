//! Address Geocoding
//!
//! Turns a postal address into latitude/longitude so events can be sorted by
//! distance. Geocoding is best effort: a failed lookup stores the address at
//! `(0, 0)` rather than rejecting the request.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoPoint {
    pub lat: f64,
    pub long: f64,
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Geocoder request failed: {0}")]
    Transport(String),

    #[error("Geocoder returned status {0}")]
    Status(u16),

    #[error("Geocoder returned an unreadable result: {0}")]
    Malformed(String),
}

#[trait_variant::make(Geocoder: Send)]
pub trait LocalGeocoder {
    /// First match for `query`, or `None` when nothing matched.
    async fn geocode(&self, query: &str) -> Result<Option<GeoPoint>, GeocodeError>;
}

/// Geocode `query`, falling back to `(0, 0)` on any failure.
pub async fn locate_or_origin<G: Geocoder + Sync>(geocoder: &G, query: &str) -> GeoPoint {
    match Geocoder::geocode(geocoder, query).await {
        Ok(Some(point)) => point,
        Ok(None) => {
            tracing::warn!(query = %query, "No geocoding match, storing address at origin");
            GeoPoint::default()
        }
        Err(e) => {
            tracing::warn!(error = %e, query = %query, "Geocoding failed, storing address at origin");
            GeoPoint::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// Base URL of a Nominatim compatible service; `None` disables lookups
    pub base_url: Option<String>,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            user_agent: "karma-backend/0.1".to_string(),
            timeout: Duration::from_secs(5),
        }
    }
}

// ============================================================================
// Nominatim-style HTTP geocoder
// ============================================================================

/// Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

#[derive(Debug, Clone)]
pub struct HttpGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGeocoder {
    pub fn new(base_url: impl Into<String>, config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

fn parse_hits(hits: Vec<SearchHit>) -> Result<Option<GeoPoint>, GeocodeError> {
    let Some(hit) = hits.into_iter().next() else {
        return Ok(None);
    };
    let lat = hit
        .lat
        .parse::<f64>()
        .map_err(|e| GeocodeError::Malformed(e.to_string()))?;
    let long = hit
        .lon
        .parse::<f64>()
        .map_err(|e| GeocodeError::Malformed(e.to_string()))?;
    Ok(Some(GeoPoint { lat, long }))
}

impl Geocoder for HttpGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let hits = response
            .json::<Vec<SearchHit>>()
            .await
            .map_err(|e| GeocodeError::Malformed(e.to_string()))?;

        parse_hits(hits)
    }
}

/// Never matches anything.
#[derive(Debug, Clone, Default)]
pub struct NoopGeocoder;

impl Geocoder for NoopGeocoder {
    async fn geocode(&self, _query: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        Ok(None)
    }
}

/// Geocoder chosen from configuration at startup.
#[derive(Debug, Clone)]
pub enum AnyGeocoder {
    Http(HttpGeocoder),
    Noop(NoopGeocoder),
}

impl AnyGeocoder {
    pub fn from_config(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        match &config.base_url {
            Some(url) => Ok(Self::Http(HttpGeocoder::new(url.clone(), config)?)),
            None => Ok(Self::Noop(NoopGeocoder)),
        }
    }
}

impl Geocoder for AnyGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        match self {
            Self::Http(geocoder) => Geocoder::geocode(geocoder, query).await,
            Self::Noop(geocoder) => Geocoder::geocode(geocoder, query).await,
        }
    }
}

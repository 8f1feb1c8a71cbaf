//! Device position capability.
//!
//! A machine without any location capability has no [`Geolocator`] at all;
//! see [`geolocator_from_config`]. Runtime failures of an existing capability
//! are reported through [`GeolocationError`].

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;
use thiserror::Error;
use tracing::debug;

use crate::{
    config::{Config, GeolocationConfig},
    model::Coordinates,
};

pub const IP_LOOKUP_ENDPOINT: &str = "http://ip-api.com/json/?fields=status,message,lat,lon";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum GeolocationError {
    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0}")]
    PositionUnavailable(String),

    #[error("Timed out while getting your location")]
    Timeout,
}

#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    /// Single-shot position request.
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// Always answers with the same position.
#[derive(Debug, Clone)]
pub struct FixedGeolocator {
    position: Coordinates,
}

impl FixedGeolocator {
    pub fn new(position: Coordinates) -> Self {
        Self { position }
    }
}

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Ok(self.position)
    }
}

/// Approximates the device position from its public IP address.
#[derive(Debug, Clone)]
pub struct IpGeolocator {
    endpoint: String,
    http: Client,
}

impl Default for IpGeolocator {
    fn default() -> Self {
        Self::new(IP_LOOKUP_ENDPOINT)
    }
}

impl IpGeolocator {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), http: Client::new() }
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

fn interpret_ip_lookup(body: &str) -> Result<Coordinates, GeolocationError> {
    let parsed: IpApiResponse = serde_json::from_str(body)
        .map_err(|e| GeolocationError::PositionUnavailable(format!("Unreadable location data: {e}")))?;

    if parsed.status != "success" {
        let reason = parsed.message.unwrap_or_else(|| "unknown reason".to_string());
        return Err(GeolocationError::PositionUnavailable(format!(
            "Location lookup failed: {reason}"
        )));
    }

    match (parsed.lat, parsed.lon) {
        (Some(lat), Some(lon)) => Ok(Coordinates::new(lat, lon)),
        _ => Err(GeolocationError::PositionUnavailable(
            "Location lookup returned no coordinates".to_string(),
        )),
    }
}

#[async_trait]
impl Geolocator for IpGeolocator {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        let res = self.http.get(&self.endpoint).send().await.map_err(|e| {
            if e.is_timeout() {
                GeolocationError::Timeout
            } else {
                GeolocationError::PositionUnavailable(format!("Could not reach location service: {e}"))
            }
        })?;

        if res.status() == reqwest::StatusCode::FORBIDDEN {
            return Err(GeolocationError::PermissionDenied(
                "Location service refused the request".to_string(),
            ));
        }

        let body = res
            .text()
            .await
            .map_err(|e| GeolocationError::PositionUnavailable(e.to_string()))?;

        let position = interpret_ip_lookup(&body)?;
        debug!(%position, "resolved position from IP");
        Ok(position)
    }
}

/// `None` means the capability is absent, which callers must surface
/// distinctly from a failed position request.
pub fn geolocator_from_config(config: &Config) -> Option<Box<dyn Geolocator>> {
    match &config.geolocation {
        GeolocationConfig::Ip => Some(Box::new(IpGeolocator::default())),
        GeolocationConfig::Fixed { latitude, longitude } => {
            Some(Box::new(FixedGeolocator::new(Coordinates::new(*latitude, *longitude))))
        }
        GeolocationConfig::Disabled => None,
    }
}

//! Forward and reverse geocoding against an external service.
//!
//! Only the first candidate of each lookup is used. Lookups are blocking,
//! with no timeout and no retry; any failure is returned to the caller.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::geo::Coordinate;

pub const DEFAULT_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";

pub trait Geocoder {
    /// Coordinate of the first candidate for `address`.
    fn geocode(&self, address: &str) -> Result<Coordinate>;

    /// Formatted address of the first candidate at `coordinate`.
    fn reverse_geocode(&self, coordinate: Coordinate) -> Result<String>;
}

/// Google Geocoding API client.
pub struct GoogleGeocoder {
    http: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
}

impl GoogleGeocoder {
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(None::<Duration>)
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn lookup(&self, param: &str, value: &str) -> Result<GeocodeResult> {
        debug!(endpoint = %self.endpoint, %param, %value, "geocoding request");
        let response: GeocodeResponse = self
            .http
            .get(&self.endpoint)
            .query(&[(param, value), ("key", self.api_key.as_str())])
            .send()?
            .error_for_status()?
            .json()?;
        first_result(response, value)
    }
}

impl Geocoder for GoogleGeocoder {
    fn geocode(&self, address: &str) -> Result<Coordinate> {
        let result = self.lookup("address", address)?;
        let location = result.geometry.location;
        Ok(Coordinate::new(location.lat, location.lng))
    }

    fn reverse_geocode(&self, coordinate: Coordinate) -> Result<String> {
        let latlng = format!("{:?},{:?}", coordinate.latitude, coordinate.longitude);
        Ok(self.lookup("latlng", &latlng)?.formatted_address)
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

fn first_result(response: GeocodeResponse, query: &str) -> Result<GeocodeResult> {
    if !matches!(response.status.as_str(), "OK" | "ZERO_RESULTS") {
        return Err(Error::Service {
            status: response.status,
            message: response.error_message.unwrap_or_default(),
        });
    }
    response
        .results
        .into_iter()
        .next()
        .ok_or_else(|| Error::NoResults {
            query: query.to_string(),
        })
}

//! Reverse geocoding against a Nominatim-compatible HTTP endpoint.

use std::time::Duration;

use async_trait::async_trait;
use recicla_core::{Coordinates, Placemark};
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use crate::platform::{Geocoder, PlatformError};

const USER_AGENT: &str = concat!("recicla-contigo/", env!("CARGO_PKG_VERSION"));

/// Reverse geocoder backed by `GET {base}/reverse`.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: Url,
}

#[derive(Deserialize)]
struct ReverseResponse {
    address: Option<NominatimAddress>,
}

#[derive(Deserialize)]
struct NominatimAddress {
    road: Option<String>,
    house_number: Option<String>,
    suburb: Option<String>,
    city_district: Option<String>,
    neighbourhood: Option<String>,
}

impl From<NominatimAddress> for Placemark {
    fn from(address: NominatimAddress) -> Self {
        Self {
            street: address.road,
            street_number: address.house_number,
            district: address
                .suburb
                .or(address.city_district)
                .or(address.neighbourhood),
        }
    }
}

impl NominatimGeocoder {
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: Url, timeout: Option<Duration>) -> Result<Self, PlatformError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| PlatformError::Geocoding(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    fn reverse_url(&self, at: Coordinates) -> Result<Url, PlatformError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/reverse"))
            .map_err(|e| PlatformError::Geocoding(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("format", "jsonv2")
            .append_pair("lat", &at.latitude.to_string())
            .append_pair("lon", &at.longitude.to_string())
            .append_pair("zoom", "18")
            .append_pair("addressdetails", "1")
            .append_pair("accept-language", "es");
        Ok(url)
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    #[instrument(skip(self))]
    async fn reverse_geocode(&self, at: Coordinates) -> Result<Option<Placemark>, PlatformError> {
        let url = self.reverse_url(at)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PlatformError::Geocoding(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlatformError::Geocoding(format!("status {status}")));
        }

        let body: ReverseResponse = response
            .json()
            .await
            .map_err(|e| PlatformError::Geocoding(e.to_string()))?;
        let placemark = body.address.map(Placemark::from);
        debug!(found = placemark.is_some(), "Reverse geocoded");
        Ok(placemark)
    }
}

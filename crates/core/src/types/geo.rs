//! Coordinates and reverse-geocoded places.

use serde::{Deserialize, Serialize};

/// A WGS84 latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Coordinates {
    /// Create a coordinate pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components are finite and inside the valid ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// The street-level pieces of a reverse geocoding result.
///
/// Every field is optional because geocoders routinely leave gaps in
/// informal settlements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placemark {
    pub street: Option<String>,
    pub street_number: Option<String>,
    pub district: Option<String>,
}

impl Placemark {
    /// Render as `"{street} {number}, {district}, {locality}"`.
    ///
    /// Missing parts are left blank rather than dropped, so the separators
    /// stay in place; only the outer whitespace is trimmed.
    #[must_use]
    pub fn format_address(&self, locality: &str) -> String {
        let street = self.street.as_deref().unwrap_or_default();
        let number = self.street_number.as_deref().unwrap_or_default();
        let district = self.district.as_deref().unwrap_or_default();
        format!("{street} {number}, {district}, {locality}")
            .trim()
            .to_owned()
    }
}

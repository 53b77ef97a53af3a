#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geographic reference types.
//!
//! Institutions (lycées) and the postal geocoding table are the two
//! reference datasets the engine reads. Coordinates are validated once,
//! when a [`LatLng`] is built, so downstream geodesy never has to.

pub mod department;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use department::{DepartmentCode, DepartmentCodeError};

/// Errors raised when building a [`LatLng`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    /// Latitude is not finite or outside [-90, 90].
    #[error("latitude {0} out of range")]
    Latitude(f64),

    /// Longitude is not finite or outside [-180, 180].
    #[error("longitude {0} out of range")]
    Longitude(f64),

    /// A `"lat,lon"` string could not be parsed.
    #[error("unparseable coordinate pair {0:?}")]
    Unparseable(String),
}

/// Default map center used by the filter configuration.
pub const DEFAULT_MAP_CENTER: LatLng = LatLng {
    lat: 45.8336,
    lng: 1.2611,
};

/// A validated point, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLatLng", into = "RawLatLng")]
pub struct LatLng {
    lat: f64,
    lng: f64,
}

impl LatLng {
    /// Builds a point.
    ///
    /// # Errors
    ///
    /// Returns a [`CoordinateError`] if either component is non-finite or
    /// out of range.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::Latitude(lat));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(CoordinateError::Longitude(lng));
        }
        Ok(Self { lat, lng })
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.lng
    }
}

/// Parses the `"lat,lon"` form used by the geocoding table.
impl FromStr for LatLng {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unparseable = || CoordinateError::Unparseable(s.to_string());
        let (lat, lng) = s.split_once(',').ok_or_else(unparseable)?;
        let lat: f64 = lat.trim().parse().map_err(|_| unparseable())?;
        let lng: f64 = lng.trim().parse().map_err(|_| unparseable())?;
        Self::new(lat, lng)
    }
}

#[derive(Serialize, Deserialize)]
struct RawLatLng {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawLatLng> for LatLng {
    type Error = CoordinateError;

    fn try_from(raw: RawLatLng) -> Result<Self, Self::Error> {
        Self::new(raw.lat, raw.lng)
    }
}

impl From<LatLng> for RawLatLng {
    fn from(point: LatLng) -> Self {
        Self {
            lat: point.lat,
            lng: point.lng,
        }
    }
}

/// A lycée (or other origin institution).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Institution {
    /// Uppercased UAI code (e.g. `"0450051L"`).
    pub uai: String,
    /// Institution location.
    pub location: LatLng,
    /// Raw `code_departement` as published (e.g. `"45"`).
    pub code_departement: String,
    /// Department bucket derived from `code_departement`.
    pub department: DepartmentCode,
    /// Official name.
    pub name: String,
    /// Postal address, when published.
    pub address: Option<String>,
}

/// One row of the postal geocoding table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoEntry {
    /// Five-digit postal code.
    pub postal_code: String,
    /// Representative point for that postal code.
    pub location: LatLng,
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Geodesy and postal geocoding for the candidature map.
//!
//! Provides the great-circle distance used for every radius filter, and an
//! in-memory index over the postal geocoding table used to place post-bac
//! departments on the map.

use std::collections::BTreeMap;

use candidature_map_geography_models::{DepartmentCode, GeoEntry, LatLng};

/// Nautical miles per radian of arc (one per arc-minute).
const NAUTICAL_MILES_PER_RADIAN: f64 = 3437.74677;

/// Statute miles per nautical mile.
const STATUTE_MILES_PER_NAUTICAL_MILE: f64 = 1.1508;

/// Kilometres per statute mile.
const KM_PER_STATUTE_MILE: f64 = 1.609_347_087_886_444_6;

/// Great-circle distance in kilometres between `center` and `point`.
///
/// Spherical law of cosines, with the arc recovered through
/// `atan(-t / sqrt(1 - t²)) + π/2` and scaled by fixed nautical-mile
/// constants. Default radii are tuned against this exact formula, so
/// switching to haversine means re-tuning them.
///
/// Identical points give exactly 0. The cosine term is clamped to [-1, 1]
/// so nearly identical and antipodal points never produce NaN.
#[must_use]
#[allow(clippy::suboptimal_flops)]
pub fn spherical_distance_km(center: LatLng, point: LatLng) -> f64 {
    if center == point {
        return 0.0;
    }

    let radians_per_degree = std::f64::consts::PI / 180.0;
    let lat1 = center.lat() * radians_per_degree;
    let lat2 = point.lat() * radians_per_degree;
    let lon1 = center.lng() * radians_per_degree;
    let lon2 = point.lng() * radians_per_degree;

    // Unfused on purpose: the tuned radii depend on this exact rounding.
    let t = (lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * (lon1 - lon2).cos())
        .clamp(-1.0, 1.0);
    let arc = (-t / (-t * t + 1.0).max(0.0).sqrt()).atan() + 2.0 * 1.0_f64.atan();

    (arc * NAUTICAL_MILES_PER_RADIAN * STATUTE_MILES_PER_NAUTICAL_MILE) * KM_PER_STATUTE_MILE
}

/// Whether `point` lies within `radius_km` of `center` (inclusive).
#[must_use]
pub fn within_radius(center: LatLng, point: LatLng, radius_km: f64) -> bool {
    spherical_distance_km(center, point) <= radius_km
}

/// Postal code to coordinate lookup built from the geocoding table.
#[derive(Debug, Clone, Default)]
pub struct GeocodeIndex {
    by_postal_code: BTreeMap<String, LatLng>,
}

impl GeocodeIndex {
    /// Builds the index. When a postal code appears more than once, the
    /// first entry wins.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = GeoEntry>) -> Self {
        let mut by_postal_code = BTreeMap::new();
        let mut duplicates = 0_usize;

        for entry in entries {
            let key = entry.postal_code.trim().to_string();
            if by_postal_code.contains_key(&key) {
                duplicates += 1;
                log::debug!("Ignoring duplicate geocode entry for {key}");
                continue;
            }
            by_postal_code.insert(key, entry.location);
        }

        if duplicates > 0 {
            log::warn!("Geocoding table contained {duplicates} duplicate postal codes");
        }
        log::info!("Loaded {} postal codes into geocode index", by_postal_code.len());

        Self { by_postal_code }
    }

    /// Looks up a postal code.
    #[must_use]
    pub fn lookup(&self, postal_code: &str) -> Option<LatLng> {
        self.by_postal_code.get(postal_code.trim()).copied()
    }

    /// Representative coordinate of a department (`<code>000`).
    #[must_use]
    pub fn lookup_department(&self, department: &DepartmentCode) -> Option<LatLng> {
        self.lookup(&department.geocode_key())
    }

    /// Number of distinct postal codes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_postal_code.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_postal_code.is_empty()
    }
}

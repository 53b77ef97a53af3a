//! User-adjustable filter configuration.
//!
//! One [`FilterState`] is owned by the presentation layer, mutated in place
//! by control handlers, and passed by reference to the reducer after each
//! change. No history is kept.

use candidature_map_candidature_models::Filiere;
use candidature_map_geography_models::{DEFAULT_MAP_CENTER, LatLng};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Default search radius around the map center, in kilometres.
pub const DEFAULT_RADIUS_KM: f64 = 650.0;

/// Default chart grouping threshold.
pub const DEFAULT_GROUPING_THRESHOLD: u32 = 3;

/// Errors raised when mutating a [`FilterState`].
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum FilterError {
    /// Radius is negative or not finite.
    #[error("invalid radius {0} km: expected a finite, non-negative value")]
    InvalidRadius(f64),
}

/// Category toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct CategoryFilters {
    /// Show post-bac applicants.
    pub post_bac: bool,
    /// Show général-track applicants.
    pub generale: bool,
    /// Show STI2D applicants.
    pub sti2d: bool,
    /// Show other-track applicants.
    pub autre: bool,
}

impl CategoryFilters {
    /// Every toggle on.
    pub const ALL: Self = Self {
        post_bac: true,
        generale: true,
        sti2d: true,
        autre: true,
    };

    /// Every toggle off.
    pub const NONE: Self = Self {
        post_bac: false,
        generale: false,
        sti2d: false,
        autre: false,
    };

    /// Whether the given track is enabled.
    #[must_use]
    pub const fn allows(&self, filiere: Filiere) -> bool {
        match filiere {
            Filiere::Generale => self.generale,
            Filiere::Sti2d => self.sti2d,
            Filiere::Autre => self.autre,
        }
    }

    /// Whether at least one track toggle (général, STI2D, autre) is on.
    #[must_use]
    pub const fn any_track(&self) -> bool {
        self.generale || self.sti2d || self.autre
    }
}

impl Default for CategoryFilters {
    fn default() -> Self {
        Self::ALL
    }
}

/// Marker size buckets, by filtered application count.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum CountBucket {
    /// 1 or 2 applications.
    #[serde(rename = "1-2")]
    #[strum(serialize = "1-2")]
    OneToTwo,
    /// 3 to 5 applications.
    #[serde(rename = "3-5")]
    #[strum(serialize = "3-5")]
    ThreeToFive,
    /// 6 applications or more.
    #[serde(rename = "6+")]
    #[strum(serialize = "6+")]
    SixPlus,
}

impl CountBucket {
    /// Bucket for a filtered total; `None` for 0.
    #[must_use]
    pub const fn for_total(total: u64) -> Option<Self> {
        match total {
            0 => None,
            1..=2 => Some(Self::OneToTwo),
            3..=5 => Some(Self::ThreeToFive),
            _ => Some(Self::SixPlus),
        }
    }
}

/// Count-bucket toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountBucketFilters {
    /// Show markers with 1-2 applications.
    pub one_to_two: bool,
    /// Show markers with 3-5 applications.
    pub three_to_five: bool,
    /// Show markers with 6 or more applications.
    pub six_plus: bool,
}

impl CountBucketFilters {
    /// Every bucket on.
    pub const ALL: Self = Self {
        one_to_two: true,
        three_to_five: true,
        six_plus: true,
    };

    /// Whether the given bucket is enabled.
    #[must_use]
    pub const fn allows(&self, bucket: CountBucket) -> bool {
        match bucket {
            CountBucket::OneToTwo => self.one_to_two,
            CountBucket::ThreeToFive => self.three_to_five,
            CountBucket::SixPlus => self.six_plus,
        }
    }
}

impl Default for CountBucketFilters {
    fn default() -> Self {
        Self::ALL
    }
}

/// The configuration every view is computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Category toggles.
    pub categories: CategoryFilters,
    /// Count-bucket toggles (markers only).
    pub buckets: CountBucketFilters,
    /// Center of the search circle.
    pub center: LatLng,
    /// Departments at or below this total are merged into "Autres"; 0 disables grouping.
    pub grouping_threshold: u32,
    radius_km: f64,
}

impl FilterState {
    /// Search radius, in kilometres.
    #[must_use]
    pub const fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Sets the search radius.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidRadius`] if `radius_km` is negative or
    /// not finite; the previous radius is kept.
    pub fn set_radius_km(&mut self, radius_km: f64) -> Result<(), FilterError> {
        if !radius_km.is_finite() || radius_km < 0.0 {
            return Err(FilterError::InvalidRadius(radius_km));
        }
        self.radius_km = radius_km;
        Ok(())
    }

    /// Builder-style variant of [`Self::set_radius_km`].
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidRadius`] for a negative or non-finite radius.
    pub fn with_radius_km(mut self, radius_km: f64) -> Result<Self, FilterError> {
        self.set_radius_km(radius_km)?;
        Ok(self)
    }

    /// Builder-style setter for the category toggles.
    #[must_use]
    pub const fn with_categories(mut self, categories: CategoryFilters) -> Self {
        self.categories = categories;
        self
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            categories: CategoryFilters::ALL,
            buckets: CountBucketFilters::ALL,
            center: DEFAULT_MAP_CENTER,
            grouping_threshold: DEFAULT_GROUPING_THRESHOLD,
            radius_km: DEFAULT_RADIUS_KM,
        }
    }
}

//! TOML filter configuration.
//!
//! ```toml
//! radius_km = 300.0
//! grouping_threshold = 5
//! center = { lat = 47.9029, lng = 1.9093 }
//!
//! [categories]
//! post_bac = false
//!
//! [buckets]
//! one_to_two = false
//! ```
//!
//! Every key is optional; missing keys keep the current value.

use std::path::{Path, PathBuf};

use candidature_map_analytics_models::{FilterError, FilterState};
use candidature_map_geography_models::LatLng;
use serde::Deserialize;

/// Errors raised while loading a filter configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        /// Config file path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid TOML or has unknown keys.
    #[error("Invalid filter config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Filter settings read from a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    /// Search radius, in kilometres.
    pub radius_km: Option<f64>,
    /// Chart grouping threshold.
    pub grouping_threshold: Option<u32>,
    /// Search circle center.
    pub center: Option<LatLng>,
    /// Category toggles.
    #[serde(default)]
    pub categories: CategoryToggles,
    /// Count-bucket toggles.
    #[serde(default)]
    pub buckets: BucketToggles,
}

/// Partial category toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryToggles {
    pub post_bac: Option<bool>,
    pub generale: Option<bool>,
    pub sti2d: Option<bool>,
    pub autre: Option<bool>,
}

/// Partial count-bucket toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BucketToggles {
    pub one_to_two: Option<bool>,
    pub three_to_five: Option<bool>,
    pub six_plus: Option<bool>,
}

impl FilterConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// * If the text is not valid TOML
    /// * If it contains unknown keys or an out-of-range center
    pub fn parse(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// * If the file cannot be read
    /// * If its content does not parse (see [`Self::parse`])
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content)?;
        log::debug!("Loaded filter config from {}", path.display());
        Ok(config)
    }

    /// Overwrites the values this configuration sets.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidRadius`] for a negative or non-finite
    /// radius; `state` is left untouched in that case.
    pub fn apply(&self, state: &mut FilterState) -> Result<(), FilterError> {
        if let Some(radius_km) = self.radius_km {
            state.set_radius_km(radius_km)?;
        }
        if let Some(threshold) = self.grouping_threshold {
            state.grouping_threshold = threshold;
        }
        if let Some(center) = self.center {
            state.center = center;
        }

        let categories = &mut state.categories;
        set(&mut categories.post_bac, self.categories.post_bac);
        set(&mut categories.generale, self.categories.generale);
        set(&mut categories.sti2d, self.categories.sti2d);
        set(&mut categories.autre, self.categories.autre);

        let buckets = &mut state.buckets;
        set(&mut buckets.one_to_two, self.buckets.one_to_two);
        set(&mut buckets.three_to_five, self.buckets.three_to_five);
        set(&mut buckets.six_plus, self.buckets.six_plus);

        Ok(())
    }
}

const fn set(target: &mut bool, value: Option<bool>) {
    if let Some(value) = value {
        *target = value;
    }
}

#[cfg(test)]
mod tests {
    use candidature_map_analytics_models::{
        CategoryFilters, CountBucketFilters, DEFAULT_GROUPING_THRESHOLD, DEFAULT_RADIUS_KM,
    };

    use super::*;

    fn filter_state(toml_str: &str) -> FilterState {
        let mut state = FilterState::default();
        FilterConfig::parse(toml_str)
            .unwrap()
            .apply(&mut state)
            .unwrap();
        state
    }

    #[test]
    fn empty_config_keeps_defaults() {
        let state = filter_state("");
        assert_eq!(state, FilterState::default());
        assert!((state.radius_km() - DEFAULT_RADIUS_KM).abs() < f64::EPSILON);
        assert_eq!(state.grouping_threshold, DEFAULT_GROUPING_THRESHOLD);
    }

    #[test]
    fn full_config_overrides_everything() {
        let toml_str = r#"
radius_km = 300.0
grouping_threshold = 0
center = { lat = 47.9029, lng = 1.9093 }

[categories]
post_bac = false
autre = false

[buckets]
six_plus = false
"#;
        let state = filter_state(toml_str);

        assert!((state.radius_km() - 300.0).abs() < f64::EPSILON);
        assert_eq!(state.grouping_threshold, 0);
        assert!((state.center.lat() - 47.9029).abs() < f64::EPSILON);
        assert_eq!(
            state.categories,
            CategoryFilters {
                post_bac: false,
                generale: true,
                sti2d: true,
                autre: false,
            }
        );
        assert_eq!(
            state.buckets,
            CountBucketFilters {
                six_plus: false,
                ..CountBucketFilters::ALL
            }
        );
    }

    #[test]
    fn apply_only_touches_keys_present() {
        let mut state = FilterState::default().with_radius_km(120.0).unwrap();
        state.categories.sti2d = false;
        state.buckets.one_to_two = false;

        FilterConfig::parse("grouping_threshold = 7\n[categories]\ngenerale = false")
            .unwrap()
            .apply(&mut state)
            .unwrap();

        assert!((state.radius_km() - 120.0).abs() < f64::EPSILON);
        assert_eq!(state.grouping_threshold, 7);
        assert!(!state.categories.generale);
        assert!(!state.categories.sti2d);
        assert!(state.categories.post_bac);
        assert!(!state.buckets.one_to_two);
        assert!(state.buckets.six_plus);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            FilterConfig::parse("radius = 10.0"),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            FilterConfig::parse("[categories]\nbts = true"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn out_of_range_center_is_rejected() {
        assert!(FilterConfig::parse("center = { lat = 95.0, lng = 0.0 }").is_err());
    }

    #[test]
    fn negative_radius_leaves_state_untouched() {
        let config = FilterConfig::parse("radius_km = -1.0\ngrouping_threshold = 9").unwrap();
        let mut state = FilterState::default();
        assert_eq!(
            config.apply(&mut state),
            Err(FilterError::InvalidRadius(-1.0))
        );
        assert_eq!(state, FilterState::default());
    }
}

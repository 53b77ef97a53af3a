#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregate, filter and view types for the candidature map engine.
//!
//! Aggregates ([`InstitutionAggregate`], [`DepartmentPostBacAggregate`]) are
//! built once per dataset load. [`FilterState`] is the single piece of
//! mutable configuration; every view type here is recomputed from the two
//! whenever the filters change.

pub mod filter;
pub mod view;

use std::collections::BTreeMap;
use std::collections::btree_map;

use candidature_map_candidature_models::Filiere;
use candidature_map_geography_models::DepartmentCode;
use serde::{Deserialize, Serialize};

pub use filter::{
    CategoryFilters, CountBucket, CountBucketFilters, DEFAULT_GROUPING_THRESHOLD,
    DEFAULT_RADIUS_KM, FilterError, FilterState,
};
pub use view::{
    ChartCategory, ChartLabel, ChartSeries, DepartmentBucket, DepartmentChart, FilteredCount,
    GroupedDepartment, Marker, MarkerColor, MarkerKind,
};

/// Applications counted per track.
///
/// The per-track counts always sum to `total`: counts can only grow
/// through [`CategoryCount::record`] or be built from their parts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    total: u64,
    generale: u64,
    sti2d: u64,
    autre: u64,
}

impl CategoryCount {
    /// Builds a count from its per-track parts.
    #[must_use]
    pub const fn new(generale: u64, sti2d: u64, autre: u64) -> Self {
        Self {
            total: generale + sti2d + autre,
            generale,
            sti2d,
            autre,
        }
    }

    /// Counts one more application on `filiere`.
    pub const fn record(&mut self, filiere: Filiere) {
        self.total += 1;
        match filiere {
            Filiere::Generale => self.generale += 1,
            Filiere::Sti2d => self.sti2d += 1,
            Filiere::Autre => self.autre += 1,
        }
    }

    /// Total applications.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Applications from the général track.
    #[must_use]
    pub const fn generale(&self) -> u64 {
        self.generale
    }

    /// Applications from the STI2D track.
    #[must_use]
    pub const fn sti2d(&self) -> u64 {
        self.sti2d
    }

    /// Applications from any other track.
    #[must_use]
    pub const fn autre(&self) -> u64 {
        self.autre
    }

    /// Applications for a given track.
    #[must_use]
    pub const fn count(&self, filiere: Filiere) -> u64 {
        match filiere {
            Filiere::Generale => self.generale,
            Filiere::Sti2d => self.sti2d,
            Filiere::Autre => self.autre,
        }
    }
}

/// Applications per origin institution (UAI), for lycée applicants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InstitutionAggregate(BTreeMap<String, CategoryCount>);

impl InstitutionAggregate {
    /// Counts one application for `uai`.
    pub fn record(&mut self, uai: String, filiere: Filiere) {
        self.0.entry(uai).or_default().record(filiere);
    }

    /// Counts for an institution, if it received any application.
    #[must_use]
    pub fn get(&self, uai: &str) -> Option<&CategoryCount> {
        self.0.get(uai)
    }

    /// Iterates institutions in UAI order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, CategoryCount> {
        self.0.iter()
    }

    /// Number of institutions with at least one application.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no institution received an application.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all institution counts.
    #[must_use]
    pub fn grand_total(&self) -> u64 {
        self.0.values().map(CategoryCount::total).sum()
    }
}

impl FromIterator<(String, CategoryCount)> for InstitutionAggregate {
    fn from_iter<T: IntoIterator<Item = (String, CategoryCount)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a InstitutionAggregate {
    type Item = (&'a String, &'a CategoryCount);
    type IntoIter = btree_map::Iter<'a, String, CategoryCount>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Post-bac applications per department of origin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DepartmentPostBacAggregate(BTreeMap<DepartmentCode, CategoryCount>);

impl DepartmentPostBacAggregate {
    /// Counts one post-bac application for `department`.
    pub fn record(&mut self, department: DepartmentCode, filiere: Filiere) {
        self.0.entry(department).or_default().record(filiere);
    }

    /// Counts for a department, if it received any post-bac application.
    #[must_use]
    pub fn get(&self, department: &DepartmentCode) -> Option<&CategoryCount> {
        self.0.get(department)
    }

    /// Iterates departments in code order.
    pub fn iter(&self) -> btree_map::Iter<'_, DepartmentCode, CategoryCount> {
        self.0.iter()
    }

    /// Number of departments with at least one post-bac application.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no department received a post-bac application.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all department counts.
    #[must_use]
    pub fn grand_total(&self) -> u64 {
        self.0.values().map(CategoryCount::total).sum()
    }
}

impl FromIterator<(DepartmentCode, CategoryCount)> for DepartmentPostBacAggregate {
    fn from_iter<T: IntoIterator<Item = (DepartmentCode, CategoryCount)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a DepartmentPostBacAggregate {
    type Item = (&'a DepartmentCode, &'a CategoryCount);
    type IntoIter = btree_map::Iter<'a, DepartmentCode, CategoryCount>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// What happened to each record during aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationReport {
    /// Records read.
    pub records: u64,
    /// Records counted against an institution.
    pub lycee: u64,
    /// Records counted against a department (post-bac).
    pub post_bac: u64,
    /// Lycée records with no institution code in their history.
    pub dropped_missing_uai: u64,
    /// Post-bac records with no postal code in their two latest years.
    pub dropped_missing_postal_code: u64,
    /// Post-bac records whose postal code is not five digits.
    pub dropped_malformed_postal_code: u64,
}

impl AggregationReport {
    /// Records that were not counted anywhere.
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.dropped_missing_uai
            + self.dropped_missing_postal_code
            + self.dropped_malformed_postal_code
    }
}

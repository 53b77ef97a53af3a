#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation and filtering engine for the candidature map.
//!
//! Records are classified and aggregated once, when a [`CandidatureMap`] is
//! built. Every view (markers, department buckets, chart) is then a pure
//! function of those aggregates and a caller-owned
//! [`FilterState`](candidature_map_analytics_models::FilterState), recomputed
//! on demand after each filter change.

pub mod aggregate;
pub mod classify;
pub mod grouping;
pub mod markers;
pub mod reduce;

use std::collections::BTreeMap;

use candidature_map_analytics_models::{
    AggregationReport, DepartmentBucket, DepartmentChart, DepartmentPostBacAggregate,
    FilterState, FilteredCount, InstitutionAggregate, Marker,
};
use candidature_map_candidature_models::Candidature;
use candidature_map_geography_models::{DepartmentCode, Institution};
use candidature_map_spatial::GeocodeIndex;

pub use aggregate::{Aggregates, aggregate};
pub use reduce::{EntityKind, filtered_count};

/// The loaded datasets and their frozen aggregates.
///
/// Holds no filter state: callers own a single [`FilterState`], mutate it,
/// then ask for a fresh view.
#[derive(Debug, Clone)]
pub struct CandidatureMap {
    institutions: Vec<Institution>,
    geocodes: GeocodeIndex,
    aggregates: Aggregates,
}

impl CandidatureMap {
    /// Aggregates `records` and freezes the result alongside the reference
    /// datasets.
    #[must_use]
    pub fn new(
        institutions: Vec<Institution>,
        geocodes: GeocodeIndex,
        records: &[Candidature],
    ) -> Self {
        Self::from_aggregates(institutions, geocodes, aggregate(records))
    }

    /// Builds the map from already computed aggregates.
    #[must_use]
    pub fn from_aggregates(
        institutions: Vec<Institution>,
        geocodes: GeocodeIndex,
        aggregates: Aggregates,
    ) -> Self {
        let unplaced: Vec<&str> = aggregates
            .post_bac
            .iter()
            .filter(|(department, _)| geocodes.lookup_department(department).is_none())
            .map(|(department, _)| department.as_str())
            .collect();
        if !unplaced.is_empty() {
            log::warn!(
                "{} post-bac departments have no geocode and will not appear on the map or chart: {}",
                unplaced.len(),
                unplaced.join(", ")
            );
        }

        let known = institutions
            .iter()
            .filter(|institution| aggregates.institutions.get(&institution.uai).is_some())
            .count();
        if known < aggregates.institutions.len() {
            log::warn!(
                "{} institutions received applications but are missing from the institution list",
                aggregates.institutions.len() - known
            );
        }

        Self {
            institutions,
            geocodes,
            aggregates,
        }
    }

    /// Reference institutions.
    #[must_use]
    pub fn institutions(&self) -> &[Institution] {
        &self.institutions
    }

    /// Lycée applications per institution.
    #[must_use]
    pub const fn institution_aggregate(&self) -> &InstitutionAggregate {
        &self.aggregates.institutions
    }

    /// Post-bac applications per department.
    #[must_use]
    pub const fn post_bac_aggregate(&self) -> &DepartmentPostBacAggregate {
        &self.aggregates.post_bac
    }

    /// Outcome counters of the aggregation pass.
    #[must_use]
    pub const fn report(&self) -> &AggregationReport {
        &self.aggregates.report
    }

    /// Filtered counts of one institution, if it received applications.
    #[must_use]
    pub fn filtered_institution(&self, uai: &str, filters: &FilterState) -> Option<FilteredCount> {
        let count = self.aggregates.institutions.get(&uai.to_uppercase())?;
        Some(filtered_count(count, EntityKind::Institution, &filters.categories))
    }

    /// Filtered post-bac counts of one department, if it has any.
    #[must_use]
    pub fn filtered_department(
        &self,
        department: &DepartmentCode,
        filters: &FilterState,
    ) -> Option<FilteredCount> {
        let count = self.aggregates.post_bac.get(department)?;
        Some(filtered_count(count, EntityKind::PostBac, &filters.categories))
    }

    /// Visible markers: institutions first, then post-bac departments.
    #[must_use]
    pub fn markers(&self, filters: &FilterState) -> Vec<Marker> {
        let mut markers =
            markers::institution_markers(&self.institutions, &self.aggregates.institutions, filters);
        markers.extend(markers::post_bac_markers(
            &self.aggregates.post_bac,
            &self.geocodes,
            filters,
        ));
        log::debug!("Computed {} visible markers", markers.len());
        markers
    }

    /// Per-department totals inside the search circle.
    #[must_use]
    pub fn department_buckets(&self, filters: &FilterState) -> BTreeMap<DepartmentCode, DepartmentBucket> {
        grouping::group_by_department(
            &self.institutions,
            &self.aggregates.institutions,
            &self.aggregates.post_bac,
            &self.geocodes,
            filters,
        )
    }

    /// Chart rows (grouped by the threshold) and their stacked series.
    #[must_use]
    pub fn chart(&self, filters: &FilterState) -> DepartmentChart {
        let departments = grouping::apply_grouping_threshold(
            self.department_buckets(filters),
            filters.grouping_threshold,
        );
        let series = grouping::chart_series(&departments, &filters.categories);
        DepartmentChart {
            departments,
            series,
        }
    }
}

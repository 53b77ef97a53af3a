//! Department-level grouping for the chart.

use std::collections::BTreeMap;

use candidature_map_analytics_models::{
    CategoryFilters, ChartCategory, ChartLabel, ChartSeries, DepartmentBucket,
    DepartmentPostBacAggregate, FilterState, GroupedDepartment, InstitutionAggregate,
};
use candidature_map_geography_models::{DepartmentCode, Institution};
use candidature_map_spatial::{GeocodeIndex, within_radius};

use crate::reduce::{EntityKind, filtered_count};

/// Sums filtered counts per department, for entities inside the search
/// circle.
///
/// Institutions contribute their track counts to their own department.
/// Post-bac departments, placed at their `<code>000` geocode, contribute
/// their filtered total to `post_bac` and their track counts to the same
/// bucket. Departments with no geocode are skipped.
#[must_use]
pub fn group_by_department(
    institutions: &[Institution],
    institution_aggregate: &InstitutionAggregate,
    post_bac_aggregate: &DepartmentPostBacAggregate,
    geocodes: &GeocodeIndex,
    filters: &FilterState,
) -> BTreeMap<DepartmentCode, DepartmentBucket> {
    let mut buckets: BTreeMap<DepartmentCode, DepartmentBucket> = BTreeMap::new();

    for institution in institutions {
        let Some(count) = institution_aggregate.get(&institution.uai) else {
            continue;
        };
        if !within_radius(filters.center, institution.location, filters.radius_km()) {
            continue;
        }
        let filtered = filtered_count(count, EntityKind::Institution, &filters.categories);
        if filtered.total > 0 {
            *buckets.entry(institution.department.clone()).or_default() += DepartmentBucket {
                post_bac: 0,
                generale: filtered.generale,
                sti2d: filtered.sti2d,
                autre: filtered.autre,
                total: filtered.total,
            };
        }
    }

    for (department, count) in post_bac_aggregate {
        let Some(location) = geocodes.lookup_department(department) else {
            log::debug!("No geocode for post-bac department {department}, skipping");
            continue;
        };
        if !within_radius(filters.center, location, filters.radius_km()) {
            continue;
        }
        let filtered = filtered_count(count, EntityKind::PostBac, &filters.categories);
        if filtered.total > 0 {
            *buckets.entry(department.clone()).or_default() += DepartmentBucket {
                post_bac: filtered.total,
                generale: filtered.generale,
                sti2d: filtered.sti2d,
                autre: filtered.autre,
                total: filtered.total,
            };
        }
    }

    buckets
}

/// Sorts departments by descending total and merges small ones.
///
/// With `threshold > 0`, departments whose total is at or below the
/// threshold are summed into a trailing "Autres" row, emitted only when
/// its total is positive. With `threshold == 0` every department is kept.
/// Ties keep the input order (ascending department code for a `BTreeMap`).
#[must_use]
pub fn apply_grouping_threshold(
    buckets: impl IntoIterator<Item = (DepartmentCode, DepartmentBucket)>,
    threshold: u32,
) -> Vec<GroupedDepartment> {
    let mut rows: Vec<GroupedDepartment> = buckets
        .into_iter()
        .map(|(department, counts)| GroupedDepartment {
            label: ChartLabel::Department(department),
            counts,
        })
        .collect();
    rows.sort_by(|a, b| b.counts.total.cmp(&a.counts.total));

    if threshold == 0 {
        return rows;
    }

    let threshold = u64::from(threshold);
    let (mut kept, merged): (Vec<_>, Vec<_>) = rows
        .into_iter()
        .partition(|row| row.counts.total > threshold);

    let mut others = DepartmentBucket::default();
    for row in &merged {
        others += row.counts;
    }
    if others.total > 0 {
        kept.push(GroupedDepartment {
            label: ChartLabel::Others,
            counts: others,
        });
    }

    kept
}

/// One stacked series per enabled category, aligned with `rows`.
#[must_use]
pub fn chart_series(rows: &[GroupedDepartment], categories: &CategoryFilters) -> Vec<ChartSeries> {
    ChartCategory::all()
        .iter()
        .copied()
        .filter(|category| match category {
            ChartCategory::PostBac => categories.post_bac,
            ChartCategory::Generale => categories.generale,
            ChartCategory::Sti2d => categories.sti2d,
            ChartCategory::Autre => categories.autre,
        })
        .map(|category| ChartSeries {
            category,
            values: rows.iter().map(|row| category.value(&row.counts)).collect(),
        })
        .collect()
}

//! Map marker selection.
//!
//! A marker is shown when its entity lies inside the search circle, its
//! filtered total is positive, and the count bucket of that total is
//! enabled.

use candidature_map_analytics_models::{
    CountBucket, DepartmentPostBacAggregate, FilterState, FilteredCount, InstitutionAggregate,
    Marker, MarkerColor, MarkerKind,
};
use candidature_map_geography_models::{Institution, LatLng};
use candidature_map_spatial::{GeocodeIndex, within_radius};

use crate::reduce::{EntityKind, filtered_count};

/// Base circle radius, in pixels, before adding the application count.
const BASE_MARKER_RADIUS: u64 = 6;

/// Markers for every institution that passes the filters.
#[must_use]
pub fn institution_markers(
    institutions: &[Institution],
    aggregate: &InstitutionAggregate,
    filters: &FilterState,
) -> Vec<Marker> {
    institutions
        .iter()
        .filter_map(|institution| {
            let count = aggregate.get(&institution.uai)?;
            let counts = filtered_count(count, EntityKind::Institution, &filters.categories);
            let bucket = visible_bucket(institution.location, counts, filters)?;

            Some(Marker {
                kind: MarkerKind::Institution {
                    uai: institution.uai.clone(),
                    name: institution.name.clone(),
                    address: institution.address.clone(),
                },
                location: institution.location,
                counts,
                bucket,
                color: MarkerColor::institution(bucket),
                radius: BASE_MARKER_RADIUS + counts.total,
            })
        })
        .collect()
}

/// Markers for every post-bac department that passes the filters.
///
/// Departments without a geocode are not shown.
#[must_use]
pub fn post_bac_markers(
    aggregate: &DepartmentPostBacAggregate,
    geocodes: &GeocodeIndex,
    filters: &FilterState,
) -> Vec<Marker> {
    aggregate
        .iter()
        .filter_map(|(department, count)| {
            let location = geocodes.lookup_department(department)?;
            let counts = filtered_count(count, EntityKind::PostBac, &filters.categories);
            let bucket = visible_bucket(location, counts, filters)?;

            Some(Marker {
                kind: MarkerKind::PostBac {
                    department: department.clone(),
                },
                location,
                counts,
                bucket,
                color: MarkerColor::post_bac(bucket),
                radius: BASE_MARKER_RADIUS + counts.total,
            })
        })
        .collect()
}

fn visible_bucket(
    location: LatLng,
    counts: FilteredCount,
    filters: &FilterState,
) -> Option<CountBucket> {
    if !within_radius(filters.center, location, filters.radius_km()) {
        return None;
    }
    CountBucket::for_total(counts.total).filter(|bucket| filters.buckets.allows(*bucket))
}

#[cfg(test)]
mod tests {
    use candidature_map_analytics_models::{CategoryCount, CategoryFilters, CountBucketFilters};
    use candidature_map_geography_models::{DepartmentCode, GeoEntry};

    use super::*;

    fn point(lat: f64, lng: f64) -> LatLng {
        LatLng::new(lat, lng).unwrap()
    }

    fn institution(uai: &str, location: LatLng) -> Institution {
        Institution {
            uai: uai.to_string(),
            location,
            code_departement: "87".to_string(),
            department: DepartmentCode::from_institution_code("87").unwrap(),
            name: format!("Lycée {uai}"),
            address: Some("1 rue de la Paix".to_string()),
        }
    }

    fn institutions() -> (Vec<Institution>, InstitutionAggregate) {
        let institutions = vec![
            institution("A", point(45.8336, 1.2611)),
            institution("B", point(45.84, 1.27)),
            institution("C", point(45.85, 1.28)),
            institution("D", point(45.86, 1.29)),
        ];
        let aggregate = InstitutionAggregate::from_iter([
            ("A".to_string(), CategoryCount::new(1, 1, 0)),
            ("B".to_string(), CategoryCount::new(2, 1, 1)),
            ("C".to_string(), CategoryCount::new(5, 2, 0)),
        ]);
        (institutions, aggregate)
    }

    fn uais(markers: &[Marker]) -> Vec<&str> {
        markers
            .iter()
            .filter_map(|m| match &m.kind {
                MarkerKind::Institution { uai, .. } => Some(uai.as_str()),
                MarkerKind::PostBac { .. } => None,
            })
            .collect()
    }

    #[test]
    fn institution_markers_carry_tiers() {
        let (institutions, aggregate) = institutions();
        let markers = institution_markers(&institutions, &aggregate, &FilterState::default());

        assert_eq!(uais(&markers), ["A", "B", "C"]);
        assert_eq!(markers[0].color, MarkerColor::Blue);
        assert_eq!(markers[0].radius, 8);
        assert_eq!(markers[1].color, MarkerColor::Orange);
        assert_eq!(markers[1].bucket, CountBucket::ThreeToFive);
        assert_eq!(markers[2].color, MarkerColor::Red);
        assert_eq!(markers[2].radius, 13);
    }

    #[test]
    fn disabled_buckets_hide_markers() {
        let (institutions, aggregate) = institutions();
        let mut filters = FilterState::default();
        filters.buckets = CountBucketFilters {
            three_to_five: false,
            ..CountBucketFilters::ALL
        };
        let markers = institution_markers(&institutions, &aggregate, &filters);
        assert_eq!(uais(&markers), ["A", "C"]);
    }

    #[test]
    fn bucket_uses_filtered_total() {
        let (institutions, aggregate) = institutions();
        let mut filters = FilterState::default().with_categories(CategoryFilters {
            generale: false,
            ..CategoryFilters::ALL
        });
        filters.buckets = CountBucketFilters {
            one_to_two: true,
            three_to_five: false,
            six_plus: false,
        };
        let markers = institution_markers(&institutions, &aggregate, &filters);

        assert_eq!(uais(&markers), ["A", "B", "C"]);
        assert!(markers.iter().all(|m| m.counts.generale == 0));
    }

    #[test]
    fn post_bac_markers_need_geocode_and_toggle() {
        let aggregate = DepartmentPostBacAggregate::from_iter([
            (
                DepartmentCode::from_postal_code("87000").unwrap(),
                CategoryCount::new(6, 2, 2),
            ),
            (
                DepartmentCode::from_postal_code("23000").unwrap(),
                CategoryCount::new(1, 0, 0),
            ),
        ]);
        let geocodes = GeocodeIndex::from_entries(vec![GeoEntry {
            postal_code: "87000".to_string(),
            location: point(45.8336, 1.2611),
        }]);

        let markers = post_bac_markers(&aggregate, &geocodes, &FilterState::default());
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].color, MarkerColor::Purple);
        assert_eq!(markers[0].counts.post_bac, 10);

        let hidden = FilterState::default().with_categories(CategoryFilters {
            post_bac: false,
            ..CategoryFilters::ALL
        });
        assert!(post_bac_markers(&aggregate, &geocodes, &hidden).is_empty());
    }

    #[test]
    fn cluster_summary_over_markers() {
        let (institutions, aggregate) = institutions();
        let markers = institution_markers(&institutions, &aggregate, &FilterState::default());
        let summary = FilteredCount::sum(markers.iter().map(|m| &m.counts));
        assert_eq!(summary.total, 13);
        assert_eq!(summary.generale, 8);
        assert_eq!(summary.post_bac, 0);
    }
}

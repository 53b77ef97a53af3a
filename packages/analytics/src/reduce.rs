//! Category filtering of a single entity's counts.

use candidature_map_analytics_models::{CategoryCount, CategoryFilters, FilteredCount};
use candidature_map_candidature_models::Filiere;

/// Kind of entity a [`CategoryCount`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A lycée; its applicants are always broken down by track.
    Institution,
    /// A department's post-bac applicants.
    PostBac,
}

/// Applies the category toggles to one entity's counts.
///
/// * Institutions keep only the enabled tracks; the post-bac toggle has no
///   effect on them.
/// * Post-bac entities are suppressed entirely when the post-bac toggle is
///   off. With it on and no track toggle on, the whole total passes through
///   undivided (per-track fields 0). With at least one track toggle on, only
///   the enabled tracks are kept.
#[must_use]
pub fn filtered_count(
    count: &CategoryCount,
    kind: EntityKind,
    filters: &CategoryFilters,
) -> FilteredCount {
    match kind {
        EntityKind::Institution => by_enabled_tracks(count, *filters),
        EntityKind::PostBac if !filters.post_bac => FilteredCount::default(),
        EntityKind::PostBac if !filters.any_track() => FilteredCount {
            total: count.total(),
            post_bac: count.total(),
            ..FilteredCount::default()
        },
        EntityKind::PostBac => {
            let filtered = by_enabled_tracks(count, *filters);
            FilteredCount {
                post_bac: filtered.total,
                ..filtered
            }
        }
    }
}

fn by_enabled_tracks(count: &CategoryCount, filters: CategoryFilters) -> FilteredCount {
    let mut filtered = FilteredCount::default();
    for &filiere in Filiere::all() {
        if !filters.allows(filiere) {
            continue;
        }
        let value = count.count(filiere);
        match filiere {
            Filiere::Generale => filtered.generale = value,
            Filiere::Sti2d => filtered.sti2d = value,
            Filiere::Autre => filtered.autre = value,
        }
        filtered.total += value;
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toggles(post_bac: bool, generale: bool, sti2d: bool, autre: bool) -> CategoryFilters {
        CategoryFilters {
            post_bac,
            generale,
            sti2d,
            autre,
        }
    }

    fn every_combination() -> impl Iterator<Item = CategoryFilters> {
        (0..16_u8).map(|bits| {
            toggles(bits & 1 != 0, bits & 2 != 0, bits & 4 != 0, bits & 8 != 0)
        })
    }

    #[test]
    fn institution_scenario() {
        let count = CategoryCount::new(3, 1, 1);
        let result = filtered_count(
            &count,
            EntityKind::Institution,
            &toggles(false, true, false, true),
        );
        assert_eq!(
            result,
            FilteredCount {
                total: 4,
                generale: 3,
                sti2d: 0,
                autre: 1,
                post_bac: 0,
            }
        );
    }

    #[test]
    fn post_bac_undivided_pass_through() {
        let count = CategoryCount::new(6, 2, 2);
        let result = filtered_count(
            &count,
            EntityKind::PostBac,
            &toggles(true, false, false, false),
        );
        assert_eq!(
            result,
            FilteredCount {
                total: 10,
                generale: 0,
                sti2d: 0,
                autre: 0,
                post_bac: 10,
            }
        );
    }

    #[test]
    fn post_bac_track_breakdown() {
        let count = CategoryCount::new(6, 2, 2);
        let result = filtered_count(
            &count,
            EntityKind::PostBac,
            &toggles(true, true, false, false),
        );
        assert_eq!(
            result,
            FilteredCount {
                total: 6,
                generale: 6,
                sti2d: 0,
                autre: 0,
                post_bac: 6,
            }
        );
    }

    #[test]
    fn all_toggles_on_reproduces_counts() {
        let count = CategoryCount::new(6, 2, 2);
        for kind in [EntityKind::Institution, EntityKind::PostBac] {
            let result = filtered_count(&count, kind, &CategoryFilters::ALL);
            assert_eq!(result.total, count.total());
            assert_eq!(result.generale, count.generale());
            assert_eq!(result.sti2d, count.sti2d());
            assert_eq!(result.autre, count.autre());
        }
    }

    #[test]
    fn post_bac_off_suppresses_post_bac_entities() {
        let count = CategoryCount::new(6, 2, 2);
        for filters in every_combination().filter(|f| !f.post_bac) {
            assert_eq!(
                filtered_count(&count, EntityKind::PostBac, &filters),
                FilteredCount::default(),
                "{filters:?}"
            );
        }
    }

    #[test]
    fn post_bac_toggle_ignored_for_institutions() {
        let count = CategoryCount::new(3, 1, 1);
        for filters in every_combination() {
            let with = filtered_count(
                &count,
                EntityKind::Institution,
                &CategoryFilters {
                    post_bac: true,
                    ..filters
                },
            );
            let without = filtered_count(
                &count,
                EntityKind::Institution,
                &CategoryFilters {
                    post_bac: false,
                    ..filters
                },
            );
            assert_eq!(with, without);
            assert_eq!(with.post_bac, 0);
            assert_eq!(with.generale + with.sti2d + with.autre, with.total);
        }
    }

    #[test]
    fn single_track_keeps_only_that_track() {
        let count = CategoryCount::new(3, 1, 2);
        for &filiere in Filiere::all() {
            let filters = CategoryFilters {
                generale: filiere == Filiere::Generale,
                sti2d: filiere == Filiere::Sti2d,
                autre: filiere == Filiere::Autre,
                post_bac: true,
            };
            for kind in [EntityKind::Institution, EntityKind::PostBac] {
                let result = filtered_count(&count, kind, &filters);
                assert_eq!(result.total, count.count(filiere), "{filiere} {kind:?}");
                for &other in Filiere::all() {
                    let kept = match other {
                        Filiere::Generale => result.generale,
                        Filiere::Sti2d => result.sti2d,
                        Filiere::Autre => result.autre,
                    };
                    let expected = if other == filiere { count.count(other) } else { 0 };
                    assert_eq!(kept, expected, "{filiere} {kind:?} {other}");
                }
            }
        }
    }

    #[test]
    fn nothing_selected_is_all_zero() {
        let count = CategoryCount::new(3, 1, 1);
        for kind in [EntityKind::Institution, EntityKind::PostBac] {
            assert_eq!(
                filtered_count(&count, kind, &CategoryFilters::NONE),
                FilteredCount::default()
            );
        }
    }
}

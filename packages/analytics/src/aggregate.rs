//! One-pass aggregation of application records.
//!
//! Lycée applicants are counted against their latest institution; post-bac
//! applicants against the department of their most recent postal code.
//! Records are independent of each other, so the result does not depend on
//! input order.

use candidature_map_analytics_models::{
    AggregationReport, DepartmentPostBacAggregate, InstitutionAggregate,
};
use candidature_map_candidature_models::Candidature;

use crate::classify;

/// Frozen result of aggregating a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregates {
    /// Lycée applications per institution.
    pub institutions: InstitutionAggregate,
    /// Post-bac applications per department.
    pub post_bac: DepartmentPostBacAggregate,
    /// Per-record outcome counters.
    pub report: AggregationReport,
}

/// Folds all records into per-institution and per-department counts.
#[must_use]
pub fn aggregate<'a>(records: impl IntoIterator<Item = &'a Candidature>) -> Aggregates {
    let mut aggregates = Aggregates::default();

    for record in records {
        aggregates.report.records += 1;
        let filiere = classify::filiere(record);

        if classify::is_post_bac(record) {
            let Some(postal_code) = classify::recent_postal_code(record) else {
                aggregates.report.dropped_missing_postal_code += 1;
                continue;
            };
            match classify::department_from_postal_code(postal_code) {
                Ok(department) => {
                    aggregates.post_bac.record(department, filiere);
                    aggregates.report.post_bac += 1;
                }
                Err(e) => {
                    log::debug!("Dropping post-bac record: {e}");
                    aggregates.report.dropped_malformed_postal_code += 1;
                }
            }
        } else {
            let Some(uai) = classify::latest_uai(record) else {
                aggregates.report.dropped_missing_uai += 1;
                continue;
            };
            aggregates.institutions.record(uai, filiere);
            aggregates.report.lycee += 1;
        }
    }

    let report = &aggregates.report;
    if report.dropped_malformed_postal_code > 0 {
        log::warn!(
            "{} post-bac records had a malformed postal code and were not counted",
            report.dropped_malformed_postal_code
        );
    }
    log::info!(
        "Aggregated {} records: {} lycée ({} institutions), {} post-bac ({} departments), {} dropped",
        report.records,
        report.lycee,
        aggregates.institutions.len(),
        report.post_bac,
        aggregates.post_bac.len(),
        report.dropped(),
    );

    aggregates
}

#[cfg(test)]
mod tests {
    use candidature_map_analytics_models::CategoryCount;
    use candidature_map_candidature_models::{Baccalaureat, Scolarite};
    use candidature_map_geography_models::DepartmentCode;

    use super::*;

    fn lycee(uai: &str, serie: &str) -> Candidature {
        Candidature {
            scolarite: vec![Scolarite {
                uai: Some(uai.to_string()),
                ..Scolarite::default()
            }],
            baccalaureat: Some(Baccalaureat {
                serie_code: Some(serie.to_string()),
                type_diplome_code: Some(4),
            }),
        }
    }

    fn post_bac(postal_code: &str, serie: &str) -> Candidature {
        Candidature {
            scolarite: vec![Scolarite {
                code_postal: Some(postal_code.to_string()),
                ..Scolarite::default()
            }],
            baccalaureat: Some(Baccalaureat {
                serie_code: Some(serie.to_string()),
                type_diplome_code: Some(1),
            }),
        }
    }

    fn dataset() -> Vec<Candidature> {
        vec![
            lycee("0123456a", "S"),
            lycee("0123456A", "STI2D"),
            lycee("0123456A", "Générale"),
            lycee("0123456A", "STMG"),
            lycee("0123456A", "ES"),
            lycee("0870015U", "STI2D"),
            post_bac("45000", "S"),
            post_bac("45100", "STI2D"),
            post_bac("87000", "STL"),
            post_bac("4500", "S"),
            Candidature {
                scolarite: vec![],
                baccalaureat: Some(Baccalaureat {
                    serie_code: None,
                    type_diplome_code: Some(2),
                }),
            },
            Candidature::default(),
        ]
    }

    #[test]
    fn counts_each_branch() {
        let aggregates = aggregate(&dataset());

        assert_eq!(
            aggregates.institutions.get("0123456A"),
            Some(&CategoryCount::new(3, 1, 1))
        );
        assert_eq!(
            aggregates.institutions.get("0870015U"),
            Some(&CategoryCount::new(0, 1, 0))
        );

        let loiret = DepartmentCode::from_postal_code("45000").unwrap();
        let haute_vienne = DepartmentCode::from_postal_code("87000").unwrap();
        assert_eq!(
            aggregates.post_bac.get(&loiret),
            Some(&CategoryCount::new(1, 1, 0))
        );
        assert_eq!(
            aggregates.post_bac.get(&haute_vienne),
            Some(&CategoryCount::new(0, 0, 1))
        );
        assert_eq!(aggregates.post_bac.len(), 2);
    }

    #[test]
    fn report_accounts_for_every_record() {
        let aggregates = aggregate(&dataset());
        let report = aggregates.report;

        assert_eq!(report.records, 12);
        assert_eq!(report.lycee, 6);
        assert_eq!(report.post_bac, 3);
        assert_eq!(report.dropped_malformed_postal_code, 1);
        assert_eq!(report.dropped_missing_postal_code, 1);
        assert_eq!(report.dropped_missing_uai, 1);
        assert_eq!(report.lycee + report.post_bac + report.dropped(), report.records);
        assert_eq!(aggregates.institutions.grand_total(), report.lycee);
        assert_eq!(aggregates.post_bac.grand_total(), report.post_bac);
    }

    #[test]
    fn parts_sum_to_total() {
        let aggregates = aggregate(&dataset());
        let counts = aggregates
            .institutions
            .iter()
            .map(|(_, c)| c)
            .chain(aggregates.post_bac.iter().map(|(_, c)| c));
        for count in counts {
            assert_eq!(count.generale() + count.sti2d() + count.autre(), count.total());
        }
    }

    /// Fisher-Yates driven by a fixed linear congruential generator.
    fn shuffle<T>(items: &mut [T], seed: u64) {
        let mut state = seed;
        for i in (1..items.len()).rev() {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            let j = usize::try_from((state >> 33) % (i as u64 + 1)).unwrap();
            items.swap(i, j);
        }
    }

    #[test]
    fn order_independent() {
        let expected = aggregate(&dataset());

        for seed in 0..32 {
            let mut shuffled = dataset();
            shuffled.extend(dataset());
            shuffle(&mut shuffled, seed);

            let mut doubled = dataset();
            doubled.extend(dataset());
            assert_eq!(aggregate(&shuffled), aggregate(&doubled), "seed {seed}");
        }

        let mut reversed = dataset();
        reversed.reverse();
        assert_eq!(aggregate(&reversed), expected);
    }

    #[test]
    fn empty_input() {
        let aggregates = aggregate(&[]);
        assert!(aggregates.institutions.is_empty());
        assert!(aggregates.post_bac.is_empty());
        assert_eq!(aggregates.report, AggregationReport::default());
    }
}

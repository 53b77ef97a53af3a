#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Application record types and the track (filière) taxonomy.
//!
//! A [`Candidature`] is one student's application as exported by the
//! admissions platform: an ordered schooling history plus an optional
//! baccalauréat descriptor. These types are read-only inputs to the
//! aggregation engine.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Track (filière) an applicant followed for the baccalauréat.
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
pub enum Filiere {
    /// Général baccalauréat, including the pre-reform S, ES and L series.
    #[serde(rename = "Générale")]
    #[strum(serialize = "Générale")]
    Generale,
    /// Sciences et technologies de l'industrie et du développement durable.
    #[serde(rename = "STI2D")]
    #[strum(serialize = "STI2D")]
    Sti2d,
    /// Every other series, or no diploma descriptor at all.
    #[serde(rename = "Autre")]
    #[strum(serialize = "Autre")]
    Autre,
}

impl Filiere {
    /// Returns all variants of this enum, in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Generale, Self::Sti2d, Self::Autre]
    }
}

/// Diploma-type codes carried by `TypeDiplomeCode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiplomaType {
    /// Code 1: baccalauréat already obtained.
    Obtained,
    /// Code 2: foreign diploma recognised as equivalent.
    ForeignEquivalent,
    /// Code 4: baccalauréat in preparation (current lycée student).
    InPreparation,
    /// Any other code.
    Other(u8),
}

impl DiplomaType {
    /// Maps a raw `TypeDiplomeCode` value.
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        match code {
            1 => Self::Obtained,
            2 => Self::ForeignEquivalent,
            4 => Self::InPreparation,
            other => Self::Other(other),
        }
    }

    /// Whether the applicant already holds a diploma (codes 1 and 2).
    #[must_use]
    pub const fn is_post_bac(self) -> bool {
        matches!(self, Self::Obtained | Self::ForeignEquivalent)
    }
}

/// Baccalauréat descriptor of an application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Baccalaureat {
    /// Raw series code (`SerieDiplomeCode`), e.g. `"STI2D"`, `"S"`, `"Générale"`.
    pub serie_code: Option<String>,
    /// Raw diploma-type code (`TypeDiplomeCode`).
    pub type_diplome_code: Option<u8>,
}

impl Baccalaureat {
    /// Returns the decoded diploma type, if a code is present.
    #[must_use]
    pub fn diploma_type(&self) -> Option<DiplomaType> {
        self.type_diplome_code.map(DiplomaType::from_code)
    }
}

/// One year of schooling history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scolarite {
    /// Institution code (UAI) of the school attended that year.
    pub uai: Option<String>,
    /// Postal code of that school.
    pub code_postal: Option<String>,
    /// School-year label (e.g. `"2023-2024"`).
    pub annee_scolaire: Option<String>,
}

impl Scolarite {
    /// Parses the starting year out of the school-year label.
    ///
    /// Accepts `"2023-2024"`, `"2023/2024"` and `"2023"`.
    #[must_use]
    pub fn start_year(&self) -> Option<u16> {
        let label = self.annee_scolaire.as_deref()?.trim();
        let head = label.split(['-', '/']).next()?.trim();
        if head.len() != 4 {
            return None;
        }
        head.parse().ok()
    }
}

/// A single application record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidature {
    /// Schooling history, index 0 being the most recent year.
    pub scolarite: Vec<Scolarite>,
    /// Baccalauréat descriptor, absent for some records.
    pub baccalaureat: Option<Baccalaureat>,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn filiere_display_matches_labels() {
        assert_eq!(Filiere::Generale.to_string(), "Générale");
        assert_eq!(Filiere::Sti2d.to_string(), "STI2D");
        assert_eq!(Filiere::Autre.to_string(), "Autre");
        assert_eq!(Filiere::from_str("STI2D").unwrap(), Filiere::Sti2d);
    }

    #[test]
    fn filiere_serializes_with_accent() {
        let json = serde_json::to_string(&Filiere::Generale).unwrap();
        assert_eq!(json, "\"Générale\"");
    }

    #[test]
    fn diploma_codes() {
        assert!(DiplomaType::from_code(1).is_post_bac());
        assert!(DiplomaType::from_code(2).is_post_bac());
        assert!(!DiplomaType::from_code(4).is_post_bac());
        assert_eq!(DiplomaType::from_code(9), DiplomaType::Other(9));
        assert!(!DiplomaType::Other(3).is_post_bac());
    }

    #[test]
    fn school_year_labels() {
        let entry = |label: &str| Scolarite {
            annee_scolaire: Some(label.to_string()),
            ..Scolarite::default()
        };
        assert_eq!(entry("2023-2024").start_year(), Some(2023));
        assert_eq!(entry("2021/2022").start_year(), Some(2021));
        assert_eq!(entry(" 2020 ").start_year(), Some(2020));
        assert_eq!(entry("n/a").start_year(), None);
        assert_eq!(Scolarite::default().start_year(), None);
    }
}

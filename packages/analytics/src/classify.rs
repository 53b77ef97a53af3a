//! Record classification.
//!
//! Derives the track, the post-bac status and the identifying keys
//! (institution code, postal code, department) of an application record.
//! The classifier trusts `scolarite[0]` to be the most recent year; the
//! loader is responsible for that ordering.

use candidature_map_candidature_models::{Baccalaureat, Candidature, DiplomaType, Filiere};
use candidature_map_geography_models::{DepartmentCode, DepartmentCodeError};

/// Series codes of the général track (pre- and post-reform).
const GENERALE_SERIES: &[&str] = &["S", "ES", "L", "GÉNÉRALE"];

/// Number of schooling years considered when locating a post-bac applicant.
const RECENT_YEARS: usize = 2;

/// Maps the baccalauréat series code to a track.
///
/// Missing descriptors and unknown codes fall back to [`Filiere::Autre`].
#[must_use]
pub fn filiere(candidature: &Candidature) -> Filiere {
    let Some(serie) = candidature
        .baccalaureat
        .as_ref()
        .and_then(|bac| bac.serie_code.as_deref())
    else {
        return Filiere::Autre;
    };

    let serie = serie.trim().to_uppercase();
    if serie == "STI2D" {
        Filiere::Sti2d
    } else if GENERALE_SERIES.contains(&serie.as_str()) {
        Filiere::Generale
    } else {
        Filiere::Autre
    }
}

/// Whether the applicant already holds a baccalauréat (type codes 1 and 2).
#[must_use]
pub fn is_post_bac(candidature: &Candidature) -> bool {
    candidature
        .baccalaureat
        .as_ref()
        .and_then(Baccalaureat::diploma_type)
        .is_some_and(DiplomaType::is_post_bac)
}

/// First non-empty institution code in the schooling history, uppercased.
#[must_use]
pub fn latest_uai(candidature: &Candidature) -> Option<String> {
    candidature
        .scolarite
        .iter()
        .filter_map(|year| year.uai.as_deref())
        .map(str::trim)
        .find(|uai| !uai.is_empty())
        .map(str::to_uppercase)
}

/// First non-empty postal code among the two most recent schooling years.
#[must_use]
pub fn recent_postal_code(candidature: &Candidature) -> Option<&str> {
    candidature
        .scolarite
        .iter()
        .take(RECENT_YEARS)
        .filter_map(|year| year.code_postal.as_deref())
        .map(str::trim)
        .find(|code| !code.is_empty())
}

/// Department of a postal code (its first two digits).
///
/// # Errors
///
/// Returns [`DepartmentCodeError::MalformedPostalCode`] unless the postal
/// code is exactly five digits.
pub fn department_from_postal_code(postal_code: &str) -> Result<DepartmentCode, DepartmentCodeError> {
    DepartmentCode::from_postal_code(postal_code)
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loaders for the three JSON exports the map is built from: application
//! records, lycées, and the postal geocoding table.
//!
//! Malformed lycées and geocoding rows are skipped with a warning; a file
//! that is unreadable or not a JSON array fails the whole load.

mod raw;

use std::cmp::Reverse;
use std::path::{Path, PathBuf};

use candidature_map_candidature_models::{Candidature, Scolarite};
use candidature_map_geography_models::{DepartmentCode, GeoEntry, Institution, LatLng};

use crate::raw::{RawCandidature, RawGeoEntry, RawInstitution};

/// Default location of the lycée export.
pub const DEFAULT_INSTITUTIONS_PATH: &str = "data/lycees.json";

/// Default location of the application export.
pub const DEFAULT_CANDIDATURES_PATH: &str = "data/candidatures.json";

/// Default location of the postal geocoding table.
pub const DEFAULT_GEOCODES_PATH: &str = "data/coordonnees.json";

/// Errors that can occur while loading the exports.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The file could not be read.
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not the expected JSON shape.
    #[error("JSON parse error in {}: {source}", path.display())]
    Json {
        /// File being parsed.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// A single record could not be converted.
    #[error("Invalid {dataset} record #{index}: {reason}")]
    InvalidRecord {
        /// Which export the record came from.
        dataset: &'static str,
        /// Position of the record in the export.
        index: usize,
        /// What was wrong with it.
        reason: String,
    },
}

/// File locations of the three exports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    /// Lycée export.
    pub institutions: PathBuf,
    /// Application export.
    pub candidatures: PathBuf,
    /// Postal geocoding table.
    pub geocodes: PathBuf,
}

impl Default for DatasetPaths {
    fn default() -> Self {
        Self {
            institutions: PathBuf::from(DEFAULT_INSTITUTIONS_PATH),
            candidatures: PathBuf::from(DEFAULT_CANDIDATURES_PATH),
            geocodes: PathBuf::from(DEFAULT_GEOCODES_PATH),
        }
    }
}

/// The three exports, parsed.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Valid lycées.
    pub institutions: Vec<Institution>,
    /// Application records, schooling history most recent first.
    pub candidatures: Vec<Candidature>,
    /// Valid geocoding rows.
    pub geocodes: Vec<GeoEntry>,
}

/// Loads all three exports.
///
/// # Errors
///
/// * If any file cannot be read
/// * If any file is not a JSON array of objects
pub fn load_dataset(paths: &DatasetPaths) -> Result<Dataset, IngestError> {
    let dataset = Dataset {
        institutions: load_institutions(&paths.institutions)?,
        candidatures: load_candidatures(&paths.candidatures)?,
        geocodes: load_geocodes(&paths.geocodes)?,
    };
    log::info!(
        "Loaded {} lycées, {} applications, {} geocoding rows",
        dataset.institutions.len(),
        dataset.candidatures.len(),
        dataset.geocodes.len()
    );
    Ok(dataset)
}

/// Reads and parses the application export.
///
/// # Errors
///
/// * If the file cannot be read
/// * If the file is not a JSON array of application objects
pub fn load_candidatures(path: &Path) -> Result<Vec<Candidature>, IngestError> {
    parse_candidatures(&read(path)?).map_err(|source| json_error(path, source))
}

/// Reads and parses the lycée export.
///
/// # Errors
///
/// * If the file cannot be read
/// * If the file is not a JSON array of objects
pub fn load_institutions(path: &Path) -> Result<Vec<Institution>, IngestError> {
    parse_institutions(&read(path)?).map_err(|source| json_error(path, source))
}

/// Reads and parses the postal geocoding table.
///
/// # Errors
///
/// * If the file cannot be read
/// * If the file is not a JSON array of objects
pub fn load_geocodes(path: &Path) -> Result<Vec<GeoEntry>, IngestError> {
    parse_geocodes(&read(path)?).map_err(|source| json_error(path, source))
}

fn json_error(path: &Path, source: serde_json::Error) -> IngestError {
    IngestError::Json {
        path: path.to_path_buf(),
        source,
    }
}

fn read(path: &Path) -> Result<String, IngestError> {
    log::debug!("Reading {}", path.display());
    std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses application records.
///
/// Each record's schooling history is put most recent first (see
/// [`order_schooling`]).
///
/// # Errors
///
/// * If the input is not a JSON array of application objects
pub fn parse_candidatures(json: &str) -> Result<Vec<Candidature>, serde_json::Error> {
    let raw: Vec<RawCandidature> = serde_json::from_str(json)?;
    Ok(raw
        .into_iter()
        .map(|raw| {
            let mut candidature = Candidature::from(raw);
            order_schooling(&mut candidature.scolarite);
            candidature
        })
        .collect())
}

/// Sorts a schooling history by starting year, most recent first.
///
/// Only applied when every entry carries a readable school-year label;
/// otherwise the source order is kept. The sort is stable.
pub fn order_schooling(scolarite: &mut [Scolarite]) {
    if scolarite.iter().all(|year| year.start_year().is_some()) {
        scolarite.sort_by_key(|year| Reverse(year.start_year()));
    }
}

/// Parses the lycée export, skipping unusable entries.
///
/// # Errors
///
/// * If the input is not a JSON array of objects
pub fn parse_institutions(json: &str) -> Result<Vec<Institution>, serde_json::Error> {
    let raw: Vec<RawInstitution> = serde_json::from_str(json)?;
    let total = raw.len();

    let institutions: Vec<Institution> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, raw)| match institution(index, raw) {
            Ok(institution) => Some(institution),
            Err(e) => {
                log::warn!("Skipping lycée: {e}");
                None
            }
        })
        .collect();

    if institutions.len() < total {
        log::warn!(
            "Skipped {} of {total} lycées with missing or invalid fields",
            total - institutions.len()
        );
    }

    Ok(institutions)
}

fn institution(index: usize, raw: RawInstitution) -> Result<Institution, IngestError> {
    let invalid = |reason: String| IngestError::InvalidRecord {
        dataset: "lycée",
        index,
        reason,
    };

    let uai = raw
        .numero_uai
        .as_deref()
        .map(str::trim)
        .filter(|uai| !uai.is_empty())
        .ok_or_else(|| invalid("missing numero_uai".to_string()))?
        .to_uppercase();

    let lat = raw.latitude.as_ref().and_then(raw::NumberOrString::as_f64);
    let lng = raw.longitude.as_ref().and_then(raw::NumberOrString::as_f64);
    let (Some(lat), Some(lng)) = (lat, lng) else {
        return Err(invalid(format!("{uai}: missing or unreadable coordinates")));
    };
    let location = LatLng::new(lat, lng).map_err(|e| invalid(format!("{uai}: {e}")))?;

    let code_departement = raw
        .code_departement
        .map(|code| code.as_text(2))
        .ok_or_else(|| invalid(format!("{uai}: missing code_departement")))?;
    let department = DepartmentCode::from_institution_code(&code_departement)
        .map_err(|e| invalid(format!("{uai}: {e}")))?;

    Ok(Institution {
        name: raw.appellation_officielle.unwrap_or_else(|| uai.clone()),
        uai,
        location,
        code_departement,
        department,
        address: raw.adresse_uai.filter(|address| !address.trim().is_empty()),
    })
}

/// Parses the postal geocoding table, skipping unusable rows.
///
/// # Errors
///
/// * If the input is not a JSON array of objects
pub fn parse_geocodes(json: &str) -> Result<Vec<GeoEntry>, serde_json::Error> {
    let raw: Vec<RawGeoEntry> = serde_json::from_str(json)?;
    let total = raw.len();

    let entries: Vec<GeoEntry> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, raw)| match geo_entry(index, raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping geocoding row: {e}");
                None
            }
        })
        .collect();

    if entries.len() < total {
        log::warn!(
            "Skipped {} of {total} geocoding rows with missing or invalid fields",
            total - entries.len()
        );
    }

    Ok(entries)
}

fn geo_entry(index: usize, raw: RawGeoEntry) -> Result<GeoEntry, IngestError> {
    let invalid = |reason: String| IngestError::InvalidRecord {
        dataset: "geocoding",
        index,
        reason,
    };

    let postal_code = raw
        .code_postal
        .map(|code| code.as_text(5))
        .filter(|code| !code.is_empty())
        .ok_or_else(|| invalid("missing code_postal".to_string()))?;
    let location = raw
        .geopoint
        .ok_or_else(|| invalid(format!("{postal_code}: missing _geopoint")))?
        .parse::<LatLng>()
        .map_err(|e| invalid(format!("{postal_code}: {e}")))?;

    Ok(GeoEntry {
        postal_code,
        location,
    })
}

//! Raw shapes of the upstream JSON exports.
//!
//! Field names follow the exports verbatim. Anything that can be missing
//! is optional here; validation happens when converting to the model
//! types.

use candidature_map_candidature_models::{Baccalaureat, Candidature, Scolarite};
use serde::Deserialize;

/// A value published either as a JSON number or as a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    /// Numeric form (`4`, `47.9`).
    Number(f64),
    /// String form (`"4"`, `"47.9"`).
    Text(String),
}

impl NumberOrString {
    /// Floating point reading, accepting numeric strings.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Small integer code reading (`4`, `4.0` and `"4"` all give 4).
    #[must_use]
    pub fn as_code(&self) -> Option<u8> {
        match self {
            Self::Number(n) => n.to_string().parse().ok(),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Text reading. Numbers are rendered without a fractional part and
    /// left-padded with zeros to `width`, restoring the leading zero that
    /// numeric postal codes (`1000` for `01000`) lose.
    #[must_use]
    pub fn as_text(&self, width: usize) -> String {
        match self {
            Self::Number(n) => format!("{n:0>width$}"),
            Self::Text(s) => s.trim().to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RawCandidature {
    #[serde(rename = "Scolarite", default)]
    pub scolarite: Option<Vec<RawScolarite>>,
    #[serde(rename = "Baccalaureat", default)]
    pub baccalaureat: Option<RawBaccalaureat>,
}

#[derive(Debug, Deserialize)]
pub struct RawScolarite {
    #[serde(rename = "UAIEtablissementorigine", default)]
    pub uai: Option<String>,
    #[serde(rename = "CommuneEtablissementOrigineCodePostal", default)]
    pub code_postal: Option<NumberOrString>,
    #[serde(rename = "AnneeScolaireLibelle", default)]
    pub annee_scolaire: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawBaccalaureat {
    #[serde(rename = "SerieDiplomeCode", default)]
    pub serie_code: Option<String>,
    #[serde(rename = "TypeDiplomeCode", default)]
    pub type_diplome_code: Option<NumberOrString>,
}

impl From<RawCandidature> for Candidature {
    fn from(raw: RawCandidature) -> Self {
        Self {
            scolarite: raw
                .scolarite
                .unwrap_or_default()
                .into_iter()
                .map(|year| Scolarite {
                    uai: year.uai,
                    code_postal: year.code_postal.map(|code| code.as_text(5)),
                    annee_scolaire: year.annee_scolaire,
                })
                .collect(),
            baccalaureat: raw.baccalaureat.map(|bac| Baccalaureat {
                serie_code: bac.serie_code,
                type_diplome_code: bac.type_diplome_code.as_ref().and_then(|code| {
                    let parsed = code.as_code();
                    if parsed.is_none() {
                        log::debug!("Ignoring unreadable TypeDiplomeCode {code:?}");
                    }
                    parsed
                }),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RawInstitution {
    #[serde(default)]
    pub numero_uai: Option<String>,
    #[serde(default)]
    pub latitude: Option<NumberOrString>,
    #[serde(default)]
    pub longitude: Option<NumberOrString>,
    #[serde(default)]
    pub code_departement: Option<NumberOrString>,
    #[serde(default)]
    pub appellation_officielle: Option<String>,
    #[serde(default)]
    pub adresse_uai: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawGeoEntry {
    #[serde(default)]
    pub code_postal: Option<NumberOrString>,
    #[serde(rename = "_geopoint", default)]
    pub geopoint: Option<String>,
}

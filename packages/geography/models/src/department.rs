//! French administrative department codes.
//!
//! Departments are identified by the first two characters of a postal code
//! or of an institution's `code_departement`. Overseas departments (97x)
//! collapse into a single `"97"` bucket; this matches how the geocoding
//! table is keyed (`<department>000`).

use serde::{Deserialize, Serialize};

/// Errors raised when deriving a [`DepartmentCode`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DepartmentCodeError {
    /// Postal code is not exactly five ASCII digits.
    #[error("malformed postal code {0:?}: expected five digits")]
    MalformedPostalCode(String),

    /// Department code does not start with two alphanumeric characters.
    #[error("malformed department code {0:?}")]
    MalformedDepartmentCode(String),
}

/// A two-character department code (e.g. `"45"`, `"2A"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepartmentCode(String);

impl DepartmentCode {
    /// Derives the department from a French postal code.
    ///
    /// # Errors
    ///
    /// Returns [`DepartmentCodeError::MalformedPostalCode`] unless the
    /// trimmed input is exactly five ASCII digits.
    pub fn from_postal_code(postal_code: &str) -> Result<Self, DepartmentCodeError> {
        let trimmed = postal_code.trim();
        if trimmed.len() != 5 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DepartmentCodeError::MalformedPostalCode(
                postal_code.to_string(),
            ));
        }
        Ok(Self(trimmed[..2].to_string()))
    }

    /// Derives the department bucket from an institution's
    /// `code_departement` by keeping its first two characters.
    ///
    /// # Errors
    ///
    /// Returns [`DepartmentCodeError::MalformedDepartmentCode`] if the code
    /// does not start with two ASCII alphanumeric characters.
    pub fn from_institution_code(code: &str) -> Result<Self, DepartmentCodeError> {
        let trimmed = code.trim();
        let prefix = trimmed.get(..2).filter(|p| {
            p.bytes().all(|b| b.is_ascii_alphanumeric())
        });
        prefix.map_or_else(
            || Err(DepartmentCodeError::MalformedDepartmentCode(code.to_string())),
            |p| Ok(Self(p.to_ascii_uppercase())),
        )
    }

    /// Key of the department's representative entry in the geocoding table.
    #[must_use]
    pub fn geocode_key(&self) -> String {
        format!("{}000", self.0)
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DepartmentCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DepartmentCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

//! Derived views handed to rendering collaborators.

use std::ops::AddAssign;

use candidature_map_geography_models::{DepartmentCode, LatLng};
use serde::{Serialize, Serializer};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::filter::CountBucket;

/// Counts after applying the category toggles to one entity.
///
/// Unlike [`crate::CategoryCount`], the per-track fields do not always sum
/// to `total`: an undivided post-bac count keeps its total with every
/// per-track field at 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredCount {
    /// Applications left after filtering.
    pub total: u64,
    /// Général-track applications left after filtering.
    pub generale: u64,
    /// STI2D applications left after filtering.
    pub sti2d: u64,
    /// Other-track applications left after filtering.
    pub autre: u64,
    /// Share of `total` coming from post-bac applicants.
    pub post_bac: u64,
}

impl FilteredCount {
    /// Sums several counts, e.g. the markers of a map cluster.
    pub fn sum<'a>(counts: impl IntoIterator<Item = &'a Self>) -> Self {
        counts.into_iter().fold(Self::default(), |mut acc, count| {
            acc += *count;
            acc
        })
    }
}

impl AddAssign for FilteredCount {
    fn add_assign(&mut self, rhs: Self) {
        self.total += rhs.total;
        self.generale += rhs.generale;
        self.sti2d += rhs.sti2d;
        self.autre += rhs.autre;
        self.post_bac += rhs.post_bac;
    }
}

/// Per-department chart totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentBucket {
    /// Post-bac applications.
    pub post_bac: u64,
    /// Général-track applications.
    pub generale: u64,
    /// STI2D applications.
    pub sti2d: u64,
    /// Other-track applications.
    pub autre: u64,
    /// Total applications.
    pub total: u64,
}

impl AddAssign for DepartmentBucket {
    fn add_assign(&mut self, rhs: Self) {
        self.post_bac += rhs.post_bac;
        self.generale += rhs.generale;
        self.sti2d += rhs.sti2d;
        self.autre += rhs.autre;
        self.total += rhs.total;
    }
}

/// Category axis of a chart row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChartLabel {
    /// A single department.
    Department(DepartmentCode),
    /// Every department at or below the grouping threshold.
    Others,
}

impl std::fmt::Display for ChartLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Department(code) => write!(f, "{code}"),
            Self::Others => write!(f, "Autres"),
        }
    }
}

impl Serialize for ChartLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One chart row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedDepartment {
    /// Department code, or "Autres".
    pub label: ChartLabel,
    /// Totals for that row.
    #[serde(flatten)]
    pub counts: DepartmentBucket,
}

/// Stacked-bar series of the department chart.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, AsRefStr,
)]
pub enum ChartCategory {
    /// Post-bac applicants.
    #[serde(rename = "Post-bac")]
    #[strum(serialize = "Post-bac")]
    PostBac,
    /// Général track.
    #[serde(rename = "Générale")]
    #[strum(serialize = "Générale")]
    Generale,
    /// STI2D track.
    #[serde(rename = "STI2D")]
    #[strum(serialize = "STI2D")]
    Sti2d,
    /// Other tracks.
    #[serde(rename = "Autre")]
    #[strum(serialize = "Autre")]
    Autre,
}

impl ChartCategory {
    /// Returns all variants, in stacking order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::PostBac, Self::Generale, Self::Sti2d, Self::Autre]
    }

    /// The field of a [`DepartmentBucket`] this series plots.
    #[must_use]
    pub const fn value(self, bucket: &DepartmentBucket) -> u64 {
        match self {
            Self::PostBac => bucket.post_bac,
            Self::Generale => bucket.generale,
            Self::Sti2d => bucket.sti2d,
            Self::Autre => bucket.autre,
        }
    }
}

/// One stacked series, with one value per chart row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    /// Series name.
    pub category: ChartCategory,
    /// Values, aligned with [`DepartmentChart::departments`].
    pub values: Vec<u64>,
}

/// Everything the department chart needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentChart {
    /// Rows, sorted by descending total, "Autres" last.
    pub departments: Vec<GroupedDepartment>,
    /// One series per enabled category.
    pub series: Vec<ChartSeries>,
}

/// Marker fill color.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MarkerColor {
    /// Institution, 1-2 applications.
    Blue,
    /// Institution, 3-5 applications.
    Orange,
    /// Institution, 6 or more applications.
    Red,
    /// Post-bac department, 1-2 applications.
    Green,
    /// Post-bac department, 3-5 applications.
    DarkGreen,
    /// Post-bac department, 6 or more applications.
    Purple,
}

impl MarkerColor {
    /// Color of an institution marker in the given bucket.
    #[must_use]
    pub const fn institution(bucket: CountBucket) -> Self {
        match bucket {
            CountBucket::OneToTwo => Self::Blue,
            CountBucket::ThreeToFive => Self::Orange,
            CountBucket::SixPlus => Self::Red,
        }
    }

    /// Color of a post-bac department marker in the given bucket.
    #[must_use]
    pub const fn post_bac(bucket: CountBucket) -> Self {
        match bucket {
            CountBucket::OneToTwo => Self::Green,
            CountBucket::ThreeToFive => Self::DarkGreen,
            CountBucket::SixPlus => Self::Purple,
        }
    }
}

/// What a marker stands for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MarkerKind {
    /// A lycée.
    #[serde(rename_all = "camelCase")]
    Institution {
        /// UAI code.
        uai: String,
        /// Official name.
        name: String,
        /// Postal address.
        address: Option<String>,
    },
    /// Post-bac applicants of one department.
    #[serde(rename_all = "camelCase")]
    PostBac {
        /// Department code.
        department: DepartmentCode,
    },
}

/// A map marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    /// Institution or department.
    pub kind: MarkerKind,
    /// Marker position.
    pub location: LatLng,
    /// Filtered counts shown in the popup.
    pub counts: FilteredCount,
    /// Count bucket of `counts.total`.
    pub bucket: CountBucket,
    /// Fill color.
    pub color: MarkerColor,
    /// Circle radius in pixels.
    pub radius: u64,
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the candidature map.
//!
//! Loads the three JSON exports, builds the aggregates once, applies the
//! filters from an optional TOML file and the command line, then prints
//! the requested view as JSON.

mod config;

use std::path::PathBuf;

use candidature_map_analytics::CandidatureMap;
use candidature_map_analytics_models::{
    AggregationReport, CountBucket, FilterError, FilterState, FilteredCount,
};
use candidature_map_geography_models::LatLng;
use candidature_map_ingest::{
    DEFAULT_CANDIDATURES_PATH, DEFAULT_GEOCODES_PATH, DEFAULT_INSTITUTIONS_PATH, DatasetPaths,
};
use candidature_map_spatial::GeocodeIndex;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use crate::config::FilterConfig;

#[derive(Parser)]
#[command(name = "candidature_map", about = "Where do the applicants come from?")]
struct Cli {
    /// Lycée export
    #[arg(long, default_value = DEFAULT_INSTITUTIONS_PATH)]
    lycees: PathBuf,

    /// Application export
    #[arg(long, default_value = DEFAULT_CANDIDATURES_PATH)]
    candidatures: PathBuf,

    /// Postal geocoding table
    #[arg(long, default_value = DEFAULT_GEOCODES_PATH)]
    coordonnees: PathBuf,

    /// TOML filter configuration, applied before the flags below
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: FilterOverrides,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregation totals, drop report, and the filtered grand total
    Summary,
    /// Departments inside the search circle, grouped by threshold, with stacked series
    Chart,
    /// Visible map markers with their tier and color
    Markers,
}

#[derive(Debug, Default, Args)]
struct FilterOverrides {
    /// Search radius in kilometres
    #[arg(long)]
    radius_km: Option<f64>,

    /// Merge departments with at most this many applications into "Autres" (0 disables)
    #[arg(long)]
    threshold: Option<u32>,

    /// Search circle center as "lat,lon"
    #[arg(long, allow_hyphen_values = true)]
    center: Option<LatLng>,

    /// Hide a category (repeatable)
    #[arg(long, value_enum)]
    hide: Vec<CategoryArg>,

    /// Hide markers in a count bucket (repeatable): 1-2, 3-5 or 6+
    #[arg(long, value_parser = parse_bucket)]
    hide_bucket: Vec<CountBucket>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CategoryArg {
    PostBac,
    Generale,
    Sti2d,
    Autre,
}

fn parse_bucket(s: &str) -> Result<CountBucket, String> {
    s.parse()
        .map_err(|_| format!("expected one of 1-2, 3-5 or 6+, got {s:?}"))
}

impl FilterOverrides {
    fn apply(&self, state: &mut FilterState) -> Result<(), FilterError> {
        if let Some(radius_km) = self.radius_km {
            state.set_radius_km(radius_km)?;
        }
        if let Some(threshold) = self.threshold {
            state.grouping_threshold = threshold;
        }
        if let Some(center) = self.center {
            state.center = center;
        }
        for category in &self.hide {
            match category {
                CategoryArg::PostBac => state.categories.post_bac = false,
                CategoryArg::Generale => state.categories.generale = false,
                CategoryArg::Sti2d => state.categories.sti2d = false,
                CategoryArg::Autre => state.categories.autre = false,
            }
        }
        for bucket in &self.hide_bucket {
            match bucket {
                CountBucket::OneToTwo => state.buckets.one_to_two = false,
                CountBucket::ThreeToFive => state.buckets.three_to_five = false,
                CountBucket::SixPlus => state.buckets.six_plus = false,
            }
        }
        Ok(())
    }
}

impl Cli {
    fn dataset_paths(&self) -> DatasetPaths {
        DatasetPaths {
            institutions: self.lycees.clone(),
            candidatures: self.candidatures.clone(),
            geocodes: self.coordonnees.clone(),
        }
    }

    fn filter_state(&self) -> Result<FilterState, Box<dyn std::error::Error>> {
        let mut state = FilterState::default();
        if let Some(path) = &self.config {
            FilterConfig::load(path)?.apply(&mut state)?;
        }
        self.overrides.apply(&mut state)?;
        Ok(state)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Summary<'a> {
    report: &'a AggregationReport,
    institutions_loaded: usize,
    institutions_with_applications: usize,
    lycee_applications: u64,
    post_bac_departments: usize,
    post_bac_applications: u64,
    filters: &'a FilterState,
    visible_markers: usize,
    visible: FilteredCount,
}

fn summary<'a>(map: &'a CandidatureMap, filters: &'a FilterState) -> Summary<'a> {
    let markers = map.markers(filters);
    Summary {
        report: map.report(),
        institutions_loaded: map.institutions().len(),
        institutions_with_applications: map.institution_aggregate().len(),
        lycee_applications: map.institution_aggregate().grand_total(),
        post_bac_departments: map.post_bac_aggregate().len(),
        post_bac_applications: map.post_bac_aggregate().grand_total(),
        filters,
        visible_markers: markers.len(),
        visible: FilteredCount::sum(markers.iter().map(|marker| &marker.counts)),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let filters = cli.filter_state()?;
    log::debug!("Effective filters: {filters:?}");

    let dataset = candidature_map_ingest::load_dataset(&cli.dataset_paths())?;
    let map = CandidatureMap::new(
        dataset.institutions,
        GeocodeIndex::from_entries(dataset.geocodes),
        &dataset.candidatures,
    );

    let output = match cli.command {
        Commands::Summary => serde_json::to_string_pretty(&summary(&map, &filters))?,
        Commands::Chart => serde_json::to_string_pretty(&map.chart(&filters))?,
        Commands::Markers => serde_json::to_string_pretty(&map.markers(&filters))?,
    };
    println!("{output}");

    Ok(())
}

//! Map configuration loading.
//!
//! Tuning knobs for the pipeline live in an optional `map.toml` next to
//! the dataset file. Every field has a default, so a missing file or a
//! partial file is fine.

use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::association::DEFAULT_CONNECTIONS_PER_REPORT;
use crate::core::viewport::{BudgetTier, ViewportConfig};
use crate::core::Point;

/// Configuration for the map pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MapConfig {
    /// Zoom clamp range.
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Zoom used when centering on a single entity.
    pub focus_zoom: f64,
    /// Map center when the dataset has no located point.
    pub fallback_center: [f64; 2],
    /// Bounding-box padding fraction per axis.
    pub padding_fraction: f64,
    /// Marker budget tiers as (zoom threshold, budget) pairs, highest
    /// threshold first.
    pub budget_tiers: Vec<(f64, usize)>,
    /// Marker budget below every tier threshold.
    pub base_budget: usize,
    /// Connections drawn per report.
    pub connections_per_report: usize,
    /// How many leading priority ranks get the larger destination marker.
    pub highlight_top_ranks: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            min_zoom: 8.0,
            max_zoom: 18.0,
            focus_zoom: 15.0,
            fallback_center: [0.0, 0.0],
            padding_fraction: 0.1,
            budget_tiers: vec![(15.0, 25), (13.0, 15)],
            base_budget: 10,
            connections_per_report: DEFAULT_CONNECTIONS_PER_REPORT,
            highlight_top_ranks: 3,
        }
    }
}

impl MapConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `config_path` - Path to the map.toml file
    ///
    /// # Returns
    /// * `Ok(MapConfig)` if the file was successfully loaded and parsed
    /// * `Err` with a descriptive message otherwise
    pub fn load(config_path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(config_path).with_context(|| format!("failed to read config file {}", config_path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse config file {}", config_path.display()))
    }

    /// Derive the config path from a dataset file path.
    ///
    /// Replaces the dataset filename with "map.toml" in the same directory.
    pub fn config_path_from_dataset(dataset_path: &Path) -> PathBuf {
        dataset_path.parent().unwrap_or(Path::new(".")).join("map.toml")
    }

    /// Load the config sitting next to the dataset, or defaults when the
    /// file does not exist. A present-but-broken config is an error the
    /// caller surfaces, not something to silently ignore.
    pub fn for_dataset(dataset_path: &Path) -> anyhow::Result<Self> {
        let path = Self::config_path_from_dataset(dataset_path);
        if path.exists() { Self::load(&path) } else { Ok(Self::default()) }
    }

    /// The viewport configuration derived from these settings. The tier
    /// list always ends with the base-budget floor so every zoom level
    /// has a budget.
    pub fn viewport_config(&self) -> ViewportConfig {
        let mut tiers: Vec<BudgetTier> = self.budget_tiers.iter().map(|&(min_zoom, budget)| BudgetTier { min_zoom, budget }).collect();
        tiers.sort_by(|a, b| b.min_zoom.total_cmp(&a.min_zoom));
        tiers.push(BudgetTier {
            min_zoom: f64::NEG_INFINITY,
            budget: self.base_budget,
        });
        ViewportConfig {
            min_zoom: self.min_zoom,
            max_zoom: self.max_zoom,
            focus_zoom: self.focus_zoom,
            fallback_center: Point::new(self.fallback_center[0], self.fallback_center[1]),
            padding_fraction: self.padding_fraction,
            tiers,
        }
    }
}

// Core computation pipeline for the map view:
// - `geo`: haversine distance and bounding-box math
// - `association`: per-report destination ranking and the global shortest route
// - `style`: deterministic rank/selection -> visual style mapping
// - `viewport`: zoom state, marker budget tiers, camera fit requests
// - `selection`: single-selection state machine over routes and reports
// - `assemble`: composition of the above into an ordered draw list
//
// Everything in this module is synchronous and pure apart from the small
// amount of state the viewport and selection machines explicitly own; the
// UI layer calls into it every frame with the current dataset.

pub mod assemble;
pub mod association;
pub mod geo;
pub mod selection;
pub mod style;
pub mod viewport;

use chrono::{DateTime, Utc};
use serde::Deserialize;

pub use assemble::{AssembleInput, MarkerKind, RenderList, assemble};
pub use geo::Point;
pub use selection::Selection;
pub use viewport::{CameraRequest, Viewport};

/// Classification label attached to a report by the external
/// water-quality service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterQuality {
    Optimum,
    HighPh,
    LowPh,
    HighPhTemp,
    LowTemp,
    LowTempHighPh,
    #[serde(other)]
    Unknown,
}

impl WaterQuality {
    /// Human-readable label for the inspector panel.
    pub fn label(&self) -> &'static str {
        match self {
            WaterQuality::Optimum => "Optimum",
            WaterQuality::HighPh => "High pH",
            WaterQuality::LowPh => "Low pH",
            WaterQuality::HighPhTemp => "High pH & temperature",
            WaterQuality::LowTemp => "Low temperature",
            WaterQuality::LowTempHighPh => "Low temperature & high pH",
            WaterQuality::Unknown => "Unknown",
        }
    }
}

/// A user-submitted water-quality report. Read-only within the core;
/// `location` is `None` when the submitting device had no usable GPS fix.
#[derive(Debug, Clone)]
pub struct Report {
    pub id: String,
    pub location: Option<Point>,
    pub quality: WaterQuality,
    pub title: String,
    pub description: String,
    pub address: String,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl Report {
    /// Location usable for spatial computation, if any.
    pub fn valid_location(&self) -> Option<Point> {
        self.location.filter(Point::is_valid)
    }
}

/// A water-supply destination with route data precomputed by the external
/// routing service. Identified by its index in the destinations vector.
#[derive(Debug, Clone)]
pub struct Destination {
    pub location: Option<Point>,
    /// Road-network distance from the admin's reference location, in km.
    pub distance_km: f64,
    /// Preformatted travel time, e.g. "12 min".
    pub travel_time: String,
    /// Road-network path from the reference location; may be empty, in
    /// which case only straight connection segments are drawn.
    pub polyline: Vec<Point>,
    pub name: String,
    pub address: String,
}

impl Destination {
    pub fn valid_location(&self) -> Option<Point> {
        self.location.filter(Point::is_valid)
    }
}

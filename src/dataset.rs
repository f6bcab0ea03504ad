//! Dataset loading, parsing, and validation.
//!
//! The app consumes a single JSON dataset file exported by the reporting
//! backend: user-submitted reports, water-supply destinations with
//! precomputed route data, and optionally the admin's current location
//! and a basemap image path.
//!
//! Validation is deliberately lenient: a malformed record is skipped (or
//! kept without a location) with a warning, never a hard error, so one
//! bad export row cannot blank the entire map. Only an unreadable or
//! syntactically invalid file fails the load.

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::core::{Destination, Point, Report, WaterQuality};

/// A parsed and validated dataset, ready for the core pipeline.
pub struct Dataset {
    pub reports: Vec<Report>,
    pub destinations: Vec<Destination>,
    pub current_location: Option<Point>,
    /// Optional path to a basemap image, relative to the dataset file.
    pub background_image: Option<String>,
}

/// Raw coordinate pair as exported by the backend. Either component may
/// be missing when the device had no GPS fix.
#[derive(Debug, Deserialize, Clone, Copy, Default)]
struct RawLocation {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl RawLocation {
    /// Convert to a core point, dropping coordinates the core would
    /// reject. The (0,0) sentinel is handled by `Point::is_valid`.
    fn to_point(self) -> Option<Point> {
        let p = Point::new(self.latitude?, self.longitude?);
        p.is_valid().then_some(p)
    }
}

#[derive(Debug, Deserialize)]
struct RawReport {
    id: String,
    #[serde(flatten)]
    location: RawLocation,
    #[serde(default = "unknown_quality")]
    water_quality: WaterQuality,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    address: String,
    #[serde(default)]
    submitted_at: Option<String>,
}

fn unknown_quality() -> WaterQuality {
    WaterQuality::Unknown
}

#[derive(Debug, Deserialize)]
struct RawDestination {
    #[serde(default)]
    name: String,
    #[serde(default)]
    address: String,
    #[serde(flatten)]
    location: RawLocation,
    distance_km: f64,
    #[serde(default)]
    travel_time: String,
    /// Route path as [latitude, longitude] pairs.
    #[serde(default)]
    polyline: Vec<[f64; 2]>,
}

/// Root structure of the dataset file.
#[derive(Debug, Deserialize)]
struct RawDataset {
    #[serde(default)]
    reports: Vec<RawReport>,
    #[serde(default)]
    destinations: Vec<RawDestination>,
    #[serde(default)]
    current_location: Option<RawLocation>,
    #[serde(default)]
    background_image: Option<String>,
}

/// Load and validate a dataset from a JSON file.
///
/// # Parameters
///
/// * `path` - Path to the dataset JSON file
///
/// # Returns
///
/// The validated dataset, or an error if the file cannot be read or is
/// not valid JSON. Record-level problems degrade with a warning instead.
pub fn load_dataset(path: &Path) -> anyhow::Result<Dataset> {
    let content = fs::read_to_string(path).with_context(|| format!("failed to read dataset file {}", path.display()))?;
    let raw: RawDataset = serde_json::from_str(&content).with_context(|| format!("failed to parse dataset file {}", path.display()))?;
    let dataset = validate(raw);
    log::info!(
        "loaded dataset from {}: {} reports, {} destinations",
        path.display(),
        dataset.reports.len(),
        dataset.destinations.len()
    );
    Ok(dataset)
}

/// Turn raw records into core types, skipping or degrading bad ones.
fn validate(raw: RawDataset) -> Dataset {
    let reports = raw
        .reports
        .into_iter()
        .map(|r| {
            let location = r.location.to_point();
            if location.is_none() {
                log::warn!("report {} has no usable coordinates, excluded from spatial computation", r.id);
            }
            let submitted_at = r.submitted_at.as_deref().and_then(|s| match DateTime::parse_from_rfc3339(s) {
                Ok(dt) => Some(dt.with_timezone(&Utc)),
                Err(e) => {
                    log::warn!("report {} has unparseable timestamp {:?}: {}", r.id, s, e);
                    None
                }
            });
            Report {
                id: r.id,
                location,
                quality: r.water_quality,
                title: r.title,
                description: r.description,
                address: r.address,
                submitted_at,
            }
        })
        .collect();

    let destinations = raw
        .destinations
        .into_iter()
        .filter_map(|d| {
            if !d.distance_km.is_finite() || d.distance_km < 0.0 {
                log::warn!("destination {:?} has invalid distance {}, skipped", d.name, d.distance_km);
                return None;
            }
            let location = d.location.to_point();
            if location.is_none() {
                log::warn!("destination {:?} has no usable coordinates", d.name);
            }
            let polyline = d
                .polyline
                .iter()
                .map(|&[lat, lon]| Point::new(lat, lon))
                .filter(Point::is_valid)
                .collect();
            Some(Destination {
                location,
                distance_km: d.distance_km,
                travel_time: d.travel_time,
                polyline,
                name: d.name,
                address: d.address,
            })
        })
        .collect();

    Dataset {
        reports,
        destinations,
        current_location: raw.current_location.and_then(RawLocation::to_point),
        background_image: raw.background_image,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Dataset {
        validate(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn full_record_round_trip() {
        let ds = parse(
            r#"{
                "reports": [{
                    "id": "r1",
                    "latitude": 47.5,
                    "longitude": 19.04,
                    "water_quality": "high_ph",
                    "title": "Murky well",
                    "description": "pH strip reads 9.1",
                    "address": "Fő utca 1",
                    "submitted_at": "2026-07-14T10:30:00Z"
                }],
                "destinations": [{
                    "name": "City well",
                    "address": "Kossuth tér",
                    "latitude": 47.51,
                    "longitude": 19.05,
                    "distance_km": 1.4,
                    "travel_time": "5 min",
                    "polyline": [[47.5, 19.04], [47.51, 19.05]]
                }],
                "current_location": {"latitude": 47.49, "longitude": 19.03}
            }"#,
        );
        assert_eq!(ds.reports.len(), 1);
        assert_eq!(ds.reports[0].quality, WaterQuality::HighPh);
        assert!(ds.reports[0].submitted_at.is_some());
        assert_eq!(ds.destinations.len(), 1);
        assert_eq!(ds.destinations[0].polyline.len(), 2);
        assert!(ds.current_location.is_some());
    }

    #[test]
    fn missing_coordinates_keep_the_report_unlocated() {
        let ds = parse(r#"{"reports": [{"id": "r1", "title": "no gps"}]}"#);
        assert_eq!(ds.reports.len(), 1);
        assert!(ds.reports[0].location.is_none());
    }

    #[test]
    fn origin_coordinates_are_treated_as_no_fix() {
        let ds = parse(r#"{"reports": [{"id": "r1", "latitude": 0.0, "longitude": 0.0}]}"#);
        assert!(ds.reports[0].location.is_none());
    }

    #[test]
    fn unknown_quality_labels_map_to_unknown() {
        let ds = parse(r#"{"reports": [{"id": "r1", "water_quality": "glows_in_the_dark"}]}"#);
        assert_eq!(ds.reports[0].quality, WaterQuality::Unknown);
    }

    #[test]
    fn destination_with_invalid_distance_is_skipped() {
        let ds = parse(
            r#"{"destinations": [
                {"name": "bad", "latitude": 1.0, "longitude": 1.0, "distance_km": -3.0},
                {"name": "ok", "latitude": 1.0, "longitude": 1.1, "distance_km": 2.0}
            ]}"#,
        );
        assert_eq!(ds.destinations.len(), 1);
        assert_eq!(ds.destinations[0].name, "ok");
    }

    #[test]
    fn bad_timestamp_degrades_to_none() {
        let ds = parse(r#"{"reports": [{"id": "r1", "submitted_at": "yesterday-ish"}]}"#);
        assert!(ds.reports[0].submitted_at.is_none());
    }

    #[test]
    fn invalid_polyline_points_are_dropped() {
        let ds = parse(
            r#"{"destinations": [{
                "name": "d", "latitude": 1.0, "longitude": 1.0, "distance_km": 1.0,
                "polyline": [[1.0, 1.0], [0.0, 0.0], [200.0, 1.0], [1.1, 1.0]]
            }]}"#,
        );
        assert_eq!(ds.destinations[0].polyline.len(), 2);
    }

    #[test]
    fn empty_object_is_a_valid_empty_dataset() {
        let ds = parse("{}");
        assert!(ds.reports.is_empty());
        assert!(ds.destinations.is_empty());
        assert!(ds.current_location.is_none());
    }
}

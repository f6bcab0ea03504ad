//! Nearest-destination ranking per report and the global shortest route.
//!
//! Two independent operations:
//! - [`compute_connections`] ranks every located destination by haversine
//!   distance from one report and keeps the closest K as connections.
//! - [`find_shortest_route_index`] scans the precomputed road distances of
//!   all destinations for the single global minimum.
//!
//! Both are recomputed from scratch whenever the report or destination set
//! changes; the expected dataset sizes (tens to low hundreds of points)
//! make incremental updates pointless.

use super::geo::distance_km;
use super::{Destination, Report};

/// Default number of connections drawn per report.
pub const DEFAULT_CONNECTIONS_PER_REPORT: usize = 5;

/// A ranked report-to-destination association.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub report_id: String,
    /// Index into the destinations vector.
    pub destination_index: usize,
    /// 0 = nearest destination for this report.
    pub rank: usize,
    /// Great-circle distance from the report to the destination, in km.
    pub distance_km: f64,
}

/// Rank all destinations by distance from `report` and keep the closest
/// `max_connections`.
///
/// Destinations without a valid location are excluded from ranking
/// entirely rather than being assigned an infinite distance. The sort is
/// stable, so equidistant destinations keep their dataset order. A report
/// without a valid location yields no connections; the caller renders it
/// as an unconnected marker.
pub fn compute_connections(report: &Report, destinations: &[Destination], max_connections: usize) -> Vec<Connection> {
    let Some(origin) = report.valid_location() else {
        return Vec::new();
    };

    let mut ranked: Vec<(usize, f64)> = destinations
        .iter()
        .enumerate()
        .filter_map(|(i, d)| d.valid_location().map(|loc| (i, distance_km(origin, loc))))
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

    ranked
        .into_iter()
        .take(max_connections)
        .enumerate()
        .map(|(rank, (destination_index, distance))| Connection {
            report_id: report.id.clone(),
            destination_index,
            rank,
            distance_km: distance,
        })
        .collect()
}

/// Index of the destination with the globally minimal precomputed road
/// distance, or `None` when no located destination exists.
///
/// Single linear pass; the first destination wins ties via the strict
/// comparison. Destinations without a valid location are skipped.
pub fn find_shortest_route_index(destinations: &[Destination]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, d) in destinations.iter().enumerate() {
        if d.valid_location().is_none() || !d.distance_km.is_finite() {
            continue;
        }
        if best.map_or(true, |(_, bd)| d.distance_km < bd) {
            best = Some((i, d.distance_km));
        }
    }
    best.map(|(i, _)| i)
}

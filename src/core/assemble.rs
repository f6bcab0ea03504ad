//! Composition of rankings, styles, selection, and viewport state into the
//! ordered draw list consumed by the map view.
//!
//! [`assemble`] is a pure function of its input: no hidden state beyond
//! what the viewport and selection machines explicitly hold. It is cheap
//! enough to run every frame at the expected dataset sizes.
//!
//! ## Draw order
//!
//! Both output lists are ordered back-to-front: unemphasized elements
//! first, emphasized (shortest or selected) elements last, and the
//! shortest route's polyline always last of all so it renders on top.

use egui::Color32;

use super::association::{Connection, compute_connections, find_shortest_route_index};
use super::geo::Point;
use super::selection::Selection;
use super::style::{CURRENT_LOCATION_COLOR, Style, StyleRole, color_for_quality, style_for};
use super::viewport::Viewport;
use super::{Destination, Report};

/// Marker radius tiers in pixels.
const MARKER_RADIUS_BASE: f32 = 6.0;
const MARKER_RADIUS_TOP_RANK: f32 = 7.0;
const MARKER_RADIUS_SELECTED: f32 = 8.0;
const MARKER_RADIUS_SHORTEST: f32 = 9.0;
const MARKER_RADIUS_REPORT: f32 = 6.0;
const MARKER_RADIUS_CURRENT_LOCATION: f32 = 7.0;

/// What a marker refers back to; drives hit-testing and the inspector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// Index into the reports vector.
    Report(usize),
    /// Index into the destinations vector.
    Destination(usize),
    CurrentLocation,
}

/// A render-ready map marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub position: Point,
    pub color: Color32,
    pub radius: f32,
    /// Emphasized markers sort to the end of the list (drawn on top).
    pub emphasized: bool,
}

/// What a polyline represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolylineKind {
    /// Precomputed road path of a destination.
    Route { destination_index: usize },
    /// Straight report-to-destination association line.
    Connection { report_index: usize, destination_index: usize, rank: usize },
}

/// A render-ready path with its style.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub kind: PolylineKind,
    pub points: Vec<Point>,
    pub style: Style,
}

/// Everything the map view needs for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderList {
    pub markers: Vec<Marker>,
    pub polylines: Vec<Polyline>,
    /// Indices of reports without a usable location, surfaced by the UI
    /// outside the map.
    pub unlocated_reports: Vec<usize>,
    /// Indices of destinations without a usable location, also surfaced
    /// outside the map.
    pub unlocated_destinations: Vec<usize>,
    /// Index of the globally shortest route, when one exists.
    pub shortest_route: Option<usize>,
    /// All computed connections, for the inspector panel.
    pub connections: Vec<Connection>,
}

/// Inputs to [`assemble`]; all references, nothing is owned or mutated.
#[derive(Debug, Clone, Copy)]
pub struct AssembleInput<'a> {
    pub reports: &'a [Report],
    pub destinations: &'a [Destination],
    pub current_location: Option<Point>,
    pub selection: &'a Selection,
    pub viewport: &'a Viewport,
    /// Upper bound on connections drawn per report.
    pub connections_per_report: usize,
    /// How many leading priority ranks get the larger marker radius.
    pub highlight_top_ranks: usize,
}

/// Build the ordered marker and polyline lists for one frame.
///
/// Steps:
/// 1. find the globally shortest route;
/// 2. rank each report's destinations;
/// 3. pick the visible destination subset (selected route only, or the
///    priority order capped by the viewport's marker budget);
/// 4. style markers and polylines, keeping connections only to visible
///    destinations;
/// 5. order both lists so emphasized elements draw on top, the shortest
///    route last of all.
///
/// Never fails: empty or partially malformed inputs degrade to smaller
/// (possibly empty) draw lists.
pub fn assemble(input: &AssembleInput<'_>) -> RenderList {
    let shortest_route = find_shortest_route_index(input.destinations);

    let mut connections = Vec::new();
    for report in input.reports {
        connections.extend(compute_connections(report, input.destinations, input.connections_per_report));
    }

    // Priority order over located destinations: shortest route first, then
    // ascending dataset order. A destination's position in this order is
    // its styling rank, independent of how many are currently visible.
    let priority = priority_order(input.destinations, shortest_route);
    let visible: Vec<usize> = match input.selection.selected_route() {
        Some(i) if priority.contains(&i) => vec![i],
        _ => priority.iter().copied().take(input.viewport.marker_budget()).collect(),
    };
    let rank_of = |dest_index: usize| priority.iter().position(|&i| i == dest_index).unwrap_or(0);

    let unlocated_destinations: Vec<usize> = input
        .destinations
        .iter()
        .enumerate()
        .filter(|(_, d)| d.valid_location().is_none())
        .map(|(i, _)| i)
        .collect();

    let mut markers = Vec::new();
    let mut polylines = Vec::new();
    let mut emphasized_polylines = Vec::new();
    let mut shortest_polyline = None;

    // Destination markers and route polylines.
    for &dest_index in &visible {
        let dest = &input.destinations[dest_index];
        let Some(position) = dest.valid_location() else { continue };
        let rank = rank_of(dest_index);
        let is_shortest = shortest_route == Some(dest_index);
        let is_selected = input.selection.selected_route() == Some(dest_index);
        let style = style_for(rank, is_shortest, is_selected, StyleRole::Route);

        let radius = if is_shortest {
            MARKER_RADIUS_SHORTEST
        } else if is_selected {
            MARKER_RADIUS_SELECTED
        } else if rank < input.highlight_top_ranks {
            MARKER_RADIUS_TOP_RANK
        } else {
            MARKER_RADIUS_BASE
        };
        markers.push(Marker {
            kind: MarkerKind::Destination(dest_index),
            position,
            color: style.color,
            radius,
            emphasized: is_shortest || is_selected,
        });

        if dest.polyline.len() >= 2 {
            let line = Polyline {
                kind: PolylineKind::Route { destination_index: dest_index },
                points: dest.polyline.clone(),
                style,
            };
            if is_shortest {
                shortest_polyline = Some(line);
            } else if is_selected {
                emphasized_polylines.push(line);
            } else {
                polylines.push(line);
            }
        }
    }

    // Connection lines, only to destinations that are actually visible.
    for connection in &connections {
        if !visible.contains(&connection.destination_index) {
            continue;
        }
        let Some(report_index) = input.reports.iter().position(|r| r.id == connection.report_id) else {
            continue;
        };
        let (Some(from), Some(to)) = (
            input.reports[report_index].valid_location(),
            input.destinations[connection.destination_index].valid_location(),
        ) else {
            continue;
        };
        let is_selected = input.selection.selected_report() == Some(connection.report_id.as_str());
        let style = style_for(connection.rank, false, is_selected, StyleRole::Connection);
        let line = Polyline {
            kind: PolylineKind::Connection {
                report_index,
                destination_index: connection.destination_index,
                rank: connection.rank,
            },
            points: vec![from, to],
            style,
        };
        if is_selected {
            emphasized_polylines.push(line);
        } else {
            polylines.push(line);
        }
    }

    // Report markers; unlocated reports go to the side list instead.
    let mut unlocated_reports = Vec::new();
    for (report_index, report) in input.reports.iter().enumerate() {
        match report.valid_location() {
            Some(position) => {
                let is_selected = input.selection.selected_report() == Some(report.id.as_str());
                markers.push(Marker {
                    kind: MarkerKind::Report(report_index),
                    position,
                    color: color_for_quality(report.quality),
                    radius: if is_selected { MARKER_RADIUS_SELECTED } else { MARKER_RADIUS_REPORT },
                    emphasized: is_selected,
                });
            }
            None => unlocated_reports.push(report_index),
        }
    }

    if let Some(position) = input.current_location.filter(Point::is_valid) {
        markers.push(Marker {
            kind: MarkerKind::CurrentLocation,
            position,
            color: CURRENT_LOCATION_COLOR,
            radius: MARKER_RADIUS_CURRENT_LOCATION,
            emphasized: false,
        });
    }

    // Z-order: plain elements first, emphasized after, shortest route last.
    markers.sort_by_key(|m| m.emphasized);
    polylines.extend(emphasized_polylines);
    polylines.extend(shortest_polyline);

    RenderList {
        markers,
        polylines,
        unlocated_reports,
        unlocated_destinations,
        shortest_route,
        connections,
    }
}

/// Located destination indices in priority order: the shortest route
/// first, then ascending dataset order.
fn priority_order(destinations: &[Destination], shortest_route: Option<usize>) -> Vec<usize> {
    let mut order: Vec<usize> = Vec::with_capacity(destinations.len());
    if let Some(s) = shortest_route {
        order.push(s);
    }
    for (i, d) in destinations.iter().enumerate() {
        if Some(i) != shortest_route && d.valid_location().is_some() {
            order.push(i);
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::viewport::{Viewport, ViewportConfig};
    use crate::core::{Selection, WaterQuality};

    fn report(id: &str, lat: f64, lon: f64) -> Report {
        Report {
            id: id.to_string(),
            location: Some(Point::new(lat, lon)),
            quality: WaterQuality::Optimum,
            title: String::new(),
            description: String::new(),
            address: String::new(),
            submitted_at: None,
        }
    }

    fn dest(lat: f64, lon: f64, distance_km: f64) -> Destination {
        Destination {
            location: Some(Point::new(lat, lon)),
            distance_km,
            travel_time: String::new(),
            polyline: vec![Point::new(lat - 0.01, lon), Point::new(lat, lon)],
            name: String::new(),
            address: String::new(),
        }
    }

    fn input<'a>(
        reports: &'a [Report],
        destinations: &'a [Destination],
        selection: &'a Selection,
        viewport: &'a Viewport,
    ) -> AssembleInput<'a> {
        AssembleInput {
            reports,
            destinations,
            current_location: None,
            selection,
            viewport,
            connections_per_report: 5,
            highlight_top_ranks: 3,
        }
    }

    #[test]
    fn empty_input_is_safe() {
        let viewport = Viewport::new(ViewportConfig::default());
        let selection = Selection::None;
        let out = assemble(&input(&[], &[], &selection, &viewport));
        assert!(out.markers.is_empty());
        assert!(out.polylines.is_empty());
        assert!(out.unlocated_reports.is_empty());
        assert!(out.unlocated_destinations.is_empty());
        assert_eq!(out.shortest_route, None);
    }

    #[test]
    fn shortest_route_polyline_is_last() {
        let reports = vec![report("r1", 1.0, 1.0)];
        let dests = vec![dest(1.0, 1.1, 11.1), dest(1.0, 1.05, 5.5), dest(1.1, 1.0, 12.0)];
        let viewport = Viewport::new(ViewportConfig::default());
        let selection = Selection::None;
        let out = assemble(&input(&reports, &dests, &selection, &viewport));

        assert_eq!(out.shortest_route, Some(1));
        let last = out.polylines.last().expect("shortest route should be drawn");
        assert_eq!(last.kind, PolylineKind::Route { destination_index: 1 });
        assert!(last.style.emphasized());
    }

    #[test]
    fn marker_budget_caps_visible_destinations() {
        let dests: Vec<Destination> = (0..40).map(|i| dest(1.0 + i as f64 * 0.01, 1.0, i as f64 + 1.0)).collect();
        let mut viewport = Viewport::new(ViewportConfig::default());
        viewport.on_zoom_changed(10.0); // budget 10
        let selection = Selection::None;
        let out = assemble(&input(&[], &dests, &selection, &viewport));

        let dest_markers: Vec<_> = out
            .markers
            .iter()
            .filter(|m| matches!(m.kind, MarkerKind::Destination(_)))
            .collect();
        assert_eq!(dest_markers.len(), 10);
        // The shortest route (index 0 here) is always part of the subset.
        assert!(dest_markers.iter().any(|m| m.kind == MarkerKind::Destination(0)));
    }

    #[test]
    fn selected_route_hides_all_other_destinations() {
        let dests = vec![dest(1.0, 1.0, 1.0), dest(1.1, 1.0, 2.0), dest(1.2, 1.0, 3.0)];
        let viewport = Viewport::new(ViewportConfig::default());
        let selection = Selection::Route(2);
        let out = assemble(&input(&[], &dests, &selection, &viewport));

        let dest_markers: Vec<_> = out
            .markers
            .iter()
            .filter(|m| matches!(m.kind, MarkerKind::Destination(_)))
            .collect();
        assert_eq!(dest_markers.len(), 1);
        assert_eq!(dest_markers[0].kind, MarkerKind::Destination(2));
        assert!(dest_markers[0].emphasized);
    }

    #[test]
    fn connections_only_reach_visible_destinations() {
        let reports = vec![report("r1", 1.0, 1.0)];
        let dests = vec![dest(1.0, 1.01, 1.0), dest(1.0, 1.02, 2.0)];
        let viewport = Viewport::new(ViewportConfig::default());
        // Selecting route 0 hides route 1, so only one connection line remains.
        let selection = Selection::Route(0);
        let out = assemble(&input(&reports, &dests, &selection, &viewport));

        let connection_lines: Vec<_> = out
            .polylines
            .iter()
            .filter(|p| matches!(p.kind, PolylineKind::Connection { .. }))
            .collect();
        assert_eq!(connection_lines.len(), 1);
        match connection_lines[0].kind {
            PolylineKind::Connection { destination_index, .. } => assert_eq!(destination_index, 0),
            _ => unreachable!(),
        }
        // Connections are straight two-point segments.
        assert_eq!(connection_lines[0].points.len(), 2);
    }

    #[test]
    fn unlocated_reports_are_listed_not_drawn() {
        let mut reports = vec![report("r1", 1.0, 1.0)];
        reports.push(Report {
            location: Some(Point::new(0.0, 0.0)),
            ..report("r2", 0.0, 0.0)
        });
        reports.push(Report { location: None, ..report("r3", 0.0, 0.0) });
        let viewport = Viewport::new(ViewportConfig::default());
        let selection = Selection::None;
        let out = assemble(&input(&reports, &[], &selection, &viewport));

        let report_markers = out.markers.iter().filter(|m| matches!(m.kind, MarkerKind::Report(_))).count();
        assert_eq!(report_markers, 1);
        assert_eq!(out.unlocated_reports, vec![1, 2]);
    }

    #[test]
    fn unlocated_destinations_are_listed_not_drawn() {
        let mut dests = vec![dest(1.0, 1.0, 1.0)];
        dests.push(Destination { location: None, ..dest(0.0, 0.0, 2.0) });
        dests.push(Destination {
            location: Some(Point::new(0.0, 0.0)),
            ..dest(0.0, 0.0, 3.0)
        });
        let viewport = Viewport::new(ViewportConfig::default());
        let selection = Selection::None;
        let out = assemble(&input(&[], &dests, &selection, &viewport));

        let dest_markers = out.markers.iter().filter(|m| matches!(m.kind, MarkerKind::Destination(_))).count();
        assert_eq!(dest_markers, 1);
        assert_eq!(out.unlocated_destinations, vec![1, 2]);
        // The located one still wins the shortest-route scan.
        assert_eq!(out.shortest_route, Some(0));
    }

    #[test]
    fn emphasized_markers_sort_last() {
        let reports = vec![report("r1", 1.0, 1.0), report("r2", 1.2, 1.0)];
        let dests = vec![dest(1.0, 1.1, 1.0)];
        let viewport = Viewport::new(ViewportConfig::default());
        let selection = Selection::Report("r2".into());
        let out = assemble(&input(&reports, &dests, &selection, &viewport));

        let last = out.markers.last().unwrap();
        assert_eq!(last.kind, MarkerKind::Report(1));
        assert!(last.emphasized);
        // Every emphasized marker comes after every plain one.
        let first_emphasized = out.markers.iter().position(|m| m.emphasized).unwrap();
        assert!(out.markers[first_emphasized..].iter().all(|m| m.emphasized));
    }

    #[test]
    fn current_location_marker_is_included_when_valid() {
        let viewport = Viewport::new(ViewportConfig::default());
        let selection = Selection::None;
        let mut inp = input(&[], &[], &selection, &viewport);
        inp.current_location = Some(Point::new(47.0, 19.0));
        let out = assemble(&inp);
        assert_eq!(out.markers.len(), 1);
        assert_eq!(out.markers[0].kind, MarkerKind::CurrentLocation);

        // The (0,0) sentinel is not drawn.
        inp.current_location = Some(Point::new(0.0, 0.0));
        assert!(assemble(&inp).markers.is_empty());
    }
}

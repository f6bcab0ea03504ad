//! # Central Map Visualization
//!
//! This module renders the main 2D map view showing:
//! - An optional basemap image under a subtle coordinate grid
//! - Destination markers with their route polylines, the globally
//!   shortest route emphasized on top
//! - Report markers colored by water-quality classification
//! - Straight connection lines from each report to its nearest supplies
//! - A pulsing current-location marker
//!
//! ## Coordinate Mapping
//!
//! Geographic coordinates are projected with a slippy-map style scale:
//! the world is 256 * 2^zoom pixels wide, and the horizontal scale is
//! corrected by the cosine of the viewport center's latitude. The
//! projection is anchored at the viewport center, so panning only moves
//! the center point.
//!
//! ## Interaction
//!
//! Clicking selects the nearest marker within a small pixel threshold
//! (squared distance, no sqrt); clicks that hit nothing clear the
//! selection. Dragging pans, the scroll wheel zooms, and pending camera
//! requests from the viewport controller (fit / center) are consumed
//! here once per frame.

use eframe::egui;
use egui::Color32;

use crate::core::geo::GeoBounds;
use crate::core::{CameraRequest, MarkerKind, Point, RenderList};
use crate::ui::{AppState, MapEvent};

/// Hit-test radius for marker selection, in pixels.
const HIT_RADIUS_PX: f32 = 14.0;

/// Dash pattern for dashed polylines, in pixels.
const DASH_LENGTH: f32 = 10.0;
const GAP_LENGTH: f32 = 6.0;

/// Pixel-space projection anchored at the viewport center.
struct Projection {
    center: Point,
    rect: egui::Rect,
    /// Pixels per degree of latitude.
    lat_scale: f64,
    /// Pixels per degree of longitude at the center latitude.
    lon_scale: f64,
}

impl Projection {
    fn new(center: Point, zoom: f64, rect: egui::Rect) -> Self {
        let lat_scale = 256.0 * 2f64.powf(zoom) / 360.0;
        let lon_scale = lat_scale * center.lat.to_radians().cos().max(0.01);
        Self {
            center,
            rect,
            lat_scale,
            lon_scale,
        }
    }

    fn to_screen(&self, p: Point) -> egui::Pos2 {
        let x = self.rect.center().x as f64 + (p.lon - self.center.lon) * self.lon_scale;
        let y = self.rect.center().y as f64 - (p.lat - self.center.lat) * self.lat_scale;
        egui::pos2(x as f32, y as f32)
    }

    /// Inverse mapping of a screen offset, used for drag panning.
    fn pan(&self, delta: egui::Vec2) -> Point {
        Point::new(
            self.center.lat + delta.y as f64 / self.lat_scale,
            self.center.lon - delta.x as f64 / self.lon_scale,
        )
    }
}

/// Render the central map panel.
///
/// This is the main rendering function for the map. It:
/// 1. Reserves the remaining central area and consumes any pending
///    camera request against it
/// 2. Draws the background, basemap, and grid
/// 3. Renders polylines then markers in draw-list order (emphasized last)
/// 4. Handles drag panning, wheel zoom, and click selection
///
/// # Parameters
///
/// * `ctx` - egui context for rendering
/// * `state` - Mutable application state for updating selection/viewport
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let rect = ui.available_rect_before_wrap();
        let response = ui.interact(rect, egui::Id::new("map_canvas"), egui::Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        apply_camera_request(state, rect);

        let projection = Projection::new(state.viewport.center(), state.viewport.zoom(), rect);

        painter.rect_filled(rect, 4.0, ui.visuals().extreme_bg_color);
        if let Some(ref texture) = state.background_image_texture {
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            painter.image(texture.id(), rect, uv, Color32::WHITE);
        }

        draw_polylines(&painter, &projection, &state.render_list);
        draw_markers(&painter, &projection, state, ui);

        handle_pan_and_zoom(&response, ui, state, &projection);
        if let Some(event) = hit_test(&response, &projection, &state.render_list, state) {
            state.apply(event);
        }
    });
}

/// Consume the pending camera request, if any. Fit requests compute the
/// zoom at which the padded bounds just fit the panel on both axes.
fn apply_camera_request(state: &mut AppState, rect: egui::Rect) {
    match state.viewport.take_camera_request() {
        Some(CameraRequest::FitBounds(bounds)) => {
            let zoom = zoom_to_fit(&bounds, rect);
            state.viewport.on_zoom_changed(zoom);
            state.viewport.set_center(bounds.center());
        }
        Some(CameraRequest::Center(point)) => {
            state.viewport.set_center(point);
        }
        None => {}
    }
}

/// Zoom level at which `bounds` fits into `rect` on both axes.
///
/// Solves 256 * 2^z / 360 * span <= extent per axis and takes the
/// smaller result. Degenerate spans fall back to a tight zoom that the
/// viewport clamps to its maximum anyway.
fn zoom_to_fit(bounds: &GeoBounds, rect: egui::Rect) -> f64 {
    let lat_span = bounds.lat_span().abs();
    let lon_span = bounds.lon_span().abs() * bounds.center().lat.to_radians().cos().max(0.01);
    let zoom_for = |span: f64, extent: f64| {
        if span <= f64::EPSILON {
            f64::INFINITY
        } else {
            (extent * 360.0 / (256.0 * span)).log2()
        }
    };
    zoom_for(lat_span, rect.height() as f64).min(zoom_for(lon_span, rect.width() as f64))
}

/// Draw all polylines in draw-list order; the list is already sorted so
/// emphasized lines and the shortest route come last.
fn draw_polylines(painter: &egui::Painter, projection: &Projection, render_list: &RenderList) {
    for polyline in &render_list.polylines {
        let points: Vec<egui::Pos2> = polyline.points.iter().map(|&p| projection.to_screen(p)).collect();
        if points.len() < 2 {
            continue;
        }
        let stroke = egui::Stroke::new(polyline.style.stroke_width, polyline.style.effective_color());
        if polyline.style.dashed {
            painter.extend(egui::Shape::dashed_line(&points, stroke, DASH_LENGTH, GAP_LENGTH));
        } else {
            painter.add(egui::Shape::line(points, stroke));
        }
    }
}

/// Draw all markers in draw-list order with optional name labels.
fn draw_markers(painter: &egui::Painter, projection: &Projection, state: &AppState, ui: &egui::Ui) {
    for marker in &state.render_list.markers {
        let pos = projection.to_screen(marker.position);

        if marker.kind == MarkerKind::CurrentLocation {
            draw_location_pulse(painter, ui, pos, marker.color);
        }

        painter.circle_filled(pos, marker.radius, marker.color);
        if marker.emphasized {
            painter.circle_stroke(pos, marker.radius + 2.0, egui::Stroke::new(2.0, Color32::WHITE));
        }

        if state.show_labels {
            if let Some(label) = marker_label(state, marker.kind) {
                let label_pos = egui::pos2(pos.x + marker.radius + 3.0, pos.y - marker.radius - 3.0);
                painter.text(
                    label_pos,
                    egui::Align2::LEFT_BOTTOM,
                    label,
                    egui::FontId::monospace(11.0),
                    ui.visuals().strong_text_color(),
                );
            }
        }
    }
}

/// Breathing ring around the current-location marker, driven by frame
/// time only. Purely cosmetic; never part of the core pipeline.
fn draw_location_pulse(painter: &egui::Painter, ui: &egui::Ui, pos: egui::Pos2, color: Color32) {
    let t = ui.input(|i| i.time);
    let phase = ((t * 1.2).fract()) as f32;
    let radius = 8.0 + phase * 14.0;
    let alpha = ((1.0 - phase) * 120.0) as u8;
    let [r, g, b, _] = color.to_array();
    painter.circle_stroke(pos, radius, egui::Stroke::new(2.0, Color32::from_rgba_unmultiplied(r, g, b, alpha)));
}

fn marker_label(state: &AppState, kind: MarkerKind) -> Option<String> {
    match kind {
        MarkerKind::Destination(i) => {
            let name = &state.destinations.get(i)?.name;
            (!name.is_empty()).then(|| name.clone())
        }
        MarkerKind::Report(i) => {
            let title = &state.reports.get(i)?.title;
            (!title.is_empty()).then(|| title.clone())
        }
        MarkerKind::CurrentLocation => None,
    }
}

/// Drag panning and scroll-wheel zoom, routed through the viewport
/// controller so the marker-budget invariant holds.
fn handle_pan_and_zoom(response: &egui::Response, ui: &egui::Ui, state: &mut AppState, projection: &Projection) {
    if response.dragged() {
        let new_center = projection.pan(response.drag_delta());
        state.viewport.set_center(new_center);
    }

    if response.hovered() {
        let scroll = ui.input(|i| i.raw_scroll_delta.y);
        if scroll != 0.0 {
            let new_zoom = state.viewport.zoom() + (scroll / 240.0) as f64;
            state.viewport.on_zoom_changed(new_zoom);
        }
    }
}

/// Find the tap target: the nearest marker within [`HIT_RADIUS_PX`],
/// topmost first (reverse draw order), or a background tap when nothing
/// is close enough.
fn hit_test(response: &egui::Response, projection: &Projection, render_list: &RenderList, state: &AppState) -> Option<MapEvent> {
    if !response.clicked() {
        return None;
    }
    let click_pos = response.interact_pointer_pos()?;

    let mut best: Option<(MarkerKind, f32)> = None;
    for marker in render_list.markers.iter().rev() {
        let pos = projection.to_screen(marker.position);
        let d2 = pos.distance_sq(click_pos);
        if d2 <= HIT_RADIUS_PX * HIT_RADIUS_PX && best.map_or(true, |(_, bd)| d2 < bd) {
            best = Some((marker.kind, d2));
        }
    }

    Some(match best {
        Some((MarkerKind::Destination(i), _)) => MapEvent::TapRoute(i),
        Some((MarkerKind::Report(i), _)) => match state.reports.get(i) {
            Some(report) => MapEvent::TapReport(report.id.clone()),
            None => MapEvent::TapBackground,
        },
        // The location marker is not selectable; treat as background.
        Some((MarkerKind::CurrentLocation, _)) | None => MapEvent::TapBackground,
    })
}

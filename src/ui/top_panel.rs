//! # Top Panel - Dataset Metrics and Controls
//!
//! This module renders the fixed-height top panel displaying:
//! - Column 1: Dataset metrics (report/destination counts, unlocated count)
//! - Column 2: Shortest-route summary (destination, distance, travel time)
//! - Column 3: Map controls (open dataset, zoom in/out/fit, label toggle)
//!
//! The zoom buttons are disabled at the configured clamp boundaries so a
//! step past the limit is visibly a no-op.

use eframe::egui;

use crate::ui::AppState;

/// Render the top panel with metrics and controls.
///
/// # Parameters
///
/// * `ctx` - egui context
/// * `state` - Mutable application state for reading metrics and updating controls
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    egui::TopBottomPanel::top("top_metrics").exact_height(110.0).show(ctx, |ui| {
        ui.columns(3, |cols| {
            cols[0].vertical(|ui| {
                ui.heading("Dataset");
                ui.separator();
                ui.horizontal(|ui| {
                    ui.label("Reports:");
                    ui.label(egui::RichText::new(state.reports.len().to_string()).strong());
                    ui.label("  unlocated:");
                    ui.label(egui::RichText::new(state.render_list.unlocated_reports.len().to_string()).strong());
                });
                ui.horizontal(|ui| {
                    ui.label("Water supplies:");
                    ui.label(egui::RichText::new(state.destinations.len().to_string()).strong());
                });
                if let Some(path) = &state.dataset_path {
                    ui.label(egui::RichText::new(path.display().to_string()).monospace().small());
                }
            });

            cols[1].vertical(|ui| {
                render_shortest_route(ui, state);
            });

            cols[2].vertical(|ui| {
                render_controls(ui, state);
            });
        });
    });
}

/// Summary of the globally shortest route, when one exists.
fn render_shortest_route(ui: &mut egui::Ui, state: &AppState) {
    ui.heading("Shortest route");
    ui.separator();
    match state.render_list.shortest_route.and_then(|i| state.destinations.get(i)) {
        Some(dest) => {
            let name = if dest.name.is_empty() { "(unnamed supply)" } else { &dest.name };
            ui.label(egui::RichText::new(name).strong());
            ui.horizontal(|ui| {
                ui.label("Distance:");
                ui.label(egui::RichText::new(format!("{:.1} km", dest.distance_km)).strong());
                if !dest.travel_time.is_empty() {
                    ui.label("  Travel time:");
                    ui.label(egui::RichText::new(&dest.travel_time).strong());
                }
            });
        }
        None => {
            ui.label("No located water supply in the dataset.");
        }
    }
}

/// Map controls: dataset picker, zoom stepping, camera fit, labels.
fn render_controls(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Map");
    ui.separator();
    ui.horizontal(|ui| {
        if ui.button("Open dataset…").clicked() {
            state.open_dataset_selector();
        }
        if ui.button("Fit view").clicked() {
            state.refit_camera();
        }
    });
    ui.horizontal(|ui| {
        // Disabled at the clamp boundary; an extra press changes nothing.
        if ui.add_enabled(state.viewport.can_zoom_out(), egui::Button::new("−")).clicked() {
            state.viewport.zoom_out();
        }
        if ui.add_enabled(state.viewport.can_zoom_in(), egui::Button::new("+")).clicked() {
            state.viewport.zoom_in();
        }
        ui.label("Zoom:");
        ui.label(egui::RichText::new(format!("{:.1}", state.viewport.zoom())).monospace().strong());
        ui.label("  Marker budget:");
        ui.label(egui::RichText::new(state.viewport.marker_budget().to_string()).monospace().strong());
    });
    ui.checkbox(&mut state.show_labels, "Show labels");
}

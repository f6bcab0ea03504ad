//! # Right Panel - Selection Inspector
//!
//! Shows details for the current selection: a water-supply route or a
//! single report. With nothing selected it lists all reports (click to
//! select and center) and the unlocated reports that cannot appear on
//! the map.

use chrono::Local;
use eframe::egui;

use crate::core::Selection;
use crate::core::style::color_for_quality;
use crate::ui::{AppState, MapEvent};

/// Render the right inspector panel.
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    let response = egui::SidePanel::right("inspector")
        .resizable(true)
        .default_width(state.right_panel_width)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match state.selection.clone() {
                Selection::Route(index) => render_route(ui, state, index),
                Selection::Report(id) => render_report(ui, state, &id),
                Selection::None => render_overview(ui, state),
            });
        });
    state.right_panel_width = response.response.rect.width();
}

/// Details of the selected water-supply route.
fn render_route(ui: &mut egui::Ui, state: &mut AppState, index: usize) {
    ui.horizontal(|ui| {
        ui.heading("Water supply");
        if ui.button("✕").clicked() {
            state.selection.close();
        }
    });
    ui.separator();

    let Some(dest) = state.destinations.get(index) else {
        ui.label("Selected route is no longer in the dataset.");
        return;
    };
    let name = if dest.name.is_empty() { "(unnamed supply)" } else { &dest.name };
    ui.label(egui::RichText::new(name).strong());
    if !dest.address.is_empty() {
        ui.label(&dest.address);
    }
    ui.horizontal(|ui| {
        ui.label("Distance:");
        ui.label(egui::RichText::new(format!("{:.1} km", dest.distance_km)).strong());
    });
    if !dest.travel_time.is_empty() {
        ui.horizontal(|ui| {
            ui.label("Travel time:");
            ui.label(egui::RichText::new(&dest.travel_time).strong());
        });
    }
    if state.render_list.shortest_route == Some(index) {
        ui.label(egui::RichText::new("Globally shortest route").strong());
    }

    if let Some(location) = dest.valid_location() {
        if ui.button("Center on map").clicked() {
            state.viewport.center_on_entity(location);
        }
    }
}

/// Details of the selected report plus its ranked connections.
fn render_report(ui: &mut egui::Ui, state: &mut AppState, id: &str) {
    ui.horizontal(|ui| {
        ui.heading("Report");
        if ui.button("✕").clicked() {
            state.selection.close();
        }
    });
    ui.separator();

    let Some(report) = state.reports.iter().find(|r| r.id == id).cloned() else {
        ui.label("Selected report is no longer in the dataset.");
        return;
    };

    let title = if report.title.is_empty() { "(untitled report)" } else { &report.title };
    ui.label(egui::RichText::new(title).strong());
    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
        ui.painter().circle_filled(rect.center(), 5.0, color_for_quality(report.quality));
        ui.label(report.quality.label());
    });
    if !report.description.is_empty() {
        ui.label(&report.description);
    }
    if !report.address.is_empty() {
        ui.label(&report.address);
    }
    if let Some(submitted) = report.submitted_at {
        ui.label(format!("Submitted {}", submitted.with_timezone(&Local).format("%Y-%m-%d %H:%M")));
    }

    if let Some(location) = report.valid_location() {
        if ui.button("Center on map").clicked() {
            state.viewport.center_on_entity(location);
        }
    }

    ui.separator();
    ui.label(egui::RichText::new("Nearest water supplies").strong());
    let mut any = false;
    for connection in state.render_list.connections.iter().filter(|c| c.report_id == id) {
        any = true;
        let name = state
            .destinations
            .get(connection.destination_index)
            .map(|d| d.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or("(unnamed supply)");
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(format!("#{}", connection.rank + 1)).monospace());
            ui.label(name);
            ui.label(egui::RichText::new(format!("{:.1} km", connection.distance_km)).monospace());
        });
    }
    if !any {
        ui.label("No located water supply to connect to.");
    }
}

/// Report list shown when nothing is selected.
fn render_overview(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Reports");
    ui.separator();
    if state.reports.is_empty() {
        ui.label("Open a dataset to see reports.");
        return;
    }

    let mut event = None;
    let mut center_on = None;
    for report in &state.reports {
        ui.horizontal(|ui| {
            let (rect, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
            ui.painter().circle_filled(rect.center(), 5.0, color_for_quality(report.quality));
            let title = if report.title.is_empty() { report.id.as_str() } else { report.title.as_str() };
            if ui.link(title).clicked() {
                event = Some(MapEvent::TapReport(report.id.clone()));
                center_on = report.valid_location();
            }
        });
    }
    if let Some(event) = event {
        state.apply(event);
    }
    if let Some(location) = center_on {
        state.viewport.center_on_entity(location);
    }

    if !state.render_list.unlocated_reports.is_empty() || !state.render_list.unlocated_destinations.is_empty() {
        ui.separator();
        ui.label(egui::RichText::new("Without location").strong());
        for &index in &state.render_list.unlocated_reports {
            if let Some(report) = state.reports.get(index) {
                let title = if report.title.is_empty() { report.id.as_str() } else { report.title.as_str() };
                ui.label(format!("{} ({})", title, report.quality.label()));
            }
        }
        for &index in &state.render_list.unlocated_destinations {
            if let Some(dest) = state.destinations.get(index) {
                let name = if dest.name.is_empty() { "(unnamed supply)" } else { dest.name.as_str() };
                ui.label(format!("{} ({:.1} km, supply)", name, dest.distance_km));
            }
        }
    }
}

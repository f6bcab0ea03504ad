//! # Application State Management
//!
//! This module implements the central `AppState` struct which owns the
//! loaded dataset, the viewport and selection machines, and the per-frame
//! draw list. It implements the `eframe::App` trait to integrate with the
//! egui application framework.
//!
//! ## State Management
//!
//! The UI is immediate mode: every frame the core pipeline reassembles
//! the draw list from the current dataset, selection, and viewport, and
//! the panels render from it. There is no incremental recomputation; the
//! datasets are small enough that a full reassembly per frame is cheap.
//!
//! All interaction funnels through [`AppState::apply`] so the selection
//! machine is the only place selection state changes.

use eframe::egui;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::MapConfig;
use crate::core::{AssembleInput, Destination, Point, Report, RenderList, Selection, Viewport, assemble};
use crate::dataset;
use crate::ui::MapEvent;

/// Settings persisted across application sessions.
#[derive(Default, Serialize, Deserialize)]
struct PersistedSettings {
    last_open_dir: Option<String>,
    right_panel_width: Option<f32>,
}

/// Central application state owning the dataset and all UI state.
pub struct AppState {
    /// Optional alert message to display in a modal dialog.
    pub alert: Option<String>,

    // Dataset
    pub dataset_path: Option<PathBuf>,
    pub reports: Vec<Report>,
    pub destinations: Vec<Destination>,
    pub current_location: Option<Point>,

    // Core machines
    pub config: MapConfig,
    pub viewport: Viewport,
    pub selection: Selection,

    /// Draw list assembled at the start of the current frame.
    pub render_list: RenderList,

    // Map display options
    /// Whether to display entity names as text labels on the map.
    pub show_labels: bool,
    /// Optional basemap image path from the dataset.
    pub background_image: Option<PathBuf>,
    /// Loaded basemap texture for rendering.
    pub background_image_texture: Option<egui::TextureHandle>,

    // Persistence
    pub last_open_dir: Option<String>,
    pub right_panel_width: f32,
}

impl AppState {
    /// Create a new AppState, loading persisted settings if available.
    pub fn new(storage: Option<&dyn eframe::Storage>) -> Self {
        let persisted: PersistedSettings = storage.and_then(|s| eframe::get_value(s, "app_settings")).unwrap_or_default();
        let config = MapConfig::default();
        let viewport = Viewport::new(config.viewport_config());

        Self {
            alert: None,
            dataset_path: None,
            reports: Vec::new(),
            destinations: Vec::new(),
            current_location: None,
            config,
            viewport,
            selection: Selection::None,
            render_list: RenderList::default(),
            show_labels: true,
            background_image: None,
            background_image_texture: None,
            last_open_dir: persisted.last_open_dir,
            right_panel_width: persisted.right_panel_width.unwrap_or(360.0),
        }
    }

    /// Open a native file picker for a dataset JSON file, starting in the
    /// last used directory. Cancelling the picker leaves the current
    /// dataset untouched; a failed load raises the alert modal.
    pub fn open_dataset_selector(&mut self) {
        let mut dialog = rfd::FileDialog::new().add_filter("Dataset files", &["json"]);
        if let Some(dir) = &self.last_open_dir {
            dialog = dialog.set_directory(dir);
        }
        let Some(file) = dialog.pick_file() else { return };
        if let Some(parent) = file.parent() {
            self.last_open_dir = Some(parent.to_string_lossy().to_string());
        }
        if let Err(e) = self.load_dataset(&file) {
            log::error!("dataset load failed: {:#}", e);
            self.alert = Some(format!("{:#}", e));
        }
    }

    /// Load a dataset and its sibling config, then refit the camera over
    /// the new point set.
    pub fn load_dataset(&mut self, path: &Path) -> anyhow::Result<()> {
        let config = MapConfig::for_dataset(path)?;
        let loaded = dataset::load_dataset(path)?;

        self.config = config;
        self.viewport = Viewport::new(self.config.viewport_config());
        self.selection = Selection::None;
        self.reports = loaded.reports;
        self.destinations = loaded.destinations;
        self.current_location = loaded.current_location;
        self.background_image = loaded
            .background_image
            .map(|rel| path.parent().unwrap_or(Path::new(".")).join(rel));
        self.background_image_texture = None;
        self.dataset_path = Some(path.to_path_buf());

        self.refit_camera();
        Ok(())
    }

    /// Request a camera fit over every located point in the dataset.
    /// Called after every dataset change, not just the initial load.
    pub fn refit_camera(&mut self) {
        let points = self.all_points();
        self.viewport.fit_to_points(&points);
    }

    /// Every point relevant for bounds fitting: reports, destinations,
    /// and the current location.
    fn all_points(&self) -> Vec<Point> {
        self.reports
            .iter()
            .filter_map(Report::valid_location)
            .chain(self.destinations.iter().filter_map(Destination::valid_location))
            .chain(self.current_location.filter(Point::is_valid))
            .collect()
    }

    /// Route a map interaction into the selection machine.
    pub fn apply(&mut self, event: MapEvent) {
        match event {
            MapEvent::TapRoute(index) => self.selection.tap_route(index),
            MapEvent::TapReport(id) => self.selection.tap_report(&id),
            MapEvent::TapBackground => self.selection.tap_background(),
        }
    }

    /// Reassemble the draw list for this frame.
    fn reassemble(&mut self) {
        self.render_list = assemble(&AssembleInput {
            reports: &self.reports,
            destinations: &self.destinations,
            current_location: self.current_location,
            selection: &self.selection,
            viewport: &self.viewport,
            connections_per_report: self.config.connections_per_report,
            highlight_top_ranks: self.config.highlight_top_ranks,
        });
    }

    /// Load the basemap image and create an egui texture.
    fn load_background_image(ctx: &egui::Context, path: &Path) -> Option<egui::TextureHandle> {
        match std::fs::read(path) {
            Ok(bytes) => match image::load_from_memory(&bytes) {
                Ok(img) => {
                    let rgba = img.to_rgba8();
                    let size = [rgba.width() as usize, rgba.height() as usize];
                    let pixels = rgba.as_flat_samples();
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
                    let texture = ctx.load_texture("background_image", color_image, egui::TextureOptions::LINEAR);
                    log::info!("loaded basemap image from {}", path.display());
                    Some(texture)
                }
                Err(e) => {
                    log::error!("failed to decode basemap image {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) => {
                log::error!("failed to read basemap image {}: {}", path.display(), e);
                None
            }
        }
    }
}

impl eframe::App for AppState {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedSettings {
            last_open_dir: self.last_open_dir.clone(),
            right_panel_width: Some(self.right_panel_width),
        };
        eframe::set_value(storage, "app_settings", &settings);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Repaint periodically so the pulsing location marker animates
        // without input events.
        ctx.request_repaint_after(std::time::Duration::from_millis(50));

        // Lazy basemap texture load, once per dataset.
        if self.background_image_texture.is_none() {
            if let Some(path) = self.background_image.take() {
                self.background_image_texture = Self::load_background_image(ctx, &path);
            }
        }

        if self.alert.is_some() {
            egui::Window::new("Alert")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(20.0);
                        ui.label(self.alert.as_ref().unwrap());
                        ui.add_space(20.0);
                        if ui.button("OK").clicked() {
                            self.alert = None;
                        }
                        ui.add_space(10.0);
                    });
                });
        }

        self.reassemble();

        // Panels layout: top (fixed), right (resizable), map fills the
        // remaining space using CentralPanel.
        super::top_panel::render(ctx, self);
        super::right_panel::render(ctx, self);
        super::map::render(ctx, self);
    }
}

//! AquaMap: desktop viewer for water-quality field reports.
//!
//! Loads a JSON dataset of reports and water-supply destinations and
//! renders them on a 2D map with ranked connections, the globally
//! shortest route emphasized, zoom-tiered marker budgets, and a
//! single-selection inspector.

use eframe::egui;
use env_logger::Builder;
use log::LevelFilter;

mod config;
mod core;
mod dataset;
mod ui;

fn main() -> eframe::Result<()> {
    Builder::new().filter_level(LevelFilter::Info).parse_default_env().init();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 840.0]).with_title("AquaMap"),
        ..Default::default()
    };

    // Optional dataset path as the first CLI argument; otherwise the
    // in-app picker is used.
    let dataset_arg = std::env::args().nth(1);

    eframe::run_native(
        "AquaMap",
        native_options,
        Box::new(move |cc| {
            let mut state = ui::AppState::new(cc.storage);
            if let Some(path) = dataset_arg {
                if let Err(e) = state.load_dataset(std::path::Path::new(&path)) {
                    log::error!("failed to load dataset {}: {:#}", path, e);
                    state.alert = Some(format!("{:#}", e));
                }
            }
            Ok(Box::new(state))
        }),
    )
}

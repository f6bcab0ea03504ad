// UI module for the AquaMap admin viewer
//
// This module organizes the UI into separate components:
// - `top_panel`: Dataset metrics and zoom controls
// - `right_panel`: Selection inspector and report lists
// - `map`: Central map display with markers, routes, and connections
// - `app_state`: Application state management and main update loop

pub mod app_state;
pub mod map;
pub mod right_panel;
pub mod top_panel;

pub use app_state::AppState;

/// Inbound map interaction vocabulary, produced by hit-testing in the map
/// view and consumed by the selection machine.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// Tap on a destination marker, by destination index.
    TapRoute(usize),
    /// Tap on a report marker, by report id.
    TapReport(String),
    /// Tap that hit no entity.
    TapBackground,
}

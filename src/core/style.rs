//! Deterministic visual encoding for routes, connections, and markers.
//!
//! Styles are a pure function of (rank, shortest?, selected?, role) so the
//! same dataset always renders identically; the rules here are pinned by
//! the style tests below and must not drift, or stored screenshots used
//! for visual comparison stop matching.
//!
//! ## Rules
//!
//! - Colors come from a cyclic 8-hue palette indexed by `rank % 8`; the
//!   globally shortest route always renders in the fixed distinguished
//!   green instead of its palette hue.
//! - The shortest route gets the widest stroke, full opacity, and a solid
//!   line; a selected (non-shortest) entity gets the second-widest tier.
//! - Everything else renders at baseline width with partial opacity,
//!   alternating solid/dashed by rank parity so overlapping lines with
//!   similar geometry stay distinguishable.
//! - Connections fade with rank depth beyond the primary, keeping each
//!   report's single nearest connection visually dominant.

use egui::Color32;

use super::WaterQuality;

/// Fixed color of the globally shortest route, distinct from the palette.
pub const SHORTEST_ROUTE_COLOR: Color32 = Color32::from_rgb(0, 200, 83);

/// Marker color for the admin's current location.
pub const CURRENT_LOCATION_COLOR: Color32 = Color32::from_rgb(66, 133, 244);

/// Cyclic palette for non-shortest routes and connections, indexed by
/// `rank % 8`. Hues chosen to stay distinguishable on the dark map
/// background.
pub const ROUTE_PALETTE: [Color32; 8] = [
    Color32::from_rgb(41, 121, 255),  // blue
    Color32::from_rgb(255, 109, 0),   // orange
    Color32::from_rgb(170, 0, 255),   // purple
    Color32::from_rgb(255, 214, 0),   // yellow
    Color32::from_rgb(0, 184, 212),   // cyan
    Color32::from_rgb(255, 23, 68),   // red
    Color32::from_rgb(118, 255, 3),   // lime
    Color32::from_rgb(255, 64, 129),  // pink
];

/// Stroke width of the shortest route.
const STROKE_SHORTEST: f32 = 8.0;
/// Stroke width of a selected, non-shortest route or connection.
const STROKE_SELECTED: f32 = 6.0;
/// Baseline stroke widths.
const STROKE_ROUTE: f32 = 4.0;
const STROKE_CONNECTION: f32 = 3.0;

/// Baseline opacity for unemphasized lines.
const BASE_OPACITY: f32 = 0.6;
/// Per-rank opacity fade for connections beyond the primary.
const CONNECTION_FADE_PER_RANK: f32 = 0.1;
/// Opacity floor so deep-ranked connections never vanish entirely.
const CONNECTION_MIN_OPACITY: f32 = 0.25;

/// Whether a style applies to a destination route or to a
/// report-to-destination connection line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleRole {
    Route,
    Connection,
}

/// Render-ready visual style for one map element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub color: Color32,
    pub stroke_width: f32,
    /// 0.0 = transparent, 1.0 = fully opaque. Applied to `color` at draw
    /// time via [`Style::effective_color`].
    pub opacity: f32,
    pub dashed: bool,
}

impl Style {
    /// The style color with opacity folded into the alpha channel.
    pub fn effective_color(&self) -> Color32 {
        let [r, g, b, _] = self.color.to_array();
        Color32::from_rgba_unmultiplied(r, g, b, (self.opacity.clamp(0.0, 1.0) * 255.0) as u8)
    }

    /// Whether this element must be drawn in the emphasized (topmost)
    /// z-order group.
    pub fn emphasized(&self) -> bool {
        self.opacity >= 1.0 && !self.dashed && self.stroke_width >= STROKE_SELECTED
    }
}

/// Compute the style for a route or connection.
///
/// # Parameters
///
/// * `rank` - Position in the ranked ordering (0 = nearest / primary)
/// * `is_shortest` - Entity is the globally shortest route
/// * `is_selected` - Entity is the current selection
/// * `role` - Route (destination path) or Connection (report association)
pub fn style_for(rank: usize, is_shortest: bool, is_selected: bool, role: StyleRole) -> Style {
    if is_shortest {
        return Style {
            color: SHORTEST_ROUTE_COLOR,
            stroke_width: STROKE_SHORTEST,
            opacity: 1.0,
            dashed: false,
        };
    }

    let color = ROUTE_PALETTE[rank % ROUTE_PALETTE.len()];
    if is_selected {
        return Style {
            color,
            stroke_width: STROKE_SELECTED,
            opacity: 1.0,
            dashed: false,
        };
    }

    let opacity = match role {
        StyleRole::Route => BASE_OPACITY,
        StyleRole::Connection => (BASE_OPACITY - CONNECTION_FADE_PER_RANK * rank as f32).max(CONNECTION_MIN_OPACITY),
    };
    Style {
        color,
        stroke_width: match role {
            StyleRole::Route => STROKE_ROUTE,
            StyleRole::Connection => STROKE_CONNECTION,
        },
        opacity,
        dashed: rank % 2 == 1,
    }
}

/// Marker color for a report, keyed by its water-quality classification.
///
/// Optimum renders green, pH problems in the orange/red band, temperature
/// problems in the blue band, and unclassified reports gray.
pub fn color_for_quality(quality: WaterQuality) -> Color32 {
    match quality {
        WaterQuality::Optimum => Color32::from_rgb(0, 200, 83),        // green
        WaterQuality::HighPh => Color32::from_rgb(255, 109, 0),        // orange
        WaterQuality::LowPh => Color32::from_rgb(255, 23, 68),         // red
        WaterQuality::HighPhTemp => Color32::from_rgb(213, 0, 0),      // deep red
        WaterQuality::LowTemp => Color32::from_rgb(41, 121, 255),      // blue
        WaterQuality::LowTempHighPh => Color32::from_rgb(123, 31, 162), // violet
        WaterQuality::Unknown => Color32::from_rgb(158, 158, 158),     // gray
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortest_overrides_everything() {
        for rank in 0..10 {
            let s = style_for(rank, true, false, StyleRole::Route);
            assert_eq!(s.color, SHORTEST_ROUTE_COLOR);
            assert_eq!(s.stroke_width, STROKE_SHORTEST);
            assert_eq!(s.opacity, 1.0);
            assert!(!s.dashed);
            assert!(s.emphasized());
        }
        // Selection on the shortest route does not change its style.
        assert_eq!(style_for(0, true, true, StyleRole::Route), style_for(0, true, false, StyleRole::Route));
    }

    #[test]
    fn selected_gets_second_tier() {
        let s = style_for(2, false, true, StyleRole::Route);
        assert_eq!(s.stroke_width, STROKE_SELECTED);
        assert_eq!(s.opacity, 1.0);
        assert!(!s.dashed);
        assert!(s.emphasized());
        assert_eq!(s.color, ROUTE_PALETTE[2]);
    }

    #[test]
    fn baseline_alternates_dashing_by_parity() {
        for rank in 0..8 {
            let s = style_for(rank, false, false, StyleRole::Route);
            assert_eq!(s.dashed, rank % 2 == 1, "rank {}", rank);
            assert_eq!(s.stroke_width, STROKE_ROUTE);
            assert!(!s.emphasized());
        }
    }

    #[test]
    fn palette_cycles_and_stays_distinct() {
        assert_eq!(style_for(9, false, false, StyleRole::Route).color, ROUTE_PALETTE[1]);
        for (i, a) in ROUTE_PALETTE.iter().enumerate() {
            for b in &ROUTE_PALETTE[i + 1..] {
                assert_ne!(a, b);
            }
            assert_ne!(*a, SHORTEST_ROUTE_COLOR);
        }
    }

    #[test]
    fn connections_fade_with_rank_depth() {
        let primary = style_for(0, false, false, StyleRole::Connection);
        assert_eq!(primary.opacity, BASE_OPACITY);
        let mut prev = primary.opacity;
        for rank in 1..6 {
            let s = style_for(rank, false, false, StyleRole::Connection);
            assert!(s.opacity <= prev);
            assert!(s.opacity >= CONNECTION_MIN_OPACITY);
            prev = s.opacity;
        }
        // Deep ranks bottom out at the floor instead of disappearing.
        assert_eq!(style_for(50, false, false, StyleRole::Connection).opacity, CONNECTION_MIN_OPACITY);
    }

    #[test]
    fn effective_color_applies_opacity() {
        let s = Style {
            color: Color32::from_rgb(10, 20, 30),
            stroke_width: 1.0,
            opacity: 0.5,
            dashed: false,
        };
        let c = s.effective_color();
        assert_eq!(c.to_array()[3], 127);
    }
}

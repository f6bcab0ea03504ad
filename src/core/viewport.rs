//! Viewport state: zoom clamping, tiered marker budgets, and camera
//! requests.
//!
//! The zoom level is a continuous value clamped to a configured range. A
//! derived marker budget caps how many destination markers render at once:
//! at low zoom hundreds of markers are both indistinguishable and
//! expensive, so the budget steps down through configured tiers. The
//! invariant `marker_budget == tier lookup of zoom` is re-established by
//! every mutation.
//!
//! Camera movement is expressed as a pending [`CameraRequest`] the map
//! view consumes once per frame; a newer request simply overwrites an
//! unconsumed one (latest wins, no cancellation needed).

use super::geo::{GeoBounds, Point, bounding_box};

/// A zoom threshold and the marker budget that applies at or above it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetTier {
    pub min_zoom: f64,
    pub budget: usize,
}

/// Static viewport configuration, normally loaded from the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Zoom applied when the map first opens and when centering on an entity.
    pub focus_zoom: f64,
    /// Fallback map center when the dataset has no located point.
    pub fallback_center: Point,
    /// Bounding-box padding as a fraction of the span per axis.
    pub padding_fraction: f64,
    /// Budget tiers, highest `min_zoom` first. The last tier's budget
    /// applies below every threshold.
    pub tiers: Vec<BudgetTier>,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_zoom: 8.0,
            max_zoom: 18.0,
            focus_zoom: 15.0,
            fallback_center: Point::new(0.0, 0.0),
            padding_fraction: 0.1,
            tiers: vec![
                BudgetTier { min_zoom: 15.0, budget: 25 },
                BudgetTier { min_zoom: 13.0, budget: 15 },
                BudgetTier { min_zoom: f64::NEG_INFINITY, budget: 10 },
            ],
        }
    }
}

/// Pending camera movement, consumed by the map view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraRequest {
    /// Move the camera so the given (already padded) bounds are visible.
    FitBounds(GeoBounds),
    /// Recenter on a point without changing zoom.
    Center(Point),
}

/// Zoom/center state plus the derived marker budget.
#[derive(Debug, Clone)]
pub struct Viewport {
    config: ViewportConfig,
    zoom: f64,
    center: Point,
    marker_budget: usize,
    pending_camera: Option<CameraRequest>,
}

impl Viewport {
    pub fn new(config: ViewportConfig) -> Self {
        let zoom = config.focus_zoom.clamp(config.min_zoom, config.max_zoom);
        let center = config.fallback_center;
        let marker_budget = budget_for(&config.tiers, zoom);
        Self {
            config,
            zoom,
            center,
            marker_budget,
            pending_camera: None,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn marker_budget(&self) -> usize {
        self.marker_budget
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Apply an absolute zoom change (slider, scroll wheel). Clamps to the
    /// configured range and rederives the marker budget.
    pub fn on_zoom_changed(&mut self, new_zoom: f64) {
        self.zoom = new_zoom.clamp(self.config.min_zoom, self.config.max_zoom);
        self.marker_budget = budget_for(&self.config.tiers, self.zoom);
    }

    /// Whether a +1 zoom step would have any effect. Drives the enabled
    /// state of the zoom-in control.
    pub fn can_zoom_in(&self) -> bool {
        self.zoom < self.config.max_zoom
    }

    pub fn can_zoom_out(&self) -> bool {
        self.zoom > self.config.min_zoom
    }

    /// Step zoom in by 1.0. No-op at the clamp boundary.
    pub fn zoom_in(&mut self) {
        if self.can_zoom_in() {
            self.on_zoom_changed(self.zoom + 1.0);
        }
    }

    /// Step zoom out by 1.0. No-op at the clamp boundary.
    pub fn zoom_out(&mut self) {
        if self.can_zoom_out() {
            self.on_zoom_changed(self.zoom - 1.0);
        }
    }

    /// Recenter without changing zoom (pan).
    pub fn set_center(&mut self, center: Point) {
        self.center = center;
    }

    /// Request a camera move to cover all given points with the configured
    /// padding. Must be re-invoked whenever the underlying dataset
    /// changes. Falls back to a small fixed box around the configured
    /// fallback center when no point is given, so the camera never fits a
    /// degenerate box.
    pub fn fit_to_points(&mut self, points: &[Point]) {
        let bounds = bounding_box(points, self.config.padding_fraction).unwrap_or_else(|| GeoBounds::around(self.config.fallback_center));
        self.pending_camera = Some(CameraRequest::FitBounds(bounds));
    }

    /// Request recentering on a point at the current zoom.
    pub fn center_on(&mut self, point: Point) {
        self.pending_camera = Some(CameraRequest::Center(point));
    }

    /// Request recentering on an entity, also snapping zoom to the
    /// configured focus level.
    pub fn center_on_entity(&mut self, point: Point) {
        self.on_zoom_changed(self.config.focus_zoom);
        self.pending_camera = Some(CameraRequest::Center(point));
    }

    /// Take the pending camera request, if any. Called once per frame by
    /// the map view; later requests overwrite earlier unconsumed ones.
    pub fn take_camera_request(&mut self) -> Option<CameraRequest> {
        self.pending_camera.take()
    }
}

/// Tier lookup: the budget of the first tier whose threshold the zoom
/// meets, or the last tier's budget as the floor.
fn budget_for(tiers: &[BudgetTier], zoom: f64) -> usize {
    tiers
        .iter()
        .find(|t| zoom >= t.min_zoom)
        .or_else(|| tiers.last())
        .map(|t| t.budget)
        .unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_tiers_match_zoom_levels() {
        let mut vp = Viewport::new(ViewportConfig::default());
        vp.on_zoom_changed(16.0);
        assert_eq!(vp.marker_budget(), 25);
        vp.on_zoom_changed(14.0);
        assert_eq!(vp.marker_budget(), 15);
        vp.on_zoom_changed(10.0);
        assert_eq!(vp.marker_budget(), 10);
        // Exactly on a threshold counts as within the tier.
        vp.on_zoom_changed(15.0);
        assert_eq!(vp.marker_budget(), 25);
        vp.on_zoom_changed(13.0);
        assert_eq!(vp.marker_budget(), 15);
    }

    #[test]
    fn zoom_in_is_a_noop_at_the_maximum() {
        let mut vp = Viewport::new(ViewportConfig::default());
        for _ in 0..50 {
            vp.zoom_in();
        }
        assert_eq!(vp.zoom(), 18.0);
        assert!(!vp.can_zoom_in());
        // One more call past the clamp leaves the zoom unchanged.
        vp.zoom_in();
        assert_eq!(vp.zoom(), 18.0);
    }

    #[test]
    fn zoom_out_clamps_at_the_minimum() {
        let mut vp = Viewport::new(ViewportConfig::default());
        for _ in 0..50 {
            vp.zoom_out();
        }
        assert_eq!(vp.zoom(), 8.0);
        assert!(!vp.can_zoom_out());
        vp.zoom_out();
        assert_eq!(vp.zoom(), 8.0);
    }

    #[test]
    fn budget_invariant_holds_after_every_mutation() {
        let cfg = ViewportConfig::default();
        let mut vp = Viewport::new(cfg.clone());
        for z in [7.0, 12.9, 13.0, 14.99, 15.0, 19.0] {
            vp.on_zoom_changed(z);
            assert_eq!(vp.marker_budget(), budget_for(&cfg.tiers, vp.zoom()));
        }
    }

    #[test]
    fn fit_to_points_falls_back_on_empty_input() {
        let mut vp = Viewport::new(ViewportConfig {
            fallback_center: Point::new(47.0, 19.0),
            ..ViewportConfig::default()
        });
        vp.fit_to_points(&[]);
        match vp.take_camera_request() {
            Some(CameraRequest::FitBounds(b)) => {
                assert!(b.lat_span() > 0.0 && b.lat_span().is_finite());
                assert_eq!(b.center(), Point::new(47.0, 19.0));
            }
            other => panic!("expected FitBounds, got {:?}", other),
        }
        // Consumed; nothing pending afterwards.
        assert!(vp.take_camera_request().is_none());
    }

    #[test]
    fn latest_camera_request_wins() {
        let mut vp = Viewport::new(ViewportConfig::default());
        vp.fit_to_points(&[Point::new(1.0, 1.0)]);
        vp.center_on(Point::new(5.0, 5.0));
        assert_eq!(vp.take_camera_request(), Some(CameraRequest::Center(Point::new(5.0, 5.0))));
    }

    #[test]
    fn center_on_entity_applies_focus_zoom() {
        let mut vp = Viewport::new(ViewportConfig::default());
        vp.on_zoom_changed(9.0);
        vp.center_on_entity(Point::new(2.0, 3.0));
        assert_eq!(vp.zoom(), 15.0);
        assert_eq!(vp.marker_budget(), 25);
    }
}

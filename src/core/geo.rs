//! Spatial primitives: great-circle distance and bounding-box aggregation.
//!
//! Everything here is a pure function over [`Point`] values. Coordinate
//! validation happens at the dataset boundary; within this module callers
//! guarantee finite lat/lon values.

/// Earth radius in kilometers, used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Span of the fallback bounding box (degrees) when no valid point exists.
/// 0.01 degrees is roughly one kilometer at the equator.
pub const FALLBACK_BOX_DELTA_DEG: f64 = 0.01;

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
}

impl Point {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether this point may participate in spatial computation.
    ///
    /// Rejects out-of-range coordinates and the exact (0,0) origin, which
    /// upstream report sources emit when a device had no GPS fix.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
            && !(self.lat == 0.0 && self.lon == 0.0)
    }
}

/// Axis-aligned geographic bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub min: Point,
    pub max: Point,
}

impl GeoBounds {
    /// Small fixed-size box around a fallback center, used when the point
    /// set is empty and a degenerate (NaN/infinite) box must be avoided.
    pub fn around(center: Point) -> Self {
        Self {
            min: Point::new(center.lat - FALLBACK_BOX_DELTA_DEG, center.lon - FALLBACK_BOX_DELTA_DEG),
            max: Point::new(center.lat + FALLBACK_BOX_DELTA_DEG, center.lon + FALLBACK_BOX_DELTA_DEG),
        }
    }

    pub fn center(&self) -> Point {
        Point::new((self.min.lat + self.max.lat) / 2.0, (self.min.lon + self.max.lon) / 2.0)
    }

    /// Latitude span in degrees.
    pub fn lat_span(&self) -> f64 {
        self.max.lat - self.min.lat
    }

    /// Longitude span in degrees.
    pub fn lon_span(&self) -> f64 {
        self.max.lon - self.min.lon
    }
}

/// Great-circle distance between two points in kilometers (haversine).
///
/// Symmetric and zero on identical inputs; no error cases because the
/// inputs are pre-validated coordinates.
///
/// # Parameters
///
/// * `a` - First point
/// * `b` - Second point
///
/// # Returns
///
/// Distance in kilometers as f64.
pub fn distance_km(a: Point, b: Point) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Min/max bounding box over a point set, expanded by `padding_fraction`
/// of the span on each axis.
///
/// Returns `None` on an empty input; callers substitute
/// [`GeoBounds::around`] with their fallback center instead of fitting a
/// degenerate box.
pub fn bounding_box(points: &[Point], padding_fraction: f64) -> Option<GeoBounds> {
    let mut iter = points.iter();
    let first = iter.next()?;

    let mut min_lat = first.lat;
    let mut max_lat = first.lat;
    let mut min_lon = first.lon;
    let mut max_lon = first.lon;
    for p in iter {
        min_lat = min_lat.min(p.lat);
        max_lat = max_lat.max(p.lat);
        min_lon = min_lon.min(p.lon);
        max_lon = max_lon.max(p.lon);
    }

    let pad_lat = (max_lat - min_lat) * padding_fraction;
    let pad_lon = (max_lon - min_lon) * padding_fraction;
    Some(GeoBounds {
        min: Point::new(min_lat - pad_lat, min_lon - pad_lon),
        max: Point::new(max_lat + pad_lat, max_lon + pad_lon),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn distance_identity() {
        let p = Point::new(47.4979, 19.0402);
        assert!(distance_km(p, p).abs() < EPS);
    }

    #[test]
    fn distance_symmetry() {
        let a = Point::new(47.4979, 19.0402);
        let b = Point::new(48.2082, 16.3738);
        assert!((distance_km(a, b) - distance_km(b, a)).abs() < EPS);
    }

    #[test]
    fn distance_known_value() {
        // Budapest to Vienna, roughly 214 km great-circle.
        let a = Point::new(47.4979, 19.0402);
        let b = Point::new(48.2082, 16.3738);
        let d = distance_km(a, b);
        assert!(d > 200.0 && d < 230.0, "expected ~214 km, got {}", d);
    }

    #[test]
    fn one_tenth_degree_of_latitude() {
        // 0.1 degrees of latitude is ~11.1 km anywhere on the sphere.
        let a = Point::new(1.0, 1.0);
        let b = Point::new(1.1, 1.0);
        let d = distance_km(a, b);
        assert!((d - 11.1).abs() < 0.05, "got {}", d);
    }

    #[test]
    fn validity_rejects_origin_and_out_of_range() {
        assert!(Point::new(47.5, 19.0).is_valid());
        assert!(!Point::new(0.0, 0.0).is_valid());
        assert!(!Point::new(91.0, 0.0).is_valid());
        assert!(!Point::new(0.0, -181.0).is_valid());
        assert!(!Point::new(f64::NAN, 0.0).is_valid());
        // A zero latitude alone is fine; only the exact origin is a sentinel.
        assert!(Point::new(0.0, 10.0).is_valid());
    }

    #[test]
    fn bounding_box_with_padding() {
        let points = [Point::new(10.0, 20.0), Point::new(12.0, 24.0)];
        let b = bounding_box(&points, 0.1).unwrap();
        assert!((b.min.lat - 9.8).abs() < EPS);
        assert!((b.max.lat - 12.2).abs() < EPS);
        assert!((b.min.lon - 19.6).abs() < EPS);
        assert!((b.max.lon - 24.4).abs() < EPS);
    }

    #[test]
    fn bounding_box_empty_and_fallback() {
        assert!(bounding_box(&[], 0.1).is_none());
        let fb = GeoBounds::around(Point::new(47.0, 19.0));
        assert!((fb.lat_span() - 2.0 * FALLBACK_BOX_DELTA_DEG).abs() < EPS);
        assert_eq!(fb.center(), Point::new(47.0, 19.0));
    }

    #[test]
    fn bounding_box_single_point_has_zero_span() {
        let b = bounding_box(&[Point::new(5.0, 5.0)], 0.1).unwrap();
        assert_eq!(b.min, b.max);
    }
}

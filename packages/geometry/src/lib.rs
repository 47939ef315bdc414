#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Area-of-interest polygon types and drawing-constraint validation.
//!
//! A completed draw event is checked against the zoom-level and area-size
//! constraints before it is accepted locally. Area is computed geodesically
//! (on the ellipsoid, not in the lat/lng plane) because selections span
//! real-world extents where planar math is materially wrong at km scale.

use geo::{Coord, GeodesicArea, LineString, Polygon};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum map zoom level at which a drawn polygon is accepted.
///
/// Zoom levels below this produce selections too coarse to analyze.
/// The comparison is strict: drawing at exactly `MIN_ZOOM` is accepted.
pub const MIN_ZOOM: u8 = 10;

/// Maximum accepted selection size in square kilometers.
///
/// Matches the backend's server-side limit. The comparison is strict and
/// applies to the 2-dp rounded area: a selection that rounds to exactly
/// `MAX_AREA_KM2` is accepted.
pub const MAX_AREA_KM2: f64 = 50.0;

/// A latitude/longitude pair as drawn on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl LatLng {
    /// Creates a new coordinate pair.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Rounds both components to 6 decimal places (~0.1 m of precision).
    #[must_use]
    fn rounded(self) -> Self {
        Self {
            lat: round_to(self.lat, 6),
            lng: round_to(self.lng, 6),
        }
    }
}

/// A single polygon-creation event from the map drawing collaborator.
///
/// The drawing tool emits exactly one of these per completed polygon,
/// carrying the vertex ring and the zoom level at which it was drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawEvent {
    /// Polygon vertices in draw order. The ring is not explicitly closed.
    pub points: Vec<LatLng>,
    /// Map zoom level when the polygon was completed.
    pub current_zoom: u8,
}

/// A validated polygon selection with its geodesic area.
///
/// Only produced by [`validate`]; points are already rounded to 6 decimal
/// places and the area to 2, so re-validating a shape is idempotent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    points: Vec<LatLng>,
    area_sq_km: f64,
}

impl Shape {
    /// The rounded polygon vertices.
    #[must_use]
    pub fn points(&self) -> &[LatLng] {
        &self.points
    }

    /// Geodesic area in km², rounded to 2 decimal places.
    #[must_use]
    pub const fn area_sq_km(&self) -> f64 {
        self.area_sq_km
    }

    /// Vertices as `[lat, lng]` pairs, the shape the wire contract expects.
    #[must_use]
    pub fn coordinate_pairs(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(|p| [p.lat, p.lng]).collect()
    }
}

/// Reasons a drawn polygon is refused before anything leaves the client.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Fewer than 3 vertices. The drawing tool normally prevents this;
    /// it is a structural precondition rather than a business rule.
    #[error("a polygon requires at least 3 points, got {count}")]
    TooFewPoints {
        /// Number of vertices received.
        count: usize,
    },

    /// The map was zoomed out too far when the polygon was completed.
    #[error("zoom level {zoom} is below the minimum of {MIN_ZOOM}")]
    ZoomTooLow {
        /// Zoom level at draw time.
        zoom: u8,
    },

    /// The selection covers more than [`MAX_AREA_KM2`].
    #[error("selected area of {area_sq_km} km² exceeds the {MAX_AREA_KM2} km² limit")]
    AreaTooLarge {
        /// Computed geodesic area in km², rounded to 2 decimal places.
        area_sq_km: f64,
    },
}

/// Checks a candidate polygon against the drawing constraints.
///
/// Rules are applied in order and the first failure wins: vertex count,
/// then zoom level, then geodesic area. Pure function, no side effects.
///
/// # Errors
///
/// Returns [`ValidationError`] describing the first violated constraint.
pub fn validate(points: &[LatLng], current_zoom: u8) -> Result<Shape, ValidationError> {
    if points.len() < 3 {
        return Err(ValidationError::TooFewPoints {
            count: points.len(),
        });
    }

    if current_zoom < MIN_ZOOM {
        return Err(ValidationError::ZoomTooLow { zoom: current_zoom });
    }

    let rounded: Vec<LatLng> = points.iter().map(|p| p.rounded()).collect();
    let area_sq_km = round_to(geodesic_area_sq_km(&rounded), 2);

    if area_sq_km > MAX_AREA_KM2 {
        return Err(ValidationError::AreaTooLarge { area_sq_km });
    }

    Ok(Shape {
        points: rounded,
        area_sq_km,
    })
}

/// Unsigned geodesic area of the vertex ring, in km².
///
/// `geo` closes the exterior ring itself, so the draw ring can be passed
/// through unclosed.
fn geodesic_area_sq_km(points: &[LatLng]) -> f64 {
    let ring: Vec<Coord<f64>> = points
        .iter()
        .map(|p| Coord { x: p.lng, y: p.lat })
        .collect();
    let polygon = Polygon::new(LineString::new(ring), vec![]);
    polygon.geodesic_area_unsigned() / 1_000_000.0
}

/// Rounds `value` to `digits` decimal places.
fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10_f64.powi(digits);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ~1.1 km x ~1.1 km square at the equator, well under the limit.
    fn small_square() -> Vec<LatLng> {
        vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 0.01),
            LatLng::new(0.01, 0.01),
            LatLng::new(0.01, 0.0),
        ]
    }

    /// ~111 km x ~111 km square, far over the limit.
    fn huge_square() -> Vec<LatLng> {
        vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 1.0),
            LatLng::new(1.0, 1.0),
            LatLng::new(1.0, 0.0),
        ]
    }

    #[test]
    fn rejects_too_few_points() {
        let points = vec![LatLng::new(0.0, 0.0), LatLng::new(0.0, 0.01)];
        assert_eq!(
            validate(&points, 14),
            Err(ValidationError::TooFewPoints { count: 2 })
        );
    }

    #[test]
    fn rejects_low_zoom_regardless_of_area() {
        assert_eq!(
            validate(&small_square(), 5),
            Err(ValidationError::ZoomTooLow { zoom: 5 })
        );
        assert_eq!(
            validate(&huge_square(), 5),
            Err(ValidationError::ZoomTooLow { zoom: 5 })
        );
    }

    #[test]
    fn zoom_check_wins_over_area_check() {
        // Oversized AND under-zoomed: the zoom rule fires first.
        let err = validate(&huge_square(), 0).unwrap_err();
        assert!(matches!(err, ValidationError::ZoomTooLow { zoom: 0 }));
    }

    #[test]
    fn accepts_at_exactly_min_zoom() {
        assert!(validate(&small_square(), MIN_ZOOM).is_ok());
    }

    #[test]
    fn rejects_oversized_area_at_sufficient_zoom() {
        let err = validate(&huge_square(), 14).unwrap_err();
        match err {
            ValidationError::AreaTooLarge { area_sq_km } => {
                assert!(area_sq_km > MAX_AREA_KM2);
            }
            other => panic!("expected AreaTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn accepts_area_at_exactly_the_limit() {
        let square = |side: f64| {
            vec![
                LatLng::new(0.0, 0.0),
                LatLng::new(0.0, side),
                LatLng::new(side, side),
                LatLng::new(side, 0.0),
            ]
        };

        // Search a square side whose geodesic area lands on the limit.
        // The area is monotonic in the side, so bisection converges to
        // well inside the 2-dp rounding window around 50.00.
        let mut lo = 0.05_f64;
        let mut hi = 0.08_f64;
        for _ in 0..60 {
            let mid = (lo + hi) / 2.0;
            if geodesic_area_sq_km(&square(mid)) < MAX_AREA_KM2 {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        let side = (lo + hi) / 2.0;

        let shape = validate(&square(side), 14).unwrap();
        assert!((shape.area_sq_km() - MAX_AREA_KM2).abs() < f64::EPSILON);

        // Nudging the side past the rounding window tips it over.
        let err = validate(&square(side + 0.001), 14).unwrap_err();
        assert!(matches!(err, ValidationError::AreaTooLarge { .. }));
    }

    #[test]
    fn accepts_small_area_with_geodesic_size() {
        let shape = validate(&small_square(), 14).unwrap();
        // A 0.01 degree square at the equator is roughly 1.2 km².
        assert!(shape.area_sq_km() > 1.0 && shape.area_sq_km() < 1.5);
        assert_eq!(shape.points().len(), 4);
    }

    #[test]
    fn rounds_points_to_six_decimal_places() {
        let points = vec![
            LatLng::new(12.345_678_912, 77.123_456_789),
            LatLng::new(12.355_678_912, 77.123_456_789),
            LatLng::new(12.355_678_912, 77.133_456_789),
        ];
        let shape = validate(&points, 14).unwrap();
        assert!((shape.points()[0].lat - 12.345_679).abs() < 1e-9);
        assert!((shape.points()[0].lng - 77.123_457).abs() < 1e-9);
    }

    #[test]
    fn validation_is_idempotent() {
        let first = validate(&small_square(), 14).unwrap();
        let second = validate(first.points(), 14).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn coordinate_pairs_match_wire_order() {
        let shape = validate(&small_square(), 14).unwrap();
        let pairs = shape.coordinate_pairs();
        assert_eq!(pairs[1], [0.0, 0.01]);
    }
}

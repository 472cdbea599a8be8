//! Planar geometry over closed rings of degree coordinates.
//!
//! Longitude is treated as `x` and latitude as `y`; no projection is applied.
//! Callers guarantee that a ring is closed (first point equals last) and has
//! at least four points. None of the functions re-validate that.

use crate::Point;

/// Twice the signed area contribution of every edge, summed.
fn cross_sum(ring: &[Point]) -> f64 {
    ring.windows(2)
        .map(|edge| match edge {
            [a, b] => a.lon * b.lat - b.lon * a.lat,
            _ => 0.0,
        })
        .sum()
}

/// Signed area of the ring; positive when the ring is counter-clockwise.
///
/// # Examples
/// ```
/// use placegrain_core::{Point, cartesian::signed_area};
///
/// let square = [
///     Point { lon: 0.0, lat: 0.0 },
///     Point { lon: 1.0, lat: 0.0 },
///     Point { lon: 1.0, lat: 1.0 },
///     Point { lon: 0.0, lat: 1.0 },
///     Point { lon: 0.0, lat: 0.0 },
/// ];
/// assert_eq!(signed_area(&square), 1.0);
/// ```
#[must_use]
pub fn signed_area(ring: &[Point]) -> f64 {
    cross_sum(ring) / 2.0
}

/// Report whether the ring winds counter-clockwise.
#[must_use]
pub fn is_counter_clockwise(ring: &[Point]) -> bool {
    signed_area(ring) > 0.0
}

/// Area-weighted centroid of the ring.
///
/// The result is undefined for rings whose signed area is zero.
#[must_use]
pub fn centroid(ring: &[Point]) -> Point {
    let mut area = 0.0;
    let mut lon = 0.0;
    let mut lat = 0.0;
    for edge in ring.windows(2) {
        if let [a, b] = edge {
            let cross = a.lon * b.lat - b.lon * a.lat;
            area += cross;
            lon += (a.lon + b.lon) * cross;
            lat += (a.lat + b.lat) * cross;
        }
    }
    // `area` holds twice the signed area here.
    let factor = 3.0 * area;
    Point {
        lon: lon / factor,
        lat: lat / factor,
    }
}

/// Reverse the ring in place when it winds clockwise.
///
/// Applying the function twice leaves the ring unchanged.
pub fn normalise_winding(ring: &mut [Point]) {
    if !is_counter_clockwise(ring) {
        ring.reverse();
    }
}

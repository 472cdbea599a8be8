//! Geographic points and bounding boxes in WGS84 degrees.
//!
//! Every coordinate handled by the ingestion pipeline is rounded to seven
//! fractional digits (roughly one centimetre) and must fall inside the usable
//! extent of the EPSG:3857 projection.

use geo::{Coord, Intersects, Rect};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest accepted absolute longitude.
pub const MAX_LONGITUDE: f64 = 180.0;

/// Largest accepted absolute latitude (EPSG:3857 usable bound).
pub const MAX_LATITUDE: f64 = 85.06;

/// Number of fractional digits kept on every coordinate.
pub const COORDINATE_PRECISION: i32 = 7;

/// Round a coordinate to [`COORDINATE_PRECISION`] fractional digits.
///
/// # Examples
/// ```
/// use placegrain_core::round_coordinate;
///
/// assert_eq!(round_coordinate(12.345_678_949), 12.345_678_9);
/// ```
#[must_use]
pub fn round_coordinate(value: f64) -> f64 {
    let scale = 10_f64.powi(COORDINATE_PRECISION);
    (value * scale).round() / scale
}

/// A location in degrees.
///
/// # Examples
/// ```
/// use placegrain_core::Point;
///
/// # fn main() -> Result<(), placegrain_core::PointError> {
/// let point = Point::new(14.421_253_44, 50.087_465_11)?;
/// assert_eq!(point.lon, 14.421_253_4);
/// assert_eq!(point.lat, 50.087_465_1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

/// Errors returned by [`Point::new`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PointError {
    /// The longitude or latitude lies outside the projection bounds.
    #[error("coordinate lon={lon}, lat={lat} is outside the supported bounds")]
    OutOfBounds {
        /// Offending longitude.
        lon: f64,
        /// Offending latitude.
        lat: f64,
    },
}

impl Point {
    /// Round both coordinates and validate them against the projection bounds.
    pub fn new(lon: f64, lat: f64) -> Result<Self, PointError> {
        let point = Self::rounded(lon, lat);
        if point.is_within_bounds() {
            Ok(point)
        } else {
            Err(PointError::OutOfBounds { lon, lat })
        }
    }

    /// Round both coordinates without validating them.
    #[must_use]
    pub fn rounded(lon: f64, lat: f64) -> Self {
        Self {
            lon: round_coordinate(lon),
            lat: round_coordinate(lat),
        }
    }

    /// Report whether the point is finite and inside the projection bounds.
    #[must_use]
    pub fn is_within_bounds(&self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && self.lon.abs() <= MAX_LONGITUDE
            && self.lat.abs() <= MAX_LATITUDE
    }
}

impl From<Point> for Coord<f64> {
    fn from(point: Point) -> Self {
        Self {
            x: point.lon,
            y: point.lat,
        }
    }
}

/// Rectangular area described by its four edges.
///
/// Boxes built through [`BoundingBox::new`] are normalised: inverted edges are
/// swapped and every edge is clamped to the projection bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Western edge (minimum longitude).
    pub west: f64,
    /// Northern edge (maximum latitude).
    pub north: f64,
    /// Eastern edge (maximum longitude).
    pub east: f64,
    /// Southern edge (minimum latitude).
    pub south: f64,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::world()
    }
}

impl BoundingBox {
    /// Build a normalised box from edges given in `west north east south` order.
    ///
    /// # Examples
    /// ```
    /// use placegrain_core::BoundingBox;
    ///
    /// let bbox = BoundingBox::new(20.0, 10.0, -200.0, 89.0);
    /// assert_eq!(bbox.west, -180.0);
    /// assert_eq!(bbox.east, 20.0);
    /// assert_eq!(bbox.north, 85.06);
    /// assert_eq!(bbox.south, 10.0);
    /// ```
    #[must_use]
    pub fn new(west: f64, north: f64, east: f64, south: f64) -> Self {
        Self {
            west: west.min(east).max(-MAX_LONGITUDE),
            north: north.max(south).min(MAX_LATITUDE),
            east: west.max(east).min(MAX_LONGITUDE),
            south: north.min(south).max(-MAX_LATITUDE),
        }
    }

    /// The whole supported extent.
    #[must_use]
    pub const fn world() -> Self {
        Self {
            west: -MAX_LONGITUDE,
            north: MAX_LATITUDE,
            east: MAX_LONGITUDE,
            south: -MAX_LATITUDE,
        }
    }

    /// Convert into a `geo` rectangle (`x = longitude`, `y = latitude`).
    #[must_use]
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            Coord {
                x: self.west,
                y: self.south,
            },
            Coord {
                x: self.east,
                y: self.north,
            },
        )
    }

    /// Report whether the point lies inside the box; edges count as inside.
    #[must_use]
    pub fn contains(&self, point: &Point) -> bool {
        self.to_rect().intersects(&Coord::from(*point))
    }

    /// Partition the box into a `rows × cols` grid.
    ///
    /// Tiles are produced row by row from the south-west corner and their edges
    /// are rounded to [`COORDINATE_PRECISION`] digits. A zero dimension is
    /// treated as one.
    ///
    /// # Examples
    /// ```
    /// use placegrain_core::BoundingBox;
    ///
    /// let tiles = BoundingBox::new(0.0, 2.0, 4.0, 0.0).tiles(2, 2);
    /// assert_eq!(tiles.len(), 4);
    /// assert_eq!(tiles[1], BoundingBox { west: 2.0, north: 1.0, east: 4.0, south: 0.0 });
    /// ```
    #[must_use]
    pub fn tiles(&self, rows: u32, cols: u32) -> Vec<Self> {
        let rows = rows.max(1);
        let cols = cols.max(1);
        let row_step = (self.north - self.south) / f64::from(rows);
        let col_step = (self.east - self.west) / f64::from(cols);

        let mut tiles = Vec::with_capacity((rows as usize) * (cols as usize));
        for row in 0..rows {
            let south = round_coordinate(self.south + row_step * f64::from(row));
            let north = round_coordinate(south + row_step);
            for col in 0..cols {
                let west = round_coordinate(self.west + col_step * f64::from(col));
                let east = round_coordinate(west + col_step);
                tiles.push(Self {
                    west,
                    north,
                    east,
                    south,
                });
            }
        }
        tiles
    }
}

//! Core domain types for the placegrain ingestion pipeline.
//!
//! The crate holds everything that does not depend on a particular input
//! format: coordinates and bounding boxes, planar ring geometry, the
//! normalised [`Place`] model with its merge rule, and the [`PlaceStore`]
//! write seam together with an SQLite implementation.

#![forbid(unsafe_code)]

pub mod cartesian;
mod document;
mod place;
mod point;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use document::{Metadata, PlaceDocument};
pub use place::{Address, Attributes, ElementKind, Linked, Place, SocialNetworks};
pub use point::{
    BoundingBox, COORDINATE_PRECISION, MAX_LATITUDE, MAX_LONGITUDE, Point, PointError,
    round_coordinate,
};
pub use store::{PlaceStore, PlaceStoreError, UpsertSummary};

#[cfg(feature = "store-sqlite")]
pub use store::SqlitePlaceStore;

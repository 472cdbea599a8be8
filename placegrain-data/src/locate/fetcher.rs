//! The per-tile lookup seam.

use async_trait::async_trait;
use placegrain_core::{BoundingBox, Point};

use super::TransportError;

/// Representative point of one multipolygon relation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelationCenter {
    /// Relation identifier.
    pub id: i64,
    /// Centre reported by the spatial service, unrounded.
    pub center: Point,
}

/// Source of multipolygon relation centres for one tile.
///
/// Implementations issue exactly one request per call; retry, pacing and
/// degradation are handled by [`super::RelationLocations::fetch`].
#[async_trait(?Send)]
pub trait CenterFetcher {
    /// Fetch the centres of all multipolygon relations within `tile`.
    async fn fetch_tile(&self, tile: &BoundingBox) -> Result<Vec<RelationCenter>, TransportError>;
}

//! Test utilities for relation resolution.
//!
//! [`StubCenterFetcher`] answers tile requests from a fixed list of relation
//! centres without touching the network, and records every tile it was asked
//! for so tests can assert on pacing and retry behaviour.

use std::cell::{Cell, RefCell};

use async_trait::async_trait;
use placegrain_core::BoundingBox;

use super::{CenterFetcher, RelationCenter, TransportError};

/// Deterministic [`CenterFetcher`] for tests.
///
/// A tile request returns every configured centre lying inside the tile.
///
/// # Example
///
/// ```
/// use placegrain_core::{BoundingBox, Point};
/// use placegrain_data::locate::test_support::StubCenterFetcher;
/// use placegrain_data::locate::{LocatorSettings, RelationCenter, RelationLocations};
/// use placegrain_data::locate::RelationLocator;
/// use std::time::Duration;
///
/// let fetcher = StubCenterFetcher::new(vec![RelationCenter {
///     id: 42,
///     center: Point { lon: 14.42, lat: 50.08 },
/// }]);
/// let settings = LocatorSettings::default().with_delays(Duration::ZERO, Duration::ZERO);
/// let locations =
///     RelationLocations::fetch_blocking(&fetcher, &BoundingBox::world(), &settings).unwrap();
/// assert_eq!(locations.resolve(42), Some(Point { lon: 14.42, lat: 50.08 }));
/// ```
#[derive(Debug, Default)]
pub struct StubCenterFetcher {
    centres: Vec<RelationCenter>,
    failing: Vec<BoundingBox>,
    remaining_failures: Cell<u32>,
    requested: RefCell<Vec<BoundingBox>>,
}

impl StubCenterFetcher {
    /// Create a fetcher serving `centres`.
    #[must_use]
    pub fn new(centres: Vec<RelationCenter>) -> Self {
        Self {
            centres,
            ..Self::default()
        }
    }

    /// Make every request for `tile` fail.
    #[must_use]
    pub fn failing_tile(mut self, tile: BoundingBox) -> Self {
        self.failing.push(tile);
        self
    }

    /// Make the first `failures` requests fail regardless of tile.
    #[must_use]
    pub fn flaky(self, failures: u32) -> Self {
        self.remaining_failures.set(failures);
        self
    }

    /// Tiles requested so far, in call order, retries included.
    #[must_use]
    pub fn requested_tiles(&self) -> Vec<BoundingBox> {
        self.requested.borrow().clone()
    }

    fn unavailable() -> TransportError {
        TransportError::Http {
            url: "stub://overpass".to_owned(),
            status: 504,
            message: "gateway timeout".to_owned(),
        }
    }
}

#[async_trait(?Send)]
impl CenterFetcher for StubCenterFetcher {
    async fn fetch_tile(&self, tile: &BoundingBox) -> Result<Vec<RelationCenter>, TransportError> {
        self.requested.borrow_mut().push(*tile);

        let pending = self.remaining_failures.get();
        if pending > 0 {
            self.remaining_failures.set(pending - 1);
            return Err(Self::unavailable());
        }
        if self.failing.contains(tile) {
            return Err(Self::unavailable());
        }
        Ok(self
            .centres
            .iter()
            .filter(|entry| tile.contains(&entry.center))
            .copied()
            .collect())
    }
}

//! Relation location resolution.
//!
//! Relations carry no geometry of their own in the element stream, so their
//! locations are looked up ahead of ingestion: the bounding box is cut into a
//! grid of tiles, each tile is queried through a [`CenterFetcher`], and the
//! answers are merged into a [`RelationLocations`] map that the inspector
//! consults through the [`RelationLocator`] trait.
//!
//! Tile requests are paced by a fixed pre-request delay and retried a bounded
//! number of times. A tile whose attempts are all exhausted contributes no
//! relations; the run carries on with the remaining tiles.

use std::collections::HashMap;
use std::time::Duration;

use futures_util::stream::{self, StreamExt};
use log::{info, warn};
use placegrain_core::{BoundingBox, Point};

mod error;
mod fetcher;
mod overpass;
#[doc(hidden)]
pub mod test_support;

pub use error::{LocateError, TransportError};
pub use fetcher::{CenterFetcher, RelationCenter};
pub use overpass::{DEFAULT_OVERPASS_ENDPOINT, OverpassConfig, OverpassFetcher};

/// Default pause before each tile request.
pub const DEFAULT_PRE_REQUEST_DELAY: Duration = Duration::from_secs(1);

/// Default pause after a failed tile request.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(10);

/// Default number of attempts per tile.
pub const DEFAULT_ATTEMPTS: u32 = 3;

/// Looks up the representative point of a relation.
pub trait RelationLocator {
    /// Location of relation `id`, or `None` when it is unknown.
    fn resolve(&self, id: i64) -> Option<Point>;
}

/// Tiling, pacing and retry parameters for [`RelationLocations::fetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorSettings {
    /// Number of tile rows.
    pub rows: u32,
    /// Number of tile columns.
    pub cols: u32,
    /// Pause before every tile request.
    pub pre_request_delay: Duration,
    /// Pause after every failed attempt that will be retried.
    pub retry_delay: Duration,
    /// Attempts per tile, at least one.
    pub attempts: u32,
    /// Tiles requested concurrently, at least one.
    pub concurrency: usize,
    /// Overall limit for the whole lookup.
    pub timeout: Option<Duration>,
}

impl Default for LocatorSettings {
    fn default() -> Self {
        Self {
            rows: 1,
            cols: 1,
            pre_request_delay: DEFAULT_PRE_REQUEST_DELAY,
            retry_delay: DEFAULT_RETRY_DELAY,
            attempts: DEFAULT_ATTEMPTS,
            concurrency: 1,
            timeout: None,
        }
    }
}

impl LocatorSettings {
    /// Set the tile grid.
    #[must_use]
    pub const fn with_grid(mut self, rows: u32, cols: u32) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    /// Set the pre-request and retry delays.
    #[must_use]
    pub const fn with_delays(mut self, pre_request: Duration, retry: Duration) -> Self {
        self.pre_request_delay = pre_request;
        self.retry_delay = retry;
        self
    }

    /// Set the number of attempts per tile.
    #[must_use]
    pub const fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Set how many tiles may be in flight at once.
    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the overall time limit.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Relation id to location map, built once and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationLocations {
    centres: HashMap<i64, Point>,
}

impl RelationLocator for RelationLocations {
    fn resolve(&self, id: i64) -> Option<Point> {
        self.centres.get(&id).copied()
    }
}

impl FromIterator<RelationCenter> for RelationLocations {
    /// Later entries overwrite earlier ones; centres are rounded and
    /// out-of-bounds centres dropped.
    fn from_iter<I: IntoIterator<Item = RelationCenter>>(iter: I) -> Self {
        let mut centres = HashMap::new();
        for entry in iter {
            match Point::new(entry.center.lon, entry.center.lat) {
                Ok(point) => {
                    centres.insert(entry.id, point);
                }
                Err(err) => warn!("Dropping centre of relation {}: {err}", entry.id),
            }
        }
        Self { centres }
    }
}

impl RelationLocations {
    /// Number of known relations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.centres.len()
    }

    /// Report whether no relation is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.centres.is_empty()
    }

    /// Query every tile of `bbox` and merge the answers in tile order.
    ///
    /// Failing tiles degrade to empty results; the only fatal outcome is the
    /// overall time limit in `settings` elapsing.
    pub async fn fetch<F>(
        fetcher: &F,
        bbox: &BoundingBox,
        settings: &LocatorSettings,
    ) -> Result<Self, LocateError>
    where
        F: CenterFetcher + ?Sized,
    {
        let tiles = bbox.tiles(settings.rows, settings.cols);
        info!(
            "Resolving relation centres over {} tile(s) of w={}, n={}, e={}, s={}.",
            tiles.len(),
            bbox.west,
            bbox.north,
            bbox.east,
            bbox.south
        );

        let work = stream::iter(tiles.iter().enumerate())
            .map(|(index, tile)| fetch_tile_with_retry(fetcher, index, tile, settings))
            .buffered(settings.concurrency.max(1))
            .collect::<Vec<_>>();

        let per_tile = match settings.timeout {
            Some(limit) => tokio::time::timeout(limit, work)
                .await
                .map_err(|_| LocateError::Timeout { limit })?,
            None => work.await,
        };

        let locations: Self = per_tile.into_iter().flatten().collect();
        info!("Created relation locator with {} relations.", locations.len());
        Ok(locations)
    }

    /// Blocking wrapper around [`Self::fetch`] driving its own runtime.
    ///
    /// Must not be called from within an async context.
    pub fn fetch_blocking<F>(
        fetcher: &F,
        bbox: &BoundingBox,
        settings: &LocatorSettings,
    ) -> Result<Self, LocateError>
    where
        F: CenterFetcher + ?Sized,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(LocateError::Runtime)?;
        runtime.block_on(Self::fetch(fetcher, bbox, settings))
    }
}

async fn fetch_tile_with_retry<F>(
    fetcher: &F,
    index: usize,
    tile: &BoundingBox,
    settings: &LocatorSettings,
) -> Vec<RelationCenter>
where
    F: CenterFetcher + ?Sized,
{
    tokio::time::sleep(settings.pre_request_delay).await;
    info!(
        "Requesting tile {index}: w={}, n={}, e={}, s={}.",
        tile.west, tile.north, tile.east, tile.south
    );

    let attempts = settings.attempts.max(1);
    for attempt in 1..=attempts {
        match fetcher.fetch_tile(tile).await {
            Ok(centres) => {
                info!("Fetched {} relation centres for tile {index}.", centres.len());
                return centres;
            }
            Err(err) => {
                warn!("Attempt {attempt}/{attempts} for tile {index} failed: {err}");
                if attempt < attempts {
                    tokio::time::sleep(settings.retry_delay).await;
                }
            }
        }
    }
    warn!("Giving up on tile {index}; it contributes no relations.");
    Vec::new()
}

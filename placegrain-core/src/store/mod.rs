//! Write access to the place catalogue.
//!
//! The [`PlaceStore`] trait accepts batches of places and applies the
//! upsert-merge rule keyed by each place's origin reference: unseen origins
//! are inserted, known ones are merged (keywords united, present fields
//! overwritten, absent fields kept).

use thiserror::Error;

use crate::Place;

#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
pub use sqlite::SqlitePlaceStore;

/// Counts reported by a single [`PlaceStore::bulk_upsert`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertSummary {
    /// Origins written for the first time.
    pub inserted: usize,
    /// Origins merged into an existing document.
    pub updated: usize,
}

impl UpsertSummary {
    /// Total number of places written.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.inserted + self.updated
    }

    /// Add another summary to this one.
    pub const fn absorb(&mut self, other: Self) {
        self.inserted += other.inserted;
        self.updated += other.updated;
    }
}

/// Errors raised while writing places.
#[derive(Debug, Error)]
pub enum PlaceStoreError {
    /// Creating the directory that holds the database failed.
    #[error("failed to create parent directory {path}")]
    CreateDirectory {
        /// Directory that could not be created.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the database failed.
    #[cfg(feature = "store-sqlite")]
    #[error("failed to open SQLite database at {path}")]
    Open {
        /// Database location.
        path: String,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// A database statement failed.
    #[cfg(feature = "store-sqlite")]
    #[error("SQLite operation '{operation}' failed")]
    Database {
        /// Short description of the failing step.
        operation: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Serialising a document failed.
    #[error("failed to encode document for {origin}")]
    Encode {
        /// Origin of the offending place.
        origin: String,
        /// Source error produced by `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// A stored document could not be decoded.
    #[error("failed to decode stored document for {origin}")]
    Decode {
        /// Origin of the offending document.
        origin: String,
        /// Source error produced by `serde_json`.
        #[source]
        source: serde_json::Error,
    },
}

/// Bulk upsert-merge sink for places.
///
/// # Examples
///
/// ```rust
/// use std::collections::BTreeMap;
/// use placegrain_core::{Place, PlaceStore, PlaceStoreError, UpsertSummary};
///
/// #[derive(Default)]
/// struct Latest(BTreeMap<String, Place>);
///
/// impl PlaceStore for Latest {
///     fn bulk_upsert(&mut self, places: &[Place]) -> Result<UpsertSummary, PlaceStoreError> {
///         let mut summary = UpsertSummary::default();
///         for place in places {
///             match self.0.get_mut(place.origin()) {
///                 Some(stored) => {
///                     stored.merge_from(place.clone());
///                     summary.updated += 1;
///                 }
///                 None => {
///                     self.0.insert(place.origin().to_owned(), place.clone());
///                     summary.inserted += 1;
///                 }
///             }
///         }
///         Ok(summary)
///     }
/// }
///
/// let mut store = Latest::default();
/// assert_eq!(store.bulk_upsert(&[]).map(|s| s.total()).ok(), Some(0));
/// ```
pub trait PlaceStore {
    /// Write a batch of places atomically.
    ///
    /// Places sharing an origin within one batch are applied in order.
    fn bulk_upsert(&mut self, places: &[Place]) -> Result<UpsertSummary, PlaceStoreError>;
}

impl<S: PlaceStore + ?Sized> PlaceStore for &mut S {
    fn bulk_upsert(&mut self, places: &[Place]) -> Result<UpsertSummary, PlaceStoreError> {
        (**self).bulk_upsert(places)
    }
}

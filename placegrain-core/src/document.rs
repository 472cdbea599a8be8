//! Stored form of a place with bookkeeping timestamps.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::Place;

/// Creation and modification times of a stored place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// First time the origin was stored.
    pub created: DateTime<Utc>,
    /// Last time the origin was written.
    pub updated: DateTime<Utc>,
}

impl Metadata {
    /// Format a timestamp the way it is persisted (RFC 3339, UTC, millis).
    #[must_use]
    pub fn format(timestamp: DateTime<Utc>) -> String {
        timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// A place as held by a [`crate::PlaceStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceDocument {
    /// The place itself; its fields sit at the top level of the document.
    #[serde(flatten)]
    pub place: Place,
    /// Bookkeeping timestamps.
    pub metadata: Metadata,
}

impl PlaceDocument {
    /// Wrap a newly seen place, stamping both timestamps with `now`.
    #[must_use]
    pub const fn new(place: Place, now: DateTime<Utc>) -> Self {
        Self {
            place,
            metadata: Metadata {
                created: now,
                updated: now,
            },
        }
    }

    /// Merge a newer observation of the same origin and refresh `updated`.
    pub fn merge(&mut self, place: Place, now: DateTime<Utc>) {
        self.place.merge_from(place);
        self.metadata.updated = now;
    }
}

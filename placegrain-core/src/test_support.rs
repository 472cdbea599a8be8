//! Test-only, in-memory `PlaceStore` implementation used by unit and
//! behaviour tests.

use std::collections::BTreeMap;

use chrono::Utc;

use crate::{Place, PlaceDocument, PlaceStore, PlaceStoreError, UpsertSummary};

/// In-memory `PlaceStore` applying the same merge rule as the SQLite store.
///
/// Batches are recorded so tests can assert on flush boundaries.
#[derive(Default, Debug)]
pub struct MemoryPlaceStore {
    documents: BTreeMap<String, PlaceDocument>,
    batches: Vec<usize>,
}

impl MemoryPlaceStore {
    /// Stored document for `origin`, if any.
    pub fn document(&self, origin: &str) -> Option<&PlaceDocument> {
        self.documents.get(origin)
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Report whether no documents are stored.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Sizes of the batches received so far, in call order.
    pub fn batches(&self) -> &[usize] {
        &self.batches
    }
}

impl PlaceStore for MemoryPlaceStore {
    fn bulk_upsert(&mut self, places: &[Place]) -> Result<UpsertSummary, PlaceStoreError> {
        let now = Utc::now();
        let mut summary = UpsertSummary::default();
        for place in places {
            match self.documents.get_mut(place.origin()) {
                Some(document) => {
                    document.merge(place.clone(), now);
                    summary.updated += 1;
                }
                None => {
                    self.documents.insert(
                        place.origin().to_owned(),
                        PlaceDocument::new(place.clone(), now),
                    );
                    summary.inserted += 1;
                }
            }
        }
        self.batches.push(places.len());
        Ok(summary)
    }
}

//! Batching sink in front of a [`PlaceStore`].

use log::info;
use placegrain_core::{Place, PlaceStore, PlaceStoreError, UpsertSummary};

/// Default number of places per flush.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Interval, in places, between progress log lines.
const REPORT_EVERY: u64 = 1000;

/// Totals reported by [`PlaceTarget::complete`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetSummary {
    /// Places handed to the target.
    pub consumed: u64,
    /// Batches flushed to the store.
    pub flushes: u64,
    /// Accumulated store outcome.
    pub upserts: UpsertSummary,
}

/// Buffers places and flushes them to the store in fixed-size batches.
#[derive(Debug)]
pub struct PlaceTarget<S> {
    store: S,
    batch: Vec<Place>,
    batch_size: usize,
    summary: TargetSummary,
}

impl<S: PlaceStore> PlaceTarget<S> {
    /// Wrap `store` using the default batch size.
    pub fn new(store: S) -> Self {
        Self::with_batch_size(store, DEFAULT_BATCH_SIZE)
    }

    /// Wrap `store` flushing every `batch_size` places (at least one).
    pub fn with_batch_size(store: S, batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            store,
            batch: Vec::with_capacity(batch_size),
            batch_size,
            summary: TargetSummary::default(),
        }
    }

    /// Queue one place, flushing when the batch is full.
    pub fn consume(&mut self, place: Place) -> Result<(), PlaceStoreError> {
        self.batch.push(place);
        self.summary.consumed += 1;
        if self.batch.len() >= self.batch_size {
            self.flush()?;
        }
        if self.summary.consumed % REPORT_EVERY == 0 {
            info!(
                "Still working... {} objects already consumed.",
                self.summary.consumed
            );
        }
        Ok(())
    }

    /// Flush whatever is still buffered and report totals.
    pub fn complete(&mut self) -> Result<TargetSummary, PlaceStoreError> {
        self.flush()?;
        info!("Total consumed {} objects.", self.summary.consumed);
        Ok(self.summary)
    }

    /// The wrapped store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Unwrap the store, dropping anything not yet flushed.
    pub fn into_store(self) -> S {
        self.store
    }

    fn flush(&mut self) -> Result<(), PlaceStoreError> {
        if self.batch.is_empty() {
            return Ok(());
        }
        let outcome = self.store.bulk_upsert(&self.batch)?;
        self.batch.clear();
        self.summary.flushes += 1;
        self.summary.upserts.absorb(outcome);
        Ok(())
    }
}

//! Facade crate for the placegrain place ingestion pipeline.
//!
//! This crate re-exports the core domain types and, behind feature flags, the
//! SQLite place store and the ingestion pipeline.

#![forbid(unsafe_code)]

pub use placegrain_core::{
    Address, Attributes, BoundingBox, ElementKind, Linked, Metadata, Place, PlaceDocument,
    PlaceStore, PlaceStoreError, Point, PointError, SocialNetworks, UpsertSummary,
};

#[cfg(feature = "store-sqlite")]
pub use placegrain_core::SqlitePlaceStore;

#[cfg(feature = "ingest")]
pub use placegrain_data::{
    CenterFetcher, ElementSource, InspectError, Inspector, LocateError, LocatorSettings,
    OverpassFetcher, PipelineError, PipelineReport, PlaceTarget, RawElement, RelationCenter,
    RelationLocations, RelationLocator, SourceError, SourceFormat, Vocabulary, run_pipeline,
};

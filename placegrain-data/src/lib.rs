//! Ingestion pipeline turning OSM extracts into place documents.
//!
//! Responsibilities:
//! - Stream raw elements from `.pbf` and `.osm` extracts.
//! - Classify tags into keywords and extract normalised attributes.
//! - Resolve relation locations through an external spatial service.
//! - Batch places into a [`placegrain_core::PlaceStore`].
//!
//! Boundaries:
//! - Domain types and merge rules live in `placegrain-core`.
//! - The pipeline itself is synchronous; only relation resolution drives an
//!   async runtime, and it finishes before streaming starts.
//!
//! Invariants:
//! - Elements are processed in file order and places reach the store in the
//!   same order.
//! - The vocabulary, node index and relation locations are never shared
//!   mutably.

pub mod classify;
pub mod element;
pub mod extract;
pub mod inspect;
pub mod locate;
pub mod naming;
pub mod pipeline;
pub mod source;
pub mod target;
pub mod text;
pub mod vocabulary;

pub use classify::KeywordClassifier;
pub use element::{RawElement, RawNode, RawRelation, RawWay, Tags, tags};
pub use extract::{AttributeExtractor, Extraction};
pub use inspect::{InspectError, Inspector, NodeIndex};
pub use locate::{
    CenterFetcher, LocateError, LocatorSettings, OverpassConfig, OverpassFetcher,
    RelationCenter, RelationLocations, RelationLocator, TransportError,
};
pub use naming::{linked, name};
pub use pipeline::{PipelineError, PipelineReport, run_pipeline};
pub use source::{ElementSource, SourceError, SourceFormat, SourceStats};
pub use target::{PlaceTarget, TargetSummary};
pub use text::{snake_to_words, split_tokens};
pub use vocabulary::{Category, Vocabulary, VocabularyBuilder, VocabularyError};

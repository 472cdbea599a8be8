//! Source → inspector → target driver.

use log::info;
use placegrain_core::{ElementKind, PlaceStore, PlaceStoreError};
use thiserror::Error;

use crate::element::RawElement;
use crate::inspect::{InspectError, Inspector, NodeIndex};
use crate::source::SourceError;
use crate::target::{PlaceTarget, TargetSummary};

/// Fatal failure of an ingestion run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Reading the extract failed.
    #[error(transparent)]
    Source(#[from] SourceError),
    /// The extract contained a structurally invalid element.
    #[error("structural error in extract: {0}")]
    Inspect(#[from] InspectError),
    /// Writing to the place store failed.
    #[error(transparent)]
    Store(#[from] PlaceStoreError),
}

/// Counters describing a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Nodes received from the source.
    pub nodes: u64,
    /// Ways received from the source.
    pub ways: u64,
    /// Relations received from the source.
    pub relations: u64,
    /// Places produced by the inspector.
    pub places: u64,
    /// Outcome of writing the places.
    pub target: TargetSummary,
}

impl PipelineReport {
    fn record(&mut self, element: &RawElement) {
        match element.kind() {
            ElementKind::Node => self.nodes += 1,
            ElementKind::Way => self.ways += 1,
            ElementKind::Relation => self.relations += 1,
        }
    }
}

/// Pull every element from `source`, inspect it, and push places to
/// `target` in input order.
///
/// Structural, source and store errors stop the run immediately; places
/// buffered but not yet flushed at that point are not written.
pub fn run_pipeline<I, S>(
    source: I,
    inspector: &Inspector<'_>,
    target: &mut PlaceTarget<S>,
) -> Result<PipelineReport, PipelineError>
where
    I: IntoIterator<Item = Result<RawElement, SourceError>>,
    S: PlaceStore,
{
    let mut report = PipelineReport::default();
    let mut nodes = NodeIndex::new();

    for element in source {
        let element = element?;
        report.record(&element);
        if let Some(place) = inspector.inspect(element, &mut nodes)? {
            report.places += 1;
            target.consume(place)?;
        }
    }

    report.target = target.complete()?;
    info!(
        "Ingested {} nodes, {} ways, {} relations into {} places.",
        report.nodes, report.ways, report.relations, report.places
    );
    Ok(report)
}

//! Wiring for the `ingest` subcommand.
//!
//! Relation centres are resolved up front; the extract is then streamed
//! through the inspector into the SQLite store.

use log::info;
use placegrain_core::SqlitePlaceStore;
use placegrain_data::{
    CenterFetcher, ElementSource, Inspector, LocatorSettings, PipelineReport, PlaceTarget,
    RelationLocations, Vocabulary, run_pipeline,
};

use crate::{CliError, IngestConfig};

pub(crate) fn run_ingest_pipeline<F>(
    config: &IngestConfig,
    fetcher: &F,
) -> Result<PipelineReport, CliError>
where
    F: CenterFetcher + ?Sized,
{
    run_with_settings(config, fetcher, &locator_settings(config))
}

pub(crate) fn run_with_settings<F>(
    config: &IngestConfig,
    fetcher: &F,
    settings: &LocatorSettings,
) -> Result<PipelineReport, CliError>
where
    F: CenterFetcher + ?Sized,
{
    let vocabulary = match &config.vocabulary_dir {
        Some(dir) => Vocabulary::from_dir(dir)?,
        None => Vocabulary::bundled()?,
    };
    let locations = RelationLocations::fetch_blocking(fetcher, &config.bbox, settings)?;

    let source = ElementSource::open(&config.extract)?.with_bbox(config.bbox);
    let store = SqlitePlaceStore::open(&config.database).map_err(|source| {
        CliError::OpenStore {
            path: config.database.clone(),
            source,
        }
    })?;
    let inspector = Inspector::new(&vocabulary, &locations);
    let mut target = PlaceTarget::with_batch_size(store, config.batch_size);

    let report = run_pipeline(source, &inspector, &mut target)?;
    info!(
        "Ingested {} places from {} nodes, {} ways and {} relations into {}.",
        report.places, report.nodes, report.ways, report.relations, config.database
    );
    Ok(report)
}

fn locator_settings(config: &IngestConfig) -> LocatorSettings {
    LocatorSettings::default()
        .with_grid(config.rows, config.cols)
        .with_timeout(config.timeout)
}

//! Pipeline integration tests covering the ingest command flow.

use super::helpers::Workspace;
use super::*;
use placegrain_core::{Point, SqlitePlaceStore};
use placegrain_data::locate::test_support::StubCenterFetcher;
use placegrain_data::{LocatorSettings, RelationCenter};
use rstest::rstest;
use rusqlite::Connection;

const OLD_TOWN: &str = "14,51,15,49";

fn old_town_config(workspace: &Workspace) -> IngestConfig {
    let args = IngestArgs {
        extract: Some(workspace.extract()),
        database: Some(workspace.database("places")),
        bbox: Some(OLD_TOWN.to_owned()),
        ..IngestArgs::default()
    };
    IngestConfig::try_from(args).expect("valid config")
}

fn quick_settings(config: &IngestConfig) -> LocatorSettings {
    LocatorSettings::default()
        .with_grid(config.rows, config.cols)
        .with_delays(Duration::ZERO, Duration::ZERO)
}

fn museum_fetcher() -> StubCenterFetcher {
    StubCenterFetcher::new(vec![RelationCenter {
        id: 30,
        center: Point {
            lon: 14.4213,
            lat: 50.0871,
        },
    }])
}

#[rstest]
fn ingest_pipeline_populates_the_store() {
    let workspace = Workspace::new();
    let config = old_town_config(&workspace);
    let fetcher = museum_fetcher();

    let report = ingest::run_with_settings(&config, &fetcher, &quick_settings(&config))
        .expect("pipeline should succeed");

    assert_eq!(report.places, 3);
    assert_eq!(report.nodes, 5, "the Vienna node lies outside the box");
    assert_eq!(report.target.consumed, 3);
    assert_eq!(fetcher.requested_tiles().len(), 1);

    let store = SqlitePlaceStore::open(&config.database).expect("reopen store");
    assert_eq!(store.len().expect("count documents"), 3);
    let museum = store
        .document("relation/30")
        .expect("query store")
        .expect("museum stored");
    assert_eq!(museum.place.name, "City Museum");
    assert!(store.document("node/2").expect("query store").is_none());

    let conn = Connection::open(config.database.as_std_path()).expect("open database");
    let mut statement = conn
        .prepare("SELECT origin FROM places ORDER BY origin")
        .expect("prepare origin query");
    let origins: Vec<String> = statement
        .query_map([], |row| row.get(0))
        .expect("query origins")
        .collect::<Result<_, _>>()
        .expect("list origins");
    assert_eq!(origins, ["node/1", "relation/30", "way/20"]);
}

#[rstest]
fn reingesting_keeps_one_document_per_origin() {
    let workspace = Workspace::new();
    let config = old_town_config(&workspace);
    let settings = quick_settings(&config);

    ingest::run_with_settings(&config, &museum_fetcher(), &settings).expect("first run");
    let report =
        ingest::run_with_settings(&config, &museum_fetcher(), &settings).expect("second run");

    assert_eq!(report.target.upserts.updated, 3);
    let store = SqlitePlaceStore::open(&config.database).expect("reopen store");
    assert_eq!(store.len().expect("count documents"), 3);
}

#[rstest]
fn unreachable_service_skips_relations_only() {
    let workspace = Workspace::new();
    let config = old_town_config(&workspace);
    let settings = quick_settings(&config).with_attempts(2);
    let fetcher = museum_fetcher().flaky(u32::MAX);

    let report = ingest::run_with_settings(&config, &fetcher, &settings).expect("run completes");

    assert_eq!(report.places, 2);
    assert_eq!(fetcher.requested_tiles().len(), 2);
}

#[rstest]
fn ingest_rejects_missing_extract() {
    let workspace = Workspace::new();
    let args = IngestArgs {
        extract: Some(workspace.root().join("absent.osm")),
        database: Some(workspace.database("places")),
        ..IngestArgs::default()
    };

    match resolve_ingest_config(args) {
        Err(CliError::MissingSourceFile { field, .. }) => assert_eq!(field, ARG_EXTRACT),
        other => panic!("unexpected outcome {other:?}"),
    }
}

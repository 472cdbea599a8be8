//! Behavioural tests for streaming `.osm.pbf` extracts.

use std::cell::RefCell;

use camino::{Utf8Path, Utf8PathBuf};
use placegrain_core::test_support::MemoryPlaceStore;
use placegrain_core::{ElementKind, Point};
use placegrain_data::{
    ElementSource, Inspector, PlaceTarget, RawElement, RelationCenter, RelationLocations,
    SourceError, Vocabulary, run_pipeline,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempPath;

mod support;

use support::{assert_close, decode_fixture, fixtures_dir};

enum FixtureTarget {
    Existing(TempPath),
    Missing(Utf8PathBuf),
}

impl FixtureTarget {
    fn path(&self) -> &Utf8Path {
        match self {
            Self::Existing(temp) => Utf8Path::from_path(temp).expect("utf-8 temp path"),
            Self::Missing(path) => path.as_path(),
        }
    }
}

struct ExtractWorld {
    target: RefCell<Option<FixtureTarget>>,
    streamed: RefCell<Option<Result<Vec<RawElement>, SourceError>>>,
    store: RefCell<MemoryPlaceStore>,
}

impl ExtractWorld {
    fn path(&self) -> Utf8PathBuf {
        self.target
            .borrow()
            .as_ref()
            .expect("fixture prepared")
            .path()
            .to_path_buf()
    }

    fn error(&self) -> SourceError {
        match self.streamed.take().expect("extract was streamed") {
            Ok(elements) => panic!("expected an error, read {} elements", elements.len()),
            Err(err) => err,
        }
    }
}

#[fixture]
fn world() -> ExtractWorld {
    ExtractWorld {
        target: RefCell::new(None),
        streamed: RefCell::new(None),
        store: RefCell::new(MemoryPlaceStore::default()),
    }
}

#[given("the sample PBF extract")]
fn sample_extract(world: &ExtractWorld) {
    let fixture = decode_fixture(&fixtures_dir(), "prague_sample");
    world.target.replace(Some(FixtureTarget::Existing(fixture)));
}

#[given("a path to a missing PBF file")]
fn missing_extract(world: &ExtractWorld) {
    let path = fixtures_dir().join("missing.osm.pbf");
    world.target.replace(Some(FixtureTarget::Missing(path)));
}

#[given("a path to a file containing invalid PBF data")]
fn invalid_extract(world: &ExtractWorld) {
    let fixture = decode_fixture(&fixtures_dir(), "invalid");
    world.target.replace(Some(FixtureTarget::Existing(fixture)));
}

#[when("the extract is streamed")]
fn stream_extract(world: &ExtractWorld) {
    let outcome = ElementSource::open(&world.path())
        .and_then(|source| source.collect::<Result<Vec<_>, _>>());
    world.streamed.replace(Some(outcome));
}

#[when("the extract is ingested with relation {id} placed at {lon} {lat}")]
fn ingest_extract(world: &ExtractWorld, id: i64, lon: f64, lat: f64) {
    let vocabulary = Vocabulary::bundled().expect("bundled vocabulary loads");
    let locations: RelationLocations = [RelationCenter {
        id,
        center: Point { lon, lat },
    }]
    .into_iter()
    .collect();
    let inspector = Inspector::new(&vocabulary, &locations);
    let source = ElementSource::open(&world.path()).expect("open extract");

    let mut target = PlaceTarget::new(world.store.take());
    run_pipeline(source, &inspector, &mut target).expect("ingest extract");
    world.store.replace(target.into_store());
}

#[then("{nodes} nodes, {ways} way and {relations} relation are read")]
fn element_counts(world: &ExtractWorld, nodes: usize, ways: usize, relations: usize) {
    let elements = world
        .streamed
        .take()
        .expect("extract was streamed")
        .expect("extract should decode");
    let count = |kind: ElementKind| elements.iter().filter(|e| e.kind() == kind).count();
    assert_eq!(count(ElementKind::Node), nodes);
    assert_eq!(count(ElementKind::Way), ways);
    assert_eq!(count(ElementKind::Relation), relations);
}

#[then("{count} places are stored")]
fn places_stored(world: &ExtractWorld, count: usize) {
    assert_eq!(world.store.borrow().len(), count);
}

#[then("the place {origin} sits at {lon} {lat}")]
fn place_location(world: &ExtractWorld, origin: String, lon: f64, lat: f64) {
    let store = world.store.borrow();
    let document = store
        .document(origin.trim_matches('"'))
        .expect("document stored");
    assert_close(document.place.location.lon, lon);
    assert_close(document.place.location.lat, lat);
}

#[then("the place {origin} is named {name}")]
fn place_name(world: &ExtractWorld, origin: String, name: String) {
    let store = world.store.borrow();
    let document = store
        .document(origin.trim_matches('"'))
        .expect("document stored");
    assert_eq!(document.place.name, name.trim_matches('"'));
}

#[then("an open error is returned")]
fn open_error(world: &ExtractWorld) {
    match world.error() {
        SourceError::Open { path, .. } => assert!(path.as_str().ends_with("missing.osm.pbf")),
        other => panic!("expected an open error, got {other:?}"),
    }
}

#[then("a decode error is returned")]
fn decode_error(world: &ExtractWorld) {
    match world.error() {
        SourceError::Decode { path, source } => {
            assert_eq!(path.extension(), Some("pbf"));
            assert!(!source.to_string().is_empty());
        }
        other => panic!("expected a decode error, got {other:?}"),
    }
}

#[scenario(path = "tests/features/pbf_source.feature", index = 0)]
fn streaming_known_extract(world: ExtractWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/pbf_source.feature", index = 1)]
fn ingesting_known_extract(world: ExtractWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/pbf_source.feature", index = 2)]
fn missing_extract_file(world: ExtractWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/pbf_source.feature", index = 3)]
fn corrupted_extract(world: ExtractWorld) {
    let _ = world;
}

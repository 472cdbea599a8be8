//! Shared helpers for the behaviour tests.
#![allow(dead_code, reason = "each test binary uses a subset of the helpers")]

use std::{fs, io::Write};

use base64::{Engine as _, engine::general_purpose};
use camino::{Utf8Path, Utf8PathBuf};
use tempfile::{Builder, TempPath};

/// Epsilon for coordinate comparisons; one unit in the seventh decimal.
const COORDINATE_EPSILON: f64 = 1.0e-7;

/// Directory holding the extract fixtures.
pub fn fixtures_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Decode a Base64-encoded fixture into a temporary `.osm.pbf` file.
pub fn decode_fixture(dir: &Utf8Path, stem: &str) -> TempPath {
    let encoded_path = dir.join(format!("{stem}.osm.pbf.b64"));
    let encoded = fs::read_to_string(&encoded_path).unwrap_or_else(|err| {
        panic!("failed to read base64 fixture {encoded_path}: {err}");
    });
    let cleaned: String = encoded
        .chars()
        .filter(|ch| !ch.is_ascii_whitespace())
        .collect();
    let decoded = general_purpose::STANDARD
        .decode(cleaned.as_bytes())
        .unwrap_or_else(|err| {
            panic!("failed to decode base64 fixture {encoded_path}: {err}");
        });
    let mut tempfile = Builder::new()
        .prefix(stem)
        .suffix(".osm.pbf")
        .tempfile()
        .unwrap_or_else(|err| {
            panic!("failed to create temporary fixture for {stem}: {err}");
        });
    tempfile.write_all(&decoded).unwrap_or_else(|err| {
        panic!("failed to write decoded fixture for {stem}: {err}");
    });
    tempfile.into_temp_path()
}

/// Assert two coordinates agree to seven decimal places.
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= COORDINATE_EPSILON,
        "expected {expected}, got {actual}"
    );
}

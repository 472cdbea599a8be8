//! Test helpers for ingest datasets and layered overrides.

use super::*;
use std::fs;
use tempfile::TempDir;

#[derive(Debug, Clone, Default)]
pub(super) struct LayerOverrides {
    pub(super) extract: Option<Utf8PathBuf>,
    pub(super) database: Option<Utf8PathBuf>,
}

/// Scratch directory holding a copy of the sample extract and room for
/// databases named after the layer that supplies them.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
        fs::copy(fixture("old_town.osm"), root.join("old_town.osm")).expect("copy fixture");
        Self { _dir: dir, root }
    }

    pub(super) fn extract(&self) -> Utf8PathBuf {
        self.root.join("old_town.osm")
    }

    pub(super) fn database(&self, layer: &str) -> Utf8PathBuf {
        self.root.join(format!("{layer}.db"))
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }
}

pub(super) fn fixture(name: &str) -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Apply file and environment overrides below the CLI layer, then resolve.
pub(super) fn merge_layers(
    mut cli_args: IngestArgs,
    file_layer: Option<LayerOverrides>,
    env_layer: Option<LayerOverrides>,
) -> Result<IngestConfig, CliError> {
    merge_field(
        &mut cli_args.extract,
        extract_field(env_layer.as_ref(), |layer| &layer.extract),
        extract_field(file_layer.as_ref(), |layer| &layer.extract),
    );
    merge_field(
        &mut cli_args.database,
        extract_field(env_layer.as_ref(), |layer| &layer.database),
        extract_field(file_layer.as_ref(), |layer| &layer.database),
    );
    resolve_ingest_config(cli_args)
}

fn merge_field<T: Clone>(target: &mut Option<T>, env_value: Option<T>, file_value: Option<T>) {
    if target.is_none()
        && let Some(value) = env_value.or(file_value)
    {
        *target = Some(value);
    }
}

fn extract_field<T: Clone>(
    layer: Option<&LayerOverrides>,
    accessor: fn(&LayerOverrides) -> &Option<T>,
) -> Option<T> {
    layer.and_then(|entry| accessor(entry).clone())
}

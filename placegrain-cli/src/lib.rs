//! Command-line interface for the placegrain ingestion pipeline.
#![forbid(unsafe_code)]

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use placegrain_core::BoundingBox;
use placegrain_data::OverpassFetcher;
use placegrain_data::locate::DEFAULT_OVERPASS_ENDPOINT;
use placegrain_data::target::DEFAULT_BATCH_SIZE;
use serde::{Deserialize, Serialize};

mod error;
mod ingest;

pub use error::CliError;

const ARG_EXTRACT: &str = "extract";
const ARG_DATABASE: &str = "database";
const ARG_BBOX: &str = "bbox";
const ARG_ROWS: &str = "rows";
const ARG_COLS: &str = "cols";
const ARG_OVERPASS_ENDPOINT: &str = "overpass-endpoint";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";
const ARG_VOCABULARY_DIR: &str = "vocabulary-dir";
const ARG_BATCH_SIZE: &str = "batch-size";
const ENV_EXTRACT: &str = "PLACEGRAIN_CMDS_INGEST_EXTRACT";
const ENV_DATABASE: &str = "PLACEGRAIN_CMDS_INGEST_DATABASE";

/// Run the placegrain CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Ingest(args) => {
            let config = resolve_ingest_config(args)?;
            let fetcher = OverpassFetcher::new(config.overpass_endpoint.as_str())?;
            ingest::run_ingest_pipeline(&config, &fetcher)?;
        }
    }
    Ok(())
}

fn resolve_ingest_config(args: IngestArgs) -> Result<IngestConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

#[derive(Debug, Parser)]
#[command(
    name = "placegrain",
    about = "Turn OpenStreetMap extracts into searchable place documents",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ingest an OSM extract into the place store.
    Ingest(IngestArgs),
}

/// CLI arguments for the `ingest` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Stream an OSM extract, classify its elements and upsert \
                 the resulting places into a SQLite store. Options can come \
                 from CLI flags, configuration files, or environment \
                 variables.",
    about = "Ingest an OSM extract into the place store"
)]
#[ortho_config(prefix = "PLACEGRAIN")]
struct IngestArgs {
    /// Path to the `.osm.pbf` or `.osm` extract.
    #[arg(long = ARG_EXTRACT, value_name = "path")]
    #[serde(default)]
    extract: Option<Utf8PathBuf>,
    /// Path to the SQLite place store; created when absent.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    database: Option<Utf8PathBuf>,
    /// Area to ingest as `west,north,east,south`; defaults to the world.
    #[arg(long = ARG_BBOX, value_name = "w,n,e,s", allow_hyphen_values = true)]
    #[serde(default)]
    bbox: Option<String>,
    /// Tile rows used for relation lookup.
    #[arg(long = ARG_ROWS, value_name = "count")]
    #[serde(default)]
    rows: Option<u32>,
    /// Tile columns used for relation lookup.
    #[arg(long = ARG_COLS, value_name = "count")]
    #[serde(default)]
    cols: Option<u32>,
    /// Overpass interpreter endpoint.
    #[arg(long = ARG_OVERPASS_ENDPOINT, value_name = "url")]
    #[serde(default)]
    overpass_endpoint: Option<String>,
    /// Overall limit for relation lookup, in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    timeout_secs: Option<u64>,
    /// Directory holding vocabulary tables; the bundled copy is used otherwise.
    #[arg(long = ARG_VOCABULARY_DIR, value_name = "path")]
    #[serde(default)]
    vocabulary_dir: Option<Utf8PathBuf>,
    /// Places buffered per store transaction.
    #[arg(long = ARG_BATCH_SIZE, value_name = "count")]
    #[serde(default)]
    batch_size: Option<usize>,
}

impl IngestArgs {
    fn into_config(self) -> Result<IngestConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        IngestConfig::try_from(merged)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct IngestConfig {
    extract: Utf8PathBuf,
    database: Utf8PathBuf,
    bbox: BoundingBox,
    rows: u32,
    cols: u32,
    overpass_endpoint: String,
    timeout: Option<Duration>,
    vocabulary_dir: Option<Utf8PathBuf>,
    batch_size: usize,
}

impl IngestConfig {
    fn validate_sources(&self) -> Result<(), CliError> {
        if !self.extract.is_file() {
            return Err(missing_source(ARG_EXTRACT, &self.extract, "file"));
        }
        if let Some(dir) = &self.vocabulary_dir
            && !dir.is_dir()
        {
            return Err(missing_source(ARG_VOCABULARY_DIR, dir, "directory"));
        }
        Ok(())
    }
}

fn missing_source(field: &'static str, path: &Utf8Path, expected: &'static str) -> CliError {
    CliError::MissingSourceFile {
        field,
        path: path.to_path_buf(),
        expected,
    }
}

impl TryFrom<IngestArgs> for IngestConfig {
    type Error = CliError;

    fn try_from(args: IngestArgs) -> Result<Self, Self::Error> {
        let extract = args.extract.ok_or(CliError::MissingArgument {
            field: ARG_EXTRACT,
            env: ENV_EXTRACT,
        })?;
        let database = args.database.ok_or(CliError::MissingArgument {
            field: ARG_DATABASE,
            env: ENV_DATABASE,
        })?;
        let bbox = args
            .bbox
            .as_deref()
            .map_or(Ok(BoundingBox::world()), parse_bbox)?;
        let rows = args.rows.unwrap_or(1);
        let cols = args.cols.unwrap_or(1);
        if rows == 0 || cols == 0 {
            return Err(CliError::InvalidGrid { rows, cols });
        }
        Ok(Self {
            extract,
            database,
            bbox,
            rows,
            cols,
            overpass_endpoint: args
                .overpass_endpoint
                .unwrap_or_else(|| DEFAULT_OVERPASS_ENDPOINT.to_owned()),
            timeout: args.timeout_secs.map(Duration::from_secs),
            vocabulary_dir: args.vocabulary_dir,
            batch_size: args.batch_size.unwrap_or(DEFAULT_BATCH_SIZE),
        })
    }
}

/// Parse `west,north,east,south`; commas and whitespace both separate values.
fn parse_bbox(raw: &str) -> Result<BoundingBox, CliError> {
    let invalid = || CliError::InvalidBoundingBox {
        value: raw.to_owned(),
    };
    let values = raw
        .split(|ch: char| ch == ',' || ch.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(invalid)
        })
        .collect::<Result<Vec<_>, _>>()?;
    let [west, north, east, south] = <[f64; 4]>::try_from(values).map_err(|_| invalid())?;
    Ok(BoundingBox::new(west, north, east, south))
}

#[cfg(test)]
mod tests;

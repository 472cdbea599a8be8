//! Streaming element sources for OSM extracts.
//!
//! [`ElementSource`] opens a `.pbf` or `.osm` file and yields raw elements one
//! at a time in file order. Nodes outside the configured bounding box are
//! dropped; ways and relations always pass. Every `interval` elements read
//! the source calls its progress hook.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use log::info;
use placegrain_core::{BoundingBox, Point};
use thiserror::Error;

use crate::element::RawElement;

mod pbf;
mod xml;

/// Default number of elements between progress reports.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 10_000_000;

/// Errors raised while reading an extract.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The file extension names no supported format.
    #[error("unsupported extract format for {path}; expected .pbf or .osm")]
    UnsupportedFormat {
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// The file could not be opened.
    #[error("failed to open extract at {path}")]
    Open {
        /// Extract path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A binary block could not be decoded.
    #[error("failed to decode OSM PBF data at {path}")]
    Decode {
        /// Extract path.
        path: Utf8PathBuf,
        /// Decoder error.
        #[source]
        source: osmpbf::Error,
    },
    /// The XML document is malformed.
    #[error("malformed OSM XML in {path} near byte {position}")]
    Parse {
        /// Extract path.
        path: Utf8PathBuf,
        /// Reader position when the error surfaced.
        position: usize,
        /// Parser error.
        #[source]
        source: quick_xml::Error,
    },
}

/// Supported extract encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Protocol-buffer binary format.
    Pbf,
    /// XML exchange format.
    Xml,
}

impl SourceFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Utf8Path) -> Result<Self, SourceError> {
        match path.extension().map(str::to_ascii_lowercase).as_deref() {
            Some("pbf") => Ok(Self::Pbf),
            Some("osm") => Ok(Self::Xml),
            _ => Err(SourceError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Callback receiving the running element count.
pub type ProgressHook = Box<dyn FnMut(u64)>;

/// Element counters maintained while streaming.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceStats {
    /// Elements decoded from the file.
    pub read: u64,
    /// Nodes dropped by the bounding-box filter.
    pub filtered: u64,
}

type Elements = Box<dyn Iterator<Item = Result<RawElement, SourceError>>>;

/// Forward-only stream of raw elements.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use placegrain_core::BoundingBox;
/// use placegrain_data::ElementSource;
///
/// # fn main() -> Result<(), placegrain_data::SourceError> {
/// let source = ElementSource::open(Utf8Path::new("prague.osm.pbf"))?
///     .with_bbox(BoundingBox::new(14.2, 50.2, 14.7, 49.9));
/// for element in source {
///     let element = element?;
///     println!("{}", element.kind());
/// }
/// # Ok(())
/// # }
/// ```
pub struct ElementSource {
    elements: Elements,
    bbox: BoundingBox,
    interval: u64,
    progress: ProgressHook,
    stats: SourceStats,
    finished: bool,
}

impl fmt::Debug for ElementSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementSource")
            .field("bbox", &self.bbox)
            .field("interval", &self.interval)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl ElementSource {
    /// Open the extract at `path`, choosing the decoder by extension.
    pub fn open(path: &Utf8Path) -> Result<Self, SourceError> {
        let elements: Elements = match SourceFormat::from_path(path)? {
            SourceFormat::Pbf => Box::new(pbf::PbfElements::open(path)?),
            SourceFormat::Xml => Box::new(xml::XmlElements::open(path)?),
        };
        info!("Streaming elements from {path}.");
        Ok(Self::from_elements(elements))
    }

    /// Stream elements from an in-memory XML document.
    #[must_use]
    pub fn from_xml(document: &str) -> Self {
        Self::from_elements(Box::new(xml::XmlElements::from_document(document)))
    }

    fn from_elements(elements: Elements) -> Self {
        Self {
            elements,
            bbox: BoundingBox::world(),
            interval: DEFAULT_PROGRESS_INTERVAL,
            progress: Box::new(log_progress),
            stats: SourceStats::default(),
            finished: false,
        }
    }

    /// Drop nodes outside `bbox`.
    #[must_use]
    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = bbox;
        self
    }

    /// Replace the progress hook and its interval. A zero interval disables
    /// reporting.
    #[must_use]
    pub fn with_progress(mut self, interval: u64, hook: impl FnMut(u64) + 'static) -> Self {
        self.interval = interval;
        self.progress = Box::new(hook);
        self
    }

    /// Counters so far.
    #[must_use]
    pub const fn stats(&self) -> SourceStats {
        self.stats
    }

    fn outside_bbox(&self, element: &RawElement) -> bool {
        match element {
            RawElement::Node(node) => match (node.lon, node.lat) {
                (Some(lon), Some(lat)) => !self.bbox.contains(&Point { lon, lat }),
                _ => false,
            },
            RawElement::Way(_) | RawElement::Relation(_) => false,
        }
    }
}

impl Iterator for ElementSource {
    type Item = Result<RawElement, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            let element = match self.elements.next() {
                Some(Ok(element)) => element,
                Some(Err(err)) => {
                    self.finished = true;
                    return Some(Err(err));
                }
                None => {
                    self.finished = true;
                    return None;
                }
            };

            self.stats.read += 1;
            if self.interval > 0 && self.stats.read % self.interval == 0 {
                (self.progress)(self.stats.read);
            }
            if self.outside_bbox(&element) {
                self.stats.filtered += 1;
                continue;
            }
            return Some(Ok(element));
        }
    }
}

fn log_progress(read: u64) {
    info!("Processed {read} elements.");
}

//! Blob-by-blob reader for `.pbf` extracts.
//!
//! Each data blob is decoded into a primitive block whose elements are
//! converted and buffered, so memory stays bounded by one block.

use std::collections::VecDeque;
use std::fs::File;
use std::io::BufReader;

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use osmpbf::{BlobDecode, BlobReader, Element, PrimitiveBlock};

use crate::element::{RawElement, RawNode, RawRelation, RawWay, Tags};

use super::SourceError;

pub(super) struct PbfElements {
    blobs: BlobReader<BufReader<File>>,
    pending: VecDeque<RawElement>,
    path: Utf8PathBuf,
    done: bool,
}

impl PbfElements {
    pub(super) fn open(path: &Utf8Path) -> Result<Self, SourceError> {
        let file = File::open(path.as_std_path()).map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            blobs: BlobReader::new(BufReader::new(file)),
            pending: VecDeque::new(),
            path: path.to_path_buf(),
            done: false,
        })
    }

    /// Decode the next data blob into `pending`; `false` once the file ends.
    fn fill(&mut self) -> Result<bool, SourceError> {
        let decode = |source| SourceError::Decode {
            path: self.path.clone(),
            source,
        };
        let Some(blob) = self.blobs.next() else {
            return Ok(false);
        };
        match blob.map_err(decode)?.decode().map_err(decode)? {
            BlobDecode::OsmData(block) => self.pending.extend(convert_block(&block)),
            BlobDecode::OsmHeader(_) => {}
            BlobDecode::Unknown(kind) => debug!("Skipping unknown blob type {kind}."),
        }
        Ok(true)
    }
}

impl Iterator for PbfElements {
    type Item = Result<RawElement, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(element) = self.pending.pop_front() {
                return Some(Ok(element));
            }
            if self.done {
                return None;
            }
            match self.fill() {
                Ok(true) => {}
                Ok(false) => self.done = true,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

fn convert_block(block: &PrimitiveBlock) -> Vec<RawElement> {
    block.elements().map(convert).collect()
}

fn convert(element: Element<'_>) -> RawElement {
    match element {
        Element::Node(node) => RawElement::Node(RawNode {
            id: Some(node.id()),
            lon: Some(node.lon()),
            lat: Some(node.lat()),
            tags: owned_tags(node.tags()),
        }),
        Element::DenseNode(node) => RawElement::Node(RawNode {
            id: Some(node.id()),
            lon: Some(node.lon()),
            lat: Some(node.lat()),
            tags: owned_tags(node.tags()),
        }),
        Element::Way(way) => RawElement::Way(RawWay {
            id: Some(way.id()),
            node_ids: Some(way.refs().collect()),
            tags: owned_tags(way.tags()),
        }),
        Element::Relation(relation) => RawElement::Relation(RawRelation {
            id: Some(relation.id()),
            tags: owned_tags(relation.tags()),
        }),
    }
}

fn owned_tags<'a>(pairs: impl Iterator<Item = (&'a str, &'a str)>) -> Tags {
    pairs
        .map(|(key, value)| (key.to_owned(), value.to_owned()))
        .collect()
}

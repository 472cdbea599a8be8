//! Pull parser for the `.osm` XML exchange format.
//!
//! Only `node`, `way`, `nd`, `relation` and `tag` are interpreted; every other
//! element (`bounds`, `member`, changeset metadata) is skipped. Attribute
//! values that do not parse leave the corresponding field unset so the
//! inspector can report the element.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};

use camino::{Utf8Path, Utf8PathBuf};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::element::{RawElement, RawNode, RawRelation, RawWay, Tags};

use super::SourceError;

/// Owned view of an opening tag, detached from the reader buffer.
enum Markup {
    Open { element: RawElement, empty: bool },
    NodeRef(Option<i64>),
    Tag(Option<(String, String)>),
    Close(Vec<u8>),
    Skip,
    Eof,
}

pub(super) struct XmlElements<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    path: Utf8PathBuf,
    current: Option<RawElement>,
    done: bool,
}

impl XmlElements<BufReader<File>> {
    pub(super) fn open(path: &Utf8Path) -> Result<Self, SourceError> {
        let file = File::open(path.as_std_path()).map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufReader::new(file), path.to_path_buf()))
    }
}

impl XmlElements<Cursor<Vec<u8>>> {
    pub(super) fn from_document(document: &str) -> Self {
        Self::new(
            Cursor::new(document.as_bytes().to_vec()),
            Utf8PathBuf::from("<memory>"),
        )
    }
}

impl<R: BufRead> XmlElements<R> {
    fn new(input: R, path: Utf8PathBuf) -> Self {
        let mut reader = Reader::from_reader(input);
        reader.trim_text(true);
        Self {
            reader,
            buf: Vec::new(),
            path,
            current: None,
            done: false,
        }
    }

    fn read_markup(&mut self) -> Result<Markup, SourceError> {
        self.buf.clear();
        let event = self.reader.read_event_into(&mut self.buf);
        let position = self.reader.buffer_position();
        let path = &self.path;
        let fail = |source: quick_xml::Error| SourceError::Parse {
            path: path.clone(),
            position,
            source,
        };
        match event.map_err(fail)? {
            Event::Start(start) => markup(&start, false).map_err(fail),
            Event::Empty(start) => markup(&start, true).map_err(fail),
            Event::End(end) => Ok(Markup::Close(end.name().as_ref().to_vec())),
            Event::Eof => Ok(Markup::Eof),
            _ => Ok(Markup::Skip),
        }
    }
}

impl<R: BufRead> Iterator for XmlElements<R> {
    type Item = Result<RawElement, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let markup = match self.read_markup() {
                Ok(markup) => markup,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            };
            match markup {
                Markup::Open { element, empty } => {
                    if empty {
                        return Some(Ok(element));
                    }
                    self.current = Some(element);
                }
                Markup::NodeRef(reference) => {
                    if let (Some(RawElement::Way(way)), Some(reference)) =
                        (self.current.as_mut(), reference)
                    {
                        way.node_ids.get_or_insert_with(Vec::new).push(reference);
                    }
                }
                Markup::Tag(pair) => {
                    if let (Some(element), Some((key, value))) = (self.current.as_mut(), pair) {
                        tags_mut(element).insert(key, value);
                    }
                }
                Markup::Close(name) => {
                    if matches!(name.as_slice(), b"node" | b"way" | b"relation") {
                        if let Some(element) = self.current.take() {
                            return Some(Ok(element));
                        }
                    }
                }
                Markup::Skip => {}
                Markup::Eof => self.done = true,
            }
        }
        None
    }
}

fn tags_mut(element: &mut RawElement) -> &mut Tags {
    match element {
        RawElement::Node(node) => &mut node.tags,
        RawElement::Way(way) => &mut way.tags,
        RawElement::Relation(relation) => &mut relation.tags,
    }
}

fn markup(start: &BytesStart<'_>, empty: bool) -> Result<Markup, quick_xml::Error> {
    let element = match start.name().as_ref() {
        b"node" => RawElement::Node(RawNode {
            id: parsed(start, b"id")?,
            lon: parsed(start, b"lon")?,
            lat: parsed(start, b"lat")?,
            tags: Tags::new(),
        }),
        b"way" => RawElement::Way(RawWay {
            id: parsed(start, b"id")?,
            node_ids: Some(Vec::new()),
            tags: Tags::new(),
        }),
        b"relation" => RawElement::Relation(RawRelation {
            id: parsed(start, b"id")?,
            tags: Tags::new(),
        }),
        b"nd" => return Ok(Markup::NodeRef(parsed(start, b"ref")?)),
        b"tag" => {
            let key = attribute(start, b"k")?;
            let value = attribute(start, b"v")?;
            return Ok(Markup::Tag(key.zip(value)));
        }
        _ => return Ok(Markup::Skip),
    };
    Ok(Markup::Open { element, empty })
}

fn attribute(start: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, quick_xml::Error> {
    for attr in start.attributes().with_checks(false) {
        let attr = attr?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn parsed<T: std::str::FromStr>(
    start: &BytesStart<'_>,
    key: &[u8],
) -> Result<Option<T>, quick_xml::Error> {
    Ok(attribute(start, key)?.and_then(|value| value.trim().parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::tags;
    use rstest::rstest;

    fn elements(document: &str) -> Vec<RawElement> {
        XmlElements::from_document(document)
            .collect::<Result<_, _>>()
            .expect("document should parse")
    }

    #[rstest]
    fn reads_every_element_kind() {
        let parsed = elements(
            r#"<osm>
                <bounds minlat="49" minlon="14" maxlat="51" maxlon="15"/>
                <node id="1" lat="50.08" lon="14.42">
                    <tag k="amenity" v="drinking_water"/>
                </node>
                <way id="2">
                    <nd ref="1"/><nd ref="3"/>
                    <tag k="building" v="yes"/>
                </way>
                <relation id="3">
                    <member type="way" ref="2" role="outer"/>
                    <tag k="type" v="multipolygon"/>
                </relation>
            </osm>"#,
        );
        assert_eq!(
            parsed,
            vec![
                RawElement::Node(RawNode {
                    id: Some(1),
                    lon: Some(14.42),
                    lat: Some(50.08),
                    tags: tags([("amenity", "drinking_water")]),
                }),
                RawElement::Way(RawWay {
                    id: Some(2),
                    node_ids: Some(vec![1, 3]),
                    tags: tags([("building", "yes")]),
                }),
                RawElement::Relation(RawRelation {
                    id: Some(3),
                    tags: tags([("type", "multipolygon")]),
                }),
            ]
        );
    }

    #[rstest]
    fn unparsable_attributes_stay_unset() {
        let parsed = elements(r#"<osm><node id="x" lat="50" lon="east"/></osm>"#);
        assert_eq!(
            parsed,
            vec![RawElement::Node(RawNode {
                id: None,
                lon: None,
                lat: Some(50.0),
                tags: Tags::new(),
            })]
        );
    }

    #[rstest]
    fn escaped_tag_values_are_decoded() {
        let parsed = elements(
            r#"<osm><node id="1" lat="0" lon="0"><tag k="name" v="Fish &amp; Chips"/></node></osm>"#,
        );
        assert_eq!(parsed[0].tags().get("name").map(String::as_str), Some("Fish & Chips"));
    }

    #[rstest]
    fn missing_file_is_an_open_error() {
        let result = XmlElements::open(Utf8Path::new("/nonexistent/extract.osm"));
        assert!(matches!(result, Err(SourceError::Open { .. })));
    }
}

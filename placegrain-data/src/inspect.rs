//! Per-element inspection: raw element in, place (or nothing) out.
//!
//! Nodes are recorded in a [`NodeIndex`] as they pass so that later ways can
//! resolve their node references. Ways become places only when they form a
//! closed, tagged ring; relations only when the [`RelationLocator`] knows
//! where they are.

use std::collections::HashMap;

use log::debug;
use placegrain_core::cartesian::{centroid, normalise_winding};
use placegrain_core::{ElementKind, Place, Point, PointError};
use thiserror::Error;

use crate::classify::KeywordClassifier;
use crate::element::{RawElement, RawNode, RawRelation, RawWay, Tags};
use crate::extract::AttributeExtractor;
use crate::locate::RelationLocator;
use crate::naming;
use crate::vocabulary::Vocabulary;

/// Minimum number of node references in a closed ring.
const MIN_RING_LENGTH: usize = 4;

/// Structural defect in the input stream. These abort ingestion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InspectError {
    /// An element carried no identifier.
    #[error("{kind} without an id")]
    MissingId {
        /// Kind of the offending element.
        kind: ElementKind,
    },
    /// A node carried no coordinates.
    #[error("node {id} has no coordinates")]
    MissingCoordinates {
        /// Node identifier.
        id: i64,
    },
    /// A node lies outside the usable coordinate range.
    #[error("node {id} is out of bounds: {source}")]
    OutOfBounds {
        /// Node identifier.
        id: i64,
        /// Bounds check failure.
        #[source]
        source: PointError,
    },
    /// The same node identifier was seen twice.
    #[error("node {id} appears more than once")]
    DuplicateNode {
        /// Node identifier.
        id: i64,
    },
    /// A way carried no node list.
    #[error("way {id} has no node list")]
    MissingNodeList {
        /// Way identifier.
        id: i64,
    },
}

/// Locations of every node seen so far, keyed by node id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeIndex {
    points: HashMap<i64, Point>,
}

impl NodeIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record node `id` at `point`; a repeated id is an error.
    pub fn insert(&mut self, id: i64, point: Point) -> Result<(), InspectError> {
        if self.points.insert(id, point).is_some() {
            return Err(InspectError::DuplicateNode { id });
        }
        Ok(())
    }

    /// Location of node `id`.
    #[must_use]
    pub fn get(&self, id: i64) -> Option<Point> {
        self.points.get(&id).copied()
    }

    /// Number of indexed nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Report whether no node has been indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Turns raw elements into places.
pub struct Inspector<'a> {
    classifier: KeywordClassifier<'a>,
    extractor: AttributeExtractor<'a>,
    locator: &'a dyn RelationLocator,
}

impl std::fmt::Debug for Inspector<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inspector")
            .field("classifier", &self.classifier)
            .field("extractor", &self.extractor)
            .finish_non_exhaustive()
    }
}

impl<'a> Inspector<'a> {
    /// Create an inspector over `vocabulary` resolving relations via `locator`.
    #[must_use]
    pub fn new(vocabulary: &'a Vocabulary, locator: &'a dyn RelationLocator) -> Self {
        Self {
            classifier: KeywordClassifier::new(vocabulary),
            extractor: AttributeExtractor::new(vocabulary),
            locator,
        }
    }

    /// Inspect one element.
    ///
    /// Returns `Ok(None)` when the element is well-formed but does not make a
    /// place, and an error only for structural defects.
    pub fn inspect(
        &self,
        element: RawElement,
        nodes: &mut NodeIndex,
    ) -> Result<Option<Place>, InspectError> {
        match element {
            RawElement::Node(node) => self.inspect_node(node, nodes),
            RawElement::Way(way) => self.inspect_way(way, nodes),
            RawElement::Relation(relation) => self.inspect_relation(relation),
        }
    }

    fn inspect_node(
        &self,
        node: RawNode,
        nodes: &mut NodeIndex,
    ) -> Result<Option<Place>, InspectError> {
        let id = node.id.ok_or(InspectError::MissingId {
            kind: ElementKind::Node,
        })?;
        let (Some(lon), Some(lat)) = (node.lon, node.lat) else {
            return Err(InspectError::MissingCoordinates { id });
        };
        let point =
            Point::new(lon, lat).map_err(|source| InspectError::OutOfBounds { id, source })?;
        nodes.insert(id, point)?;

        if node.tags.is_empty() {
            return Ok(None);
        }
        Ok(self.assemble(ElementKind::Node, id, &node.tags, point, None))
    }

    fn inspect_way(&self, way: RawWay, nodes: &NodeIndex) -> Result<Option<Place>, InspectError> {
        let id = way.id.ok_or(InspectError::MissingId {
            kind: ElementKind::Way,
        })?;
        let node_ids = way.node_ids.ok_or(InspectError::MissingNodeList { id })?;

        let closed = node_ids.len() >= MIN_RING_LENGTH && node_ids.first() == node_ids.last();
        if !closed || way.tags.is_empty() {
            return Ok(None);
        }

        let Some(mut ring) = node_ids
            .iter()
            .map(|node_id| nodes.get(*node_id))
            .collect::<Option<Vec<_>>>()
        else {
            debug!("Skipping way {id}: unresolved node reference.");
            return Ok(None);
        };

        normalise_winding(&mut ring);
        let centre = centroid(&ring);
        let Ok(location) = Point::new(centre.lon, centre.lat) else {
            debug!("Skipping way {id}: degenerate ring has no centroid.");
            return Ok(None);
        };
        Ok(self.assemble(ElementKind::Way, id, &way.tags, location, Some(ring)))
    }

    fn inspect_relation(&self, relation: RawRelation) -> Result<Option<Place>, InspectError> {
        let id = relation.id.ok_or(InspectError::MissingId {
            kind: ElementKind::Relation,
        })?;
        if relation.tags.is_empty() {
            return Ok(None);
        }
        let Some(location) = self.locator.resolve(id) else {
            debug!("Skipping relation {id}: location unknown.");
            return Ok(None);
        };
        Ok(self.assemble(ElementKind::Relation, id, &relation.tags, location, None))
    }

    /// Classification and extraction shared by every element kind.
    fn assemble(
        &self,
        kind: ElementKind,
        id: i64,
        tags: &Tags,
        location: Point,
        polygon: Option<Vec<Point>>,
    ) -> Option<Place> {
        let mut keywords = self.classifier.classify(tags);
        if keywords.is_empty() {
            return None;
        }

        let extraction = self.extractor.extract(tags);
        keywords.extend(extraction.keywords);
        let mut attributes = extraction.attributes;
        attributes.polygon = polygon;

        let name = naming::name(tags, &keywords)?;
        let linked = naming::linked(kind, id, tags);
        Some(Place {
            name,
            location,
            keywords,
            linked,
            attributes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::tags;
    use crate::locate::{RelationCenter, RelationLocations};
    use crate::vocabulary::VocabularyBuilder;
    use rstest::{fixture, rstest};

    #[fixture]
    fn vocabulary() -> Vocabulary {
        VocabularyBuilder::default()
            .allow("amenity", ["cafe", "drinking_water"])
            .allow("building", ["church"])
            .allow("tourism", ["museum"])
            .build()
    }

    #[fixture]
    fn locations() -> RelationLocations {
        [RelationCenter {
            id: 77,
            center: Point {
                lon: 14.400_000_04,
                lat: 50.0,
            },
        }]
        .into_iter()
        .collect()
    }

    fn node(id: i64, lon: f64, lat: f64, pairs: &[(&str, &str)]) -> RawElement {
        RawElement::Node(RawNode {
            id: Some(id),
            lon: Some(lon),
            lat: Some(lat),
            tags: tags(pairs.iter().copied()),
        })
    }

    fn way(id: i64, node_ids: &[i64], pairs: &[(&str, &str)]) -> RawElement {
        RawElement::Way(RawWay {
            id: Some(id),
            node_ids: Some(node_ids.to_vec()),
            tags: tags(pairs.iter().copied()),
        })
    }

    /// Index the corners of a clockwise unit square at ids 1..=4.
    fn index_square(inspector: &Inspector<'_>, nodes: &mut NodeIndex) {
        for (id, lon, lat) in [(1, 0.0, 0.0), (2, 0.0, 1.0), (3, 1.0, 1.0), (4, 1.0, 0.0)] {
            let outcome = inspector.inspect(node(id, lon, lat, &[]), nodes);
            assert_eq!(outcome, Ok(None));
        }
    }

    #[rstest]
    fn drinking_water_node(vocabulary: Vocabulary, locations: RelationLocations) {
        let inspector = Inspector::new(&vocabulary, &locations);
        let mut nodes = NodeIndex::new();
        let place = inspector
            .inspect(
                node(1, 14.421_234_567, 50.087_654_321, &[("amenity", "drinking_water")]),
                &mut nodes,
            )
            .expect("well-formed node")
            .expect("place");

        assert!(place.keywords.contains("drinking water"));
        assert_eq!(place.attributes.drinking_water, Some(true));
        assert_eq!(
            place.location,
            Point {
                lon: 14.421_234_6,
                lat: 50.087_654_3
            }
        );
        assert_eq!(place.name, "Drinking water");
        assert_eq!(place.linked.osm, "node/1");
        assert_eq!(nodes.len(), 1);
    }

    #[rstest]
    fn untagged_node_is_indexed_only(vocabulary: Vocabulary, locations: RelationLocations) {
        let inspector = Inspector::new(&vocabulary, &locations);
        let mut nodes = NodeIndex::new();
        assert_eq!(inspector.inspect(node(5, 1.0, 2.0, &[]), &mut nodes), Ok(None));
        assert_eq!(nodes.get(5), Some(Point { lon: 1.0, lat: 2.0 }));
    }

    #[rstest]
    fn unclassified_node_is_not_a_place(vocabulary: Vocabulary, locations: RelationLocations) {
        let inspector = Inspector::new(&vocabulary, &locations);
        let outcome = inspector.inspect(
            node(6, 1.0, 2.0, &[("name", "Bench"), ("amenity", "bench")]),
            &mut NodeIndex::new(),
        );
        assert_eq!(outcome, Ok(None));
    }

    #[rstest]
    #[case(RawNode { id: None, lon: Some(1.0), lat: Some(1.0), tags: Tags::new() },
        InspectError::MissingId { kind: ElementKind::Node })]
    #[case(RawNode { id: Some(2), lon: None, lat: Some(1.0), tags: Tags::new() },
        InspectError::MissingCoordinates { id: 2 })]
    #[case(RawNode { id: Some(3), lon: Some(1.0), lat: Some(89.0), tags: Tags::new() },
        InspectError::OutOfBounds { id: 3, source: PointError::OutOfBounds { lon: 1.0, lat: 89.0 } })]
    fn malformed_nodes_are_fatal(
        vocabulary: Vocabulary,
        locations: RelationLocations,
        #[case] raw: RawNode,
        #[case] expected: InspectError,
    ) {
        let inspector = Inspector::new(&vocabulary, &locations);
        let outcome = inspector.inspect(RawElement::Node(raw), &mut NodeIndex::new());
        assert_eq!(outcome, Err(expected));
    }

    #[rstest]
    fn duplicate_node_is_fatal(vocabulary: Vocabulary, locations: RelationLocations) {
        let inspector = Inspector::new(&vocabulary, &locations);
        let mut nodes = NodeIndex::new();
        inspector
            .inspect(node(8, 1.0, 1.0, &[]), &mut nodes)
            .expect("first sighting");
        assert_eq!(
            inspector.inspect(node(8, 1.0, 1.0, &[]), &mut nodes),
            Err(InspectError::DuplicateNode { id: 8 })
        );
    }

    #[rstest]
    fn clockwise_way_is_reversed(vocabulary: Vocabulary, locations: RelationLocations) {
        let inspector = Inspector::new(&vocabulary, &locations);
        let mut nodes = NodeIndex::new();
        index_square(&inspector, &mut nodes);

        let place = inspector
            .inspect(way(10, &[1, 2, 3, 4, 1], &[("building", "church")]), &mut nodes)
            .expect("well-formed way")
            .expect("place");

        let polygon = place.attributes.polygon.expect("polygon");
        let corners: Vec<(f64, f64)> = polygon.iter().map(|p| (p.lon, p.lat)).collect();
        assert_eq!(
            corners,
            [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]
        );
        assert_eq!(place.location, Point { lon: 0.5, lat: 0.5 });
        assert!(place.keywords.contains("church"));
        assert_eq!(place.linked.osm, "way/10");
    }

    #[rstest]
    #[case(&[1, 2, 1], &[("building", "church")])]
    #[case(&[1, 2, 3, 4], &[("building", "church")])]
    #[case(&[1, 2, 3, 4, 1], &[])]
    #[case(&[1, 2, 3, 4, 1], &[("building", "yes")])]
    #[case(&[1, 2, 3, 99, 1], &[("building", "church")])]
    fn non_place_ways(
        vocabulary: Vocabulary,
        locations: RelationLocations,
        #[case] refs: &[i64],
        #[case] pairs: &[(&str, &str)],
    ) {
        let inspector = Inspector::new(&vocabulary, &locations);
        let mut nodes = NodeIndex::new();
        index_square(&inspector, &mut nodes);
        assert_eq!(inspector.inspect(way(11, refs, pairs), &mut nodes), Ok(None));
    }

    #[rstest]
    fn way_without_node_list_is_fatal(vocabulary: Vocabulary, locations: RelationLocations) {
        let inspector = Inspector::new(&vocabulary, &locations);
        let raw = RawElement::Way(RawWay {
            id: Some(12),
            node_ids: None,
            tags: tags([("building", "yes")]),
        });
        assert_eq!(
            inspector.inspect(raw, &mut NodeIndex::new()),
            Err(InspectError::MissingNodeList { id: 12 })
        );
    }

    #[rstest]
    fn located_relation(vocabulary: Vocabulary, locations: RelationLocations) {
        let inspector = Inspector::new(&vocabulary, &locations);
        let raw = RawElement::Relation(RawRelation {
            id: Some(77),
            tags: tags([
                ("tourism", "museum"),
                ("name", "National Museum"),
                ("wikidata", "Q188112"),
            ]),
        });
        let place = inspector
            .inspect(raw, &mut NodeIndex::new())
            .expect("well-formed relation")
            .expect("place");
        assert_eq!(place.location, Point { lon: 14.4, lat: 50.0 });
        assert_eq!(place.name, "National Museum");
        assert_eq!(place.linked.wikidata.as_deref(), Some("Q188112"));
        assert!(place.keywords.contains("tourism"));
    }

    #[rstest]
    fn unknown_relation_is_skipped(vocabulary: Vocabulary, locations: RelationLocations) {
        let inspector = Inspector::new(&vocabulary, &locations);
        let raw = RawElement::Relation(RawRelation {
            id: Some(78),
            tags: tags([("tourism", "museum")]),
        });
        assert_eq!(inspector.inspect(raw, &mut NodeIndex::new()), Ok(None));
    }
}

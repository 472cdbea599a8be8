//! Raw OSM elements as delivered by a [`crate::ElementSource`].
//!
//! Structural fields are optional because the XML exchange format may omit
//! them; the [`crate::Inspector`] decides which absences are fatal.

use std::collections::HashMap;

use placegrain_core::ElementKind;

/// Free-form key/value tags attached to an element.
pub type Tags = HashMap<String, String>;

/// Tagged point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawNode {
    /// OSM identifier.
    pub id: Option<i64>,
    /// Longitude in degrees.
    pub lon: Option<f64>,
    /// Latitude in degrees.
    pub lat: Option<f64>,
    /// Element tags.
    pub tags: Tags,
}

/// Ordered list of node references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawWay {
    /// OSM identifier.
    pub id: Option<i64>,
    /// Referenced node identifiers in order.
    pub node_ids: Option<Vec<i64>>,
    /// Element tags.
    pub tags: Tags,
}

/// Relation; members are not retained because locations come from the
/// relation resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRelation {
    /// OSM identifier.
    pub id: Option<i64>,
    /// Element tags.
    pub tags: Tags,
}

/// One element of an OSM extract.
#[derive(Debug, Clone, PartialEq)]
pub enum RawElement {
    /// A node.
    Node(RawNode),
    /// A way.
    Way(RawWay),
    /// A relation.
    Relation(RawRelation),
}

impl RawElement {
    /// Kind of the element.
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        match self {
            Self::Node(_) => ElementKind::Node,
            Self::Way(_) => ElementKind::Way,
            Self::Relation(_) => ElementKind::Relation,
        }
    }

    /// Tags of the element.
    #[must_use]
    pub const fn tags(&self) -> &Tags {
        match self {
            Self::Node(node) => &node.tags,
            Self::Way(way) => &way.tags,
            Self::Relation(relation) => &relation.tags,
        }
    }
}

/// Build a tag map from string pairs.
///
/// # Examples
/// ```
/// use placegrain_data::tags;
///
/// let tags = tags([("amenity", "cafe")]);
/// assert_eq!(tags.get("amenity").map(String::as_str), Some("cafe"));
/// ```
pub fn tags<'a, I>(pairs: I) -> Tags
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value.to_owned()))
        .collect()
}

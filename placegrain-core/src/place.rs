//! Normalised places produced by the ingestion pipeline.
//!
//! A [`Place`] is keyed by its OSM origin reference (`node/1`, `way/2`,
//! `relation/3`). Serialised field names use camelCase and absent optional
//! fields are omitted from the stored document.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Point;

/// Kind of OSM element a place originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Single tagged node.
    Node,
    /// Closed way describing an area.
    Way,
    /// Multipolygon relation.
    Relation,
}

impl ElementKind {
    /// Return the kind as used in origin references.
    ///
    /// # Examples
    /// ```
    /// use placegrain_core::ElementKind;
    ///
    /// assert_eq!(ElementKind::Relation.as_str(), "relation");
    /// ```
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overwrite `slot` when `incoming` carries a value.
fn overwrite<T>(slot: &mut Option<T>, incoming: Option<T>) {
    if incoming.is_some() {
        *slot = incoming;
    }
}

/// Postal address assembled from `addr:*` tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Country code or name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// City, province, county or hamlet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settlement: Option<String>,
    /// District, subdistrict or suburb.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    /// Street or named place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    /// House or conscription number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house: Option<String>,
    /// Postal code or post box.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

impl Address {
    /// Report whether no component is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.country.is_none()
            && self.settlement.is_none()
            && self.district.is_none()
            && self.place.is_none()
            && self.house.is_none()
            && self.postal_code.is_none()
    }
}

/// Links to social network profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialNetworks {
    /// Facebook page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    /// Instagram profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    /// LinkedIn page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    /// Pinterest profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinterest: Option<String>,
    /// Telegram channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram: Option<String>,
    /// Twitter account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    /// YouTube channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
}

impl SocialNetworks {
    /// Report whether no network is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.facebook.is_none()
            && self.instagram.is_none()
            && self.linkedin.is_none()
            && self.pinterest.is_none()
            && self.telegram.is_none()
            && self.twitter.is_none()
            && self.youtube.is_none()
    }
}

/// Structured facts extracted from tags.
///
/// Every field is independently optional; a field is only present when a
/// tag supplied a valid value for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
    /// Counter-clockwise outline of an area, closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon: Option<Vec<Point>>,
    /// Absolute image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Absolute website URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Postal address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    /// Contact mailbox.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Contact phone number as tagged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Social network links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_networks: Option<SocialNetworks>,
    /// Accepted payment methods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<BTreeSet<String>>,
    /// Whether entry is charged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<bool>,
    /// Whether delivery is offered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery: Option<bool>,
    /// Whether drinking water is available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drinking_water: Option<bool>,
    /// Whether internet access is available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internet_access: Option<bool>,
    /// Whether a shower is available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shower: Option<bool>,
    /// Whether smoking is allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoking: Option<bool>,
    /// Whether takeaway is offered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub takeaway: Option<bool>,
    /// Whether toilets are available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toilets: Option<bool>,
    /// Whether the place is wheelchair accessible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wheelchair: Option<bool>,
    /// Number of people the place accommodates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    /// Elevation above sea level in metres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
    /// Minimum visitor age.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_age: Option<u32>,
    /// Star rating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u32>,
    /// Year of construction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Charges as tagged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge: Option<Vec<String>>,
    /// Opening hours expressions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<Vec<String>>,
    /// Clothes on sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clothes: Option<BTreeSet<String>>,
    /// Cuisines served.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<BTreeSet<String>>,
    /// Religious denominations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denomination: Option<BTreeSet<String>>,
    /// Items for rent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rental: Option<BTreeSet<String>>,
}

impl Attributes {
    /// Overwrite every field that `incoming` carries, keeping the rest.
    ///
    /// Nested records (address, social networks) are replaced as a whole.
    pub fn merge_from(&mut self, incoming: Self) {
        overwrite(&mut self.polygon, incoming.polygon);
        overwrite(&mut self.image, incoming.image);
        overwrite(&mut self.website, incoming.website);
        overwrite(&mut self.address, incoming.address);
        overwrite(&mut self.email, incoming.email);
        overwrite(&mut self.phone, incoming.phone);
        overwrite(&mut self.social_networks, incoming.social_networks);
        overwrite(&mut self.payment, incoming.payment);
        overwrite(&mut self.fee, incoming.fee);
        overwrite(&mut self.delivery, incoming.delivery);
        overwrite(&mut self.drinking_water, incoming.drinking_water);
        overwrite(&mut self.internet_access, incoming.internet_access);
        overwrite(&mut self.shower, incoming.shower);
        overwrite(&mut self.smoking, incoming.smoking);
        overwrite(&mut self.takeaway, incoming.takeaway);
        overwrite(&mut self.toilets, incoming.toilets);
        overwrite(&mut self.wheelchair, incoming.wheelchair);
        overwrite(&mut self.capacity, incoming.capacity);
        overwrite(&mut self.elevation, incoming.elevation);
        overwrite(&mut self.minimum_age, incoming.minimum_age);
        overwrite(&mut self.rating, incoming.rating);
        overwrite(&mut self.year, incoming.year);
        overwrite(&mut self.charge, incoming.charge);
        overwrite(&mut self.opening_hours, incoming.opening_hours);
        overwrite(&mut self.clothes, incoming.clothes);
        overwrite(&mut self.cuisine, incoming.cuisine);
        overwrite(&mut self.denomination, incoming.denomination);
        overwrite(&mut self.rental, incoming.rental);
    }
}

/// References to the source element and external knowledge bases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Linked {
    /// Origin reference such as `node/42`.
    pub osm: String,
    /// Wikidata item identifier such as `Q90`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wikidata: Option<String>,
}

impl Linked {
    /// Build the link set for an element without external identifiers.
    ///
    /// # Examples
    /// ```
    /// use placegrain_core::{ElementKind, Linked};
    ///
    /// let linked = Linked::for_element(ElementKind::Way, 7);
    /// assert_eq!(linked.osm, "way/7");
    /// assert!(linked.wikidata.is_none());
    /// ```
    #[must_use]
    pub fn for_element(kind: ElementKind, id: i64) -> Self {
        Self {
            osm: format!("{kind}/{id}"),
            wikidata: None,
        }
    }
}

/// A normalised, point-located entity ready for storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Display name; never empty.
    pub name: String,
    /// Representative location.
    pub location: Point,
    /// Controlled vocabulary keywords, sorted.
    pub keywords: BTreeSet<String>,
    /// Origin and external references.
    pub linked: Linked,
    /// Extracted attributes.
    pub attributes: Attributes,
}

impl Place {
    /// Origin reference the place is keyed by.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.linked.osm
    }

    /// Fold a newer observation of the same origin into this place.
    ///
    /// Keywords are united; name and location are replaced; present
    /// attributes and links overwrite, absent ones are kept.
    ///
    /// # Examples
    /// ```
    /// use std::collections::BTreeSet;
    /// use placegrain_core::{Attributes, ElementKind, Linked, Place, Point};
    ///
    /// let place = |name: &str, keyword: &str| Place {
    ///     name: name.to_owned(),
    ///     location: Point { lon: 0.0, lat: 0.0 },
    ///     keywords: BTreeSet::from([keyword.to_owned()]),
    ///     linked: Linked::for_element(ElementKind::Node, 1),
    ///     attributes: Attributes::default(),
    /// };
    /// let mut stored = place("Old", "museum");
    /// stored.merge_from(place("New", "cafe"));
    /// assert_eq!(stored.name, "New");
    /// assert_eq!(stored.keywords.len(), 2);
    /// ```
    pub fn merge_from(&mut self, incoming: Self) {
        let Self {
            name,
            location,
            mut keywords,
            linked,
            attributes,
        } = incoming;
        self.name = name;
        self.location = location;
        self.keywords.append(&mut keywords);
        self.linked.osm = linked.osm;
        overwrite(&mut self.linked.wikidata, linked.wikidata);
        self.attributes.merge_from(attributes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn museum() -> Place {
        Place {
            name: "City Museum".to_owned(),
            location: Point { lon: 1.0, lat: 2.0 },
            keywords: BTreeSet::from(["museum".to_owned()]),
            linked: Linked {
                osm: "node/5".to_owned(),
                wikidata: Some("Q1".to_owned()),
            },
            attributes: Attributes {
                website: Some("https://museum.example/".to_owned()),
                fee: Some(true),
                ..Attributes::default()
            },
        }
    }

    #[rstest]
    fn merge_keeps_absent_fields(mut museum: Place) {
        let update = Place {
            name: "Museum of the City".to_owned(),
            location: Point { lon: 1.5, lat: 2.5 },
            keywords: BTreeSet::from(["tourism".to_owned()]),
            linked: Linked::for_element(ElementKind::Node, 5),
            attributes: Attributes {
                fee: Some(false),
                ..Attributes::default()
            },
        };

        museum.merge_from(update);

        assert_eq!(museum.name, "Museum of the City");
        assert_eq!(museum.location, Point { lon: 1.5, lat: 2.5 });
        assert_eq!(
            museum.keywords.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["museum", "tourism"]
        );
        assert_eq!(museum.linked.wikidata.as_deref(), Some("Q1"));
        assert_eq!(museum.attributes.fee, Some(false));
        assert_eq!(
            museum.attributes.website.as_deref(),
            Some("https://museum.example/")
        );
    }

    #[rstest]
    fn serialised_place_omits_absent_fields(museum: Place) {
        let json = serde_json::to_value(&museum).expect("serialise place");
        let attributes = json
            .get("attributes")
            .and_then(serde_json::Value::as_object)
            .expect("attributes object");
        assert_eq!(attributes.len(), 2);
        assert!(attributes.contains_key("website"));
        assert!(!attributes.contains_key("drinkingWater"));
    }

    #[rstest]
    fn attribute_names_are_camel_case() {
        let attributes = Attributes {
            drinking_water: Some(true),
            minimum_age: Some(18),
            address: Some(Address {
                postal_code: Some("11000".to_owned()),
                ..Address::default()
            }),
            ..Attributes::default()
        };
        let json = serde_json::to_string(&attributes).expect("serialise attributes");
        assert!(json.contains("\"drinkingWater\":true"));
        assert!(json.contains("\"minimumAge\":18"));
        assert!(json.contains("\"postalCode\":\"11000\""));
    }

    #[rstest]
    #[case(ElementKind::Node, "node/9")]
    #[case(ElementKind::Way, "way/9")]
    #[case(ElementKind::Relation, "relation/9")]
    fn origin_reference_uses_kind(#[case] kind: ElementKind, #[case] expected: &str) {
        assert_eq!(Linked::for_element(kind, 9).osm, expected);
    }
}

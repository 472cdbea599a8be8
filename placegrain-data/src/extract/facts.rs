//! Numeric facts and free-text lists.

use placegrain_core::Attributes;

use super::{first_valid, validate};
use crate::element::Tags;

const YEAR: &[&str] = &[
    "year_of_construction",
    "building:year_built",
    "year",
    "construction_year",
    "year_built",
    "building:year",
    "year_completed",
    "build_year",
];
const RATING: &[&str] = &["stars"];
const CAPACITY: &[&str] = &["capacity", "seats"];
const CAPACITY_PERSONS: &[&str] = &["capacity:persons"];
const ELEVATION: &[&str] = &["ele", "top_ele", "elevation"];
const MINIMUM_AGE: &[&str] = &["min_age"];
const CHARGE: &[&str] = &["charge"];
const OPENING_HOURS: &[&str] = &["opening_hours", "service_times"];

pub(super) fn extract(tags: &Tags, attributes: &mut Attributes) {
    attributes.year = first_valid(tags, YEAR, validate::integer);
    attributes.rating = first_valid(tags, RATING, validate::count);
    attributes.capacity = first_valid(tags, CAPACITY, validate::count)
        .or_else(|| first_valid(tags, CAPACITY_PERSONS, validate::last_positive_integer));
    attributes.elevation = first_valid(tags, ELEVATION, validate::number);
    attributes.minimum_age = first_valid(tags, MINIMUM_AGE, validate::count);
    attributes.charge = first_valid(tags, CHARGE, validate::list);
    attributes.opening_hours = first_valid(tags, OPENING_HOURS, validate::list);
}

//! Boolean amenity rules and the fee rule.
//!
//! A boolean rule commits a definite value as soon as any candidate key is
//! present: `true` when one of the present values is affirmative for the
//! rule, `false` otherwise.

use placegrain_core::Attributes;

use super::{Extraction, candidates};
use crate::element::Tags;

struct BooleanRule {
    keys: &'static [&'static str],
    affirmative: &'static [&'static str],
    /// Tag that implies `true` on its own.
    implied_by: Option<(&'static str, &'static str)>,
    /// Keyword added when the rule yields `true`.
    keyword: Option<&'static str>,
    field: fn(&mut Attributes) -> &mut Option<bool>,
}

const RULES: [BooleanRule; 8] = [
    BooleanRule {
        keys: &["delivery"],
        affirmative: &["yes", "only"],
        implied_by: None,
        keyword: None,
        field: |a| &mut a.delivery,
    },
    BooleanRule {
        keys: &[
            "drinking_water",
            "drinking_water:legal",
            "drinking_water:refill",
        ],
        affirmative: &["yes"],
        implied_by: Some(("amenity", "drinking_water")),
        keyword: Some("drinking water"),
        field: |a| &mut a.drinking_water,
    },
    BooleanRule {
        keys: &["internet_access"],
        affirmative: &["wlan", "yes", "terminal", "wired", "wifi"],
        implied_by: None,
        keyword: Some("internet access"),
        field: |a| &mut a.internet_access,
    },
    BooleanRule {
        keys: &["shower"],
        affirmative: &["yes", "hot", "outdoor"],
        implied_by: None,
        keyword: None,
        field: |a| &mut a.shower,
    },
    BooleanRule {
        keys: &["smoking", "smoking:outside"],
        affirmative: &[
            "yes",
            "outside",
            "isolated",
            "separated",
            "outdoor",
            "dedicated",
            "designated",
        ],
        implied_by: None,
        keyword: None,
        field: |a| &mut a.smoking,
    },
    BooleanRule {
        keys: &["takeaway"],
        affirmative: &["yes", "only"],
        implied_by: None,
        keyword: None,
        field: |a| &mut a.takeaway,
    },
    BooleanRule {
        keys: &["toilets"],
        affirmative: &["yes"],
        implied_by: None,
        keyword: None,
        field: |a| &mut a.toilets,
    },
    BooleanRule {
        keys: &["wheelchair"],
        affirmative: &["yes"],
        implied_by: None,
        keyword: None,
        field: |a| &mut a.wheelchair,
    },
];

const FEE: &[&str] = &["fee", "toll"];

impl BooleanRule {
    fn evaluate(&self, tags: &Tags) -> Option<bool> {
        let implied = self
            .implied_by
            .is_some_and(|(key, value)| tags.get(key).is_some_and(|v| v.trim() == value));
        let Some(value) = candidates(tags, self.keys).next() else {
            return implied.then_some(true);
        };
        let affirmed = self.affirmative.iter().any(|a| *a == value.trim());
        Some(implied || affirmed)
    }
}

pub(super) fn extract(tags: &Tags, extraction: &mut Extraction) {
    for rule in &RULES {
        let value = rule.evaluate(tags);
        if value == Some(true) {
            if let Some(keyword) = rule.keyword {
                extraction.keywords.insert(keyword.to_owned());
            }
        }
        *(rule.field)(&mut extraction.attributes) = value;
    }
    extraction.attributes.fee = candidates(tags, FEE)
        .next()
        .map(|value| value.trim() != "no");
}

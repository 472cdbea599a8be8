//! Attribute extraction from element tags.
//!
//! Each rule reads a prioritised list of candidate keys and writes at most one
//! field of [`Attributes`]. Rules are independent of each other and never
//! fail: input that does not validate simply leaves the field unset. A few
//! boolean rules also contribute keywords (`drinking water`,
//! `internet access`), which is why extraction returns an [`Extraction`]
//! rather than bare attributes.

use std::collections::BTreeSet;

use placegrain_core::Attributes;

use crate::element::Tags;
use crate::vocabulary::Vocabulary;

mod amenity;
mod contact;
mod facts;
mod sets;
mod validate;

/// Output of [`AttributeExtractor::extract`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// Extracted attributes.
    pub attributes: Attributes,
    /// Keywords contributed by attribute rules.
    pub keywords: BTreeSet<String>,
}

/// Applies every attribute rule to a tag map.
#[derive(Debug, Clone, Copy)]
pub struct AttributeExtractor<'v> {
    vocabulary: &'v Vocabulary,
}

impl<'v> AttributeExtractor<'v> {
    /// Create an extractor whose controlled sets come from `vocabulary`.
    #[must_use]
    pub const fn new(vocabulary: &'v Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Run all rules over `tags`.
    ///
    /// # Examples
    /// ```
    /// use placegrain_data::{AttributeExtractor, VocabularyBuilder, tags};
    ///
    /// let vocabulary = VocabularyBuilder::default().build();
    /// let extraction = AttributeExtractor::new(&vocabulary).extract(&tags([
    ///     ("website", "museum.example"),
    ///     ("wheelchair", "no"),
    ///     ("internet_access", "wlan"),
    /// ]));
    /// assert_eq!(
    ///     extraction.attributes.website.as_deref(),
    ///     Some("https://museum.example/")
    /// );
    /// assert_eq!(extraction.attributes.wheelchair, Some(false));
    /// assert!(extraction.keywords.contains("internet access"));
    /// ```
    #[must_use]
    pub fn extract(&self, tags: &Tags) -> Extraction {
        let mut extraction = Extraction::default();
        contact::extract(tags, &mut extraction.attributes);
        amenity::extract(tags, &mut extraction);
        facts::extract(tags, &mut extraction.attributes);
        sets::extract(tags, self.vocabulary, &mut extraction.attributes);
        extraction
    }
}

/// Values of the candidate keys that are present, in priority order.
fn candidates<'t>(tags: &'t Tags, keys: &'static [&'static str]) -> impl Iterator<Item = &'t str> {
    keys.iter()
        .filter_map(move |key| tags.get(*key))
        .map(String::as_str)
}

/// First candidate value accepted by `rule`.
fn first_valid<'t, T>(
    tags: &'t Tags,
    keys: &'static [&'static str],
    rule: impl Fn(&'t str) -> Option<T>,
) -> Option<T> {
    candidates(tags, keys).find_map(rule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::tags;
    use crate::vocabulary::{Category, VocabularyBuilder};
    use proptest::prelude::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn vocabulary() -> Vocabulary {
        VocabularyBuilder::default()
            .category(Category::Cuisine, ["italian", "pizza", "vegan"])
            .category(Category::Payment, ["visa", "cash"])
            .build()
    }

    #[rstest]
    fn empty_tags_yield_nothing(vocabulary: Vocabulary) {
        let extraction = AttributeExtractor::new(&vocabulary).extract(&Tags::new());
        assert_eq!(extraction, Extraction::default());
    }

    #[rstest]
    fn rules_are_independent(vocabulary: Vocabulary) {
        let extraction = AttributeExtractor::new(&vocabulary).extract(&tags([
            ("phone", "not a phone"),
            ("email", "info@cafe.example"),
            ("cuisine", "pizza;unknown"),
            ("payment:visa", "yes"),
        ]));
        let attributes = extraction.attributes;
        assert!(attributes.phone.is_none());
        assert_eq!(attributes.email.as_deref(), Some("info@cafe.example"));
        assert_eq!(
            attributes.cuisine,
            Some(BTreeSet::from(["pizza".to_owned()]))
        );
        assert_eq!(attributes.payment, Some(BTreeSet::from(["visa".to_owned()])));
    }

    proptest! {
        #[test]
        fn extraction_never_panics(
            pairs in prop::collection::vec(
                (
                    prop::sample::select(vec![
                        "website", "url", "wikipedia", "image", "email", "phone",
                        "contact:phone", "capacity", "capacity:persons", "ele", "stars",
                        "min_age", "year", "charge", "opening_hours", "cuisine",
                        "diet:vegan", "payment:visa", "fee", "toilets", "addr:city",
                        "facebook", "rental", "clothes", "denomination",
                    ]),
                    ".{0,40}",
                ),
                0..12,
            )
        ) {
            let vocabulary = VocabularyBuilder::default().build();
            let tags: Tags = pairs
                .into_iter()
                .map(|(key, value)| (key.to_owned(), value))
                .collect();
            let _ = AttributeExtractor::new(&vocabulary).extract(&tags);
        }
    }
}

//! Controlled-set rules: clothes, cuisine, denomination, rental, payment.
//!
//! Tokens are lower-cased and put in keyword form before being intersected
//! with the matching vocabulary category. An empty intersection leaves the
//! field unset.

use std::collections::BTreeSet;

use placegrain_core::Attributes;

use super::{candidates, validate};
use crate::element::Tags;
use crate::text::snake_to_words;
use crate::vocabulary::{Category, Vocabulary};

const PAYMENT_PREFIX: &str = "payment:";
const ACCEPTED: [&str; 2] = ["yes", "only"];
const DIET_ACCEPTED: [&str; 3] = ["yes", "only", "limited"];
const DIETS: [(&str, &str); 2] = [("diet:vegan", "vegan"), ("diet:vegetarian", "vegetarian")];

pub(super) fn extract(tags: &Tags, vocabulary: &Vocabulary, attributes: &mut Attributes) {
    attributes.clothes = controlled(tags, &["clothes"], vocabulary, Category::Clothes, []);
    attributes.cuisine = controlled(
        tags,
        &["cuisine"],
        vocabulary,
        Category::Cuisine,
        diets(tags),
    );
    attributes.denomination = controlled(
        tags,
        &["denomination"],
        vocabulary,
        Category::Denomination,
        [],
    );
    attributes.rental = controlled(tags, &["rental"], vocabulary, Category::Rental, []);
    attributes.payment = payment(tags, vocabulary);
}

fn normalise(token: &str) -> String {
    snake_to_words(&token.to_lowercase())
}

fn controlled<I>(
    tags: &Tags,
    keys: &'static [&'static str],
    vocabulary: &Vocabulary,
    category: Category,
    extra: I,
) -> Option<BTreeSet<String>>
where
    I: IntoIterator<Item = String>,
{
    let allowed = vocabulary.category(category);
    let set: BTreeSet<String> = candidates(tags, keys)
        .flat_map(validate::tokens)
        .map(normalise)
        .chain(extra)
        .filter(|item| allowed.contains(item))
        .collect();
    (!set.is_empty()).then_some(set)
}

fn diets(tags: &Tags) -> Vec<String> {
    DIETS
        .iter()
        .filter(|(key, _)| {
            tags.get(*key)
                .is_some_and(|value| DIET_ACCEPTED.contains(&value.trim()))
        })
        .map(|(_, cuisine)| (*cuisine).to_owned())
        .collect()
}

fn payment(tags: &Tags, vocabulary: &Vocabulary) -> Option<BTreeSet<String>> {
    let allowed = vocabulary.category(Category::Payment);
    let set: BTreeSet<String> = tags
        .iter()
        .filter(|(_, value)| ACCEPTED.contains(&value.trim()))
        .filter_map(|(key, _)| key.strip_prefix(PAYMENT_PREFIX))
        .map(normalise)
        .filter(|method| allowed.contains(method))
        .collect();
    (!set.is_empty()).then_some(set)
}

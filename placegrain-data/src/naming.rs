//! Display names and external links.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use placegrain_core::{ElementKind, Linked};
use regex::Regex;

use crate::element::Tags;
use crate::text::non_blank;

static WIKIDATA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Q[1-9][0-9]*$").expect("valid regex"));

/// Name tags in priority order.
pub const NAME_KEYS: [&str; 7] = [
    "name",
    "name:en",
    "int_name",
    "official_name",
    "short_name",
    "alt_name",
    "brand",
];

/// Choose a display name.
///
/// The first non-blank name tag wins. Otherwise the lexicographically first
/// keyword is used with its first letter capitalised. `None` only when both
/// are missing.
///
/// # Examples
/// ```
/// use std::collections::BTreeSet;
/// use placegrain_data::{name, tags};
///
/// let keywords = BTreeSet::from(["drinking water".to_owned()]);
/// assert_eq!(name(&tags([]), &keywords).as_deref(), Some("Drinking water"));
/// assert_eq!(
///     name(&tags([("name", " "), ("brand", "Acme")]), &keywords).as_deref(),
///     Some("Acme")
/// );
/// ```
#[must_use]
pub fn name(tags: &Tags, keywords: &BTreeSet<String>) -> Option<String> {
    NAME_KEYS
        .iter()
        .filter_map(|key| tags.get(*key))
        .find_map(|value| non_blank(value))
        .map(str::to_owned)
        .or_else(|| keywords.first().map(|keyword| capitalise(keyword)))
}

fn capitalise(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Build origin and Wikidata links for an element.
#[must_use]
pub fn linked(kind: ElementKind, id: i64, tags: &Tags) -> Linked {
    let mut linked = Linked::for_element(kind, id);
    linked.wikidata = tags
        .get("wikidata")
        .map(|value| value.trim())
        .filter(|value| WIKIDATA_RE.is_match(value))
        .map(str::to_owned);
    linked
}

//! Tag-to-keyword classification.
//!
//! Classified keys come in two flavours. For the keys in
//! [`TYPED_KEYS`](crate::vocabulary::TYPED_KEYS) a matched value contributes
//! both the value and the key, so `tourism=museum` yields `museum` and
//! `tourism`. For [`UNTYPED_KEYS`](crate::vocabulary::UNTYPED_KEYS) only the
//! value is kept.

use std::collections::BTreeSet;

use crate::element::Tags;
use crate::text::{snake_to_words, split_tokens};
use crate::vocabulary::{TYPED_KEYS, UNTYPED_KEYS, Vocabulary};

/// Maps element tags onto the controlled keyword vocabulary.
#[derive(Debug, Clone, Copy)]
pub struct KeywordClassifier<'v> {
    vocabulary: &'v Vocabulary,
}

impl<'v> KeywordClassifier<'v> {
    /// Create a classifier over `vocabulary`.
    #[must_use]
    pub const fn new(vocabulary: &'v Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Sorted keywords for `tags`; empty when nothing is recognised.
    ///
    /// # Examples
    /// ```
    /// use placegrain_data::{KeywordClassifier, VocabularyBuilder, tags};
    ///
    /// let vocabulary = VocabularyBuilder::default()
    ///     .allow("tourism", ["museum", "gallery"])
    ///     .build();
    /// let keywords = KeywordClassifier::new(&vocabulary)
    ///     .classify(&tags([("tourism", "museum;castle")]));
    /// assert_eq!(keywords.into_iter().collect::<Vec<_>>(), ["museum", "tourism"]);
    /// ```
    #[must_use]
    pub fn classify(&self, tags: &Tags) -> BTreeSet<String> {
        let mut keywords = BTreeSet::new();
        for key in TYPED_KEYS {
            self.classify_key(key, true, tags, &mut keywords);
        }
        for key in UNTYPED_KEYS {
            self.classify_key(key, false, tags, &mut keywords);
        }
        keywords
    }

    fn classify_key(&self, key: &str, typed: bool, tags: &Tags, keywords: &mut BTreeSet<String>) {
        let Some(value) = tags.get(key) else {
            return;
        };
        for token in split_tokens(value) {
            let word = snake_to_words(token);
            if !self.vocabulary.is_allowed(key, &word) {
                continue;
            }
            for association in self.vocabulary.associations(key) {
                if association.values.contains(&word) {
                    keywords.extend(association.enrich.iter().cloned());
                }
            }
            if typed {
                keywords.insert(key.to_owned());
            }
            keywords.insert(word);
        }
    }
}

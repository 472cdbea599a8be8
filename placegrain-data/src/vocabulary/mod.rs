//! Controlled vocabularies used by the classifier and the extractors.
//!
//! A [`Vocabulary`] bundles three kinds of reference data:
//!
//! - per-key allow-lists of tag values that may become keywords
//!   (`tags/<key>.json`),
//! - controlled sets for list-valued attributes such as cuisine or payment
//!   methods (`taginfo/<category>.json`),
//! - keyword enrichments that fire when a matched value belongs to an
//!   association group (`enrich/assoc.json`).
//!
//! Values are held in keyword form (underscores replaced by spaces). The data
//! is loaded once, from the copy compiled into the crate or from a directory
//! on disk, and is read-only afterwards.

use std::collections::{BTreeSet, HashMap};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use serde::Deserialize;
use thiserror::Error;

use crate::text::snake_to_words;

mod bundled;

/// Keys whose matched values also contribute the key itself as a keyword.
pub const TYPED_KEYS: [&str; 8] = [
    "aerialway",
    "aeroway",
    "club",
    "craft",
    "hazard",
    "healthcare",
    "historic",
    "tourism",
];

/// Keys whose matched values contribute only the value as a keyword.
pub const UNTYPED_KEYS: [&str; 13] = [
    "amenity",
    "artwork_type",
    "attraction",
    "building",
    "business",
    "emergency",
    "leisure",
    "natural",
    "office",
    "public_transport",
    "shop",
    "sport",
    "theatre:genre",
];

/// Controlled sets backing list-valued attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Clothes sold by a shop.
    Clothes,
    /// Cuisines served.
    Cuisine,
    /// Religious denominations.
    Denomination,
    /// Accepted payment methods.
    Payment,
    /// Items for rent.
    Rental,
}

impl Category {
    /// Every category, in asset order.
    pub const ALL: [Self; 5] = [
        Self::Clothes,
        Self::Cuisine,
        Self::Denomination,
        Self::Payment,
        Self::Rental,
    ];

    /// Asset file stem of the category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Clothes => "clothes",
            Self::Cuisine => "cuisine",
            Self::Denomination => "denomination",
            Self::Payment => "payment",
            Self::Rental => "rental",
        }
    }
}

/// Keyword enrichment attached to a tag key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Association {
    /// Values that trigger the enrichment.
    pub values: BTreeSet<String>,
    /// Keywords added when a trigger value matches.
    pub enrich: BTreeSet<String>,
}

/// Errors raised while loading reference data.
#[derive(Debug, Error)]
pub enum VocabularyError {
    /// The asset directory could not be opened.
    #[error("failed to open vocabulary directory {path}")]
    OpenDirectory {
        /// Directory that was requested.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// An asset file could not be read.
    #[error("failed to read vocabulary file {file}")]
    Read {
        /// Asset path relative to the asset root.
        file: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// An asset file held malformed JSON.
    #[error("failed to parse vocabulary file {file}")]
    Parse {
        /// Asset path relative to the asset root.
        file: String,
        /// Source error produced by `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// A file expected in the bundled copy is absent.
    #[error("bundled vocabulary lacks {file}")]
    MissingBundled {
        /// Asset path relative to the asset root.
        file: String,
    },
}

#[derive(Deserialize)]
struct Item {
    value: String,
}

/// Read-only keyword and attribute vocabularies.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    allowed: HashMap<String, BTreeSet<String>>,
    associations: HashMap<String, Vec<Association>>,
    categories: HashMap<Category, BTreeSet<String>>,
}

static EMPTY_SET: BTreeSet<String> = BTreeSet::new();

impl Vocabulary {
    /// Load the copy compiled into the crate.
    ///
    /// # Examples
    /// ```
    /// use placegrain_data::{Category, Vocabulary};
    ///
    /// # fn main() -> Result<(), placegrain_data::VocabularyError> {
    /// let vocabulary = Vocabulary::bundled()?;
    /// assert!(vocabulary.is_allowed("amenity", "drinking water"));
    /// assert!(vocabulary.category(Category::Payment).contains("visa"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn bundled() -> Result<Self, VocabularyError> {
        Self::load(|file| {
            bundled::file(file)
                .map(str::to_owned)
                .ok_or_else(|| VocabularyError::MissingBundled {
                    file: file.to_owned(),
                })
        })
    }

    /// Load reference data from a directory laid out like `assets/`.
    pub fn from_dir(path: &Utf8Path) -> Result<Self, VocabularyError> {
        let dir = fs_utf8::Dir::open_ambient_dir(path, ambient_authority()).map_err(|source| {
            VocabularyError::OpenDirectory {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::load(|file| {
            dir.read_to_string(file)
                .map_err(|source| VocabularyError::Read {
                    file: file.to_owned(),
                    source,
                })
        })
    }

    fn load<F>(read: F) -> Result<Self, VocabularyError>
    where
        F: Fn(&str) -> Result<String, VocabularyError>,
    {
        let mut builder = VocabularyBuilder::default();
        for key in TYPED_KEYS.iter().chain(UNTYPED_KEYS.iter()) {
            let file = format!("tags/{}.json", key.replace(':', "_"));
            builder = builder.allow(key, parse_items(&file, &read(&file)?)?);
        }
        for category in Category::ALL {
            let file = format!("taginfo/{}.json", category.as_str());
            builder = builder.category(category, parse_items(&file, &read(&file)?)?);
        }

        let file = "enrich/assoc.json";
        let associations: HashMap<String, Vec<Association>> =
            serde_json::from_str(&read(file)?).map_err(|source| VocabularyError::Parse {
                file: file.to_owned(),
                source,
            })?;
        for (key, groups) in associations {
            for group in groups {
                builder = builder.associate(&key, group.values, group.enrich);
            }
        }
        Ok(builder.build())
    }

    /// Report whether `value` (keyword form) may become a keyword for `key`.
    #[must_use]
    pub fn is_allowed(&self, key: &str, value: &str) -> bool {
        self.allowed.get(key).is_some_and(|set| set.contains(value))
    }

    /// Enrichment groups registered for `key`.
    #[must_use]
    pub fn associations(&self, key: &str) -> &[Association] {
        self.associations.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Members of a controlled set.
    #[must_use]
    pub fn category(&self, category: Category) -> &BTreeSet<String> {
        self.categories.get(&category).unwrap_or(&EMPTY_SET)
    }
}

fn parse_items(file: &str, json: &str) -> Result<Vec<String>, VocabularyError> {
    let items: Vec<Item> = serde_json::from_str(json).map_err(|source| VocabularyError::Parse {
        file: file.to_owned(),
        source,
    })?;
    Ok(items.into_iter().map(|item| item.value).collect())
}

/// Assemble a [`Vocabulary`] by hand.
///
/// Values are converted to keyword form. Every classified key ends up with an
/// allow-list and association list, empty when nothing was registered.
///
/// # Examples
/// ```
/// use placegrain_data::VocabularyBuilder;
///
/// let vocabulary = VocabularyBuilder::default()
///     .allow("tourism", ["museum"])
///     .associate("tourism", ["museum"], ["culture"])
///     .build();
/// assert!(vocabulary.is_allowed("tourism", "museum"));
/// assert_eq!(vocabulary.associations("tourism").len(), 1);
/// assert!(vocabulary.associations("amenity").is_empty());
/// ```
#[derive(Debug, Default)]
pub struct VocabularyBuilder {
    vocabulary: Vocabulary,
}

fn keyword_set<I, S>(values: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|value| snake_to_words(value.as_ref().trim()))
        .collect()
}

impl VocabularyBuilder {
    /// Add allowed values for a tag key.
    #[must_use]
    pub fn allow<I, S>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.vocabulary
            .allowed
            .entry(key.to_owned())
            .or_default()
            .extend(keyword_set(values));
        self
    }

    /// Add an enrichment group for a tag key.
    #[must_use]
    pub fn associate<I, S, J, T>(mut self, key: &str, values: I, enrich: J) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        J: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.vocabulary
            .associations
            .entry(key.to_owned())
            .or_default()
            .push(Association {
                values: keyword_set(values),
                enrich: enrich.into_iter().map(|e| e.as_ref().to_owned()).collect(),
            });
        self
    }

    /// Add members to a controlled set.
    #[must_use]
    pub fn category<I, S>(mut self, category: Category, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.vocabulary
            .categories
            .entry(category)
            .or_default()
            .extend(keyword_set(values));
        self
    }

    /// Finish the vocabulary.
    #[must_use]
    pub fn build(mut self) -> Vocabulary {
        for key in TYPED_KEYS.iter().chain(UNTYPED_KEYS.iter()) {
            self.vocabulary
                .allowed
                .entry((*key).to_owned())
                .or_default();
            self.vocabulary
                .associations
                .entry((*key).to_owned())
                .or_default();
        }
        for category in Category::ALL {
            self.vocabulary.categories.entry(category).or_default();
        }
        self.vocabulary
    }
}

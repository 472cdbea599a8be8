//! SQLite-backed place catalogue.
//!
//! Documents are stored as JSON in a single `places` table keyed by origin
//! reference. Each [`PlaceStore::bulk_upsert`] call runs inside one
//! transaction, so a failed batch leaves no partial writes behind.

use std::fmt;
use std::path::{Component, Path};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Transaction, params};

use crate::{Metadata, Place, PlaceDocument};

use super::{PlaceStore, PlaceStoreError, UpsertSummary};

const CREATE_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS places (
    origin TEXT PRIMARY KEY,
    document TEXT NOT NULL,
    created TEXT NOT NULL,
    updated TEXT NOT NULL
)";

const SELECT_DOCUMENT: &str = "SELECT document FROM places WHERE origin = ?1";

const UPSERT_DOCUMENT: &str = "INSERT INTO places (origin, document, created, updated)
    VALUES (?1, ?2, ?3, ?4)
    ON CONFLICT(origin) DO UPDATE SET
        document = excluded.document,
        updated = excluded.updated";

/// Place store writing JSON documents to SQLite.
pub struct SqlitePlaceStore {
    connection: Connection,
    path: String,
}

impl fmt::Debug for SqlitePlaceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlitePlaceStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SqlitePlaceStore {
    /// Open (creating if needed) the database at `path` and its schema.
    ///
    /// Missing parent directories are created.
    pub fn open(path: &Utf8Path) -> Result<Self, PlaceStoreError> {
        ensure_parent_dir(path)?;
        let connection =
            Connection::open(path.as_std_path()).map_err(|source| PlaceStoreError::Open {
                path: path.to_string(),
                source,
            })?;
        Self::with_connection(connection, path.to_string())
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, PlaceStoreError> {
        let connection = Connection::open_in_memory().map_err(|source| PlaceStoreError::Open {
            path: ":memory:".to_owned(),
            source,
        })?;
        Self::with_connection(connection, ":memory:".to_owned())
    }

    fn with_connection(connection: Connection, path: String) -> Result<Self, PlaceStoreError> {
        connection
            .execute(CREATE_SCHEMA, [])
            .map_err(|source| PlaceStoreError::Database {
                operation: "create places table",
                source,
            })?;
        Ok(Self { connection, path })
    }

    /// Read back the document stored for `origin`, if any.
    pub fn document(&self, origin: &str) -> Result<Option<PlaceDocument>, PlaceStoreError> {
        let raw: Option<String> = self
            .connection
            .query_row(SELECT_DOCUMENT, params![origin], |row| row.get(0))
            .optional()
            .map_err(|source| PlaceStoreError::Database {
                operation: "select document",
                source,
            })?;
        raw.map(|json| decode(origin, &json)).transpose()
    }

    /// Number of stored documents.
    pub fn len(&self) -> Result<usize, PlaceStoreError> {
        self.connection
            .query_row("SELECT COUNT(*) FROM places", [], |row| row.get::<_, i64>(0))
            .map(|count| usize::try_from(count).unwrap_or_default())
            .map_err(|source| PlaceStoreError::Database {
                operation: "count documents",
                source,
            })
    }

    /// Report whether the catalogue holds no documents.
    pub fn is_empty(&self) -> Result<bool, PlaceStoreError> {
        self.len().map(|count| count == 0)
    }
}

impl PlaceStore for SqlitePlaceStore {
    fn bulk_upsert(&mut self, places: &[Place]) -> Result<UpsertSummary, PlaceStoreError> {
        if places.is_empty() {
            return Ok(UpsertSummary::default());
        }
        let now = Utc::now();
        let transaction =
            self.connection
                .transaction()
                .map_err(|source| PlaceStoreError::Database {
                    operation: "begin transaction",
                    source,
                })?;

        let mut summary = UpsertSummary::default();
        for place in places {
            if upsert_one(&transaction, place, now)? {
                summary.inserted += 1;
            } else {
                summary.updated += 1;
            }
        }

        transaction
            .commit()
            .map_err(|source| PlaceStoreError::Database {
                operation: "commit transaction",
                source,
            })?;
        Ok(summary)
    }
}

/// Merge one place into the table; returns `true` when the origin was new.
fn upsert_one(
    transaction: &Transaction<'_>,
    place: &Place,
    now: DateTime<Utc>,
) -> Result<bool, PlaceStoreError> {
    let origin = place.origin();
    let existing: Option<String> = transaction
        .prepare_cached(SELECT_DOCUMENT)
        .and_then(|mut statement| {
            statement
                .query_row(params![origin], |row| row.get(0))
                .optional()
        })
        .map_err(|source| PlaceStoreError::Database {
            operation: "select document",
            source,
        })?;

    let inserted = existing.is_none();
    let document = match existing {
        Some(json) => {
            let mut document = decode(origin, &json)?;
            document.merge(place.clone(), now);
            document
        }
        None => PlaceDocument::new(place.clone(), now),
    };

    let json = serde_json::to_string(&document).map_err(|source| PlaceStoreError::Encode {
        origin: origin.to_owned(),
        source,
    })?;
    transaction
        .prepare_cached(UPSERT_DOCUMENT)
        .and_then(|mut statement| {
            statement.execute(params![
                origin,
                json,
                Metadata::format(document.metadata.created),
                Metadata::format(document.metadata.updated),
            ])
        })
        .map_err(|source| PlaceStoreError::Database {
            operation: "upsert document",
            source,
        })?;
    Ok(inserted)
}

fn decode(origin: &str, json: &str) -> Result<PlaceDocument, PlaceStoreError> {
    serde_json::from_str(json).map_err(|source| PlaceStoreError::Decode {
        origin: origin.to_owned(),
        source,
    })
}

fn ensure_parent_dir(path: &Utf8Path) -> Result<(), PlaceStoreError> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() || parent == Utf8Path::new("/") {
        return Ok(());
    }

    let to_error = |source| PlaceStoreError::CreateDirectory {
        path: parent.to_string(),
        source,
    };
    let (base, relative) = split_base(parent);
    if relative.as_os_str().is_empty() {
        return Ok(());
    }
    let base_dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority()).map_err(to_error)?;
    base_dir.create_dir_all(&relative).map_err(to_error)
}

/// Split a directory into an ambient base (`/` or `.`) and a relative suffix.
fn split_base(parent: &Utf8Path) -> (Utf8PathBuf, Utf8PathBuf) {
    let std_parent: &Path = parent.as_std_path();
    match std_parent.components().next() {
        Some(Component::RootDir) => (
            Utf8PathBuf::from("/"),
            parent
                .strip_prefix("/")
                .map_or_else(|_| parent.to_path_buf(), Utf8Path::to_path_buf),
        ),
        _ => (Utf8PathBuf::from("."), parent.to_path_buf()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Attributes, ElementKind, Linked, Point};
    use rstest::{fixture, rstest};
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn place(id: i64, keywords: &[&str]) -> Place {
        Place {
            name: format!("Place {id}"),
            location: Point { lon: 1.0, lat: 1.0 },
            keywords: keywords.iter().map(|k| (*k).to_owned()).collect(),
            linked: Linked::for_element(ElementKind::Node, id),
            attributes: Attributes::default(),
        }
    }

    #[fixture]
    fn store() -> SqlitePlaceStore {
        SqlitePlaceStore::open_in_memory().expect("open in-memory store")
    }

    #[rstest]
    fn empty_batch_is_a_no_op(mut store: SqlitePlaceStore) {
        let summary = store.bulk_upsert(&[]).expect("upsert");
        assert_eq!(summary, UpsertSummary::default());
        assert!(store.is_empty().expect("count"));
    }

    #[rstest]
    fn repeated_origin_merges_keywords(mut store: SqlitePlaceStore) {
        store
            .bulk_upsert(&[place(1, &["museum"])])
            .expect("first upsert");
        let summary = store
            .bulk_upsert(&[place(1, &["tourism"])])
            .expect("second upsert");

        assert_eq!(summary, UpsertSummary { inserted: 0, updated: 1 });
        let document = store
            .document("node/1")
            .expect("read document")
            .expect("document stored");
        assert_eq!(
            document.place.keywords,
            BTreeSet::from(["museum".to_owned(), "tourism".to_owned()])
        );
        assert!(document.metadata.created <= document.metadata.updated);
    }

    #[rstest]
    fn duplicates_within_one_batch_apply_in_order(mut store: SqlitePlaceStore) {
        let summary = store
            .bulk_upsert(&[place(2, &["cafe"]), place(2, &["bar"]), place(3, &["pub"])])
            .expect("upsert");
        assert_eq!(summary, UpsertSummary { inserted: 2, updated: 1 });
        assert_eq!(store.len().expect("count"), 2);
    }

    #[rstest]
    fn open_creates_missing_directories() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8Path::from_path(temp.path()).expect("utf-8 temp dir");
        let path = root.join("nested/deeper/places.db");
        let mut store = SqlitePlaceStore::open(&path).expect("open store");
        store.bulk_upsert(&[place(4, &["park"])]).expect("upsert");
        assert!(path.as_std_path().exists());
    }
}

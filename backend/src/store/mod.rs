//! # Document Store
//!
//! SQLite persistence for templates, collections and case studies.
//!
//! Like the rest of the service, every operation opens its own connection to
//! the database file; there is no pool. List and JSON valued fields (`tags`,
//! `json_data`, `placeholders`, ...) are stored as JSON text columns and
//! timestamps as RFC 3339 text through rusqlite's `chrono` support.
//!
//! ## Sub-modules:
//! - `templates`: published templates.
//! - `collections`: collections and case studies, both of which group templates.

mod collections;
mod templates;

use crate::error::ServiceError;
use rusqlite::types::Type;
use rusqlite::{Connection, Row};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS templates (
    id            TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    type          TEXT NOT NULL,
    html_ref      TEXT NOT NULL,
    html_url      TEXT NOT NULL,
    version       INTEGER NOT NULL,
    is_latest     INTEGER NOT NULL,
    is_visible    INTEGER NOT NULL,
    production    INTEGER NOT NULL,
    published_at  TEXT,
    created_by    TEXT NOT NULL,
    tags          TEXT NOT NULL,
    json_data     TEXT NOT NULL,
    placeholders  TEXT NOT NULL,
    collection_id TEXT,
    parent_id     TEXT,
    child_ids     TEXT NOT NULL,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS templates_type ON templates (type);

CREATE TABLE IF NOT EXISTS collections (
    id           TEXT PRIMARY KEY,
    name         TEXT NOT NULL,
    tags         TEXT NOT NULL,
    placeholders TEXT NOT NULL,
    template_ids TEXT NOT NULL,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS case_studies (
    id           TEXT PRIMARY KEY,
    tags         TEXT NOT NULL,
    template_ids TEXT NOT NULL,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);
";

#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Opens (creating if needed) the database at `path` and ensures the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Store, ServiceError> {
        let store = Store {
            path: path.as_ref().to_path_buf(),
        };
        store.connection()?.execute_batch(SCHEMA)?;
        log::info!("Document store ready at {}", store.path.display());
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connection(&self) -> Result<Connection, ServiceError> {
        Ok(Connection::open(&self.path)?)
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ServiceError> {
    Ok(serde_json::to_string(value)?)
}

/// Reads a JSON text column.
fn json_column<T: DeserializeOwned>(row: &Row, idx: usize) -> rusqlite::Result<T> {
    let text: String = row.get(idx)?;
    serde_json::from_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.sqlite");
        Store::open(&path).unwrap();
        let store = Store::open(&path).unwrap();
        assert_eq!(store.path(), path.as_path());
        assert!(store.list_templates().unwrap().is_empty());
    }
}

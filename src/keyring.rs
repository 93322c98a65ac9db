use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::error::KeyringError;

pub const KEYRING_FILE: &str = "keyring.db";

/// A named signer address. The keyring holds no private keys; signing
/// happens on the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyRecord {
    pub name: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

pub struct Keyring {
    conn: Connection,
}

impl Keyring {
    pub fn open(home: &Path) -> Result<Self, KeyringError> {
        std::fs::create_dir_all(home).map_err(|source| KeyringError::CreateDir {
            path: home.to_path_buf(),
            source,
        })?;
        Self::init(Connection::open(home.join(KEYRING_FILE))?)
    }

    pub fn open_in_memory() -> Result<Self, KeyringError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, KeyringError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS keys (
                name TEXT PRIMARY KEY,
                address TEXT NOT NULL,
                created_at INTEGER NOT NULL
            );",
        )?;
        Ok(Keyring { conn })
    }

    pub fn add(&self, name: &str, address: &str) -> Result<KeyRecord, KeyringError> {
        if self.get(name)?.is_some() {
            return Err(KeyringError::AlreadyExists(name.to_string()));
        }
        // stored with second precision, so truncate before handing it back
        let created_at =
            DateTime::<Utc>::from_timestamp(Utc::now().timestamp(), 0).unwrap_or_default();
        self.conn.execute(
            "INSERT INTO keys (name, address, created_at) VALUES (?1, ?2, ?3)",
            params![name, address, created_at.timestamp()],
        )?;
        Ok(KeyRecord {
            name: name.to_string(),
            address: address.to_string(),
            created_at,
        })
    }

    pub fn get(&self, name: &str) -> Result<Option<KeyRecord>, KeyringError> {
        let record = self
            .conn
            .query_row(
                "SELECT name, address, created_at FROM keys WHERE name = ?1",
                params![name],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    pub fn list(&self) -> Result<Vec<KeyRecord>, KeyringError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, address, created_at FROM keys ORDER BY name")?;
        let rows = stmt.query_map([], row_to_record)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn delete(&self, name: &str) -> Result<(), KeyringError> {
        let removed = self
            .conn
            .execute("DELETE FROM keys WHERE name = ?1", params![name])?;
        if removed == 0 {
            return Err(KeyringError::NotFound(name.to_string()));
        }
        Ok(())
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<KeyRecord> {
    let created_at: i64 = row.get(2)?;
    Ok(KeyRecord {
        name: row.get(0)?,
        address: row.get(1)?,
        created_at: DateTime::<Utc>::from_timestamp(created_at, 0).unwrap_or_default(),
    })
}

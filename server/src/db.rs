use crate::error::AppError;
use crate::services::cache::CacheStore;
use async_trait::async_trait;
use chrono::Utc;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use rusqlite::{params, Connection, OptionalExtension};
use std::io::{Read, Write};
use std::sync::Mutex;
use std::time::Duration;

const SCHEMA: &str = include_str!("schema.sql");

/// SQLite-backed key space for cached upstream data.
pub struct Db {
    conn: Mutex<Connection>,
}

impl Db {
    pub fn open(path: &str) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA busy_timeout=5000;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Db {
            conn: Mutex::new(conn),
        })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Db {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T, rusqlite::Error>
    where
        F: FnOnce(&Connection) -> Result<T, rusqlite::Error>,
    {
        // The connection carries no in-process invariants; recover from poisoning.
        let conn = self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&conn)
    }

    /// Returns the decompressed value stored under `key` unless it has expired.
    pub fn get_entry(&self, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        let now = Utc::now().timestamp();
        let compressed = self.with_conn(|conn| {
            conn.query_row(
                "SELECT value FROM cache_entries WHERE key = ?1 AND expires_at > ?2",
                params![key, now],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()
        })?;

        match compressed {
            Some(bytes) => {
                let mut decoded = Vec::new();
                ZlibDecoder::new(bytes.as_slice()).read_to_end(&mut decoded)?;
                Ok(Some(decoded))
            }
            None => Ok(None),
        }
    }

    pub fn put_entry(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), AppError> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(value)?;
        let compressed = encoder.finish()?;

        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let expires_at = Utc::now().timestamp().saturating_add(ttl_secs);

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO cache_entries (key, value, expires_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    expires_at = excluded.expires_at,
                    created_at = datetime('now')",
                params![key, compressed, expires_at],
            )
        })?;
        Ok(())
    }

    /// Deletes every expired entry, returning how many were removed.
    pub fn purge_expired(&self) -> Result<usize, AppError> {
        let now = Utc::now().timestamp();
        Ok(self.with_conn(|conn| {
            conn.execute("DELETE FROM cache_entries WHERE expires_at <= ?1", params![now])
        })?)
    }
}

#[async_trait]
impl CacheStore for Db {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        self.get_entry(key)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), AppError> {
        self.put_entry(key, value, ttl)
    }
}

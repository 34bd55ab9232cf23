use std::{cell::RefCell, collections::HashMap, path::Path};

use log::{info, warn};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::LadderResult;

/// Scalar key/value persistence. Every successful write is durable when it returns.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> LadderResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> LadderResult<()>;
    fn delete(&self, key: &str) -> LadderResult<()>;

    fn get_int(&self, key: &str) -> LadderResult<Option<i64>> {
        let value = self.get(key)?;
        Ok(value.and_then(|text| match text.parse::<i64>() {
            Ok(number) => Some(number),
            Err(_) => {
                warn!("Ignoring non-integer value stored under {}", key);
                None
            }
        }))
    }

    fn set_int(&self, key: &str, value: i64) -> LadderResult<()> {
        self.set(key, &value.to_string())
    }
}

pub struct SqliteStore {
    connection: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> LadderResult<SqliteStore> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let connection = Connection::open(path)?;
        info!("Opened progress database: {}", path.display());
        SqliteStore::with_connection(connection)
    }

    pub fn open_in_memory() -> LadderResult<SqliteStore> {
        SqliteStore::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(connection: Connection) -> LadderResult<SqliteStore> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )?;
        Ok(SqliteStore { connection })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> LadderResult<Option<String>> {
        let value = self
            .connection
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> LadderResult<()> {
        self.connection.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete(&self, key: &str) -> LadderResult<()> {
        self.connection
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> LadderResult<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> LadderResult<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> LadderResult<()> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

/// A memory store whose writes to the listed keys fail.
#[cfg(test)]
pub struct ReadOnlyKeys {
    inner: MemoryStore,
    locked: Vec<String>,
}

#[cfg(test)]
impl ReadOnlyKeys {
    pub fn new(locked: &[&str]) -> ReadOnlyKeys {
        ReadOnlyKeys {
            inner: MemoryStore::new(),
            locked: locked.iter().map(|key| key.to_string()).collect(),
        }
    }

    fn check(&self, key: &str) -> LadderResult<()> {
        if self.locked.iter().any(|locked| locked == key) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("{} is read-only", key),
            )
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
impl KeyValueStore for ReadOnlyKeys {
    fn get(&self, key: &str) -> LadderResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> LadderResult<()> {
        self.check(key)?;
        self.inner.set(key, value)
    }

    fn delete(&self, key: &str) -> LadderResult<()> {
        self.check(key)?;
        self.inner.delete(key)
    }
}

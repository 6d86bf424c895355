use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use crate::version::error::CacheError;
use crate::version::state::StateStore;

/// SQLite-backed [`StateStore`].
///
/// One database can hold the state of several apps; each `Cache` reads and
/// writes only the row for its own scope (the bundle identifier).
pub struct Cache {
    conn: Mutex<Connection>,
    scope: String,
}

impl Cache {
    pub fn new(db_path: &Path, scope: &str) -> Result<Self, CacheError> {
        info!("Initializing state database at {:?}", db_path);

        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        Self::with_connection(conn, scope)
    }

    /// Open a private in-memory database
    pub fn in_memory(scope: &str) -> Result<Self, CacheError> {
        Self::with_connection(Connection::open_in_memory()?, scope)
    }

    fn with_connection(conn: Connection, scope: &str) -> Result<Self, CacheError> {
        let cache = Self {
            conn: Mutex::new(conn),
            scope: scope.to_string(),
        };

        cache.create_schema()?;
        debug!("State store ready for scope {}", scope);

        Ok(cache)
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Acquire database connection lock with proper error handling
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, CacheError> {
        self.conn.lock().map_err(|_| CacheError::LockPoisoned)
    }

    fn create_schema(&self) -> Result<(), CacheError> {
        let conn = self.lock_conn()?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS check_state (
                scope TEXT PRIMARY KEY,
                last_check_at INTEGER,
                skipped_version TEXT
            )
            "#,
            [],
        )?;

        Ok(())
    }

    /// Upsert a single column for this scope
    fn write_column(&self, column: &str, value: &dyn rusqlite::ToSql) -> Result<(), CacheError> {
        let conn = self.lock_conn()?;
        let sql = format!(
            r#"
            INSERT INTO check_state (scope, {column})
            VALUES (?1, ?2)
            ON CONFLICT(scope) DO UPDATE SET {column} = excluded.{column}
            "#
        );
        conn.execute(&sql, (&self.scope, value))?;
        Ok(())
    }
}

impl StateStore for Cache {
    fn last_check(&self) -> Result<Option<DateTime<Utc>>, CacheError> {
        let conn = self.lock_conn()?;
        let millis: Option<i64> = conn
            .query_row(
                "SELECT last_check_at FROM check_state WHERE scope = ?1",
                [&self.scope],
                |row| row.get::<_, Option<i64>>(0),
            )
            .optional()?
            .flatten();

        millis
            .map(|ms| DateTime::from_timestamp_millis(ms).ok_or(CacheError::InvalidTimestamp(ms)))
            .transpose()
    }

    fn set_last_check(&self, at: DateTime<Utc>) -> Result<(), CacheError> {
        debug!("Saving last check {} for {}", at, self.scope);
        self.write_column("last_check_at", &at.timestamp_millis())
    }

    fn skipped_version(&self) -> Result<Option<String>, CacheError> {
        let conn = self.lock_conn()?;
        let version = conn
            .query_row(
                "SELECT skipped_version FROM check_state WHERE scope = ?1",
                [&self.scope],
                |row| row.get::<_, Option<String>>(0),
            )
            .optional()?
            .flatten();

        Ok(version)
    }

    fn set_skipped_version(&self, version: &str) -> Result<(), CacheError> {
        debug!("Saving skipped version {} for {}", version, self.scope);
        self.write_column("skipped_version", &version)
    }

    fn clear_skipped_version(&self) -> Result<(), CacheError> {
        let conn = self.lock_conn()?;
        conn.execute(
            "UPDATE check_state SET skipped_version = NULL WHERE scope = ?1",
            [&self.scope],
        )?;
        Ok(())
    }
}

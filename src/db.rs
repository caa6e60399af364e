use std::fs;
use std::path::Path;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use tracing::{debug, info};

use crate::error::{ContactError, Result};
use crate::models::{ContactRecord, RecordId, StoredContact};
use crate::schema::contacts;
use crate::store::{BackendKind, ContactStore};

// Type alias for the database connection pool
pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Default number of pooled connections
pub const DEFAULT_MAX_CONNECTIONS: u32 = 4;

/// Relational contact store backed by a single SQLite table
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Open (or create) the database at `database_url`.
    ///
    /// Accepts a plain path as well as `sqlite:` / `sqlite://` prefixed URLs.
    pub fn new(database_url: &str) -> Result<Self> {
        Self::open(Path::new(database_path(database_url)), DEFAULT_MAX_CONNECTIONS)
    }

    /// Open (or create) the database file at `path` with a bounded pool
    pub fn open(path: &Path, max_connections: u32) -> Result<Self> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(max_connections.max(1)).build(manager)?;

        info!(path = %path.display(), max_connections, "Opened relational contact store");
        Self::from_pool(pool)
    }

    /// Private in-memory database; the pool keeps its single connection alive
    pub fn in_memory() -> Result<Self> {
        let pool = Pool::builder()
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .build(SqliteConnectionManager::memory())?;
        Self::from_pool(pool)
    }

    fn from_pool(pool: DbPool) -> Result<Self> {
        let conn = pool.get()?;
        Self::run_migrations(&conn)?;
        drop(conn);
        Ok(Self { pool })
    }

    /// Run database migrations
    fn run_migrations(conn: &Connection) -> Result<()> {
        conn.execute_batch(include_str!("../migrations/2024-06-01-000000_create_contacts/up.sql"))?;
        Ok(())
    }

    /// Get a connection from the pool
    pub fn get_connection(&self) -> Result<DbConnection> {
        Ok(self.pool.get()?)
    }

    fn select_columns() -> String {
        format!("{}, {}", contacts::ID, contacts::FIELDS.join(", "))
    }

    /// Map a database row to a `StoredContact`
    fn map_contact(row: &Row) -> rusqlite::Result<StoredContact> {
        Ok(StoredContact {
            id: RecordId::Row(row.get(contacts::ID)?),
            record: ContactRecord {
                first_name: row.get(contacts::FIRST_NAME)?,
                last_name: row.get(contacts::LAST_NAME)?,
                date_of_birth: row.get(contacts::DATE_OF_BIRTH)?,
                street_address: row.get(contacts::STREET_ADDRESS)?,
                postal_code: row.get(contacts::POSTAL_CODE)?,
                state_or_province: row.get(contacts::STATE_OR_PROVINCE)?,
                country: row.get(contacts::COUNTRY)?,
                email: row.get(contacts::EMAIL)?,
                phone_number: row.get(contacts::PHONE_NUMBER)?,
                notes: row.get(contacts::NOTES)?,
            },
        })
    }
}

impl ContactStore for Database {
    fn backend(&self) -> BackendKind {
        BackendKind::Relational
    }

    fn insert(&self, record: &ContactRecord) -> Result<StoredContact> {
        let conn = self.get_connection()?;

        let inserted = conn.execute(
            &format!(
                "INSERT INTO {} ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                contacts::TABLE,
                contacts::FIELDS.join(", ")
            ),
            params![
                record.first_name,
                record.last_name,
                record.date_of_birth,
                record.street_address,
                record.postal_code,
                record.state_or_province,
                record.country,
                record.email,
                record.phone_number,
                record.notes,
            ],
        );

        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(ContactError::DuplicateEmail(record.email.clone()));
            }
            Err(e) => return Err(e.into()),
        }

        // Get the last inserted ID
        let id = conn.last_insert_rowid();
        debug!(id, email = %record.email, "Inserted contact row");

        Ok(StoredContact {
            id: RecordId::Row(id),
            record: record.clone(),
        })
    }

    fn list_all(&self) -> Result<Vec<StoredContact>> {
        let conn = self.get_connection()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM {} ORDER BY {} ASC",
            Self::select_columns(),
            contacts::TABLE,
            contacts::ID
        ))?;
        let contact_iter = stmt.query_map(params![], Self::map_contact)?;

        let mut results = Vec::new();
        for contact in contact_iter {
            results.push(contact?);
        }

        Ok(results)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<StoredContact>> {
        let conn = self.get_connection()?;

        let contact = conn
            .query_row(
                &format!(
                    "SELECT {} FROM {} WHERE {} = ?",
                    Self::select_columns(),
                    contacts::TABLE,
                    contacts::EMAIL
                ),
                params![email],
                Self::map_contact,
            )
            .optional()?;

        Ok(contact)
    }

    fn delete_by_email(&self, email: &str) -> Result<usize> {
        let conn = self.get_connection()?;

        let deleted = conn.execute(
            &format!("DELETE FROM {} WHERE {} = ?", contacts::TABLE, contacts::EMAIL),
            params![email],
        )?;
        debug!(email, deleted, "Deleted contact rows");

        Ok(deleted)
    }

    fn count(&self) -> Result<usize> {
        let conn = self.get_connection()?;

        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", contacts::TABLE),
            params![],
            |row| row.get(0),
        )?;

        usize::try_from(total).map_err(|e| ContactError::Other(format!("Invalid row count {total}: {e}")))
    }

    fn clear(&self) -> Result<usize> {
        let conn = self.get_connection()?;
        Ok(conn.execute(&format!("DELETE FROM {}", contacts::TABLE), params![])?)
    }

    fn flush(&self) -> Result<()> {
        // Every statement autocommits.
        Ok(())
    }
}

/// True when `err` is a violation of a `UNIQUE` constraint
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Strip an optional `sqlite:` / `sqlite://` scheme from a database URL
fn database_path(database_url: &str) -> &str {
    database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_path_strips_scheme() {
        assert_eq!(database_path("sqlite://data/contacts.db"), "data/contacts.db");
        assert_eq!(database_path("sqlite:contacts.db"), "contacts.db");
        assert_eq!(database_path("contacts.db"), "contacts.db");
    }

    #[test]
    fn test_in_memory_database_survives_connection_reuse() {
        let db = Database::in_memory().unwrap();
        db.insert(&ContactRecord {
            email: "a@example.com".to_string(),
            ..ContactRecord::default()
        })
        .unwrap();
        assert_eq!(db.count().unwrap(), 1);
        assert_eq!(db.list_all().unwrap().len(), 1);
    }
}

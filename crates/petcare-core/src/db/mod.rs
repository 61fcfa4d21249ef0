//! Database layer for petcare.

mod schema;
mod accounts;
mod appointments;
mod clinics;
mod pets;

pub use schema::*;
#[allow(unused_imports)]
pub use accounts::*;
#[allow(unused_imports)]
pub use appointments::*;
#[allow(unused_imports)]
pub use clinics::*;
#[allow(unused_imports)]
pub use pets::*;

use rusqlite::{Connection, ErrorCode, Transaction, TransactionBehavior};
use std::path::Path;
use thiserror::Error;

/// Message raised by the appointment overlap triggers.
pub(crate) const OVERLAP_MESSAGE: &str = "appointment overlaps an existing booking";

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Overlapping appointment for vet {0}")]
    Overlap(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Run `f` inside a `BEGIN IMMEDIATE` transaction.
    ///
    /// The write lock is taken up front, so a read-then-write sequence in `f`
    /// cannot interleave with another writer. Commits on `Ok`, rolls back on
    /// `Err`.
    pub fn immediate<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<DbError>,
    {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)
            .map_err(DbError::from)?;
        let value = f(self)?;
        tx.commit().map_err(DbError::from)?;
        Ok(value)
    }
}

/// Classify a failed write, surfacing constraint and overlap violations.
pub(crate) fn classify_write_error(err: rusqlite::Error, vet_id: Option<&str>) -> DbError {
    if err.sqlite_error_code() != Some(ErrorCode::ConstraintViolation) {
        return DbError::Sqlite(err);
    }
    let message = err.to_string();
    if message.contains(OVERLAP_MESSAGE) {
        DbError::Overlap(vet_id.unwrap_or_default().to_string())
    } else {
        DbError::Constraint(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_schema_initialized() {
        let db = Database::open_in_memory().unwrap();

        let tables: Vec<String> = db
            .conn()
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"accounts".to_string()));
        assert!(tables.contains(&"api_tokens".to_string()));
        assert!(tables.contains(&"clinics".to_string()));
        assert!(tables.contains(&"clinic_members".to_string()));
        assert!(tables.contains(&"pets".to_string()));
        assert!(tables.contains(&"appointments".to_string()));
    }

    #[test]
    fn test_open_on_disk_reopens_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("petcare.db");

        Database::open(&path).unwrap();
        // Second open must tolerate the existing schema
        let db = Database::open(&path).unwrap();
        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM appointments", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_immediate_rolls_back_on_error() {
        let db = Database::open_in_memory().unwrap();

        let result: Result<(), DbError> = db.immediate(|db| {
            db.conn().execute(
                "INSERT INTO accounts (id, name, email, kind) VALUES ('a1', 'A', 'a@x.io', 'VET')",
                [],
            )?;
            Err(DbError::NotFound("forced".into()))
        });
        assert!(result.is_err());

        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_immediate_rolls_back_on_panic() {
        let db = Database::open_in_memory().unwrap();

        let unwound = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _: Result<(), DbError> = db.immediate(|db| {
                db.conn().execute(
                    "INSERT INTO accounts (id, name, email, kind) VALUES ('a1', 'A', 'a@x.io', 'VET')",
                    [],
                )?;
                panic!("bug inside transaction");
            });
        }));
        assert!(unwound.is_err());

        // Connection is out of the transaction and usable again
        let result: Result<(), DbError> = db.immediate(|_| Ok(()));
        assert!(result.is_ok());
        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}

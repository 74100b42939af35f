//! SQLite storage for tasks.
//!
//! [`Database`] is synchronous and owns one connection. Async callers go
//! through [`SqliteRepository`](crate::repository::SqliteRepository), which
//! opens a fresh `Database` per operation on the blocking pool.

use std::path::Path;

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod migrations;
pub mod task_queries;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Opens (creating if needed) the database at `path` and brings the
    /// schema up to date.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}

//! Database schema initialization and migrations.

use crate::error::{DatabaseResultExt, Result};

impl super::Database {
    /// Initializes the database schema using the embedded SQL file.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        self.connection
            .execute("PRAGMA foreign_keys = ON", [])
            .db_context("Failed to enable foreign keys")?;

        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        self.apply_migrations()?;

        Ok(())
    }

    /// Brings databases created before outcomes and postponement links up
    /// to date.
    fn apply_migrations(&self) -> Result<()> {
        for (column, definition) in [
            ("outcome", "outcome TEXT"),
            ("postponed_from", "postponed_from INTEGER REFERENCES tasks(id)"),
        ] {
            if !self.has_column("tasks", column) {
                self.connection
                    .execute(&format!("ALTER TABLE tasks ADD COLUMN {definition}"), [])
                    .db_context("Failed to add column to tasks table")?;
            }
        }

        Ok(())
    }

    fn has_column(&self, table: &str, column: &str) -> bool {
        self.connection
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
                [table, column],
                |row| row.get(0),
            )
            .map(|count: i64| count > 0)
            .unwrap_or(false)
    }
}

/// Connection Management Module
///
/// This module owns the single SQLite connection the application uses for
/// its whole lifetime.

use super::schema::apply_schema;
use crate::core::{EmptrackError, Result};
use rusqlite::Connection;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Path that selects an in-memory database instead of a file
pub const MEMORY_PATH: &str = ":memory:";

/// Owner of the one long-lived database connection.
///
/// The gateway is constructed once by `main` and lent to the dispatcher.
/// The connection is released exactly once: by an explicit `close`, or by
/// `Drop` on any path that never reached it.
#[derive(Debug)]
pub struct Gateway {
    /// Active database connection (None once closed)
    connection: Option<Connection>,
    /// Path to the database file (None for in-memory databases)
    path: Option<String>,
}

impl Gateway {
    /// Opens the database at `db_path`, enables foreign keys and applies the
    /// schema.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the SQLite database file, or ":memory:" for an
    ///   in-memory database
    ///
    /// # Errors
    ///
    /// `EmptrackError::Database` when the file cannot be opened or the schema
    /// cannot be applied.
    pub fn open(db_path: &str) -> Result<Self> {
        let started_at = Instant::now();
        info!("Opening database: {}", db_path);

        let conn = Connection::open(db_path).map_err(|e| {
            error!("Failed to open database {}: {}", db_path, e);
            EmptrackError::Database(e)
        })?;
        bootstrap(&conn)?;

        debug!(
            "Database {} ready in {}ms",
            db_path,
            started_at.elapsed().as_millis()
        );
        Ok(Gateway {
            connection: Some(conn),
            path: if db_path != MEMORY_PATH {
                Some(db_path.to_string())
            } else {
                None
            },
        })
    }

    /// Opens a fresh in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::open(MEMORY_PATH)
    }

    /// Borrows the open connection.
    ///
    /// # Errors
    ///
    /// `EmptrackError::Closed` once `close` has run.
    pub fn connection(&self) -> Result<&Connection> {
        self.connection.as_ref().ok_or(EmptrackError::Closed)
    }

    /// Checks if the connection is still open
    pub fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    /// Gets the database path (None for in-memory databases)
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Closes the connection.
    ///
    /// Returns `true` if this call released the connection and `false` if it
    /// was already closed, so a second call is a harmless no-op.
    pub fn close(&mut self) -> Result<bool> {
        match self.connection.take() {
            Some(conn) => {
                conn.close().map_err(|(_, e)| {
                    error!("Failed to close database: {}", e);
                    EmptrackError::Database(e)
                })?;
                info!("Database connection closed");
                Ok(true)
            }
            None => {
                debug!("Close requested on an already closed gateway");
                Ok(false)
            }
        }
    }
}

impl Drop for Gateway {
    fn drop(&mut self) {
        if self.is_open() {
            warn!("Gateway dropped while open, closing connection");
            if let Err(e) = self.close() {
                error!("Error while closing database on drop: {}", e);
            }
        }
    }
}

fn bootstrap(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    apply_schema(conn)
}

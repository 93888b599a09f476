//! In-memory SQLite store for daily minimum-temperature history.
//!
//! Loads a `Fecha,Tmin` CSV into an in-memory SQLite database and exposes
//! typed query methods. [`Database`] implements
//! [`frost_core::HistoricalStore`], so the forecast engine can read from it
//! directly.
//!
//! # Usage
//!
//! ```rust
//! use frost_db::Database;
//!
//! let db = Database::new().unwrap();
//! db.load_history("Fecha,Tmin\n2024-01-01,3.4\n2024-01-02,-0.6\n").unwrap();
//!
//! let stats = db.query_summary_statistics(0.0).unwrap();
//! assert_eq!(stats.total_records, 2);
//! assert_eq!(stats.frost_days, 1);
//! ```
//!
//! # Tables
//!
//! See [`schema::create_schema`] for the SQL schema.

pub mod schema;
mod loader;
mod queries;
mod store;
pub mod models;

use rusqlite::Connection;
use std::cell::RefCell;
use std::rc::Rc;

/// In-memory SQLite database holding one municipality's daily history.
///
/// Cheaply cloneable (via `Rc`); clones share the same connection. Meant
/// for single-threaded use.
#[derive(Clone)]
pub struct Database {
    conn: Rc<RefCell<Connection>>,
}

impl Database {
    /// Create a new in-memory database with the schema applied.
    ///
    /// The database is empty after creation; use
    /// [`load_history`](Self::load_history) to populate it.
    pub fn new() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }

    /// Create a database and load a history CSV into it.
    pub fn from_csv(csv_data: &str) -> anyhow::Result<Self> {
        let db = Self::new()?;
        db.load_history(csv_data)?;
        Ok(db)
    }
}

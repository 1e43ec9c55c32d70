// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the market participant registry.
//!
//! This crate implements every storage contract of the core crate on
//! Diesel over `SQLite`: aggregate repositories, the grid area reservation
//! ledger, the audit log and the domain event and email outboxes.
//!
//! ## Units of Work
//!
//! [`Persistence`] is a [`UnitOfWorkProvider`]. Each unit of work is a
//! `BEGIN IMMEDIATE` transaction on the adapter's connection; writers on
//! other connections wait for it (up to the busy timeout) instead of
//! interleaving. Dropping a unit of work without committing rolls it back.
//!
//! ## Reservation Ledger
//!
//! Reservations live in their own table keyed by (function, grid area).
//! `try_reserve` is a single `INSERT ... ON CONFLICT DO NOTHING`, so the
//! key decides between concurrent reservations for the same pair.
//!
//! ## Migrations
//!
//! The schema is embedded from `migrations/` and applied whenever a
//! database is opened.
//!
//! ## Testing
//!
//! Tests run against unique shared-cache in-memory databases created by
//! [`Persistence::new_in_memory`].

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod unit_of_work;

#[cfg(test)]
mod tests;

use diesel::SqliteConnection;
use mp_registry::{StoreError, UnitOfWorkProvider};
use mp_registry_domain::{ActorId, EicFunction, GridAreaId};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

pub use data_models::{OutboxDomainEvent, OutboxEmailEvent};
pub use error::PersistenceError;
pub use unit_of_work::SqliteUnitOfWork;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter owning one `SQLite` connection.
pub struct Persistence {
    conn: SqliteConnection,
    database_url: String,
}

impl Persistence {
    /// Creates a new persistence adapter with a shared-cache in-memory database.
    ///
    /// The database lives as long as at least one connection to it is open.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let database_url: String = format!("file:memdb_registry_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&database_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn, database_url })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let database_url: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(database_url)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        info!(database = database_url, "Opened registry database");
        Ok(Self {
            conn,
            database_url: database_url.to_string(),
        })
    }

    /// Opens a second, independent connection to the same database.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be opened.
    pub fn new_connection(&self) -> Result<Self, PersistenceError> {
        let mut conn: SqliteConnection = backend::sqlite::establish(&self.database_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            database_url: self.database_url.clone(),
        })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    /// Applies any migrations not yet recorded in the database.
    ///
    /// # Errors
    ///
    /// Returns an error if a migration fails.
    pub fn run_migrations(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::run_migrations(&mut self.conn)
    }

    /// Domain events not yet dispatched, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a payload cannot be decoded.
    pub fn pending_domain_events(&mut self) -> Result<Vec<OutboxDomainEvent>, PersistenceError> {
        queries::pending_domain_events(&mut self.conn)
    }

    /// Emails not yet dispatched, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored value is invalid.
    pub fn pending_email_events(&mut self) -> Result<Vec<OutboxEmailEvent>, PersistenceError> {
        queries::pending_email_events(&mut self.conn)
    }

    /// Returns the actor currently holding a (function, grid area) reservation.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn reservation_holder(
        &mut self,
        function: EicFunction,
        grid_area_id: GridAreaId,
    ) -> Result<Option<ActorId>, PersistenceError> {
        queries::get_reservation_holder(&mut self.conn, function, grid_area_id)
    }
}

impl UnitOfWorkProvider for Persistence {
    type UnitOfWork<'a> = SqliteUnitOfWork<'a>;

    fn begin(&mut self) -> Result<SqliteUnitOfWork<'_>, StoreError> {
        Ok(SqliteUnitOfWork::begin(&mut self.conn)?)
    }
}

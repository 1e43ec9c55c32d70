// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use mp_registry_audit::{AuditLogEntry, AuditedChange};
use tracing::debug;

use crate::data_models::NewAuditLogRow;
use crate::diesel_schema::audit_log;
use crate::error::PersistenceError;

/// Appends an audit log entry. Entries are never updated or deleted.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `entry` - The entry to append
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn insert_audit_log_entry<C: AuditedChange>(
    conn: &mut SqliteConnection,
    entry: &AuditLogEntry<C>,
) -> Result<(), PersistenceError> {
    let row: NewAuditLogRow = NewAuditLogRow::from_entry(entry)?;
    diesel::insert_into(audit_log::table)
        .values(&row)
        .execute(conn)?;

    debug!(
        kind = %row.kind,
        subject = %row.subject,
        change = %row.change,
        changed_by = %row.changed_by,
        "Inserted audit log entry"
    );
    Ok(())
}

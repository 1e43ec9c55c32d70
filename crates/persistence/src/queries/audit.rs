// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use mp_registry_audit::{AuditLogEntry, AuditedChange};
use tracing::debug;

use crate::data_models::AuditLogRow;
use crate::diesel_schema::audit_log;
use crate::error::PersistenceError;

/// Retrieves the audit log of one subject in insertion order.
///
/// Only entries of the change catalogue's own kind are returned, so an
/// actor's `Actor` log and its `ActorConsolidation` log stay separate.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `subject` - The audited entity
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is invalid.
pub fn get_audit_log_entries<C: AuditedChange>(
    conn: &mut SqliteConnection,
    subject: C::Subject,
) -> Result<Vec<AuditLogEntry<C>>, PersistenceError> {
    debug!(kind = %C::KIND, subject = %subject, "Loading audit log entries");

    let rows: Vec<AuditLogRow> = audit_log::table
        .filter(audit_log::kind.eq(C::KIND.as_str()))
        .filter(audit_log::subject.eq(subject.to_string()))
        .order(audit_log::entry_id.asc())
        .select(AuditLogRow::as_select())
        .load(conn)?;

    rows.into_iter().map(AuditLogRow::into_entry).collect()
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use mp_registry_domain::{
    MessageDelegation, MessageDelegationId, ProcessDelegation, ProcessDelegationId,
};
use tracing::debug;

use crate::data_models::{
    MessageDelegationPeriodRow, MessageDelegationRow, ProcessDelegationPeriodRow,
    ProcessDelegationRow,
};
use crate::diesel_schema::{
    message_delegation_periods, message_delegations, process_delegation_periods,
    process_delegations,
};
use crate::error::PersistenceError;

/// Inserts or updates a message delegation and replaces its periods.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn upsert_message_delegation(
    conn: &mut SqliteConnection,
    delegation: &MessageDelegation,
) -> Result<MessageDelegationId, PersistenceError> {
    let row: MessageDelegationRow = MessageDelegationRow {
        id: delegation.id().to_string(),
        delegated_by: delegation.delegated_by().to_string(),
        message_type: delegation.subject().to_string(),
    };
    diesel::insert_into(message_delegations::table)
        .values(&row)
        .on_conflict(message_delegations::id)
        .do_update()
        .set(&row)
        .execute(conn)?;

    diesel::delete(
        message_delegation_periods::table
            .filter(message_delegation_periods::delegation_id.eq(&row.id)),
    )
    .execute(conn)?;
    let periods: Vec<MessageDelegationPeriodRow> =
        MessageDelegationPeriodRow::from_domain(row.id.clone(), delegation.periods())?;
    if !periods.is_empty() {
        diesel::insert_into(message_delegation_periods::table)
            .values(&periods)
            .execute(conn)?;
    }

    debug!(
        delegation_id = %delegation.id(),
        message_type = %delegation.subject(),
        periods = periods.len(),
        "Saved message delegation"
    );
    Ok(delegation.id())
}

/// Inserts or updates a process delegation and replaces its periods.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn upsert_process_delegation(
    conn: &mut SqliteConnection,
    delegation: &ProcessDelegation,
) -> Result<ProcessDelegationId, PersistenceError> {
    let row: ProcessDelegationRow = ProcessDelegationRow {
        id: delegation.id().to_string(),
        delegated_by: delegation.delegated_by().to_string(),
        process: delegation.subject().to_string(),
    };
    diesel::insert_into(process_delegations::table)
        .values(&row)
        .on_conflict(process_delegations::id)
        .do_update()
        .set(&row)
        .execute(conn)?;

    diesel::delete(
        process_delegation_periods::table
            .filter(process_delegation_periods::delegation_id.eq(&row.id)),
    )
    .execute(conn)?;
    let periods: Vec<ProcessDelegationPeriodRow> =
        ProcessDelegationPeriodRow::from_domain(row.id.clone(), delegation.periods())?;
    if !periods.is_empty() {
        diesel::insert_into(process_delegation_periods::table)
            .values(&periods)
            .execute(conn)?;
    }

    debug!(
        delegation_id = %delegation.id(),
        process = %delegation.subject(),
        periods = periods.len(),
        "Saved process delegation"
    );
    Ok(delegation.id())
}

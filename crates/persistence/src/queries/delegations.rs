// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use mp_registry_domain::{
    ActorId, DelegatedProcess, DelegationMessageType, DelegationPeriod, MessageDelegation,
    MessageDelegationId, ProcessDelegation, ProcessDelegationId,
};

use crate::data_models::{
    MessageDelegationPeriodRow, MessageDelegationRow, ProcessDelegationPeriodRow,
    ProcessDelegationRow, parse_stored,
};
use crate::diesel_schema::{
    message_delegation_periods, message_delegations, process_delegation_periods,
    process_delegations,
};
use crate::error::PersistenceError;

fn load_message_delegation(
    conn: &mut SqliteConnection,
    row: MessageDelegationRow,
) -> Result<MessageDelegation, PersistenceError> {
    const TABLE: &str = "message_delegations";
    let periods: Vec<DelegationPeriod> = message_delegation_periods::table
        .filter(message_delegation_periods::delegation_id.eq(&row.id))
        .order(message_delegation_periods::position.asc())
        .select(MessageDelegationPeriodRow::as_select())
        .load(conn)?
        .into_iter()
        .map(MessageDelegationPeriodRow::into_domain)
        .collect::<Result<_, _>>()?;

    Ok(MessageDelegation::with_id(
        parse_stored(TABLE, &row.id)?,
        parse_stored(TABLE, &row.delegated_by)?,
        parse_stored(TABLE, &row.message_type)?,
        periods,
    ))
}

fn load_process_delegation(
    conn: &mut SqliteConnection,
    row: ProcessDelegationRow,
) -> Result<ProcessDelegation, PersistenceError> {
    const TABLE: &str = "process_delegations";
    let periods: Vec<DelegationPeriod> = process_delegation_periods::table
        .filter(process_delegation_periods::delegation_id.eq(&row.id))
        .order(process_delegation_periods::position.asc())
        .select(ProcessDelegationPeriodRow::as_select())
        .load(conn)?
        .into_iter()
        .map(ProcessDelegationPeriodRow::into_domain)
        .collect::<Result<_, _>>()?;

    Ok(ProcessDelegation::with_id(
        parse_stored(TABLE, &row.id)?,
        parse_stored(TABLE, &row.delegated_by)?,
        parse_stored(TABLE, &row.process)?,
        periods,
    ))
}

/// Retrieves a message delegation with its periods.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is invalid.
/// Returns `Ok(None)` if the delegation does not exist.
pub fn get_message_delegation(
    conn: &mut SqliteConnection,
    id: MessageDelegationId,
) -> Result<Option<MessageDelegation>, PersistenceError> {
    let result: Result<MessageDelegationRow, diesel::result::Error> = message_delegations::table
        .filter(message_delegations::id.eq(id.to_string()))
        .select(MessageDelegationRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(load_message_delegation(conn, row)?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Retrieves the delegation of `message_type` made by `delegated_by`.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is invalid.
/// Returns `Ok(None)` if the actor has not delegated the message type.
pub fn get_message_delegation_for(
    conn: &mut SqliteConnection,
    delegated_by: ActorId,
    message_type: DelegationMessageType,
) -> Result<Option<MessageDelegation>, PersistenceError> {
    let result: Result<MessageDelegationRow, diesel::result::Error> = message_delegations::table
        .filter(message_delegations::delegated_by.eq(delegated_by.to_string()))
        .filter(message_delegations::message_type.eq(message_type.as_str()))
        .select(MessageDelegationRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(load_message_delegation(conn, row)?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Retrieves a process delegation with its periods.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is invalid.
/// Returns `Ok(None)` if the delegation does not exist.
pub fn get_process_delegation(
    conn: &mut SqliteConnection,
    id: ProcessDelegationId,
) -> Result<Option<ProcessDelegation>, PersistenceError> {
    let result: Result<ProcessDelegationRow, diesel::result::Error> = process_delegations::table
        .filter(process_delegations::id.eq(id.to_string()))
        .select(ProcessDelegationRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(load_process_delegation(conn, row)?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Retrieves the delegation of `process` made by `delegated_by`.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is invalid.
/// Returns `Ok(None)` if the actor has not delegated the process.
pub fn get_process_delegation_for(
    conn: &mut SqliteConnection,
    delegated_by: ActorId,
    process: DelegatedProcess,
) -> Result<Option<ProcessDelegation>, PersistenceError> {
    let result: Result<ProcessDelegationRow, diesel::result::Error> = process_delegations::table
        .filter(process_delegations::delegated_by.eq(delegated_by.to_string()))
        .filter(process_delegations::process.eq(process.as_str()))
        .select(ProcessDelegationRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(load_process_delegation(conn, row)?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

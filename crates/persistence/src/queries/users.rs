// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use mp_registry_domain::{ExternalUserId, User, UserId, UserRoleId};

use crate::data_models::{UserRoleAssignmentRow, UserRow};
use crate::diesel_schema::{user_role_assignments, users};
use crate::error::PersistenceError;

fn load_user(conn: &mut SqliteConnection, row: UserRow) -> Result<User, PersistenceError> {
    let assignments: Vec<UserRoleAssignmentRow> = user_role_assignments::table
        .filter(user_role_assignments::user_id.eq(&row.id))
        .select(UserRoleAssignmentRow::as_select())
        .load(conn)?;

    row.into_domain(assignments)
}

fn first_user(
    conn: &mut SqliteConnection,
    result: Result<UserRow, diesel::result::Error>,
) -> Result<Option<User>, PersistenceError> {
    match result {
        Ok(row) => Ok(Some(load_user(conn, row)?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Retrieves a user with its role assignments.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is invalid.
/// Returns `Ok(None)` if the user does not exist.
pub fn get_user(conn: &mut SqliteConnection, id: UserId) -> Result<Option<User>, PersistenceError> {
    let result: Result<UserRow, diesel::result::Error> = users::table
        .filter(users::id.eq(id.to_string()))
        .select(UserRow::as_select())
        .first(conn);

    first_user(conn, result)
}

/// Retrieves the user linked to an external directory identity.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is invalid.
/// Returns `Ok(None)` if no user is linked to the identity.
pub fn get_user_by_external_id(
    conn: &mut SqliteConnection,
    external_id: ExternalUserId,
) -> Result<Option<User>, PersistenceError> {
    let result: Result<UserRow, diesel::result::Error> = users::table
        .filter(users::external_id.eq(external_id.to_string()))
        .select(UserRow::as_select())
        .first(conn);

    first_user(conn, result)
}

/// Retrieves every user holding the role for any actor.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is invalid.
pub fn get_users_with_role(
    conn: &mut SqliteConnection,
    user_role_id: UserRoleId,
) -> Result<Vec<User>, PersistenceError> {
    let holders = user_role_assignments::table
        .filter(user_role_assignments::user_role_id.eq(user_role_id.to_string()))
        .select(user_role_assignments::user_id);

    let rows: Vec<UserRow> = users::table
        .filter(users::id.eq_any(holders))
        .order(users::id.asc())
        .select(UserRow::as_select())
        .load(conn)?;

    rows.into_iter().map(|row| load_user(conn, row)).collect()
}

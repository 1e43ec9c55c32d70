// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use mp_registry_domain::{UserRole, UserRoleId};

use crate::data_models::{UserRolePermissionRow, UserRoleRow};
use crate::diesel_schema::{user_role_permissions, user_roles};
use crate::error::PersistenceError;

fn load_user_role(
    conn: &mut SqliteConnection,
    row: UserRoleRow,
) -> Result<UserRole, PersistenceError> {
    let permissions: Vec<UserRolePermissionRow> = user_role_permissions::table
        .filter(user_role_permissions::user_role_id.eq(&row.id))
        .select(UserRolePermissionRow::as_select())
        .load(conn)?;

    row.into_domain(permissions)
}

/// Retrieves a user role with its permissions.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is invalid.
/// Returns `Ok(None)` if the user role does not exist.
pub fn get_user_role(
    conn: &mut SqliteConnection,
    id: UserRoleId,
) -> Result<Option<UserRole>, PersistenceError> {
    let result: Result<UserRoleRow, diesel::result::Error> = user_roles::table
        .filter(user_roles::id.eq(id.to_string()))
        .select(UserRoleRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(load_user_role(conn, row)?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Retrieves every user role, ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is invalid.
pub fn get_user_roles(conn: &mut SqliteConnection) -> Result<Vec<UserRole>, PersistenceError> {
    let rows: Vec<UserRoleRow> = user_roles::table
        .order((user_roles::name.asc(), user_roles::id.asc()))
        .select(UserRoleRow::as_select())
        .load(conn)?;

    rows.into_iter()
        .map(|row| load_user_role(conn, row))
        .collect()
}

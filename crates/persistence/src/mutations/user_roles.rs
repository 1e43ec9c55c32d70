// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use mp_registry_domain::{UserRole, UserRoleId};
use tracing::debug;

use crate::data_models::{UserRolePermissionRow, UserRoleRow};
use crate::diesel_schema::{user_role_permissions, user_roles};
use crate::error::PersistenceError;

/// Inserts or updates a user role and replaces its permissions.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn upsert_user_role(
    conn: &mut SqliteConnection,
    user_role: &UserRole,
) -> Result<UserRoleId, PersistenceError> {
    let row: UserRoleRow = UserRoleRow::from_domain(user_role);
    diesel::insert_into(user_roles::table)
        .values(&row)
        .on_conflict(user_roles::id)
        .do_update()
        .set(&row)
        .execute(conn)?;

    diesel::delete(
        user_role_permissions::table.filter(user_role_permissions::user_role_id.eq(&row.id)),
    )
    .execute(conn)?;
    let permissions: Vec<UserRolePermissionRow> = UserRoleRow::permission_rows(user_role);
    if !permissions.is_empty() {
        diesel::insert_into(user_role_permissions::table)
            .values(&permissions)
            .execute(conn)?;
    }

    debug!(
        user_role_id = %user_role.id(),
        status = %user_role.status(),
        permissions = permissions.len(),
        "Saved user role"
    );
    Ok(user_role.id())
}

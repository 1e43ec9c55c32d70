// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use mp_registry_domain::{User, UserId};
use tracing::debug;

use crate::data_models::{UserRoleAssignmentRow, UserRow};
use crate::diesel_schema::{user_role_assignments, users};
use crate::error::PersistenceError;

/// Inserts or updates a user and replaces its role assignments.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn upsert_user(conn: &mut SqliteConnection, user: &User) -> Result<UserId, PersistenceError> {
    let row: UserRow = UserRow::from_domain(user)?;
    diesel::insert_into(users::table)
        .values(&row)
        .on_conflict(users::id)
        .do_update()
        .set(&row)
        .execute(conn)?;

    diesel::delete(user_role_assignments::table.filter(user_role_assignments::user_id.eq(&row.id)))
        .execute(conn)?;
    let assignments: Vec<UserRoleAssignmentRow> = UserRow::assignment_rows(user);
    if !assignments.is_empty() {
        diesel::insert_into(user_role_assignments::table)
            .values(&assignments)
            .execute(conn)?;
    }

    debug!(user_id = %user.id(), assignments = assignments.len(), "Saved user");
    Ok(user.id())
}

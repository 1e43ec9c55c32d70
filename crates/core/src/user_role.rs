// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::audit_log::{assignment_value, record};
use crate::error::CoreError;
use crate::invitation::assignments_changed;
use crate::lookup::load_user_role;
use crate::repository::Store;
use crate::rules::ensure_required_permissions_kept;
use mp_registry_audit::{
    ChangedBy, PermissionAuditLogEntry, PermissionAuditedChange, UserRoleAssignmentAuditLogEntry,
    UserRoleAssignmentAuditedChange, UserRoleAuditLogEntry, UserRoleAuditedChange,
};
use mp_registry_domain::{
    ActorId, EicFunction, Permission, User, UserRole, UserRoleAssignment, UserRoleId,
};
use std::collections::{BTreeMap, BTreeSet};
use time::OffsetDateTime;
use tracing::{debug, info};

/// Data for a new user role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserRole {
    pub name: String,
    pub description: Option<String>,
    pub eic_function: EicFunction,
    pub permissions: BTreeSet<Permission>,
}

/// Creates an active user role.
///
/// # Errors
///
/// Returns `CoreError::Validation` for a blank name or a permission that
/// cannot be granted to the role's function.
pub fn create_user_role<S: Store + ?Sized>(
    store: &mut S,
    new_user_role: NewUserRole,
    changed_by: ChangedBy,
    now: OffsetDateTime,
) -> Result<UserRoleId, CoreError> {
    let user_role: UserRole = UserRole::new(
        &new_user_role.name,
        new_user_role.description,
        new_user_role.eic_function,
        new_user_role.permissions,
    )?;
    let user_role_id: UserRoleId = store.add_or_update_user_role(&user_role)?;

    record(
        store,
        UserRoleAuditLogEntry::new(user_role_id, UserRoleAuditedChange::Created, changed_by, now)
            .with_current(user_role.name()),
    )?;
    for permission in user_role.permissions() {
        record(
            store,
            PermissionAuditLogEntry::new(
                *permission,
                PermissionAuditedChange::AssignedToUserRole,
                changed_by,
                now,
            )
            .with_current(user_role_id.to_string()),
        )?;
    }

    info!(%user_role_id, name = user_role.name(), "Created user role");
    Ok(user_role_id)
}

/// Replaces a user role's permissions.
///
/// # Errors
///
/// Returns `CoreError::NotFound` for an unknown role and
/// `CoreError::Validation` if a permission is not assignable to the role's
/// function or a required permission would no longer be granted by any
/// active role while the role is in use.
pub fn update_user_role_permissions<S: Store + ?Sized>(
    store: &mut S,
    user_role_id: UserRoleId,
    permissions: BTreeSet<Permission>,
    changed_by: ChangedBy,
    now: OffsetDateTime,
) -> Result<(), CoreError> {
    let before: UserRole = load_user_role(store, user_role_id)?;
    let mut after: UserRole = before.clone();
    after.set_permissions(permissions)?;
    if after == before {
        return Ok(());
    }

    ensure_required_permissions_kept(store, &before, &after)?;
    store.add_or_update_user_role(&after)?;

    record(
        store,
        UserRoleAuditLogEntry::new(
            user_role_id,
            UserRoleAuditedChange::Permissions,
            changed_by,
            now,
        )
        .with_current(permissions_value(after.permissions()))
        .with_previous(permissions_value(before.permissions())),
    )?;

    let added = after.permissions().difference(before.permissions());
    let removed = before.permissions().difference(after.permissions());
    let changes = added
        .map(|permission| (*permission, PermissionAuditedChange::AssignedToUserRole))
        .chain(removed.map(|permission| {
            (*permission, PermissionAuditedChange::RemovedFromUserRole)
        }));
    for (permission, change) in changes {
        record(
            store,
            PermissionAuditLogEntry::new(permission, change, changed_by, now)
                .with_current(user_role_id.to_string()),
        )?;
    }

    info!(%user_role_id, "Updated user role permissions");
    Ok(())
}

/// Deactivates a user role and removes it from every user holding it.
///
/// Each removed assignment is audited against its user, and every affected
/// user gets one `UserRoleAssignmentsChanged` event per actor.
///
/// # Errors
///
/// Returns `CoreError::NotFound` for an unknown role and
/// `CoreError::Validation` if the role is the last active grant of a
/// required permission while in use.
pub fn deactivate_user_role<S: Store + ?Sized>(
    store: &mut S,
    user_role_id: UserRoleId,
    changed_by: ChangedBy,
    now: OffsetDateTime,
) -> Result<(), CoreError> {
    let before: UserRole = load_user_role(store, user_role_id)?;
    if !before.is_active() {
        debug!(%user_role_id, "User role is already inactive");
        return Ok(());
    }

    let mut after: UserRole = before.clone();
    after.deactivate();
    ensure_required_permissions_kept(store, &before, &after)?;
    store.add_or_update_user_role(&after)?;

    record(
        store,
        UserRoleAuditLogEntry::new(user_role_id, UserRoleAuditedChange::Status, changed_by, now)
            .with_current(after.status().as_str())
            .with_previous(before.status().as_str()),
    )?;

    let holders: Vec<User> = store.get_users_with_role(user_role_id)?;
    for mut user in holders {
        let removed: Vec<UserRoleAssignment> = user.remove_role(user_role_id);
        store.add_or_update_user(&user)?;
        for assignment in &removed {
            record(
                store,
                UserRoleAssignmentAuditLogEntry::new(
                    user.id(),
                    UserRoleAssignmentAuditedChange::Removed,
                    changed_by,
                    now,
                )
                .with_previous(assignment_value(assignment)?),
            )?;
        }

        let mut removed_by_actor: BTreeMap<ActorId, Vec<UserRoleAssignment>> = BTreeMap::new();
        for assignment in removed.iter().copied() {
            removed_by_actor
                .entry(assignment.actor_id)
                .or_default()
                .push(assignment);
        }
        for (actor_id, assignments) in &removed_by_actor {
            let event = assignments_changed(&user, *actor_id, &[], assignments);
            store.enqueue_domain_event(&event)?;
        }
        debug!(
            user_id = %user.id(),
            removed = removed.len(),
            "Removed deactivated role from user"
        );
    }

    info!(%user_role_id, "Deactivated user role");
    Ok(())
}

fn permissions_value(permissions: &BTreeSet<Permission>) -> String {
    permissions
        .iter()
        .map(Permission::as_str)
        .collect::<Vec<&str>>()
        .join(",")
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::audit_log::{assignment_value, record};
use crate::error::CoreError;
use crate::lookup::{load_actor, load_organization, load_user, load_user_role};
use crate::repository::{ExternalIdentityProvider, Store};
use crate::rules::ensure_email_in_organization_domain;
use mp_registry_audit::{
    ChangedBy, UserInviteAuditLogEntry, UserInviteAuditedChange, UserRoleAssignmentAuditLogEntry,
    UserRoleAssignmentAuditedChange,
};
use mp_registry_domain::{
    Actor, ActorId, DomainError, DomainEvent, EmailEvent, EmailTemplate, ExternalUserId,
    Organization, User, UserId, UserInvitation, UserRole, UserRoleAssignment, UserRoleId,
};
use std::collections::BTreeSet;
use time::OffsetDateTime;
use tracing::{debug, info};

/// Invites a person to act for an actor with the requested user roles.
///
/// The directory identity and the local user are reused when they already
/// exist. Requested assignments the user lacks are added, one audit entry
/// each; assignments the user already has are left alone. An invitation
/// email is always enqueued.
///
/// # Errors
///
/// Returns `CoreError::NotFound` for an unknown actor, organization or user
/// role and `CoreError::Validation` if the email is outside the
/// organization's domains or a role is inactive or for another function.
/// Nothing is written when validation fails.
pub fn invite_user<S, D>(
    store: &mut S,
    directory: &mut D,
    invitation: &UserInvitation,
    invited_by: UserId,
    now: OffsetDateTime,
) -> Result<UserId, CoreError>
where
    S: Store + ?Sized,
    D: ExternalIdentityProvider + ?Sized,
{
    let actor: Actor = load_actor(store, invitation.assigned_actor)?;
    let organization: Organization = load_organization(store, actor.organization_id())?;
    ensure_email_in_organization_domain(&invitation.email, &organization)?;
    ensure_roles_assignable(store, &actor, &invitation.assigned_roles)?;

    let external_id: ExternalUserId =
        match directory.find_user_identity_by_email(&invitation.email)? {
            Some(identity) => identity.external_id,
            None => directory.create_user_identity(invitation)?,
        };

    let mut user: User = match store.get_user_by_external_id(external_id)? {
        Some(user) => user,
        None => User::new(external_id),
    };

    let changed_by: ChangedBy = ChangedBy::User(invited_by);
    let added: Vec<UserRoleAssignment> = invitation
        .requested_assignments()
        .into_iter()
        .filter(|assignment| user.add_assignment(*assignment))
        .collect();

    user.renew_invitation(now);
    let user_id: UserId = store.add_or_update_user(&user)?;

    audit_assignments(
        store,
        user_id,
        &added,
        UserRoleAssignmentAuditedChange::Added,
        changed_by,
        now,
    )?;
    if !added.is_empty() {
        store.enqueue_domain_event(&assignments_changed(&user, actor.id(), &added, &[]))?;
    }

    record(
        store,
        UserInviteAuditLogEntry::new(
            user_id,
            UserInviteAuditedChange::InvitationSent,
            changed_by,
            now,
        )
        .with_current(invitation.email.value()),
    )?;
    store.enqueue_email_event(&EmailEvent {
        email: invitation.email.clone(),
        template: EmailTemplate::UserInvite,
        user_id,
        actor_id: actor.id(),
    })?;

    info!(%user_id, actor_id = %actor.id(), added = added.len(), "Invited user");
    Ok(user_id)
}

/// Sets the user roles a user holds for one actor.
///
/// Every added and every removed assignment gets its own audit entry.
///
/// # Errors
///
/// Returns `CoreError::NotFound` for an unknown user, actor or user role and
/// `CoreError::Validation` if an added role is inactive or for another
/// function.
pub fn update_user_role_assignments<S: Store + ?Sized>(
    store: &mut S,
    user_id: UserId,
    actor_id: ActorId,
    user_role_ids: &BTreeSet<UserRoleId>,
    changed_by: ChangedBy,
    now: OffsetDateTime,
) -> Result<(), CoreError> {
    let mut user: User = load_user(store, user_id)?;
    let actor: Actor = load_actor(store, actor_id)?;

    let current: BTreeSet<UserRoleId> = user
        .role_assignments()
        .iter()
        .filter(|assignment| assignment.actor_id == actor_id)
        .map(|assignment| assignment.user_role_id)
        .collect();

    let to_add: BTreeSet<UserRoleId> = user_role_ids.difference(&current).copied().collect();
    ensure_roles_assignable(store, &actor, &to_add)?;

    let added: Vec<UserRoleAssignment> = to_add
        .iter()
        .map(|user_role_id| UserRoleAssignment::new(actor_id, *user_role_id))
        .filter(|assignment| user.add_assignment(*assignment))
        .collect();
    let removed: Vec<UserRoleAssignment> = current
        .difference(user_role_ids)
        .map(|user_role_id| UserRoleAssignment::new(actor_id, *user_role_id))
        .filter(|assignment| user.remove_assignment(assignment))
        .collect();

    if added.is_empty() && removed.is_empty() {
        debug!(%user_id, %actor_id, "Role assignments unchanged");
        return Ok(());
    }

    store.add_or_update_user(&user)?;
    audit_assignments(
        store,
        user_id,
        &added,
        UserRoleAssignmentAuditedChange::Added,
        changed_by,
        now,
    )?;
    audit_assignments(
        store,
        user_id,
        &removed,
        UserRoleAssignmentAuditedChange::Removed,
        changed_by,
        now,
    )?;
    store.enqueue_domain_event(&assignments_changed(&user, actor_id, &added, &removed))?;

    info!(
        %user_id,
        %actor_id,
        added = added.len(),
        removed = removed.len(),
        "Updated user role assignments"
    );
    Ok(())
}

fn ensure_roles_assignable<S: Store + ?Sized>(
    store: &mut S,
    actor: &Actor,
    user_role_ids: &BTreeSet<UserRoleId>,
) -> Result<(), CoreError> {
    let function = actor.market_role().function();
    for user_role_id in user_role_ids {
        let user_role: UserRole = load_user_role(store, *user_role_id)?;
        if !user_role.is_active() {
            return Err(DomainError::UserRoleNotActive(user_role.name().to_string()).into());
        }
        if user_role.eic_function() != function {
            return Err(DomainError::UserRoleFunctionMismatch {
                user_role: user_role.name().to_string(),
                role_function: user_role.eic_function(),
                actor_function: function,
            }
            .into());
        }
    }
    Ok(())
}

fn audit_assignments<S: Store + ?Sized>(
    store: &mut S,
    user_id: UserId,
    assignments: &[UserRoleAssignment],
    change: UserRoleAssignmentAuditedChange,
    changed_by: ChangedBy,
    now: OffsetDateTime,
) -> Result<(), CoreError> {
    for assignment in assignments {
        let value: String = assignment_value(assignment)?;
        let entry: UserRoleAssignmentAuditLogEntry =
            UserRoleAssignmentAuditLogEntry::new(user_id, change, changed_by, now);
        let entry: UserRoleAssignmentAuditLogEntry = match change {
            UserRoleAssignmentAuditedChange::Added => entry.with_current(value),
            UserRoleAssignmentAuditedChange::Removed => entry.with_previous(value),
        };
        record(store, entry)?;
    }
    Ok(())
}

pub(crate) fn assignments_changed(
    user: &User,
    actor_id: ActorId,
    added: &[UserRoleAssignment],
    removed: &[UserRoleAssignment],
) -> DomainEvent {
    DomainEvent::UserRoleAssignmentsChanged {
        user_id: user.id(),
        external_user_id: user.external_id(),
        actor_id,
        added_user_roles: added
            .iter()
            .map(|assignment| assignment.user_role_id)
            .collect(),
        removed_user_roles: removed
            .iter()
            .map(|assignment| assignment.user_role_id)
            .collect(),
    }
}

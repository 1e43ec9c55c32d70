// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::actor::{
    ActorUpdate, NewActor, assign_actor_credentials, change_actor_status, create_actor,
    remove_actor_credentials, update_actor,
};
use crate::consolidation::{
    ConsolidationRun, consolidate_due, execute_due_consolidations, schedule_consolidation,
};
use crate::delegation::{
    NewMessageDelegation, NewProcessDelegation, create_message_delegation,
    create_process_delegation, stop_message_delegation, stop_process_delegation,
};
use crate::error::CoreError;
use crate::invitation::{invite_user, update_user_role_assignments};
use crate::organization::{
    NewGridArea, NewOrganization, OrganizationUpdate, create_grid_area, create_organization,
    update_grid_area, update_organization,
};
use crate::repository::{ExternalIdentityProvider, Store, UnitOfWork, UnitOfWorkProvider};
use crate::user_role::{
    NewUserRole, create_user_role, deactivate_user_role, update_user_role_permissions,
};
use mp_registry_audit::ChangedBy;
use mp_registry_domain::{
    ActorConsolidationId, ActorCredentials, ActorId, ActorStatus, DelegationPeriodId, GridAreaId,
    MessageDelegationId, OrganizationId, Permission, ProcessDelegationId, UserId, UserInvitation,
    UserRoleId,
};
use std::collections::BTreeSet;
use time::OffsetDateTime;
use tracing::debug;

/// A command represents user or system intent as data only.
///
/// Commands are the only way to request state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateOrganization(Box<NewOrganization>),
    UpdateOrganization(Box<OrganizationUpdate>),
    CreateGridArea(NewGridArea),
    UpdateGridArea {
        grid_area_id: GridAreaId,
        name: String,
        valid_to: Option<OffsetDateTime>,
    },
    CreateActor(NewActor),
    UpdateActor(ActorUpdate),
    ChangeActorStatus {
        actor_id: ActorId,
        status: ActorStatus,
    },
    AssignActorCredentials {
        actor_id: ActorId,
        credentials: ActorCredentials,
    },
    RemoveActorCredentials {
        actor_id: ActorId,
    },
    /// Schedule `actor_from` to be merged into `actor_to`.
    ScheduleConsolidation {
        actor_from: ActorId,
        actor_to: ActorId,
        consolidate_at: OffsetDateTime,
    },
    /// Run every pending consolidation that is due.
    ExecuteDueConsolidations,
    CreateMessageDelegation(NewMessageDelegation),
    StopMessageDelegation {
        delegation_id: MessageDelegationId,
        period_id: DelegationPeriodId,
        stops_at: OffsetDateTime,
    },
    CreateProcessDelegation(NewProcessDelegation),
    StopProcessDelegation {
        delegation_id: ProcessDelegationId,
        period_id: DelegationPeriodId,
        stops_at: OffsetDateTime,
    },
    CreateUserRole(NewUserRole),
    UpdateUserRolePermissions {
        user_role_id: UserRoleId,
        permissions: BTreeSet<Permission>,
    },
    DeactivateUserRole {
        user_role_id: UserRoleId,
    },
    /// Set the roles a user holds for one actor.
    UpdateUserRoleAssignments {
        user_id: UserId,
        actor_id: ActorId,
        user_role_ids: BTreeSet<UserRoleId>,
    },
}

impl Command {
    /// Stable name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateOrganization(_) => "CreateOrganization",
            Self::UpdateOrganization(_) => "UpdateOrganization",
            Self::CreateGridArea(_) => "CreateGridArea",
            Self::UpdateGridArea { .. } => "UpdateGridArea",
            Self::CreateActor(_) => "CreateActor",
            Self::UpdateActor(_) => "UpdateActor",
            Self::ChangeActorStatus { .. } => "ChangeActorStatus",
            Self::AssignActorCredentials { .. } => "AssignActorCredentials",
            Self::RemoveActorCredentials { .. } => "RemoveActorCredentials",
            Self::ScheduleConsolidation { .. } => "ScheduleConsolidation",
            Self::ExecuteDueConsolidations => "ExecuteDueConsolidations",
            Self::CreateMessageDelegation(_) => "CreateMessageDelegation",
            Self::StopMessageDelegation { .. } => "StopMessageDelegation",
            Self::CreateProcessDelegation(_) => "CreateProcessDelegation",
            Self::StopProcessDelegation { .. } => "StopProcessDelegation",
            Self::CreateUserRole(_) => "CreateUserRole",
            Self::UpdateUserRolePermissions { .. } => "UpdateUserRolePermissions",
            Self::DeactivateUserRole { .. } => "DeactivateUserRole",
            Self::UpdateUserRoleAssignments { .. } => "UpdateUserRoleAssignments",
        }
    }
}

/// What a successful command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Organization(OrganizationId),
    GridArea(GridAreaId),
    Actor(ActorId),
    ActorConsolidation(ActorConsolidationId),
    ConsolidationsExecuted(ConsolidationRun),
    MessageDelegations(Vec<MessageDelegationId>),
    ProcessDelegations(Vec<ProcessDelegationId>),
    UserRole(UserRoleId),
    Completed,
}

/// Runs a command in its own unit of work, committing on success.
///
/// On failure the unit of work is dropped without commit, discarding every
/// write the command made. `ExecuteDueConsolidations` instead runs each due
/// consolidation in its own unit of work.
///
/// # Errors
///
/// Returns whatever the command's service returns, or
/// `CoreError::Infrastructure` if the unit of work cannot begin or commit.
pub fn execute<P: UnitOfWorkProvider + ?Sized>(
    provider: &mut P,
    command: Command,
    changed_by: ChangedBy,
    now: OffsetDateTime,
) -> Result<CommandOutcome, CoreError> {
    debug!(command = command.name(), %changed_by, "Executing command");
    if matches!(command, Command::ExecuteDueConsolidations) {
        return Ok(CommandOutcome::ConsolidationsExecuted(
            execute_due_consolidations(provider, now)?,
        ));
    }

    let mut unit_of_work = provider.begin()?;
    let outcome: CommandOutcome = apply(&mut unit_of_work, command, changed_by, now)?;
    unit_of_work.commit()?;
    Ok(outcome)
}

/// Invites a user in its own unit of work, committing on success.
///
/// # Errors
///
/// See [`invite_user`].
pub fn execute_invitation<P, D>(
    provider: &mut P,
    directory: &mut D,
    invitation: &UserInvitation,
    invited_by: UserId,
    now: OffsetDateTime,
) -> Result<UserId, CoreError>
where
    P: UnitOfWorkProvider + ?Sized,
    D: ExternalIdentityProvider + ?Sized,
{
    let mut unit_of_work = provider.begin()?;
    let user_id: UserId = invite_user(&mut unit_of_work, directory, invitation, invited_by, now)?;
    unit_of_work.commit()?;
    Ok(user_id)
}

/// Applies a command to a store without managing the transaction.
///
/// Due consolidations are executed in the one store and stop at the first
/// failure.
///
/// # Errors
///
/// Returns whatever the command's service returns.
pub fn apply<S: Store + ?Sized>(
    store: &mut S,
    command: Command,
    changed_by: ChangedBy,
    now: OffsetDateTime,
) -> Result<CommandOutcome, CoreError> {
    let outcome: CommandOutcome = match command {
        Command::CreateOrganization(new_organization) => CommandOutcome::Organization(
            create_organization(store, *new_organization, changed_by, now)?,
        ),
        Command::UpdateOrganization(update) => {
            update_organization(store, *update, changed_by, now)?;
            CommandOutcome::Completed
        }
        Command::CreateGridArea(new_grid_area) => {
            CommandOutcome::GridArea(create_grid_area(store, new_grid_area, changed_by, now)?)
        }
        Command::UpdateGridArea {
            grid_area_id,
            name,
            valid_to,
        } => {
            update_grid_area(store, grid_area_id, &name, valid_to, changed_by, now)?;
            CommandOutcome::Completed
        }
        Command::CreateActor(new_actor) => {
            CommandOutcome::Actor(create_actor(store, new_actor, changed_by, now)?)
        }
        Command::UpdateActor(update) => {
            update_actor(store, update, changed_by, now)?;
            CommandOutcome::Completed
        }
        Command::ChangeActorStatus { actor_id, status } => {
            change_actor_status(store, actor_id, status, changed_by, now)?;
            CommandOutcome::Completed
        }
        Command::AssignActorCredentials {
            actor_id,
            credentials,
        } => {
            assign_actor_credentials(store, actor_id, credentials, changed_by, now)?;
            CommandOutcome::Completed
        }
        Command::RemoveActorCredentials { actor_id } => {
            remove_actor_credentials(store, actor_id, changed_by, now)?;
            CommandOutcome::Completed
        }
        Command::ScheduleConsolidation {
            actor_from,
            actor_to,
            consolidate_at,
        } => CommandOutcome::ActorConsolidation(schedule_consolidation(
            store,
            actor_from,
            actor_to,
            consolidate_at,
            changed_by,
            now,
        )?),
        Command::ExecuteDueConsolidations => {
            CommandOutcome::ConsolidationsExecuted(ConsolidationRun {
                executed: consolidate_due(store, now)?,
                failed: Vec::new(),
            })
        }
        Command::CreateMessageDelegation(request) => CommandOutcome::MessageDelegations(
            create_message_delegation(store, request, changed_by, now)?,
        ),
        Command::StopMessageDelegation {
            delegation_id,
            period_id,
            stops_at,
        } => {
            stop_message_delegation(store, delegation_id, period_id, stops_at, changed_by, now)?;
            CommandOutcome::Completed
        }
        Command::CreateProcessDelegation(request) => CommandOutcome::ProcessDelegations(
            create_process_delegation(store, request, changed_by, now)?,
        ),
        Command::StopProcessDelegation {
            delegation_id,
            period_id,
            stops_at,
        } => {
            stop_process_delegation(store, delegation_id, period_id, stops_at, changed_by, now)?;
            CommandOutcome::Completed
        }
        Command::CreateUserRole(new_user_role) => {
            CommandOutcome::UserRole(create_user_role(store, new_user_role, changed_by, now)?)
        }
        Command::UpdateUserRolePermissions {
            user_role_id,
            permissions,
        } => {
            update_user_role_permissions(store, user_role_id, permissions, changed_by, now)?;
            CommandOutcome::Completed
        }
        Command::DeactivateUserRole { user_role_id } => {
            deactivate_user_role(store, user_role_id, changed_by, now)?;
            CommandOutcome::Completed
        }
        Command::UpdateUserRoleAssignments {
            user_id,
            actor_id,
            user_role_ids,
        } => {
            update_user_role_assignments(
                store,
                user_id,
                actor_id,
                &user_role_ids,
                changed_by,
                now,
            )?;
            CommandOutcome::Completed
        }
    };
    Ok(outcome)
}

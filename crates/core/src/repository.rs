// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Storage contracts consumed by the rule and workflow services.
//!
//! Repositories return fully populated aggregates. Every call made through a
//! unit of work joins its transaction; nothing is visible to other units of
//! work until `commit`.

use crate::error::StoreError;
use mp_registry_audit::{
    ActorAuditedChange, ActorConsolidationAuditedChange, AuditLogEntry, AuditedChange,
    GridAreaAuditedChange, OrganizationAuditedChange, PermissionAuditedChange,
    UserInviteAuditedChange, UserRoleAssignmentAuditedChange, UserRoleAuditedChange,
};
use mp_registry_domain::{
    Actor, ActorConsolidation, ActorConsolidationId, ActorId, DelegatedProcess,
    DelegationMessageType, DomainEvent, EicFunction, EmailAddress, EmailEvent, ExternalUserId,
    GridArea, GridAreaId, MessageDelegation, MessageDelegationId, Organization, OrganizationId,
    ProcessDelegation, ProcessDelegationId, User, UserId, UserIdentity, UserInvitation, UserRole,
    UserRoleId,
};

pub trait OrganizationRepository {
    fn get_organization(&mut self, id: OrganizationId)
    -> Result<Option<Organization>, StoreError>;

    fn get_organizations(&mut self) -> Result<Vec<Organization>, StoreError>;

    fn add_or_update_organization(
        &mut self,
        organization: &Organization,
    ) -> Result<OrganizationId, StoreError>;
}

pub trait ActorRepository {
    fn get_actor(&mut self, id: ActorId) -> Result<Option<Actor>, StoreError>;

    /// Every actor owned by the organization, in any status.
    fn get_actors_by_organization(
        &mut self,
        organization_id: OrganizationId,
    ) -> Result<Vec<Actor>, StoreError>;

    fn add_or_update_actor(&mut self, actor: &Actor) -> Result<ActorId, StoreError>;
}

pub trait GridAreaRepository {
    fn get_grid_area(&mut self, id: GridAreaId) -> Result<Option<GridArea>, StoreError>;

    fn get_grid_areas(&mut self) -> Result<Vec<GridArea>, StoreError>;

    fn add_or_update_grid_area(&mut self, grid_area: &GridArea) -> Result<GridAreaId, StoreError>;
}

pub trait UserRepository {
    fn get_user(&mut self, id: UserId) -> Result<Option<User>, StoreError>;

    fn get_user_by_external_id(
        &mut self,
        external_id: ExternalUserId,
    ) -> Result<Option<User>, StoreError>;

    /// Users holding the role for any actor.
    fn get_users_with_role(&mut self, user_role_id: UserRoleId) -> Result<Vec<User>, StoreError>;

    fn add_or_update_user(&mut self, user: &User) -> Result<UserId, StoreError>;
}

pub trait UserRoleRepository {
    fn get_user_role(&mut self, id: UserRoleId) -> Result<Option<UserRole>, StoreError>;

    fn get_user_roles(&mut self) -> Result<Vec<UserRole>, StoreError>;

    fn add_or_update_user_role(&mut self, user_role: &UserRole) -> Result<UserRoleId, StoreError>;
}

pub trait MessageDelegationRepository {
    fn get_message_delegation(
        &mut self,
        id: MessageDelegationId,
    ) -> Result<Option<MessageDelegation>, StoreError>;

    /// The delegation of `message_type` made by `delegated_by`, if one exists.
    fn get_message_delegation_for(
        &mut self,
        delegated_by: ActorId,
        message_type: DelegationMessageType,
    ) -> Result<Option<MessageDelegation>, StoreError>;

    fn add_or_update_message_delegation(
        &mut self,
        delegation: &MessageDelegation,
    ) -> Result<MessageDelegationId, StoreError>;
}

pub trait ProcessDelegationRepository {
    fn get_process_delegation(
        &mut self,
        id: ProcessDelegationId,
    ) -> Result<Option<ProcessDelegation>, StoreError>;

    /// The delegation of `process` made by `delegated_by`, if one exists.
    fn get_process_delegation_for(
        &mut self,
        delegated_by: ActorId,
        process: DelegatedProcess,
    ) -> Result<Option<ProcessDelegation>, StoreError>;

    fn add_or_update_process_delegation(
        &mut self,
        delegation: &ProcessDelegation,
    ) -> Result<ProcessDelegationId, StoreError>;
}

pub trait ActorConsolidationRepository {
    fn get_actor_consolidation(
        &mut self,
        id: ActorConsolidationId,
    ) -> Result<Option<ActorConsolidation>, StoreError>;

    /// Every consolidation, ordered by scheduled instant.
    fn get_actor_consolidations(&mut self) -> Result<Vec<ActorConsolidation>, StoreError>;

    fn add_or_update_actor_consolidation(
        &mut self,
        consolidation: &ActorConsolidation,
    ) -> Result<ActorConsolidationId, StoreError>;
}

/// Ledger of exclusive (function, grid area) holdings.
///
/// Implementations must back `try_reserve` with an atomic, constraint
/// enforced write so two units of work can never both succeed for the same
/// pair.
pub trait ReservationLedger {
    /// Reserves the pair for the actor. Returns `false` if it is already held.
    fn try_reserve(
        &mut self,
        actor_id: ActorId,
        function: EicFunction,
        grid_area_id: GridAreaId,
    ) -> Result<bool, StoreError>;

    fn remove_all_reservations(&mut self, actor_id: ActorId) -> Result<(), StoreError>;
}

/// Append-only outbox of integration events.
pub trait DomainEventOutbox {
    fn enqueue_domain_event(&mut self, event: &DomainEvent) -> Result<(), StoreError>;
}

/// Append-only outbox of emails to send.
pub trait EmailEventOutbox {
    fn enqueue_email_event(&mut self, event: &EmailEvent) -> Result<(), StoreError>;
}

/// Insert-only audit log for one audited entity kind.
pub trait AuditLogRepository<C: AuditedChange> {
    fn insert_audit_log_entry(&mut self, entry: &AuditLogEntry<C>) -> Result<(), StoreError>;

    /// Entries for the subject in insertion order.
    fn get_audit_log_entries(
        &mut self,
        subject: C::Subject,
    ) -> Result<Vec<AuditLogEntry<C>>, StoreError>;
}

/// Every contract a unit of work exposes.
pub trait Store:
    OrganizationRepository
    + ActorRepository
    + GridAreaRepository
    + UserRepository
    + UserRoleRepository
    + MessageDelegationRepository
    + ProcessDelegationRepository
    + ActorConsolidationRepository
    + ReservationLedger
    + DomainEventOutbox
    + EmailEventOutbox
    + AuditLogRepository<OrganizationAuditedChange>
    + AuditLogRepository<ActorAuditedChange>
    + AuditLogRepository<ActorConsolidationAuditedChange>
    + AuditLogRepository<PermissionAuditedChange>
    + AuditLogRepository<UserRoleAuditedChange>
    + AuditLogRepository<UserInviteAuditedChange>
    + AuditLogRepository<UserRoleAssignmentAuditedChange>
    + AuditLogRepository<GridAreaAuditedChange>
{
}

impl<T> Store for T where
    T: OrganizationRepository
        + ActorRepository
        + GridAreaRepository
        + UserRepository
        + UserRoleRepository
        + MessageDelegationRepository
        + ProcessDelegationRepository
        + ActorConsolidationRepository
        + ReservationLedger
        + DomainEventOutbox
        + EmailEventOutbox
        + AuditLogRepository<OrganizationAuditedChange>
        + AuditLogRepository<ActorAuditedChange>
        + AuditLogRepository<ActorConsolidationAuditedChange>
        + AuditLogRepository<PermissionAuditedChange>
        + AuditLogRepository<UserRoleAuditedChange>
        + AuditLogRepository<UserInviteAuditedChange>
        + AuditLogRepository<UserRoleAssignmentAuditedChange>
        + AuditLogRepository<GridAreaAuditedChange>
{
}

/// A transaction spanning every repository call made through it.
///
/// Dropping a unit of work without calling `commit` rolls it back.
pub trait UnitOfWork: Store {
    fn commit(self) -> Result<(), StoreError>
    where
        Self: Sized;

    fn rollback(self) -> Result<(), StoreError>
    where
        Self: Sized;
}

/// Opens units of work.
pub trait UnitOfWorkProvider {
    type UnitOfWork<'a>: UnitOfWork
    where
        Self: 'a;

    fn begin(&mut self) -> Result<Self::UnitOfWork<'_>, StoreError>;
}

/// The external user directory.
pub trait ExternalIdentityProvider {
    fn find_user_identity_by_email(
        &mut self,
        email: &EmailAddress,
    ) -> Result<Option<UserIdentity>, StoreError>;

    /// Creates a directory identity for the invited person.
    fn create_user_identity(
        &mut self,
        invitation: &UserInvitation,
    ) -> Result<ExternalUserId, StoreError>;
}

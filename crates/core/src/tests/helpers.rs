// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    ActorConsolidationRepository, ActorRepository, AuditLogRepository, DomainEventOutbox,
    EmailEventOutbox, ExternalIdentityProvider, GridAreaRepository, MessageDelegationRepository,
    NewActor, NewGridArea, NewOrganization, NewUserRole, OrganizationRepository,
    ProcessDelegationRepository, ReservationLedger, StoreError, UnitOfWork, UnitOfWorkProvider,
    UserRepository, UserRoleRepository, activate_actor, create_actor, create_grid_area,
    create_organization, create_user_role,
};
use mp_registry_audit::{AuditLogEntry, AuditLogKind, AuditedChange, ChangedBy};
use mp_registry_domain::{
    Actor, ActorConsolidation, ActorConsolidationId, ActorGridArea, ActorId, ActorMarketRole,
    ActorName, ActorNumber, Address, BusinessRegisterIdentifier, DelegatedProcess,
    DelegationMessageType, DomainEvent, EicFunction, EmailAddress, EmailEvent, ExternalUserId,
    GridArea, GridAreaCode, GridAreaId, GridAreaType, MessageDelegation, MessageDelegationId,
    MeteringPointType, Organization, OrganizationDomain, OrganizationId, Permission,
    PriceAreaCode, ProcessDelegation, ProcessDelegationId, User, UserId, UserIdentity,
    UserInvitation, UserRole, UserRoleId,
};
use std::collections::{BTreeMap, BTreeSet};
use time::OffsetDateTime;
use time::macros::datetime;

pub fn test_instant() -> OffsetDateTime {
    datetime!(2026-03-01 00:00 UTC)
}

/// An audit entry with its change and subject flattened to codes.
#[derive(Debug, Clone)]
pub struct StoredAuditEntry {
    pub kind: AuditLogKind,
    pub subject: String,
    pub change: String,
    pub changed_by: ChangedBy,
    pub timestamp: OffsetDateTime,
    pub current_value: Option<String>,
    pub previous_value: Option<String>,
}

/// Everything an in-memory store holds.
#[derive(Debug, Clone, Default)]
pub struct FakeState {
    pub organizations: BTreeMap<OrganizationId, Organization>,
    pub actors: BTreeMap<ActorId, Actor>,
    pub grid_areas: BTreeMap<GridAreaId, GridArea>,
    pub users: BTreeMap<UserId, User>,
    pub user_roles: BTreeMap<UserRoleId, UserRole>,
    pub message_delegations: BTreeMap<MessageDelegationId, MessageDelegation>,
    pub process_delegations: BTreeMap<ProcessDelegationId, ProcessDelegation>,
    pub consolidations: BTreeMap<ActorConsolidationId, ActorConsolidation>,
    pub reservations: BTreeMap<(EicFunction, GridAreaId), ActorId>,
    pub domain_events: Vec<DomainEvent>,
    pub email_events: Vec<EmailEvent>,
    pub audit_log: Vec<StoredAuditEntry>,
}

impl FakeState {
    pub fn audit_entries(&self, kind: AuditLogKind, change: &str) -> Vec<&StoredAuditEntry> {
        self.audit_log
            .iter()
            .filter(|entry| entry.kind == kind && entry.change == change)
            .collect()
    }
}

/// Anything that exposes a `FakeState` gets every storage contract.
pub trait FakeBacked {
    fn state(&mut self) -> &mut FakeState;
}

/// A store with no transaction; writes land immediately.
#[derive(Debug, Default)]
pub struct FakeStore {
    pub state: FakeState,
}

impl FakeBacked for FakeStore {
    fn state(&mut self) -> &mut FakeState {
        &mut self.state
    }
}

/// Provider whose units of work copy the state and write it back on commit.
#[derive(Debug, Default)]
pub struct FakeProvider {
    pub state: FakeState,
}

pub struct FakeUnitOfWork<'a> {
    committed: &'a mut FakeState,
    working: FakeState,
}

impl FakeBacked for FakeUnitOfWork<'_> {
    fn state(&mut self) -> &mut FakeState {
        &mut self.working
    }
}

impl UnitOfWork for FakeUnitOfWork<'_> {
    fn commit(self) -> Result<(), StoreError> {
        let Self { committed, working } = self;
        *committed = working;
        Ok(())
    }

    fn rollback(self) -> Result<(), StoreError> {
        Ok(())
    }
}

impl UnitOfWorkProvider for FakeProvider {
    type UnitOfWork<'a> = FakeUnitOfWork<'a>;

    fn begin(&mut self) -> Result<FakeUnitOfWork<'_>, StoreError> {
        let working: FakeState = self.state.clone();
        Ok(FakeUnitOfWork {
            committed: &mut self.state,
            working,
        })
    }
}

impl<T: FakeBacked> OrganizationRepository for T {
    fn get_organization(&mut self, id: OrganizationId) -> Result<Option<Organization>, StoreError> {
        Ok(self.state().organizations.get(&id).cloned())
    }

    fn get_organizations(&mut self) -> Result<Vec<Organization>, StoreError> {
        Ok(self.state().organizations.values().cloned().collect())
    }

    fn add_or_update_organization(
        &mut self,
        organization: &Organization,
    ) -> Result<OrganizationId, StoreError> {
        self.state()
            .organizations
            .insert(organization.id(), organization.clone());
        Ok(organization.id())
    }
}

impl<T: FakeBacked> ActorRepository for T {
    fn get_actor(&mut self, id: ActorId) -> Result<Option<Actor>, StoreError> {
        Ok(self.state().actors.get(&id).cloned())
    }

    fn get_actors_by_organization(
        &mut self,
        organization_id: OrganizationId,
    ) -> Result<Vec<Actor>, StoreError> {
        Ok(self
            .state()
            .actors
            .values()
            .filter(|actor| actor.organization_id() == organization_id)
            .cloned()
            .collect())
    }

    fn add_or_update_actor(&mut self, actor: &Actor) -> Result<ActorId, StoreError> {
        self.state().actors.insert(actor.id(), actor.clone());
        Ok(actor.id())
    }
}

impl<T: FakeBacked> GridAreaRepository for T {
    fn get_grid_area(&mut self, id: GridAreaId) -> Result<Option<GridArea>, StoreError> {
        Ok(self.state().grid_areas.get(&id).cloned())
    }

    fn get_grid_areas(&mut self) -> Result<Vec<GridArea>, StoreError> {
        Ok(self.state().grid_areas.values().cloned().collect())
    }

    fn add_or_update_grid_area(&mut self, grid_area: &GridArea) -> Result<GridAreaId, StoreError> {
        self.state()
            .grid_areas
            .insert(grid_area.id(), grid_area.clone());
        Ok(grid_area.id())
    }
}

impl<T: FakeBacked> UserRepository for T {
    fn get_user(&mut self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.state().users.get(&id).cloned())
    }

    fn get_user_by_external_id(
        &mut self,
        external_id: ExternalUserId,
    ) -> Result<Option<User>, StoreError> {
        Ok(self
            .state()
            .users
            .values()
            .find(|user| user.external_id() == external_id)
            .cloned())
    }

    fn get_users_with_role(&mut self, user_role_id: UserRoleId) -> Result<Vec<User>, StoreError> {
        Ok(self
            .state()
            .users
            .values()
            .filter(|user| {
                user.role_assignments()
                    .iter()
                    .any(|assignment| assignment.user_role_id == user_role_id)
            })
            .cloned()
            .collect())
    }

    fn add_or_update_user(&mut self, user: &User) -> Result<UserId, StoreError> {
        self.state().users.insert(user.id(), user.clone());
        Ok(user.id())
    }
}

impl<T: FakeBacked> UserRoleRepository for T {
    fn get_user_role(&mut self, id: UserRoleId) -> Result<Option<UserRole>, StoreError> {
        Ok(self.state().user_roles.get(&id).cloned())
    }

    fn get_user_roles(&mut self) -> Result<Vec<UserRole>, StoreError> {
        Ok(self.state().user_roles.values().cloned().collect())
    }

    fn add_or_update_user_role(&mut self, user_role: &UserRole) -> Result<UserRoleId, StoreError> {
        self.state()
            .user_roles
            .insert(user_role.id(), user_role.clone());
        Ok(user_role.id())
    }
}

impl<T: FakeBacked> MessageDelegationRepository for T {
    fn get_message_delegation(
        &mut self,
        id: MessageDelegationId,
    ) -> Result<Option<MessageDelegation>, StoreError> {
        Ok(self.state().message_delegations.get(&id).cloned())
    }

    fn get_message_delegation_for(
        &mut self,
        delegated_by: ActorId,
        message_type: DelegationMessageType,
    ) -> Result<Option<MessageDelegation>, StoreError> {
        Ok(self
            .state()
            .message_delegations
            .values()
            .find(|delegation| {
                delegation.delegated_by() == delegated_by && delegation.subject() == message_type
            })
            .cloned())
    }

    fn add_or_update_message_delegation(
        &mut self,
        delegation: &MessageDelegation,
    ) -> Result<MessageDelegationId, StoreError> {
        self.state()
            .message_delegations
            .insert(delegation.id(), delegation.clone());
        Ok(delegation.id())
    }
}

impl<T: FakeBacked> ProcessDelegationRepository for T {
    fn get_process_delegation(
        &mut self,
        id: ProcessDelegationId,
    ) -> Result<Option<ProcessDelegation>, StoreError> {
        Ok(self.state().process_delegations.get(&id).cloned())
    }

    fn get_process_delegation_for(
        &mut self,
        delegated_by: ActorId,
        process: DelegatedProcess,
    ) -> Result<Option<ProcessDelegation>, StoreError> {
        Ok(self
            .state()
            .process_delegations
            .values()
            .find(|delegation| {
                delegation.delegated_by() == delegated_by && delegation.subject() == process
            })
            .cloned())
    }

    fn add_or_update_process_delegation(
        &mut self,
        delegation: &ProcessDelegation,
    ) -> Result<ProcessDelegationId, StoreError> {
        self.state()
            .process_delegations
            .insert(delegation.id(), delegation.clone());
        Ok(delegation.id())
    }
}

impl<T: FakeBacked> ActorConsolidationRepository for T {
    fn get_actor_consolidation(
        &mut self,
        id: ActorConsolidationId,
    ) -> Result<Option<ActorConsolidation>, StoreError> {
        Ok(self.state().consolidations.get(&id).cloned())
    }

    fn get_actor_consolidations(&mut self) -> Result<Vec<ActorConsolidation>, StoreError> {
        let mut consolidations: Vec<ActorConsolidation> =
            self.state().consolidations.values().cloned().collect();
        consolidations.sort_by_key(ActorConsolidation::consolidate_at);
        Ok(consolidations)
    }

    fn add_or_update_actor_consolidation(
        &mut self,
        consolidation: &ActorConsolidation,
    ) -> Result<ActorConsolidationId, StoreError> {
        self.state()
            .consolidations
            .insert(consolidation.id(), consolidation.clone());
        Ok(consolidation.id())
    }
}

impl<T: FakeBacked> ReservationLedger for T {
    fn try_reserve(
        &mut self,
        actor_id: ActorId,
        function: EicFunction,
        grid_area_id: GridAreaId,
    ) -> Result<bool, StoreError> {
        let reservations = &mut self.state().reservations;
        if reservations.contains_key(&(function, grid_area_id)) {
            return Ok(false);
        }
        reservations.insert((function, grid_area_id), actor_id);
        Ok(true)
    }

    fn remove_all_reservations(&mut self, actor_id: ActorId) -> Result<(), StoreError> {
        self.state()
            .reservations
            .retain(|_, holder| *holder != actor_id);
        Ok(())
    }
}

impl<T: FakeBacked> DomainEventOutbox for T {
    fn enqueue_domain_event(&mut self, event: &DomainEvent) -> Result<(), StoreError> {
        self.state().domain_events.push(event.clone());
        Ok(())
    }
}

impl<T: FakeBacked> EmailEventOutbox for T {
    fn enqueue_email_event(&mut self, event: &EmailEvent) -> Result<(), StoreError> {
        self.state().email_events.push(event.clone());
        Ok(())
    }
}

impl<T: FakeBacked, C: AuditedChange> AuditLogRepository<C> for T {
    fn insert_audit_log_entry(&mut self, entry: &AuditLogEntry<C>) -> Result<(), StoreError> {
        self.state().audit_log.push(StoredAuditEntry {
            kind: C::KIND,
            subject: entry.subject.to_string(),
            change: entry.change.to_string(),
            changed_by: entry.changed_by,
            timestamp: entry.timestamp,
            current_value: entry.current_value.clone(),
            previous_value: entry.previous_value.clone(),
        });
        Ok(())
    }

    fn get_audit_log_entries(
        &mut self,
        subject: C::Subject,
    ) -> Result<Vec<AuditLogEntry<C>>, StoreError> {
        let key: String = subject.to_string();
        self.state()
            .audit_log
            .iter()
            .filter(|entry| entry.kind == C::KIND && entry.subject == key)
            .map(|entry| {
                let change: C = entry.change.parse().map_err(StoreError::new)?;
                Ok(AuditLogEntry {
                    subject,
                    change,
                    changed_by: entry.changed_by,
                    timestamp: entry.timestamp,
                    current_value: entry.current_value.clone(),
                    previous_value: entry.previous_value.clone(),
                })
            })
            .collect()
    }
}

/// Directory that hands out fresh identities and remembers them.
#[derive(Debug, Default)]
pub struct FakeDirectory {
    pub identities: Vec<UserIdentity>,
    pub created: usize,
}

impl ExternalIdentityProvider for FakeDirectory {
    fn find_user_identity_by_email(
        &mut self,
        email: &EmailAddress,
    ) -> Result<Option<UserIdentity>, StoreError> {
        Ok(self
            .identities
            .iter()
            .find(|identity| &identity.email == email)
            .cloned())
    }

    fn create_user_identity(
        &mut self,
        invitation: &UserInvitation,
    ) -> Result<ExternalUserId, StoreError> {
        let external_id: ExternalUserId = ExternalUserId::new();
        self.identities.push(UserIdentity {
            external_id,
            email: invitation.email.clone(),
            first_name: invitation.first_name.clone(),
            last_name: invitation.last_name.clone(),
            phone_number: invitation.phone_number.clone(),
        });
        self.created += 1;
        Ok(external_id)
    }
}

pub fn new_test_organization(name: &str, cvr: &str) -> NewOrganization {
    NewOrganization {
        name: name.to_string(),
        business_register_identifier: BusinessRegisterIdentifier::new(cvr).unwrap(),
        address: Address {
            country: String::from("DK"),
            ..Address::default()
        },
        domains: vec![OrganizationDomain::new("test.dk").unwrap()],
    }
}

pub fn seed_organization(store: &mut FakeStore, cvr: &str) -> OrganizationId {
    create_organization(
        store,
        new_test_organization("Test", cvr),
        ChangedBy::System,
        test_instant(),
    )
    .unwrap()
}

pub fn new_test_grid_area(code: &str) -> NewGridArea {
    NewGridArea {
        name: format!("Grid area {code}"),
        code: GridAreaCode::new(code).unwrap(),
        price_area_code: PriceAreaCode::Dk1,
        grid_area_type: GridAreaType::Distribution,
        valid_from: datetime!(2020-01-01 00:00 UTC),
        valid_to: None,
    }
}

pub fn seed_grid_area(store: &mut FakeStore, code: &str) -> GridAreaId {
    create_grid_area(
        store,
        new_test_grid_area(code),
        ChangedBy::System,
        test_instant(),
    )
    .unwrap()
}

pub fn market_role(function: EicFunction, grid_area_ids: &[GridAreaId]) -> ActorMarketRole {
    let grid_areas: Vec<ActorGridArea> = grid_area_ids
        .iter()
        .map(|grid_area_id| {
            ActorGridArea::new(*grid_area_id, [MeteringPointType::D01VeProduction])
        })
        .collect();
    ActorMarketRole::new(function, grid_areas, None).unwrap()
}

pub fn new_test_actor(
    organization_id: OrganizationId,
    actor_number: &str,
    function: EicFunction,
    grid_area_ids: &[GridAreaId],
) -> NewActor {
    NewActor {
        organization_id,
        actor_number: ActorNumber::new(actor_number).unwrap(),
        name: ActorName::new("Test Actor").unwrap(),
        market_role: market_role(function, grid_area_ids),
    }
}

pub fn seed_actor(
    store: &mut FakeStore,
    organization_id: OrganizationId,
    actor_number: &str,
    function: EicFunction,
    grid_area_ids: &[GridAreaId],
) -> ActorId {
    create_actor(
        store,
        new_test_actor(organization_id, actor_number, function, grid_area_ids),
        ChangedBy::System,
        test_instant(),
    )
    .unwrap()
}

pub fn seed_active_actor(
    store: &mut FakeStore,
    organization_id: OrganizationId,
    actor_number: &str,
    function: EicFunction,
    grid_area_ids: &[GridAreaId],
) -> ActorId {
    let actor_id: ActorId = seed_actor(store, organization_id, actor_number, function, grid_area_ids);
    activate_actor(store, actor_id, ChangedBy::System, test_instant()).unwrap();
    actor_id
}

pub fn seed_user_role(
    store: &mut FakeStore,
    name: &str,
    eic_function: EicFunction,
    permissions: &[Permission],
) -> UserRoleId {
    create_user_role(
        store,
        NewUserRole {
            name: name.to_string(),
            description: None,
            eic_function,
            permissions: permissions.iter().copied().collect::<BTreeSet<Permission>>(),
        },
        ChangedBy::System,
        test_instant(),
    )
    .unwrap()
}

pub fn test_invitation(
    email: &str,
    assigned_actor: ActorId,
    assigned_roles: &[UserRoleId],
) -> UserInvitation {
    UserInvitation {
        email: EmailAddress::new(email).unwrap(),
        first_name: String::from("Test"),
        last_name: String::from("User"),
        phone_number: None,
        assigned_actor,
        assigned_roles: assigned_roles.iter().copied().collect(),
    }
}

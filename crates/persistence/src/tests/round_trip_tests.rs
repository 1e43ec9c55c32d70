// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::Persistence;
use crate::tests::helpers::{
    market_role, seed_active_actor, seed_actor, seed_grid_area, seed_organization,
    seed_user_role, test_instant,
};
use mp_registry::{
    ActorConsolidationRepository, ActorRepository, GridAreaRepository,
    MessageDelegationRepository, OrganizationRepository, ProcessDelegationRepository,
    UnitOfWork, UnitOfWorkProvider, UserRepository, UserRoleRepository,
};
use mp_registry_domain::{
    Actor, ActorConsolidation, ActorConsolidationStatus, ActorCredentials, ActorId, ActorName,
    ActorNumber, ActorStatus, DelegatedProcess, DelegationMessageType, DelegationPeriod,
    DelegationPeriodId, EicFunction, ExternalActorId, ExternalUserId, GridArea, GridAreaId,
    MessageDelegation, Organization, OrganizationId, Permission, ProcessDelegation, User,
    UserRole, UserRoleAssignment, UserRoleId,
};
use std::collections::BTreeSet;
use time::Duration;
use time::macros::datetime;

#[test]
fn test_organization_and_actor_round_trip() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let organization_id: OrganizationId = seed_organization(&mut persistence, "12345678");
    let actor_id: ActorId = seed_actor(
        &mut persistence,
        organization_id,
        "5790000000001",
        EicFunction::EnergySupplier,
        &[],
    );

    let mut unit_of_work = persistence.begin().unwrap();
    let organization: Organization = unit_of_work
        .get_organization(organization_id)
        .unwrap()
        .unwrap();
    let actor: Actor = unit_of_work.get_actor(actor_id).unwrap().unwrap();
    unit_of_work.rollback().unwrap();

    assert_eq!(organization.id(), organization_id);
    assert_eq!(organization.name(), "Test");
    assert_eq!(organization.business_register_identifier().value(), "12345678");
    assert_eq!(organization.address().city.as_deref(), Some("Fredericia"));
    assert_eq!(organization.domains()[0].value(), "test.dk");
    assert_eq!(actor.organization_id(), organization_id);
    assert_eq!(actor.actor_number().value(), "5790000000001");
    assert_eq!(actor.market_role().function(), EicFunction::EnergySupplier);
    assert_eq!(actor.status(), ActorStatus::New);
}

#[test]
fn test_actor_with_grid_areas_and_credentials_round_trip() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let organization_id: OrganizationId = seed_organization(&mut persistence, "12345678");
    let first: GridAreaId = seed_grid_area(&mut persistence, "101");
    let second: GridAreaId = seed_grid_area(&mut persistence, "102");

    let actor: Actor = Actor::with_id(
        ActorId::new(),
        organization_id,
        Some(ExternalActorId::new()),
        ActorNumber::new("5790000000002").unwrap(),
        ActorStatus::Active,
        ActorName::new("Grid Company").unwrap(),
        market_role(EicFunction::GridAccessProvider, &[second, first]),
        Some(ActorCredentials::Certificate {
            thumbprint: String::from("A1B2C3"),
            lookup_identifier: String::from("cert-5790000000002"),
            expires_at: datetime!(2027-03-01 12:30:15.5 UTC),
        }),
    );

    let mut unit_of_work = persistence.begin().unwrap();
    unit_of_work.add_or_update_actor(&actor).unwrap();
    unit_of_work.commit().unwrap();

    let mut unit_of_work = persistence.begin().unwrap();
    let loaded: Actor = unit_of_work.get_actor(actor.id()).unwrap().unwrap();
    unit_of_work.rollback().unwrap();

    assert_eq!(loaded, actor);
}

#[test]
fn test_actor_update_replaces_grid_areas_and_clears_credentials() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let organization_id: OrganizationId = seed_organization(&mut persistence, "12345678");
    let first: GridAreaId = seed_grid_area(&mut persistence, "101");
    let second: GridAreaId = seed_grid_area(&mut persistence, "102");

    let mut actor: Actor = Actor::with_id(
        ActorId::new(),
        organization_id,
        None,
        ActorNumber::new("5790000000002").unwrap(),
        ActorStatus::New,
        ActorName::new("Grid Company").unwrap(),
        market_role(EicFunction::GridAccessProvider, &[first]),
        Some(ActorCredentials::ClientSecret {
            secret_identifier: String::from("secret-1"),
            expires_at: datetime!(2027-03-01 00:00 UTC),
        }),
    );
    let mut unit_of_work = persistence.begin().unwrap();
    unit_of_work.add_or_update_actor(&actor).unwrap();
    unit_of_work.commit().unwrap();

    actor.set_market_role(market_role(EicFunction::GridAccessProvider, &[second]));
    actor.remove_credentials();
    let mut unit_of_work = persistence.begin().unwrap();
    unit_of_work.add_or_update_actor(&actor).unwrap();
    let loaded: Actor = unit_of_work.get_actor(actor.id()).unwrap().unwrap();
    unit_of_work.commit().unwrap();

    assert_eq!(loaded.market_role().grid_areas().len(), 1);
    assert_eq!(loaded.market_role().grid_areas()[0].grid_area_id, second);
    assert!(loaded.credentials().is_none());
}

#[test]
fn test_missing_aggregates_load_as_none() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    let mut unit_of_work = persistence.begin().unwrap();
    assert!(unit_of_work.get_actor(ActorId::new()).unwrap().is_none());
    assert!(
        unit_of_work
            .get_organization(OrganizationId::new())
            .unwrap()
            .is_none()
    );
    assert!(
        unit_of_work
            .get_grid_area(GridAreaId::new())
            .unwrap()
            .is_none()
    );
    assert!(
        unit_of_work
            .get_user_role(UserRoleId::new())
            .unwrap()
            .is_none()
    );
    unit_of_work.rollback().unwrap();
}

#[test]
fn test_grid_area_round_trip_keeps_validity() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let grid_area_id: GridAreaId = seed_grid_area(&mut persistence, "101");

    let mut unit_of_work = persistence.begin().unwrap();
    let grid_areas: Vec<GridArea> = unit_of_work.get_grid_areas().unwrap();
    unit_of_work.rollback().unwrap();

    assert_eq!(grid_areas.len(), 1);
    assert_eq!(grid_areas[0].id(), grid_area_id);
    assert_eq!(grid_areas[0].code().value(), "101");
    assert_eq!(grid_areas[0].valid_from(), datetime!(2020-01-01 00:00 UTC));
    assert_eq!(grid_areas[0].valid_to(), None);
}

#[test]
fn test_user_role_and_user_round_trip() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let organization_id: OrganizationId = seed_organization(&mut persistence, "12345678");
    let actor_id: ActorId = seed_actor(
        &mut persistence,
        organization_id,
        "5790000000001",
        EicFunction::EnergySupplier,
        &[],
    );
    let user_role_id: UserRoleId = seed_user_role(
        &mut persistence,
        "Supplier admin",
        EicFunction::EnergySupplier,
        &[Permission::UsersManage, Permission::UsersView],
    );
    let user: User = User::with_id(
        mp_registry_domain::UserId::new(),
        ExternalUserId::new(),
        BTreeSet::from([UserRoleAssignment::new(actor_id, user_role_id)]),
        Some(test_instant() + Duration::days(7)),
        None,
    );

    let mut unit_of_work = persistence.begin().unwrap();
    unit_of_work.add_or_update_user(&user).unwrap();
    unit_of_work.commit().unwrap();

    let mut unit_of_work = persistence.begin().unwrap();
    let user_role: UserRole = unit_of_work.get_user_role(user_role_id).unwrap().unwrap();
    let by_id: User = unit_of_work.get_user(user.id()).unwrap().unwrap();
    let by_external_id: User = unit_of_work
        .get_user_by_external_id(user.external_id())
        .unwrap()
        .unwrap();
    let holders: Vec<User> = unit_of_work.get_users_with_role(user_role_id).unwrap();
    unit_of_work.rollback().unwrap();

    assert_eq!(user_role.name(), "Supplier admin");
    assert_eq!(user_role.description(), Some("Supplier admin description"));
    assert_eq!(
        user_role.permissions(),
        &BTreeSet::from([Permission::UsersManage, Permission::UsersView])
    );
    assert_eq!(by_id, user);
    assert_eq!(by_external_id, user);
    assert_eq!(holders, vec![user]);
}

#[test]
fn test_delegations_round_trip_with_periods() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let organization_id: OrganizationId = seed_organization(&mut persistence, "12345678");
    let grid_area_id: GridAreaId = seed_grid_area(&mut persistence, "101");
    let delegated_by: ActorId = seed_active_actor(
        &mut persistence,
        organization_id,
        "5790000000001",
        EicFunction::GridAccessProvider,
        &[grid_area_id],
    );
    let delegated_to: ActorId = seed_active_actor(
        &mut persistence,
        organization_id,
        "5790000000002",
        EicFunction::Delegated,
        &[],
    );
    let period: DelegationPeriod = DelegationPeriod {
        id: DelegationPeriodId::new(),
        delegated_to,
        grid_area_id,
        starts_at: test_instant(),
        stops_at: Some(test_instant() + Duration::days(30)),
    };
    let message_delegation: MessageDelegation = MessageDelegation::with_id(
        mp_registry_domain::MessageDelegationId::new(),
        delegated_by,
        DelegationMessageType::Rsm012Inbound,
        vec![period.clone()],
    );
    let process_delegation: ProcessDelegation = ProcessDelegation::with_id(
        mp_registry_domain::ProcessDelegationId::new(),
        delegated_by,
        DelegatedProcess::RequestEnergyResults,
        vec![period],
    );

    let mut unit_of_work = persistence.begin().unwrap();
    unit_of_work
        .add_or_update_message_delegation(&message_delegation)
        .unwrap();
    unit_of_work
        .add_or_update_process_delegation(&process_delegation)
        .unwrap();
    unit_of_work.commit().unwrap();

    let mut unit_of_work = persistence.begin().unwrap();
    let loaded_message: Option<MessageDelegation> = unit_of_work
        .get_message_delegation_for(delegated_by, DelegationMessageType::Rsm012Inbound)
        .unwrap();
    let loaded_process: Option<ProcessDelegation> = unit_of_work
        .get_process_delegation(process_delegation.id())
        .unwrap();
    let other_type: Option<MessageDelegation> = unit_of_work
        .get_message_delegation_for(delegated_by, DelegationMessageType::Rsm014Inbound)
        .unwrap();
    unit_of_work.rollback().unwrap();

    assert_eq!(loaded_message, Some(message_delegation));
    assert_eq!(loaded_process, Some(process_delegation));
    assert!(other_type.is_none());
}

#[test]
fn test_consolidations_load_in_scheduled_order() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let organization_id: OrganizationId = seed_organization(&mut persistence, "12345678");
    let first: ActorId = seed_actor(
        &mut persistence,
        organization_id,
        "5790000000001",
        EicFunction::EnergySupplier,
        &[],
    );
    let second: ActorId = seed_actor(
        &mut persistence,
        organization_id,
        "5790000000002",
        EicFunction::EnergySupplier,
        &[],
    );
    let later: ActorConsolidation = ActorConsolidation::with_id(
        mp_registry_domain::ActorConsolidationId::new(),
        first,
        second,
        test_instant() + Duration::days(10),
        ActorConsolidationStatus::Pending,
    );
    let sooner: ActorConsolidation = ActorConsolidation::with_id(
        mp_registry_domain::ActorConsolidationId::new(),
        second,
        first,
        test_instant() + Duration::milliseconds(1500),
        ActorConsolidationStatus::Executed,
    );

    let mut unit_of_work = persistence.begin().unwrap();
    unit_of_work.add_or_update_actor_consolidation(&later).unwrap();
    unit_of_work.add_or_update_actor_consolidation(&sooner).unwrap();
    unit_of_work.commit().unwrap();

    let mut unit_of_work = persistence.begin().unwrap();
    let consolidations: Vec<ActorConsolidation> = unit_of_work.get_actor_consolidations().unwrap();
    let single: Option<ActorConsolidation> =
        unit_of_work.get_actor_consolidation(later.id()).unwrap();
    unit_of_work.rollback().unwrap();

    assert_eq!(consolidations, vec![sooner, later.clone()]);
    assert_eq!(single, Some(later));
}

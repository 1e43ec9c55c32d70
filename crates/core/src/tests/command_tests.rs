// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    FakeDirectory, FakeProvider, FakeStore, new_test_actor, new_test_organization,
    seed_active_actor, seed_actor, seed_grid_area, seed_organization, seed_user_role,
    test_instant, test_invitation,
};
use crate::{Command, CommandOutcome, CoreError, execute, execute_invitation};
use mp_registry_audit::{AuditLogKind, ChangedBy};
use mp_registry_domain::{
    ActorId, ActorStatus, EicFunction, GridAreaId, OrganizationId, Permission, UserId,
    UserRoleId,
};
use time::Duration;

#[test]
fn test_execute_commits_on_success() {
    let mut provider: FakeProvider = FakeProvider::default();

    let outcome: CommandOutcome = execute(
        &mut provider,
        Command::CreateOrganization(Box::new(new_test_organization("Test", "12345678"))),
        ChangedBy::System,
        test_instant(),
    )
    .unwrap();

    let CommandOutcome::Organization(organization_id) = outcome else {
        panic!("Expected an organization outcome, got {outcome:?}");
    };
    assert!(provider.state.organizations.contains_key(&organization_id));
    assert_eq!(
        provider
            .state
            .audit_entries(AuditLogKind::Organization, "Created")
            .len(),
        1
    );
}

#[test]
fn test_execute_rolls_back_partial_reservation() {
    let mut store: FakeStore = FakeStore::default();
    let first_org: OrganizationId = seed_organization(&mut store, "12345678");
    let second_org: OrganizationId = seed_organization(&mut store, "87654321");
    let free: GridAreaId = seed_grid_area(&mut store, "101");
    let taken: GridAreaId = seed_grid_area(&mut store, "102");
    seed_actor(
        &mut store,
        first_org,
        "5790000000001",
        EicFunction::GridAccessProvider,
        &[taken],
    );
    let mut provider: FakeProvider = FakeProvider { state: store.state };
    let audit_before: usize = provider.state.audit_log.len();

    // The free area is reserved before the taken one conflicts.
    let result: Result<CommandOutcome, CoreError> = execute(
        &mut provider,
        Command::CreateActor(new_test_actor(
            second_org,
            "5790000000002",
            EicFunction::GridAccessProvider,
            &[free, taken],
        )),
        ChangedBy::System,
        test_instant(),
    );

    assert!(matches!(result, Err(CoreError::Conflict { grid_area_id, .. }) if grid_area_id == taken));
    assert_eq!(provider.state.actors.len(), 1);
    assert!(
        !provider
            .state
            .reservations
            .contains_key(&(EicFunction::GridAccessProvider, free))
    );
    assert_eq!(provider.state.audit_log.len(), audit_before);
}

#[test]
fn test_execute_due_consolidations_command() {
    let mut store: FakeStore = FakeStore::default();
    let organization: OrganizationId = seed_organization(&mut store, "12345678");
    let grid_area: GridAreaId = seed_grid_area(&mut store, "101");
    let from: ActorId = seed_active_actor(
        &mut store,
        organization,
        "5790000000001",
        EicFunction::GridAccessProvider,
        &[grid_area],
    );
    let to: ActorId = seed_active_actor(
        &mut store,
        organization,
        "5790000000002",
        EicFunction::GridAccessProvider,
        &[],
    );
    let mut provider: FakeProvider = FakeProvider { state: store.state };

    execute(
        &mut provider,
        Command::ScheduleConsolidation {
            actor_from: from,
            actor_to: to,
            consolidate_at: test_instant() + Duration::days(1),
        },
        ChangedBy::System,
        test_instant(),
    )
    .unwrap();
    let outcome: CommandOutcome = execute(
        &mut provider,
        Command::ExecuteDueConsolidations,
        ChangedBy::System,
        test_instant() + Duration::days(2),
    )
    .unwrap();

    assert!(matches!(
        outcome,
        CommandOutcome::ConsolidationsExecuted(run)
            if run.executed.len() == 1 && run.failed.is_empty()
    ));
    assert_eq!(provider.state.actors[&from].status(), ActorStatus::Inactive);
    assert_eq!(
        provider
            .state
            .reservations
            .get(&(EicFunction::GridAccessProvider, grid_area)),
        Some(&to)
    );
}

#[test]
fn test_execute_invitation_commits_user() {
    let mut store: FakeStore = FakeStore::default();
    let organization: OrganizationId = seed_organization(&mut store, "12345678");
    let actor: ActorId = seed_active_actor(
        &mut store,
        organization,
        "5790000000001",
        EicFunction::EnergySupplier,
        &[],
    );
    let role: UserRoleId = seed_user_role(
        &mut store,
        "Reader",
        EicFunction::EnergySupplier,
        &[Permission::UsersView],
    );
    let mut provider: FakeProvider = FakeProvider { state: store.state };
    let mut directory: FakeDirectory = FakeDirectory::default();

    let user_id: UserId = execute_invitation(
        &mut provider,
        &mut directory,
        &test_invitation("person@test.dk", actor, &[role]),
        UserId::new(),
        test_instant(),
    )
    .unwrap();

    assert!(provider.state.users.contains_key(&user_id));
    assert_eq!(provider.state.email_events.len(), 1);
}

#[test]
fn test_command_names_are_stable() {
    assert_eq!(
        Command::ExecuteDueConsolidations.name(),
        "ExecuteDueConsolidations"
    );
    assert_eq!(
        Command::RemoveActorCredentials {
            actor_id: ActorId::new()
        }
        .name(),
        "RemoveActorCredentials"
    );
}

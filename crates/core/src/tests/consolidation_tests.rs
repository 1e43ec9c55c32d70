// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    FakeProvider, FakeStore, seed_active_actor, seed_grid_area, seed_organization, test_instant,
};
use crate::{
    AuditLogRepository, ConsolidationRun, CoreError, consolidate_due, execute_due_consolidations,
    schedule_consolidation,
};
use mp_registry_audit::{
    ActorConsolidationAuditLogEntry, ActorConsolidationAuditedChange, AuditLogKind, ChangedBy,
};
use mp_registry_domain::{
    ActorConsolidationId, ActorConsolidationStatus, ActorId, ActorMarketRole, ActorStatus,
    DomainError, DomainEvent, EicFunction, GridAreaId, OrganizationId,
};
use std::collections::BTreeSet;
use time::{Duration, OffsetDateTime};

struct GridAccessProviders {
    from: ActorId,
    to: ActorId,
    from_areas: Vec<GridAreaId>,
    to_areas: Vec<GridAreaId>,
}

fn seed_grid_access_providers(store: &mut FakeStore) -> GridAccessProviders {
    let organization: OrganizationId = seed_organization(store, "12345678");
    let from_areas: Vec<GridAreaId> = vec![
        seed_grid_area(store, "101"),
        seed_grid_area(store, "102"),
    ];
    let to_areas: Vec<GridAreaId> = vec![seed_grid_area(store, "201")];
    let from: ActorId = seed_active_actor(
        store,
        organization,
        "5790000000001",
        EicFunction::GridAccessProvider,
        &from_areas,
    );
    let to: ActorId = seed_active_actor(
        store,
        organization,
        "5790000000002",
        EicFunction::GridAccessProvider,
        &to_areas,
    );
    GridAccessProviders {
        from,
        to,
        from_areas,
        to_areas,
    }
}

#[test]
fn test_consolidation_transfers_every_grid_area() {
    let mut store: FakeStore = FakeStore::default();
    let actors: GridAccessProviders = seed_grid_access_providers(&mut store);
    let consolidate_at: OffsetDateTime = test_instant() + Duration::days(1);

    let consolidation_id: ActorConsolidationId = schedule_consolidation(
        &mut store,
        actors.from,
        actors.to,
        consolidate_at,
        ChangedBy::System,
        test_instant(),
    )
    .unwrap();
    store.state.domain_events.clear();

    let executed: Vec<ActorConsolidationId> =
        consolidate_due(&mut store, consolidate_at + Duration::hours(1)).unwrap();
    assert_eq!(executed, vec![consolidation_id]);

    let to_areas: BTreeSet<GridAreaId> = store.state.actors[&actors.to]
        .market_role()
        .grid_areas()
        .iter()
        .map(|grid_area| grid_area.grid_area_id)
        .collect();
    let expected: BTreeSet<GridAreaId> = actors
        .from_areas
        .iter()
        .chain(actors.to_areas.iter())
        .copied()
        .collect();
    assert_eq!(to_areas, expected);

    let from = &store.state.actors[&actors.from];
    assert!(from.market_role().grid_areas().is_empty());
    assert_eq!(from.status(), ActorStatus::Inactive);

    let completed: Vec<ActorConsolidationAuditLogEntry> =
        AuditLogRepository::<ActorConsolidationAuditedChange>::get_audit_log_entries(
            &mut store, actors.to,
        )
        .unwrap()
        .into_iter()
        .filter(|entry| entry.change == ActorConsolidationAuditedChange::ConsolidationCompleted)
        .collect();
    assert_eq!(completed.len(), actors.from_areas.len());
    assert!(completed.iter().all(|entry| {
        entry.previous_value.as_deref() == Some(actors.from.to_string().as_str())
            && entry.changed_by == ChangedBy::System
    }));

    for grid_area_id in &actors.from_areas {
        assert_eq!(
            store
                .state
                .reservations
                .get(&(EicFunction::GridAccessProvider, *grid_area_id)),
            Some(&actors.to)
        );
    }
    assert_eq!(store.state.domain_events.len(), 2);
    assert_eq!(
        store.state.consolidations[&consolidation_id].status(),
        ActorConsolidationStatus::Executed
    );
}

#[test]
fn test_consolidation_of_energy_supplier_transfers_nothing() {
    let mut store: FakeStore = FakeStore::default();
    let organization: OrganizationId = seed_organization(&mut store, "12345678");
    let grid_area: GridAreaId = seed_grid_area(&mut store, "101");
    let from: ActorId = seed_active_actor(
        &mut store,
        organization,
        "5790000000001",
        EicFunction::EnergySupplier,
        &[grid_area],
    );
    let to: ActorId = seed_active_actor(
        &mut store,
        organization,
        "5790000000002",
        EicFunction::EnergySupplier,
        &[],
    );
    schedule_consolidation(
        &mut store,
        from,
        to,
        test_instant(),
        ChangedBy::System,
        test_instant(),
    )
    .unwrap();
    store.state.domain_events.clear();

    consolidate_due(&mut store, test_instant()).unwrap();

    assert_eq!(store.state.actors[&from].status(), ActorStatus::Inactive);
    assert!(store.state.actors[&to].market_role().grid_areas().is_empty());
    assert!(
        store
            .state
            .audit_entries(AuditLogKind::ActorConsolidation, "ConsolidationCompleted")
            .is_empty()
    );

    let notified: Vec<ActorId> = store
        .state
        .domain_events
        .iter()
        .filter_map(|event| match event {
            DomainEvent::ActorConsolidationCompleted {
                actor_id,
                transferred_grid_areas,
                ..
            } if transferred_grid_areas.is_empty() => Some(*actor_id),
            _ => None,
        })
        .collect();
    assert_eq!(notified, vec![from, to]);
}

#[test]
fn test_schedule_records_request_on_both_actors() {
    let mut store: FakeStore = FakeStore::default();
    let actors: GridAccessProviders = seed_grid_access_providers(&mut store);

    schedule_consolidation(
        &mut store,
        actors.from,
        actors.to,
        test_instant() + Duration::days(30),
        ChangedBy::System,
        test_instant(),
    )
    .unwrap();

    let requested = store
        .state
        .audit_entries(AuditLogKind::ActorConsolidation, "ConsolidationRequested");
    let subjects: BTreeSet<String> = requested
        .iter()
        .map(|entry| entry.subject.clone())
        .collect();
    assert_eq!(
        subjects,
        BTreeSet::from([actors.from.to_string(), actors.to.to_string()])
    );
    assert!(
        store
            .state
            .consolidations
            .values()
            .all(|consolidation| consolidation.status() == ActorConsolidationStatus::Pending)
    );
}

#[test]
fn test_consolidation_not_due_is_left_pending() {
    let mut store: FakeStore = FakeStore::default();
    let actors: GridAccessProviders = seed_grid_access_providers(&mut store);
    schedule_consolidation(
        &mut store,
        actors.from,
        actors.to,
        test_instant() + Duration::days(1),
        ChangedBy::System,
        test_instant(),
    )
    .unwrap();

    let executed: Vec<ActorConsolidationId> =
        consolidate_due(&mut store, test_instant()).unwrap();

    assert!(executed.is_empty());
    assert_eq!(store.state.actors[&actors.from].status(), ActorStatus::Active);
}

#[test]
fn test_second_schedule_for_same_actor_is_rejected() {
    let mut store: FakeStore = FakeStore::default();
    let actors: GridAccessProviders = seed_grid_access_providers(&mut store);
    let consolidate_at: OffsetDateTime = test_instant() + Duration::days(1);
    schedule_consolidation(
        &mut store,
        actors.from,
        actors.to,
        consolidate_at,
        ChangedBy::System,
        test_instant(),
    )
    .unwrap();

    let result: Result<ActorConsolidationId, CoreError> = schedule_consolidation(
        &mut store,
        actors.from,
        actors.to,
        consolidate_at,
        ChangedBy::System,
        test_instant(),
    );

    assert!(matches!(
        result,
        Err(CoreError::Validation(DomainError::ConsolidationAlreadyScheduled(actor_id)))
            if actor_id == actors.from
    ));
}

#[test]
fn test_grid_access_provider_cannot_merge_into_energy_supplier() {
    let mut store: FakeStore = FakeStore::default();
    let actors: GridAccessProviders = seed_grid_access_providers(&mut store);
    let organization: OrganizationId = store.state.actors[&actors.from].organization_id();
    let supplier: ActorId = seed_active_actor(
        &mut store,
        organization,
        "5790000000003",
        EicFunction::EnergySupplier,
        &[],
    );

    let result: Result<ActorConsolidationId, CoreError> = schedule_consolidation(
        &mut store,
        actors.from,
        supplier,
        test_instant(),
        ChangedBy::System,
        test_instant(),
    );

    assert!(matches!(
        result,
        Err(CoreError::Validation(
            DomainError::ConsolidationTargetNotGridAccessProvider(_)
        ))
    ));
}

#[test]
fn test_consolidation_with_missing_actor_is_not_found() {
    let mut store: FakeStore = FakeStore::default();
    let actors: GridAccessProviders = seed_grid_access_providers(&mut store);

    let result: Result<ActorConsolidationId, CoreError> = schedule_consolidation(
        &mut store,
        actors.from,
        ActorId::new(),
        test_instant(),
        ChangedBy::System,
        test_instant(),
    );

    assert!(matches!(result, Err(CoreError::NotFound { entity: "Actor", .. })));
    assert!(store.state.consolidations.is_empty());
}

fn seed_energy_suppliers(store: &mut FakeStore) -> (ActorId, ActorId) {
    let organization: OrganizationId = seed_organization(store, "87654321");
    let from: ActorId = seed_active_actor(
        store,
        organization,
        "5790000000011",
        EicFunction::EnergySupplier,
        &[],
    );
    let to: ActorId = seed_active_actor(
        store,
        organization,
        "5790000000012",
        EicFunction::EnergySupplier,
        &[],
    );
    (from, to)
}

#[test]
fn test_target_function_changed_after_scheduling_still_receives_grid_areas() {
    let mut store: FakeStore = FakeStore::default();
    let actors: GridAccessProviders = seed_grid_access_providers(&mut store);
    let consolidation_id: ActorConsolidationId = schedule_consolidation(
        &mut store,
        actors.from,
        actors.to,
        test_instant(),
        ChangedBy::System,
        test_instant(),
    )
    .unwrap();
    store
        .state
        .actors
        .get_mut(&actors.to)
        .unwrap()
        .set_market_role(ActorMarketRole::new(EicFunction::EnergySupplier, vec![], None).unwrap());

    let executed: Vec<ActorConsolidationId> =
        consolidate_due(&mut store, test_instant() + Duration::days(1)).unwrap();

    assert_eq!(executed, vec![consolidation_id]);
    assert_eq!(store.state.actors[&actors.from].status(), ActorStatus::Inactive);
    let received: BTreeSet<GridAreaId> = store.state.actors[&actors.to]
        .market_role()
        .grid_areas()
        .iter()
        .map(|grid_area| grid_area.grid_area_id)
        .collect();
    assert_eq!(received, actors.from_areas.iter().copied().collect());
}

#[test]
fn test_failed_consolidation_does_not_block_later_ones() {
    let mut store: FakeStore = FakeStore::default();
    let actors: GridAccessProviders = seed_grid_access_providers(&mut store);
    let (supplier_from, supplier_to): (ActorId, ActorId) = seed_energy_suppliers(&mut store);
    let broken: ActorConsolidationId = schedule_consolidation(
        &mut store,
        actors.from,
        actors.to,
        test_instant(),
        ChangedBy::System,
        test_instant(),
    )
    .unwrap();
    let unrelated: ActorConsolidationId = schedule_consolidation(
        &mut store,
        supplier_from,
        supplier_to,
        test_instant() + Duration::hours(1),
        ChangedBy::System,
        test_instant(),
    )
    .unwrap();
    store.state.actors.remove(&actors.to);
    let mut provider: FakeProvider = FakeProvider { state: store.state };

    let run: ConsolidationRun =
        execute_due_consolidations(&mut provider, test_instant() + Duration::days(1)).unwrap();

    assert_eq!(run.executed, vec![unrelated]);
    assert_eq!(run.failed, vec![broken]);
    assert_eq!(
        provider.state.consolidations[&unrelated].status(),
        ActorConsolidationStatus::Executed
    );
    assert_eq!(
        provider.state.consolidations[&broken].status(),
        ActorConsolidationStatus::Pending
    );
    assert_eq!(provider.state.actors[&supplier_from].status(), ActorStatus::Inactive);
    let failed_source = &provider.state.actors[&actors.from];
    assert_eq!(failed_source.status(), ActorStatus::Active);
    assert_eq!(failed_source.market_role().grid_areas().len(), actors.from_areas.len());
}

#[test]
fn test_execute_due_consolidations_with_nothing_due() {
    let mut store: FakeStore = FakeStore::default();
    let actors: GridAccessProviders = seed_grid_access_providers(&mut store);
    schedule_consolidation(
        &mut store,
        actors.from,
        actors.to,
        test_instant() + Duration::days(1),
        ChangedBy::System,
        test_instant(),
    )
    .unwrap();
    let mut provider: FakeProvider = FakeProvider { state: store.state };

    let run: ConsolidationRun = execute_due_consolidations(&mut provider, test_instant()).unwrap();

    assert_eq!(run, ConsolidationRun::default());
}

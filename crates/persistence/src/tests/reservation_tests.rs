// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::Persistence;
use crate::tests::helpers::{seed_active_actor, seed_grid_area, seed_organization};
use mp_registry::{ReservationLedger, UnitOfWork, UnitOfWorkProvider};
use mp_registry_domain::{ActorId, EicFunction, GridAreaId, OrganizationId};

#[test]
fn test_try_reserve_is_exclusive_per_function_and_grid_area() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let grid_area_id: GridAreaId = GridAreaId::new();
    let first: ActorId = ActorId::new();
    let second: ActorId = ActorId::new();

    let mut unit_of_work = persistence.begin().unwrap();
    let first_result: bool = unit_of_work
        .try_reserve(first, EicFunction::GridAccessProvider, grid_area_id)
        .unwrap();
    let second_result: bool = unit_of_work
        .try_reserve(second, EicFunction::GridAccessProvider, grid_area_id)
        .unwrap();
    let same_actor_again: bool = unit_of_work
        .try_reserve(first, EicFunction::GridAccessProvider, grid_area_id)
        .unwrap();
    let other_function: bool = unit_of_work
        .try_reserve(second, EicFunction::MeteredDataResponsible, grid_area_id)
        .unwrap();
    unit_of_work.commit().unwrap();

    assert!(first_result);
    assert!(!second_result);
    assert!(!same_actor_again);
    assert!(other_function);
    assert_eq!(
        persistence
            .reservation_holder(EicFunction::GridAccessProvider, grid_area_id)
            .unwrap(),
        Some(first)
    );
}

#[test]
fn test_remove_all_reservations_frees_every_pair_of_the_actor() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let first_area: GridAreaId = GridAreaId::new();
    let second_area: GridAreaId = GridAreaId::new();
    let holder: ActorId = ActorId::new();
    let bystander: ActorId = ActorId::new();

    let mut unit_of_work = persistence.begin().unwrap();
    assert!(
        unit_of_work
            .try_reserve(holder, EicFunction::GridAccessProvider, first_area)
            .unwrap()
    );
    assert!(
        unit_of_work
            .try_reserve(holder, EicFunction::GridAccessProvider, second_area)
            .unwrap()
    );
    assert!(
        unit_of_work
            .try_reserve(bystander, EicFunction::MeteredDataResponsible, first_area)
            .unwrap()
    );
    unit_of_work.remove_all_reservations(holder).unwrap();
    let reserved_again: bool = unit_of_work
        .try_reserve(bystander, EicFunction::GridAccessProvider, first_area)
        .unwrap();
    unit_of_work.commit().unwrap();

    assert!(reserved_again);
    assert_eq!(
        persistence
            .reservation_holder(EicFunction::GridAccessProvider, second_area)
            .unwrap(),
        None
    );
    assert_eq!(
        persistence
            .reservation_holder(EicFunction::MeteredDataResponsible, first_area)
            .unwrap(),
        Some(bystander)
    );
}

#[test]
fn test_reservation_is_visible_to_other_connections() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let mut other: Persistence = persistence.new_connection().unwrap();
    let grid_area_id: GridAreaId = GridAreaId::new();
    let first: ActorId = ActorId::new();
    let second: ActorId = ActorId::new();

    let mut unit_of_work = persistence.begin().unwrap();
    assert!(
        unit_of_work
            .try_reserve(first, EicFunction::GridAccessProvider, grid_area_id)
            .unwrap()
    );
    unit_of_work.commit().unwrap();

    let mut unit_of_work = other.begin().unwrap();
    let reserved: bool = unit_of_work
        .try_reserve(second, EicFunction::GridAccessProvider, grid_area_id)
        .unwrap();
    unit_of_work.commit().unwrap();

    assert!(!reserved);
}

#[test]
fn test_rolled_back_reservation_is_released() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let grid_area_id: GridAreaId = GridAreaId::new();

    let mut unit_of_work = persistence.begin().unwrap();
    assert!(
        unit_of_work
            .try_reserve(ActorId::new(), EicFunction::GridAccessProvider, grid_area_id)
            .unwrap()
    );
    unit_of_work.rollback().unwrap();

    assert_eq!(
        persistence
            .reservation_holder(EicFunction::GridAccessProvider, grid_area_id)
            .unwrap(),
        None
    );
}

#[test]
fn test_activating_grid_access_provider_records_reservation() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let organization_id: OrganizationId = seed_organization(&mut persistence, "12345678");
    let grid_area_id: GridAreaId = seed_grid_area(&mut persistence, "101");

    let actor_id: ActorId = seed_active_actor(
        &mut persistence,
        organization_id,
        "5790000000001",
        EicFunction::GridAccessProvider,
        &[grid_area_id],
    );

    assert_eq!(
        persistence
            .reservation_holder(EicFunction::GridAccessProvider, grid_area_id)
            .unwrap(),
        Some(actor_id)
    );
}

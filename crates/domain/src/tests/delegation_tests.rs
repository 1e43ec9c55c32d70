// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::test_instant;
use crate::{
    ActorId, DelegatedProcess, DelegationMessageType, DelegationPeriodId, DomainError,
    GridAreaId, MessageDelegation, ProcessDelegation,
};
use time::Duration;

#[test]
fn test_delegating_to_self_is_rejected() {
    let delegated_by: ActorId = ActorId::new();
    let mut delegation: MessageDelegation =
        MessageDelegation::new(delegated_by, DelegationMessageType::Rsm012Inbound);

    let result: Result<DelegationPeriodId, DomainError> =
        delegation.add_period(delegated_by, GridAreaId::new(), test_instant());
    assert_eq!(result, Err(DomainError::SelfDelegation(delegated_by)));
    assert!(delegation.periods().is_empty());
}

#[test]
fn test_second_open_period_for_grid_area_is_rejected() {
    let grid_area_id: GridAreaId = GridAreaId::new();
    let mut delegation: ProcessDelegation =
        ProcessDelegation::new(ActorId::new(), DelegatedProcess::RequestEnergyResults);
    delegation
        .add_period(ActorId::new(), grid_area_id, test_instant())
        .unwrap();

    let result: Result<DelegationPeriodId, DomainError> =
        delegation.add_period(ActorId::new(), grid_area_id, test_instant());
    assert_eq!(result, Err(DomainError::DelegationPeriodOverlap(grid_area_id)));
}

#[test]
fn test_stopped_period_allows_new_period() {
    let grid_area_id: GridAreaId = GridAreaId::new();
    let mut delegation: MessageDelegation =
        MessageDelegation::new(ActorId::new(), DelegationMessageType::Rsm014Outbound);
    let period_id: DelegationPeriodId = delegation
        .add_period(ActorId::new(), grid_area_id, test_instant())
        .unwrap();

    delegation
        .period_mut(period_id)
        .unwrap()
        .stop(test_instant() + Duration::days(10))
        .unwrap();

    assert!(
        delegation
            .add_period(
                ActorId::new(),
                grid_area_id,
                test_instant() + Duration::days(10)
            )
            .is_ok()
    );
    assert_eq!(delegation.periods().len(), 2);
}

#[test]
fn test_period_cannot_stop_before_it_starts() {
    let mut delegation: MessageDelegation =
        MessageDelegation::new(ActorId::new(), DelegationMessageType::Rsm016Inbound);
    let period_id: DelegationPeriodId = delegation
        .add_period(ActorId::new(), GridAreaId::new(), test_instant())
        .unwrap();

    let period = delegation.period_mut(period_id).unwrap();
    let result: Result<(), DomainError> = period.stop(test_instant() - Duration::days(1));

    assert!(matches!(
        result,
        Err(DomainError::InvalidDelegationStop { .. })
    ));
    assert!(period.is_open());
}

#[test]
fn test_stopping_at_start_cancels_period() {
    let mut delegation: MessageDelegation =
        MessageDelegation::new(ActorId::new(), DelegationMessageType::Rsm017Outbound);
    let period_id: DelegationPeriodId = delegation
        .add_period(ActorId::new(), GridAreaId::new(), test_instant())
        .unwrap();

    let period = delegation.period_mut(period_id).unwrap();
    period.stop(test_instant()).unwrap();
    assert_eq!(period.stops_at, Some(period.starts_at));
}

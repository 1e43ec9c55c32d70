// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::audit_log::record;
use crate::error::{CoreError, StoreError};
use crate::lookup::{ensure_grid_areas_exist, load_actor};
use crate::repository::Store;
use mp_registry_audit::{ActorAuditLogEntry, ActorAuditedChange, ChangedBy};
use mp_registry_domain::{
    Actor, ActorId, DelegatedProcess, Delegation, DelegationMessageType, DelegationPeriod,
    DelegationPeriodId, DomainEvent, GridAreaId, MessageDelegationId, ProcessDelegationId,
    validate_delegation_actors,
};
use std::fmt::Display;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::info;

/// Request to delegate one or more subjects in one or more grid areas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDelegation<T> {
    pub delegated_by: ActorId,
    pub delegated_to: ActorId,
    pub subjects: Vec<T>,
    pub grid_area_ids: Vec<GridAreaId>,
    pub starts_at: OffsetDateTime,
}

pub type NewMessageDelegation = NewDelegation<DelegationMessageType>;
pub type NewProcessDelegation = NewDelegation<DelegatedProcess>;

/// What a delegation delegates, tying it to its repository and event.
trait DelegationSubject: Copy + Display + Sized {
    type Id: Copy + Default + Display;

    const ENTITY: &'static str;

    fn find<S: Store + ?Sized>(
        store: &mut S,
        delegated_by: ActorId,
        subject: Self,
    ) -> Result<Option<Delegation<Self::Id, Self>>, StoreError>;

    fn load<S: Store + ?Sized>(
        store: &mut S,
        id: Self::Id,
    ) -> Result<Option<Delegation<Self::Id, Self>>, StoreError>;

    fn save<S: Store + ?Sized>(
        store: &mut S,
        delegation: &Delegation<Self::Id, Self>,
    ) -> Result<Self::Id, StoreError>;

    fn configured(delegation: &Delegation<Self::Id, Self>, period: &DelegationPeriod)
    -> DomainEvent;
}

impl DelegationSubject for DelegationMessageType {
    type Id = MessageDelegationId;

    const ENTITY: &'static str = "MessageDelegation";

    fn find<S: Store + ?Sized>(
        store: &mut S,
        delegated_by: ActorId,
        subject: Self,
    ) -> Result<Option<Delegation<Self::Id, Self>>, StoreError> {
        store.get_message_delegation_for(delegated_by, subject)
    }

    fn load<S: Store + ?Sized>(
        store: &mut S,
        id: Self::Id,
    ) -> Result<Option<Delegation<Self::Id, Self>>, StoreError> {
        store.get_message_delegation(id)
    }

    fn save<S: Store + ?Sized>(
        store: &mut S,
        delegation: &Delegation<Self::Id, Self>,
    ) -> Result<Self::Id, StoreError> {
        store.add_or_update_message_delegation(delegation)
    }

    fn configured(
        delegation: &Delegation<Self::Id, Self>,
        period: &DelegationPeriod,
    ) -> DomainEvent {
        DomainEvent::MessageDelegationConfigured {
            delegation_id: delegation.id(),
            period_id: period.id,
            delegated_by: delegation.delegated_by(),
            delegated_to: period.delegated_to,
            message_type: delegation.subject(),
            grid_area_id: period.grid_area_id,
            starts_at: period.starts_at,
            stops_at: period.stops_at,
        }
    }
}

impl DelegationSubject for DelegatedProcess {
    type Id = ProcessDelegationId;

    const ENTITY: &'static str = "ProcessDelegation";

    fn find<S: Store + ?Sized>(
        store: &mut S,
        delegated_by: ActorId,
        subject: Self,
    ) -> Result<Option<Delegation<Self::Id, Self>>, StoreError> {
        store.get_process_delegation_for(delegated_by, subject)
    }

    fn load<S: Store + ?Sized>(
        store: &mut S,
        id: Self::Id,
    ) -> Result<Option<Delegation<Self::Id, Self>>, StoreError> {
        store.get_process_delegation(id)
    }

    fn save<S: Store + ?Sized>(
        store: &mut S,
        delegation: &Delegation<Self::Id, Self>,
    ) -> Result<Self::Id, StoreError> {
        store.add_or_update_process_delegation(delegation)
    }

    fn configured(
        delegation: &Delegation<Self::Id, Self>,
        period: &DelegationPeriod,
    ) -> DomainEvent {
        DomainEvent::ProcessDelegationConfigured {
            delegation_id: delegation.id(),
            period_id: period.id,
            delegated_by: delegation.delegated_by(),
            delegated_to: period.delegated_to,
            process: delegation.subject(),
            grid_area_id: period.grid_area_id,
            starts_at: period.starts_at,
            stops_at: period.stops_at,
        }
    }
}

/// Delegates message types from one active actor to another.
///
/// Opens one period per message type and grid area.
///
/// # Errors
///
/// Returns `CoreError::NotFound` for unknown actors or grid areas and
/// `CoreError::Validation` unless both actors are active, or if an open
/// period already exists for a message type and grid area.
pub fn create_message_delegation<S: Store + ?Sized>(
    store: &mut S,
    request: NewMessageDelegation,
    changed_by: ChangedBy,
    now: OffsetDateTime,
) -> Result<Vec<MessageDelegationId>, CoreError> {
    create_delegation(store, request, changed_by, now)
}

/// Delegates business processes from one active actor to another.
///
/// # Errors
///
/// See [`create_message_delegation`].
pub fn create_process_delegation<S: Store + ?Sized>(
    store: &mut S,
    request: NewProcessDelegation,
    changed_by: ChangedBy,
    now: OffsetDateTime,
) -> Result<Vec<ProcessDelegationId>, CoreError> {
    create_delegation(store, request, changed_by, now)
}

/// Stops a message delegation period at `stops_at`.
///
/// # Errors
///
/// Returns `CoreError::NotFound` if the delegation or the period does not
/// exist and `CoreError::Validation` if `stops_at` precedes the period start.
pub fn stop_message_delegation<S: Store + ?Sized>(
    store: &mut S,
    delegation_id: MessageDelegationId,
    period_id: DelegationPeriodId,
    stops_at: OffsetDateTime,
    changed_by: ChangedBy,
    now: OffsetDateTime,
) -> Result<(), CoreError> {
    stop_delegation::<DelegationMessageType, S>(
        store,
        delegation_id,
        period_id,
        stops_at,
        changed_by,
        now,
    )
}

/// Stops a process delegation period at `stops_at`.
///
/// # Errors
///
/// See [`stop_message_delegation`].
pub fn stop_process_delegation<S: Store + ?Sized>(
    store: &mut S,
    delegation_id: ProcessDelegationId,
    period_id: DelegationPeriodId,
    stops_at: OffsetDateTime,
    changed_by: ChangedBy,
    now: OffsetDateTime,
) -> Result<(), CoreError> {
    stop_delegation::<DelegatedProcess, S>(
        store,
        delegation_id,
        period_id,
        stops_at,
        changed_by,
        now,
    )
}

fn create_delegation<T, S>(
    store: &mut S,
    request: NewDelegation<T>,
    changed_by: ChangedBy,
    now: OffsetDateTime,
) -> Result<Vec<T::Id>, CoreError>
where
    T: DelegationSubject,
    S: Store + ?Sized,
{
    let delegated_by: Actor = load_actor(store, request.delegated_by)?;
    let delegated_to: Actor = load_actor(store, request.delegated_to)?;
    validate_delegation_actors(&delegated_by, &delegated_to)?;
    ensure_grid_areas_exist(store, request.grid_area_ids.iter().copied())?;

    let mut delegation_ids: Vec<T::Id> = Vec::with_capacity(request.subjects.len());
    for subject in request.subjects {
        let mut delegation: Delegation<T::Id, T> = T::find(store, delegated_by.id(), subject)?
            .unwrap_or_else(|| Delegation::new(delegated_by.id(), subject));

        let mut opened: Vec<DelegationPeriodId> = Vec::with_capacity(request.grid_area_ids.len());
        for grid_area_id in &request.grid_area_ids {
            opened.push(delegation.add_period(
                delegated_to.id(),
                *grid_area_id,
                request.starts_at,
            )?);
        }

        let delegation_id: T::Id = T::save(store, &delegation)?;
        for period in delegation
            .periods()
            .iter()
            .filter(|period| opened.contains(&period.id))
        {
            store.enqueue_domain_event(&T::configured(&delegation, period))?;
            record(
                store,
                ActorAuditLogEntry::new(
                    delegated_by.id(),
                    ActorAuditedChange::DelegationStart,
                    changed_by,
                    now,
                )
                .with_current(format!(
                    "{subject} to {} in {} from {}",
                    period.delegated_to,
                    period.grid_area_id,
                    format_instant(period.starts_at)
                )),
            )?;
        }

        info!(
            %delegation_id,
            delegated_by = %delegated_by.id(),
            delegated_to = %delegated_to.id(),
            %subject,
            periods = opened.len(),
            "Created delegation periods"
        );
        delegation_ids.push(delegation_id);
    }

    Ok(delegation_ids)
}

fn stop_delegation<T, S>(
    store: &mut S,
    delegation_id: T::Id,
    period_id: DelegationPeriodId,
    stops_at: OffsetDateTime,
    changed_by: ChangedBy,
    now: OffsetDateTime,
) -> Result<(), CoreError>
where
    T: DelegationSubject,
    S: Store + ?Sized,
{
    let mut delegation: Delegation<T::Id, T> = T::load(store, delegation_id)?
        .ok_or_else(|| CoreError::not_found(T::ENTITY, delegation_id))?;
    let period: &mut DelegationPeriod = delegation
        .period_mut(period_id)
        .ok_or_else(|| CoreError::not_found("DelegationPeriod", period_id))?;
    period.stop(stops_at)?;
    let period: DelegationPeriod = period.clone();

    T::save(store, &delegation)?;
    store.enqueue_domain_event(&T::configured(&delegation, &period))?;
    record(
        store,
        ActorAuditLogEntry::new(
            delegation.delegated_by(),
            ActorAuditedChange::DelegationStop,
            changed_by,
            now,
        )
        .with_current(format!(
            "{} to {} in {} until {}",
            delegation.subject(),
            period.delegated_to,
            period.grid_area_id,
            format_instant(stops_at)
        )),
    )?;

    info!(%delegation_id, %period_id, "Stopped delegation period");
    Ok(())
}

fn format_instant(instant: OffsetDateTime) -> String {
    instant
        .format(&Rfc3339)
        .unwrap_or_else(|_| instant.to_string())
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::audit_log::record;
use crate::error::CoreError;
use crate::lookup::load_actor;
use crate::repository::{ActorConsolidationRepository, Store, UnitOfWork, UnitOfWorkProvider};
use crate::rules::validate_and_reserve;
use mp_registry_audit::{
    ActorAuditLogEntry, ActorAuditedChange, ActorConsolidationAuditLogEntry,
    ActorConsolidationAuditedChange, ChangedBy,
};
use mp_registry_domain::{
    Actor, ActorConsolidation, ActorConsolidationId, ActorConsolidationStatus, ActorGridArea,
    ActorId, ActorStatus, DomainError, DomainEvent, GridAreaId,
};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info, warn};

/// Schedules `actor_from` to be consolidated into `actor_to` at `consolidate_at`.
///
/// # Errors
///
/// Returns `CoreError::NotFound` if either actor is missing and
/// `CoreError::Validation` if the actors are the same, `actor_from` already
/// has a pending consolidation, or a grid access provider would be merged
/// into an actor of another function.
pub fn schedule_consolidation<S: Store + ?Sized>(
    store: &mut S,
    actor_from: ActorId,
    actor_to: ActorId,
    consolidate_at: OffsetDateTime,
    changed_by: ChangedBy,
    now: OffsetDateTime,
) -> Result<ActorConsolidationId, CoreError> {
    let from: Actor = load_actor(store, actor_from)?;
    let to: Actor = load_actor(store, actor_to)?;
    let consolidation: ActorConsolidation =
        ActorConsolidation::new(actor_from, actor_to, consolidate_at)?;
    ensure_target_accepts_grid_areas(&from, &to)?;

    let already_scheduled: bool = store.get_actor_consolidations()?.iter().any(|existing| {
        existing.actor_from() == actor_from
            && existing.status() == ActorConsolidationStatus::Pending
    });
    if already_scheduled {
        return Err(DomainError::ConsolidationAlreadyScheduled(actor_from).into());
    }

    let consolidation_id: ActorConsolidationId =
        store.add_or_update_actor_consolidation(&consolidation)?;

    let scheduled: String = consolidate_at
        .format(&Rfc3339)
        .unwrap_or_else(|_| consolidate_at.to_string());
    for (subject, counterpart) in [(actor_from, actor_to), (actor_to, actor_from)] {
        record(
            store,
            ActorConsolidationAuditLogEntry::new(
                subject,
                ActorConsolidationAuditedChange::ConsolidationRequested,
                changed_by,
                now,
            )
            .with_current(format!("{counterpart} at {scheduled}")),
        )?;
    }

    info!(%consolidation_id, %actor_from, %actor_to, %scheduled, "Scheduled actor consolidation");
    Ok(consolidation_id)
}

/// Consolidates `consolidation.actor_from()` into `consolidation.actor_to()`.
///
/// A grid access provider's grid areas are merged into the target, one
/// `ConsolidationCompleted` audit entry is written per grid area of the
/// source, and the reservations follow the grid areas. The source becomes
/// `Inactive` whatever its function, and each side receives exactly one
/// `ActorConsolidationCompleted` event.
///
/// Both actors are loaded before anything is written.
///
/// # Errors
///
/// Returns `CoreError::NotFound` if either actor is missing and
/// `CoreError::Conflict` if the target cannot reserve a transferred grid
/// area.
pub fn consolidate<S: Store + ?Sized>(
    store: &mut S,
    consolidation: &ActorConsolidation,
    changed_by: ChangedBy,
    now: OffsetDateTime,
) -> Result<(), CoreError> {
    let mut from: Actor = load_actor(store, consolidation.actor_from())?;
    let mut to: Actor = load_actor(store, consolidation.actor_to())?;

    let transferred: Vec<ActorGridArea> = if from.market_role().function().reserves_grid_areas() {
        from.take_grid_areas()
    } else {
        Vec::new()
    };
    let transferred_ids: Vec<GridAreaId> = transferred
        .iter()
        .map(|grid_area| grid_area.grid_area_id)
        .collect();

    for grid_area in transferred {
        let grid_area_id: GridAreaId = grid_area.grid_area_id;
        let added: bool = to.merge_grid_area(grid_area);
        debug!(
            actor_from = %from.id(),
            actor_to = %to.id(),
            %grid_area_id,
            added,
            "Transferred grid area"
        );
        record(
            store,
            ActorConsolidationAuditLogEntry::new(
                to.id(),
                ActorConsolidationAuditedChange::ConsolidationCompleted,
                changed_by,
                now,
            )
            .with_current(grid_area_id.to_string())
            .with_previous(from.id().to_string()),
        )?;
    }

    let previous_status: ActorStatus = from.status();
    from.deactivate_for_consolidation();

    store.add_or_update_actor(&from)?;
    store.add_or_update_actor(&to)?;
    store.remove_all_reservations(from.id())?;
    if !transferred_ids.is_empty() {
        validate_and_reserve(store, &to)?;
    }

    if previous_status != ActorStatus::Inactive {
        record(
            store,
            ActorAuditLogEntry::new(from.id(), ActorAuditedChange::Status, changed_by, now)
                .with_current(ActorStatus::Inactive.as_str())
                .with_previous(previous_status.as_str()),
        )?;
    }

    for actor_id in [from.id(), to.id()] {
        store.enqueue_domain_event(&DomainEvent::ActorConsolidationCompleted {
            actor_id,
            consolidated_from: from.id(),
            consolidated_into: to.id(),
            transferred_grid_areas: transferred_ids.clone(),
            consolidated_at: now,
        })?;
    }

    info!(
        actor_from = %from.id(),
        actor_to = %to.id(),
        transferred = transferred_ids.len(),
        "Consolidated actors"
    );
    Ok(())
}

/// Outcome of a run over the due consolidations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsolidationRun {
    pub executed: Vec<ActorConsolidationId>,
    /// Due consolidations that failed and were left pending.
    pub failed: Vec<ActorConsolidationId>,
}

/// Pending consolidations scheduled at or before `now`, in schedule order.
///
/// # Errors
///
/// Returns `CoreError::Infrastructure` if the consolidations cannot be read.
pub fn due_consolidations<S: ActorConsolidationRepository + ?Sized>(
    store: &mut S,
    now: OffsetDateTime,
) -> Result<Vec<ActorConsolidation>, CoreError> {
    let mut due: Vec<ActorConsolidation> = store
        .get_actor_consolidations()?
        .into_iter()
        .filter(|consolidation| consolidation.is_due(now))
        .collect();
    due.sort_by_key(ActorConsolidation::consolidate_at);
    Ok(due)
}

/// Carries out one consolidation as the system and marks it executed.
///
/// # Errors
///
/// See [`consolidate`].
pub fn execute_consolidation<S: Store + ?Sized>(
    store: &mut S,
    mut consolidation: ActorConsolidation,
    now: OffsetDateTime,
) -> Result<ActorConsolidationId, CoreError> {
    consolidate(store, &consolidation, ChangedBy::System, now)?;
    consolidation.mark_executed()?;
    Ok(store.add_or_update_actor_consolidation(&consolidation)?)
}

/// Executes every due consolidation inside one store, failing on the first
/// consolidation that fails.
///
/// # Errors
///
/// See [`consolidate`].
pub fn consolidate_due<S: Store + ?Sized>(
    store: &mut S,
    now: OffsetDateTime,
) -> Result<Vec<ActorConsolidationId>, CoreError> {
    let due: Vec<ActorConsolidation> = due_consolidations(store, now)?;
    let mut executed: Vec<ActorConsolidationId> = Vec::with_capacity(due.len());
    for consolidation in due {
        executed.push(execute_consolidation(store, consolidation, now)?);
    }

    info!(count = executed.len(), "Executed due actor consolidations");
    Ok(executed)
}

/// Executes every due consolidation, each in its own unit of work.
///
/// A consolidation that fails validation or lookup is rolled back, logged
/// and left pending; the rest of the run continues.
///
/// # Errors
///
/// Returns `CoreError::Infrastructure` if a unit of work cannot begin or
/// commit, or the store fails.
pub fn execute_due_consolidations<P: UnitOfWorkProvider + ?Sized>(
    provider: &mut P,
    now: OffsetDateTime,
) -> Result<ConsolidationRun, CoreError> {
    let due: Vec<ActorConsolidation> = {
        let mut unit_of_work = provider.begin()?;
        let due: Vec<ActorConsolidation> = due_consolidations(&mut unit_of_work, now)?;
        unit_of_work.rollback()?;
        due
    };

    let mut run: ConsolidationRun = ConsolidationRun::default();
    for consolidation in due {
        let consolidation_id: ActorConsolidationId = consolidation.id();
        let mut unit_of_work = provider.begin()?;
        match execute_consolidation(&mut unit_of_work, consolidation, now) {
            Ok(_) => {
                unit_of_work.commit()?;
                run.executed.push(consolidation_id);
            }
            Err(CoreError::Infrastructure(e)) => return Err(CoreError::Infrastructure(e)),
            Err(e) => {
                unit_of_work.rollback()?;
                warn!(%consolidation_id, error = %e, "Consolidation failed and stays pending");
                run.failed.push(consolidation_id);
            }
        }
    }

    info!(
        executed = run.executed.len(),
        failed = run.failed.len(),
        "Executed due actor consolidations"
    );
    Ok(run)
}

fn ensure_target_accepts_grid_areas(from: &Actor, to: &Actor) -> Result<(), CoreError> {
    if from.market_role().function().reserves_grid_areas()
        && to.market_role().function() != from.market_role().function()
    {
        return Err(DomainError::ConsolidationTargetNotGridAccessProvider(to.id()).into());
    }
    Ok(())
}

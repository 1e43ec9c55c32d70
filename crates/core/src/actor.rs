// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::audit_log::{market_role_value, record};
use crate::error::CoreError;
use crate::lookup::{ensure_grid_areas_exist, load_actor, load_organization};
use crate::repository::Store;
use crate::rules::{
    ensure_market_role_change_allowed, ensure_unique_eic_functions, validate_and_reserve,
};
use mp_registry_audit::{ActorAuditLogEntry, ActorAuditedChange, ChangedBy};
use mp_registry_domain::{
    Actor, ActorCredentials, ActorId, ActorMarketRole, ActorName, ActorNumber, ActorStatus,
    DomainEvent, Organization, OrganizationId, OrganizationStatus,
};
use time::OffsetDateTime;
use tracing::{debug, info};

/// Data for a new actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActor {
    pub organization_id: OrganizationId,
    pub actor_number: ActorNumber,
    pub name: ActorName,
    pub market_role: ActorMarketRole,
}

/// Replacement name and market role for an actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorUpdate {
    pub actor_id: ActorId,
    pub name: ActorName,
    pub market_role: ActorMarketRole,
}

/// Creates an actor in status `New` and reserves its grid areas.
///
/// # Errors
///
/// Returns `CoreError::NotFound` for an unknown organization or grid area,
/// `CoreError::Validation` if the function overlaps another actor's, and
/// `CoreError::Conflict` if a grid area is held by another grid access
/// provider.
pub fn create_actor<S: Store + ?Sized>(
    store: &mut S,
    new_actor: NewActor,
    changed_by: ChangedBy,
    now: OffsetDateTime,
) -> Result<ActorId, CoreError> {
    let organization: Organization = load_organization(store, new_actor.organization_id)?;
    if organization.status() == OrganizationStatus::Deleted {
        return Err(CoreError::not_found("Organization", organization.id()));
    }
    ensure_grid_areas_exist(
        store,
        new_actor
            .market_role
            .grid_areas()
            .iter()
            .map(|grid_area| grid_area.grid_area_id),
    )?;

    let actor: Actor = Actor::new(
        organization.id(),
        new_actor.actor_number,
        new_actor.name,
        new_actor.market_role,
    );
    ensure_unique_eic_functions(store, &actor)?;
    validate_and_reserve(store, &actor)?;

    let actor_id: ActorId = store.add_or_update_actor(&actor)?;
    record(
        store,
        ActorAuditLogEntry::new(actor_id, ActorAuditedChange::Created, changed_by, now)
            .with_current(actor.actor_number().value()),
    )?;

    info!(
        %actor_id,
        actor_number = %actor.actor_number(),
        function = %actor.market_role().function(),
        "Created actor"
    );
    Ok(actor_id)
}

/// Updates an actor's name and market role.
///
/// The market role change is checked against the persisted actor first,
/// then function overlap, then grid area reservations.
///
/// # Errors
///
/// Returns `CoreError::NotFound` for an unknown actor or grid area,
/// `CoreError::Validation` for a disallowed change, and `CoreError::Conflict`
/// if a grid area is held by another grid access provider.
pub fn update_actor<S: Store + ?Sized>(
    store: &mut S,
    update: ActorUpdate,
    changed_by: ChangedBy,
    now: OffsetDateTime,
) -> Result<(), CoreError> {
    let previous: Actor = load_actor(store, update.actor_id)?;
    let mut actor: Actor = previous.clone();
    actor.set_name(update.name);
    actor.set_market_role(update.market_role);

    ensure_market_role_change_allowed(store, &actor)?;
    ensure_unique_eic_functions(store, &actor)?;
    ensure_grid_areas_exist(
        store,
        actor
            .market_role()
            .grid_areas()
            .iter()
            .map(|grid_area| grid_area.grid_area_id),
    )?;
    validate_and_reserve(store, &actor)?;

    store.add_or_update_actor(&actor)?;

    if actor.name() != previous.name() {
        record(
            store,
            ActorAuditLogEntry::new(actor.id(), ActorAuditedChange::Name, changed_by, now)
                .with_current(actor.name().value())
                .with_previous(previous.name().value()),
        )?;
    }
    if actor.market_role() != previous.market_role() {
        record(
            store,
            ActorAuditLogEntry::new(actor.id(), ActorAuditedChange::MarketRole, changed_by, now)
                .with_current(market_role_value(actor.market_role()))
                .with_previous(market_role_value(previous.market_role())),
        )?;
    }

    info!(actor_id = %actor.id(), "Updated actor");
    Ok(())
}

/// Moves an actor to another status.
///
/// Activation of a new actor enqueues `ActorActivated` and, for grid access
/// providers, one `GridAreaOwnershipAssigned` per grid area.
///
/// # Errors
///
/// Returns `CoreError::NotFound` for an unknown actor and
/// `CoreError::Validation` for a disallowed transition.
pub fn change_actor_status<S: Store + ?Sized>(
    store: &mut S,
    actor_id: ActorId,
    target: ActorStatus,
    changed_by: ChangedBy,
    now: OffsetDateTime,
) -> Result<(), CoreError> {
    let mut actor: Actor = load_actor(store, actor_id)?;
    let previous: ActorStatus = actor.status();

    let events: Vec<DomainEvent> = if previous == ActorStatus::New && target == ActorStatus::Active
    {
        actor.activate(now)?
    } else {
        actor.transition_to(target)?;
        Vec::new()
    };

    store.add_or_update_actor(&actor)?;
    for event in &events {
        store.enqueue_domain_event(event)?;
    }
    record(
        store,
        ActorAuditLogEntry::new(actor_id, ActorAuditedChange::Status, changed_by, now)
            .with_current(target.as_str())
            .with_previous(previous.as_str()),
    )?;

    info!(%actor_id, from = %previous, to = %target, "Changed actor status");
    Ok(())
}

/// Activates a new actor.
///
/// # Errors
///
/// See [`change_actor_status`].
pub fn activate_actor<S: Store + ?Sized>(
    store: &mut S,
    actor_id: ActorId,
    changed_by: ChangedBy,
    now: OffsetDateTime,
) -> Result<(), CoreError> {
    change_actor_status(store, actor_id, ActorStatus::Active, changed_by, now)
}

/// Assigns credentials issued by the external directory.
///
/// # Errors
///
/// Returns `CoreError::NotFound` for an unknown actor and
/// `CoreError::Validation` if the actor already has credentials.
pub fn assign_actor_credentials<S: Store + ?Sized>(
    store: &mut S,
    actor_id: ActorId,
    credentials: ActorCredentials,
    changed_by: ChangedBy,
    now: OffsetDateTime,
) -> Result<(), CoreError> {
    let mut actor: Actor = load_actor(store, actor_id)?;
    let (change, value): (ActorAuditedChange, String) = credentials_audit(&credentials);
    actor.assign_credentials(credentials)?;
    store.add_or_update_actor(&actor)?;

    record(
        store,
        ActorAuditLogEntry::new(actor_id, change, changed_by, now).with_current(value),
    )?;

    info!(%actor_id, %change, "Assigned actor credentials");
    Ok(())
}

/// Removes an actor's credentials, if any.
///
/// # Errors
///
/// Returns `CoreError::NotFound` for an unknown actor.
pub fn remove_actor_credentials<S: Store + ?Sized>(
    store: &mut S,
    actor_id: ActorId,
    changed_by: ChangedBy,
    now: OffsetDateTime,
) -> Result<(), CoreError> {
    let mut actor: Actor = load_actor(store, actor_id)?;
    let Some(credentials) = actor.credentials().cloned() else {
        debug!(%actor_id, "Actor has no credentials to remove");
        return Ok(());
    };

    let event: Option<DomainEvent> = actor.remove_credentials();
    store.add_or_update_actor(&actor)?;
    if let Some(event) = event {
        store.enqueue_domain_event(&event)?;
    }

    let (change, value): (ActorAuditedChange, String) = credentials_audit(&credentials);
    record(
        store,
        ActorAuditLogEntry::new(actor_id, change, changed_by, now).with_previous(value),
    )?;

    info!(%actor_id, "Removed actor credentials");
    Ok(())
}

fn credentials_audit(credentials: &ActorCredentials) -> (ActorAuditedChange, String) {
    match credentials {
        ActorCredentials::Certificate { thumbprint, .. } => {
            (ActorAuditedChange::CertificateCredentials, thumbprint.clone())
        }
        ActorCredentials::ClientSecret {
            secret_identifier, ..
        } => (
            ActorAuditedChange::ClientSecretCredentials,
            secret_identifier.clone(),
        ),
    }
}

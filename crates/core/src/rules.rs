// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rule services: load the snapshot a rule needs, then decide.
//!
//! Apart from [`validate_and_reserve`], nothing here writes.

use crate::error::CoreError;
use crate::repository::{
    ActorRepository, OrganizationRepository, ReservationLedger, UserRepository,
    UserRoleRepository,
};
use mp_registry_domain::{
    Actor, EicFunction, EmailAddress, Organization, UserRole,
    validate_business_register_identifier_unique, validate_eic_functions_across_actors,
    validate_email_domain, validate_market_role_change, validate_required_permissions,
};
use tracing::{debug, warn};

/// Checks that no other actor in the candidate's organization with the same
/// actor number already holds the candidate's function.
///
/// # Errors
///
/// Returns `CoreError::Validation` on an overlap.
pub fn ensure_unique_eic_functions<S>(store: &mut S, candidate: &Actor) -> Result<(), CoreError>
where
    S: ActorRepository + ?Sized,
{
    let organization_actors: Vec<Actor> =
        store.get_actors_by_organization(candidate.organization_id())?;
    validate_eic_functions_across_actors(candidate, &organization_actors)?;
    Ok(())
}

/// Replaces the actor's reservations with one per grid area it holds as a
/// grid access provider.
///
/// Existing reservations for the actor are cleared first. Reservations are
/// attempted sequentially in grid area order. On a conflict the reservations
/// already made are left in place; the surrounding unit of work is
/// responsible for rolling them back.
///
/// # Errors
///
/// Returns `CoreError::Conflict` when another actor holds one of the grid areas.
pub fn validate_and_reserve<S>(store: &mut S, actor: &Actor) -> Result<(), CoreError>
where
    S: ReservationLedger + ?Sized,
{
    store.remove_all_reservations(actor.id())?;

    let function: EicFunction = actor.market_role().function();
    if !function.reserves_grid_areas() {
        return Ok(());
    }

    for grid_area in actor.market_role().grid_areas() {
        if !store.try_reserve(actor.id(), function, grid_area.grid_area_id)? {
            warn!(
                actor_id = %actor.id(),
                grid_area_id = %grid_area.grid_area_id,
                %function,
                "Grid area reservation rejected"
            );
            return Err(CoreError::Conflict {
                actor_id: actor.id(),
                function,
                grid_area_id: grid_area.grid_area_id,
            });
        }
        debug!(
            actor_id = %actor.id(),
            grid_area_id = %grid_area.grid_area_id,
            "Reserved grid area"
        );
    }

    Ok(())
}

/// Checks an actor's market role change against its last persisted version.
///
/// # Errors
///
/// Returns `CoreError::NotFound` if the actor was never persisted and
/// `CoreError::Validation` if an operational actor would lose a grid area,
/// a metering point type, or its function.
pub fn ensure_market_role_change_allowed<S>(store: &mut S, updated: &Actor) -> Result<(), CoreError>
where
    S: ActorRepository + ?Sized,
{
    let persisted: Actor = store
        .get_actor(updated.id())?
        .ok_or_else(|| CoreError::not_found("Actor", updated.id()))?;
    validate_market_role_change(&persisted, updated)?;
    Ok(())
}

/// Checks that no other live organization uses the candidate's business
/// register identifier.
///
/// # Errors
///
/// Returns `CoreError::Validation` on a clash.
pub fn ensure_unique_business_register_identifier<S>(
    store: &mut S,
    candidate: &Organization,
) -> Result<(), CoreError>
where
    S: OrganizationRepository + ?Sized,
{
    let organizations: Vec<Organization> = store.get_organizations()?;
    validate_business_register_identifier_unique(candidate, &organizations)?;
    Ok(())
}

/// Checks that changing a user role from `before` to `after` leaves every
/// required permission granted by some active role.
///
/// # Errors
///
/// Returns `CoreError::Validation` naming the permission that would be lost.
pub fn ensure_required_permissions_kept<S>(
    store: &mut S,
    before: &UserRole,
    after: &UserRole,
) -> Result<(), CoreError>
where
    S: UserRepository + UserRoleRepository + ?Sized,
{
    let role_in_use: bool = !store.get_users_with_role(before.id())?.is_empty();
    let all_roles: Vec<UserRole> = store.get_user_roles()?;
    validate_required_permissions(before, after, &all_roles, role_in_use)?;
    Ok(())
}

/// Checks that the email belongs to one of the organization's domains.
///
/// # Errors
///
/// Returns `CoreError::Validation` otherwise.
pub fn ensure_email_in_organization_domain(
    email: &EmailAddress,
    organization: &Organization,
) -> Result<(), CoreError> {
    validate_email_domain(email, organization)?;
    Ok(())
}

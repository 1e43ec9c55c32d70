// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::repository::{
    ActorRepository, GridAreaRepository, OrganizationRepository, UserRepository,
    UserRoleRepository,
};
use mp_registry_domain::{
    Actor, ActorId, GridArea, GridAreaId, Organization, OrganizationId, User, UserId, UserRole,
    UserRoleId,
};

pub fn load_actor<S: ActorRepository + ?Sized>(
    store: &mut S,
    id: ActorId,
) -> Result<Actor, CoreError> {
    store
        .get_actor(id)?
        .ok_or_else(|| CoreError::not_found("Actor", id))
}

pub fn load_organization<S: OrganizationRepository + ?Sized>(
    store: &mut S,
    id: OrganizationId,
) -> Result<Organization, CoreError> {
    store
        .get_organization(id)?
        .ok_or_else(|| CoreError::not_found("Organization", id))
}

pub fn load_grid_area<S: GridAreaRepository + ?Sized>(
    store: &mut S,
    id: GridAreaId,
) -> Result<GridArea, CoreError> {
    store
        .get_grid_area(id)?
        .ok_or_else(|| CoreError::not_found("GridArea", id))
}

pub fn load_user<S: UserRepository + ?Sized>(store: &mut S, id: UserId) -> Result<User, CoreError> {
    store
        .get_user(id)?
        .ok_or_else(|| CoreError::not_found("User", id))
}

pub fn load_user_role<S: UserRoleRepository + ?Sized>(
    store: &mut S,
    id: UserRoleId,
) -> Result<UserRole, CoreError> {
    store
        .get_user_role(id)?
        .ok_or_else(|| CoreError::not_found("UserRole", id))
}

/// Fails with `NotFound` on the first grid area that does not exist.
pub fn ensure_grid_areas_exist<S, I>(store: &mut S, grid_area_ids: I) -> Result<(), CoreError>
where
    S: GridAreaRepository + ?Sized,
    I: IntoIterator<Item = GridAreaId>,
{
    for grid_area_id in grid_area_ids {
        load_grid_area(store, grid_area_id)?;
    }
    Ok(())
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use mp_registry_domain::{Actor, ActorId, EicFunction, GridAreaId, OrganizationId};

use crate::data_models::{ActorGridAreaRow, ActorRow, parse_stored};
use crate::diesel_schema::{actor_grid_areas, actors, grid_area_reservations};
use crate::error::PersistenceError;

fn load_actor(conn: &mut SqliteConnection, row: ActorRow) -> Result<Actor, PersistenceError> {
    let grid_areas: Vec<ActorGridAreaRow> = actor_grid_areas::table
        .filter(actor_grid_areas::actor_id.eq(&row.id))
        .order(actor_grid_areas::position.asc())
        .select(ActorGridAreaRow::as_select())
        .load(conn)?;

    row.into_domain(grid_areas)
}

/// Retrieves an actor with its market role and credentials.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `id` - The actor to load
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is invalid.
/// Returns `Ok(None)` if the actor does not exist.
pub fn get_actor(
    conn: &mut SqliteConnection,
    id: ActorId,
) -> Result<Option<Actor>, PersistenceError> {
    let result: Result<ActorRow, diesel::result::Error> = actors::table
        .filter(actors::id.eq(id.to_string()))
        .select(ActorRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(load_actor(conn, row)?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Retrieves every actor owned by an organization, in any status.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is invalid.
pub fn get_actors_by_organization(
    conn: &mut SqliteConnection,
    organization_id: OrganizationId,
) -> Result<Vec<Actor>, PersistenceError> {
    let rows: Vec<ActorRow> = actors::table
        .filter(actors::organization_id.eq(organization_id.to_string()))
        .order(actors::id.asc())
        .select(ActorRow::as_select())
        .load(conn)?;

    rows.into_iter().map(|row| load_actor(conn, row)).collect()
}

/// Returns the actor holding the (function, grid area) reservation, if any.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is invalid.
pub fn get_reservation_holder(
    conn: &mut SqliteConnection,
    function: EicFunction,
    grid_area_id: GridAreaId,
) -> Result<Option<ActorId>, PersistenceError> {
    let result: Result<String, diesel::result::Error> = grid_area_reservations::table
        .filter(grid_area_reservations::eic_function.eq(function.as_str()))
        .filter(grid_area_reservations::grid_area_id.eq(grid_area_id.to_string()))
        .select(grid_area_reservations::actor_id)
        .first(conn);

    match result {
        Ok(actor_id) => Ok(Some(parse_stored("grid_area_reservations", &actor_id)?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use mp_registry_domain::{Actor, ActorId};
use tracing::debug;

use crate::data_models::{ActorGridAreaRow, ActorRow};
use crate::diesel_schema::{actor_grid_areas, actors};
use crate::error::PersistenceError;

/// Inserts or updates an actor and replaces its market role grid areas.
///
/// Reservations are not touched; they are owned by the reservation ledger.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `actor` - The actor to save
///
/// # Errors
///
/// Returns an error if the database operation fails, including a foreign
/// key violation for an unknown organization or grid area.
pub fn upsert_actor(conn: &mut SqliteConnection, actor: &Actor) -> Result<ActorId, PersistenceError> {
    let row: ActorRow = ActorRow::from_domain(actor)?;
    diesel::insert_into(actors::table)
        .values(&row)
        .on_conflict(actors::id)
        .do_update()
        .set(&row)
        .execute(conn)?;

    diesel::delete(actor_grid_areas::table.filter(actor_grid_areas::actor_id.eq(&row.id)))
        .execute(conn)?;
    let grid_areas: Vec<ActorGridAreaRow> = ActorRow::grid_area_rows(actor);
    if !grid_areas.is_empty() {
        diesel::insert_into(actor_grid_areas::table)
            .values(&grid_areas)
            .execute(conn)?;
    }

    debug!(
        actor_id = %actor.id(),
        status = %actor.status(),
        grid_areas = grid_areas.len(),
        "Saved actor"
    );
    Ok(actor.id())
}

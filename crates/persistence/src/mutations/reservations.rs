// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use mp_registry_domain::{ActorId, EicFunction, GridAreaId};
use tracing::debug;

use crate::data_models::ReservationRow;
use crate::diesel_schema::grid_area_reservations;
use crate::error::PersistenceError;

/// Reserves a (function, grid area) pair for an actor.
///
/// The primary key on (function, grid area) is the arbiter: the insert is
/// `ON CONFLICT DO NOTHING`, and the affected row count tells whether this
/// call took the pair.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn try_reserve(
    conn: &mut SqliteConnection,
    actor_id: ActorId,
    function: EicFunction,
    grid_area_id: GridAreaId,
) -> Result<bool, PersistenceError> {
    let row: ReservationRow = ReservationRow {
        eic_function: function.to_string(),
        grid_area_id: grid_area_id.to_string(),
        actor_id: actor_id.to_string(),
    };

    let inserted: usize = diesel::insert_into(grid_area_reservations::table)
        .values(&row)
        .on_conflict_do_nothing()
        .execute(conn)?;

    debug!(
        actor_id = %actor_id,
        function = %function,
        grid_area_id = %grid_area_id,
        reserved = inserted == 1,
        "Attempted grid area reservation"
    );
    Ok(inserted == 1)
}

/// Releases every reservation held by an actor.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn remove_all_reservations(
    conn: &mut SqliteConnection,
    actor_id: ActorId,
) -> Result<(), PersistenceError> {
    let removed: usize = diesel::delete(
        grid_area_reservations::table
            .filter(grid_area_reservations::actor_id.eq(actor_id.to_string())),
    )
    .execute(conn)?;

    debug!(actor_id = %actor_id, removed, "Removed grid area reservations");
    Ok(())
}

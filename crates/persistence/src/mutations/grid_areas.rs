// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use mp_registry_domain::{GridArea, GridAreaId};
use tracing::debug;

use crate::data_models::GridAreaRow;
use crate::diesel_schema::grid_areas;
use crate::error::PersistenceError;

/// Inserts or updates a grid area.
///
/// # Errors
///
/// Returns an error if the database operation fails, including a unique
/// violation when another grid area already uses the code.
pub fn upsert_grid_area(
    conn: &mut SqliteConnection,
    grid_area: &GridArea,
) -> Result<GridAreaId, PersistenceError> {
    let row: GridAreaRow = GridAreaRow::from_domain(grid_area)?;
    diesel::insert_into(grid_areas::table)
        .values(&row)
        .on_conflict(grid_areas::id)
        .do_update()
        .set(&row)
        .execute(conn)?;

    debug!(grid_area_id = %grid_area.id(), code = %grid_area.code().value(), "Saved grid area");
    Ok(grid_area.id())
}

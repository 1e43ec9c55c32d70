// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use mp_registry_domain::{GridArea, GridAreaId};

use crate::data_models::GridAreaRow;
use crate::diesel_schema::grid_areas;
use crate::error::PersistenceError;

/// Retrieves a grid area.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is invalid.
/// Returns `Ok(None)` if the grid area does not exist.
pub fn get_grid_area(
    conn: &mut SqliteConnection,
    id: GridAreaId,
) -> Result<Option<GridArea>, PersistenceError> {
    let result: Result<GridAreaRow, diesel::result::Error> = grid_areas::table
        .filter(grid_areas::id.eq(id.to_string()))
        .select(GridAreaRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_domain()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Retrieves every grid area, ordered by code.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is invalid.
pub fn get_grid_areas(conn: &mut SqliteConnection) -> Result<Vec<GridArea>, PersistenceError> {
    let rows: Vec<GridAreaRow> = grid_areas::table
        .order(grid_areas::code.asc())
        .select(GridAreaRow::as_select())
        .load(conn)?;

    rows.into_iter().map(GridAreaRow::into_domain).collect()
}

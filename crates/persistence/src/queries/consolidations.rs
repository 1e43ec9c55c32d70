// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use mp_registry_domain::{ActorConsolidation, ActorConsolidationId};

use crate::data_models::ActorConsolidationRow;
use crate::diesel_schema::actor_consolidations;
use crate::error::PersistenceError;

/// Retrieves an actor consolidation.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is invalid.
/// Returns `Ok(None)` if the consolidation does not exist.
pub fn get_actor_consolidation(
    conn: &mut SqliteConnection,
    id: ActorConsolidationId,
) -> Result<Option<ActorConsolidation>, PersistenceError> {
    let result: Result<ActorConsolidationRow, diesel::result::Error> =
        actor_consolidations::table
            .filter(actor_consolidations::id.eq(id.to_string()))
            .select(ActorConsolidationRow::as_select())
            .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_domain()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Retrieves every actor consolidation, ordered by scheduled instant.
///
/// Ordering happens after parsing since RFC 3339 text with differing
/// fractional precision does not sort lexically.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is invalid.
pub fn get_actor_consolidations(
    conn: &mut SqliteConnection,
) -> Result<Vec<ActorConsolidation>, PersistenceError> {
    let rows: Vec<ActorConsolidationRow> = actor_consolidations::table
        .select(ActorConsolidationRow::as_select())
        .load(conn)?;

    let mut consolidations: Vec<ActorConsolidation> = rows
        .into_iter()
        .map(ActorConsolidationRow::into_domain)
        .collect::<Result<_, _>>()?;
    consolidations.sort_by_key(|consolidation| (consolidation.consolidate_at(), consolidation.id()));

    Ok(consolidations)
}

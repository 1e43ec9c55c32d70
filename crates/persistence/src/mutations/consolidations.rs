// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use mp_registry_domain::{ActorConsolidation, ActorConsolidationId};
use tracing::debug;

use crate::data_models::ActorConsolidationRow;
use crate::diesel_schema::actor_consolidations;
use crate::error::PersistenceError;

/// Inserts or updates an actor consolidation.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn upsert_actor_consolidation(
    conn: &mut SqliteConnection,
    consolidation: &ActorConsolidation,
) -> Result<ActorConsolidationId, PersistenceError> {
    let row: ActorConsolidationRow = ActorConsolidationRow::from_domain(consolidation)?;
    diesel::insert_into(actor_consolidations::table)
        .values(&row)
        .on_conflict(actor_consolidations::id)
        .do_update()
        .set(&row)
        .execute(conn)?;

    debug!(
        consolidation_id = %consolidation.id(),
        status = %consolidation.status(),
        "Saved actor consolidation"
    );
    Ok(consolidation.id())
}

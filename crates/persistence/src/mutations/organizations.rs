// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use mp_registry_domain::{Organization, OrganizationId};
use tracing::debug;

use crate::data_models::{OrganizationDomainRow, OrganizationRow};
use crate::diesel_schema::{organization_domains, organizations};
use crate::error::PersistenceError;

/// Inserts or updates an organization and replaces its domains.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `organization` - The organization to save
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn upsert_organization(
    conn: &mut SqliteConnection,
    organization: &Organization,
) -> Result<OrganizationId, PersistenceError> {
    let row: OrganizationRow = OrganizationRow::from_domain(organization);
    diesel::insert_into(organizations::table)
        .values(&row)
        .on_conflict(organizations::id)
        .do_update()
        .set(&row)
        .execute(conn)?;

    diesel::delete(
        organization_domains::table.filter(organization_domains::organization_id.eq(&row.id)),
    )
    .execute(conn)?;
    let domains: Vec<OrganizationDomainRow> = OrganizationRow::domain_rows(organization);
    if !domains.is_empty() {
        diesel::insert_into(organization_domains::table)
            .values(&domains)
            .execute(conn)?;
    }

    debug!(organization_id = %organization.id(), status = %organization.status(), "Saved organization");
    Ok(organization.id())
}

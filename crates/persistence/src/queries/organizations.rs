// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use mp_registry_domain::{Organization, OrganizationId};

use crate::data_models::{OrganizationDomainRow, OrganizationRow};
use crate::diesel_schema::{organization_domains, organizations};
use crate::error::PersistenceError;

fn load_organization(
    conn: &mut SqliteConnection,
    row: OrganizationRow,
) -> Result<Organization, PersistenceError> {
    let domains: Vec<OrganizationDomainRow> = organization_domains::table
        .filter(organization_domains::organization_id.eq(&row.id))
        .order(organization_domains::domain.asc())
        .select(OrganizationDomainRow::as_select())
        .load(conn)?;

    row.into_domain(domains)
}

/// Retrieves an organization with its domains.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `id` - The organization to load
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is invalid.
/// Returns `Ok(None)` if the organization does not exist.
pub fn get_organization(
    conn: &mut SqliteConnection,
    id: OrganizationId,
) -> Result<Option<Organization>, PersistenceError> {
    let result: Result<OrganizationRow, diesel::result::Error> = organizations::table
        .filter(organizations::id.eq(id.to_string()))
        .select(OrganizationRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(load_organization(conn, row)?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Retrieves every organization, ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is invalid.
pub fn get_organizations(
    conn: &mut SqliteConnection,
) -> Result<Vec<Organization>, PersistenceError> {
    let rows: Vec<OrganizationRow> = organizations::table
        .order((organizations::name.asc(), organizations::id.asc()))
        .select(OrganizationRow::as_select())
        .load(conn)?;

    rows.into_iter()
        .map(|row| load_organization(conn, row))
        .collect()
}

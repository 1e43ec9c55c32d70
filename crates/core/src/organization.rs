// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::audit_log::{address_value, record};
use crate::error::CoreError;
use crate::lookup::{load_grid_area, load_organization};
use crate::repository::Store;
use crate::rules::ensure_unique_business_register_identifier;
use mp_registry_audit::{
    ChangedBy, GridAreaAuditLogEntry, GridAreaAuditedChange, OrganizationAuditLogEntry,
    OrganizationAuditedChange,
};
use mp_registry_domain::{
    Address, BusinessRegisterIdentifier, DomainError, GridArea, GridAreaCode, GridAreaId,
    GridAreaType, Organization, OrganizationDomain, OrganizationId, OrganizationStatus,
    PriceAreaCode,
};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::info;

/// Data for a new organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrganization {
    pub name: String,
    pub business_register_identifier: BusinessRegisterIdentifier,
    pub address: Address,
    pub domains: Vec<OrganizationDomain>,
}

/// Replacement values for an organization's editable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationUpdate {
    pub organization_id: OrganizationId,
    pub name: String,
    pub address: Address,
    pub domains: Vec<OrganizationDomain>,
    pub status: OrganizationStatus,
}

/// Creates an organization.
///
/// # Errors
///
/// Returns `CoreError::Validation` if the data is invalid or the business
/// register identifier is already in use.
pub fn create_organization<S: Store + ?Sized>(
    store: &mut S,
    new_organization: NewOrganization,
    changed_by: ChangedBy,
    now: OffsetDateTime,
) -> Result<OrganizationId, CoreError> {
    let organization: Organization = Organization::new(
        &new_organization.name,
        new_organization.business_register_identifier,
        new_organization.address,
        new_organization.domains,
    )?;
    ensure_unique_business_register_identifier(store, &organization)?;

    let organization_id: OrganizationId = store.add_or_update_organization(&organization)?;
    record(
        store,
        OrganizationAuditLogEntry::new(
            organization_id,
            OrganizationAuditedChange::Created,
            changed_by,
            now,
        )
        .with_current(organization.name()),
    )?;

    info!(%organization_id, name = organization.name(), "Created organization");
    Ok(organization_id)
}

/// Updates an organization, writing one audit entry per changed field.
///
/// # Errors
///
/// Returns `CoreError::NotFound` for an unknown organization and
/// `CoreError::Validation` for invalid values or status transitions.
pub fn update_organization<S: Store + ?Sized>(
    store: &mut S,
    update: OrganizationUpdate,
    changed_by: ChangedBy,
    now: OffsetDateTime,
) -> Result<(), CoreError> {
    let previous: Organization = load_organization(store, update.organization_id)?;
    let mut organization: Organization = previous.clone();

    organization.rename(&update.name)?;
    organization.set_address(update.address);
    organization.set_domains(update.domains)?;
    if update.status != previous.status() {
        match update.status {
            OrganizationStatus::Active => organization.activate()?,
            OrganizationStatus::Deleted => organization.delete()?,
            OrganizationStatus::New => {
                return Err(DomainError::InvalidStatusTransition {
                    entity: "Organization",
                    from: previous.status().as_str(),
                    to: OrganizationStatus::New.as_str(),
                }
                .into());
            }
        }
    }

    store.add_or_update_organization(&organization)?;

    let entry = |change: OrganizationAuditedChange, current: String, previous: String| {
        OrganizationAuditLogEntry::new(organization.id(), change, changed_by, now)
            .with_current(current)
            .with_previous(previous)
    };

    if organization.name() != previous.name() {
        record(
            store,
            entry(
                OrganizationAuditedChange::Name,
                organization.name().to_string(),
                previous.name().to_string(),
            ),
        )?;
    }
    if organization.domains() != previous.domains() {
        record(
            store,
            entry(
                OrganizationAuditedChange::Domain,
                domains_value(organization.domains()),
                domains_value(previous.domains()),
            ),
        )?;
    }
    if organization.address() != previous.address() {
        record(
            store,
            entry(
                OrganizationAuditedChange::Address,
                address_value(organization.address()),
                address_value(previous.address()),
            ),
        )?;
    }
    if organization.status() != previous.status() {
        record(
            store,
            entry(
                OrganizationAuditedChange::Status,
                organization.status().to_string(),
                previous.status().to_string(),
            ),
        )?;
    }

    info!(organization_id = %organization.id(), "Updated organization");
    Ok(())
}

fn domains_value(domains: &[OrganizationDomain]) -> String {
    domains
        .iter()
        .map(OrganizationDomain::value)
        .collect::<Vec<&str>>()
        .join(",")
}

/// Data for a new grid area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGridArea {
    pub name: String,
    pub code: GridAreaCode,
    pub price_area_code: PriceAreaCode,
    pub grid_area_type: GridAreaType,
    pub valid_from: OffsetDateTime,
    pub valid_to: Option<OffsetDateTime>,
}

/// Creates a grid area with a code not used by any other grid area.
///
/// # Errors
///
/// Returns `CoreError::Validation` for invalid data or a duplicate code.
pub fn create_grid_area<S: Store + ?Sized>(
    store: &mut S,
    new_grid_area: NewGridArea,
    changed_by: ChangedBy,
    now: OffsetDateTime,
) -> Result<GridAreaId, CoreError> {
    let grid_area: GridArea = GridArea::with_id(
        GridAreaId::new(),
        &new_grid_area.name,
        new_grid_area.code,
        new_grid_area.price_area_code,
        new_grid_area.grid_area_type,
        new_grid_area.valid_from,
        new_grid_area.valid_to,
    )?;

    if store
        .get_grid_areas()?
        .iter()
        .any(|existing| existing.code() == grid_area.code())
    {
        return Err(DomainError::DuplicateGridAreaCode(grid_area.code().value().to_string()).into());
    }

    let grid_area_id: GridAreaId = store.add_or_update_grid_area(&grid_area)?;
    record(
        store,
        GridAreaAuditLogEntry::new(grid_area_id, GridAreaAuditedChange::Created, changed_by, now)
            .with_current(grid_area.code().value()),
    )?;

    info!(%grid_area_id, code = grid_area.code().value(), "Created grid area");
    Ok(grid_area_id)
}

/// Renames a grid area and sets the end of its validity.
///
/// # Errors
///
/// Returns `CoreError::NotFound` for an unknown grid area and
/// `CoreError::Validation` for a blank name or inverted validity.
pub fn update_grid_area<S: Store + ?Sized>(
    store: &mut S,
    grid_area_id: GridAreaId,
    name: &str,
    valid_to: Option<OffsetDateTime>,
    changed_by: ChangedBy,
    now: OffsetDateTime,
) -> Result<(), CoreError> {
    let previous: GridArea = load_grid_area(store, grid_area_id)?;
    let grid_area: GridArea = GridArea::with_id(
        grid_area_id,
        name,
        previous.code().clone(),
        previous.price_area_code(),
        previous.grid_area_type(),
        previous.valid_from(),
        valid_to,
    )?;
    store.add_or_update_grid_area(&grid_area)?;

    if grid_area.name() != previous.name() {
        record(
            store,
            GridAreaAuditLogEntry::new(grid_area_id, GridAreaAuditedChange::Name, changed_by, now)
                .with_current(grid_area.name())
                .with_previous(previous.name()),
        )?;
    }
    if grid_area.valid_to() != previous.valid_to() {
        let mut entry: GridAreaAuditLogEntry =
            GridAreaAuditLogEntry::new(grid_area_id, GridAreaAuditedChange::ValidTo, changed_by, now);
        entry.current_value = instant_value(grid_area.valid_to());
        entry.previous_value = instant_value(previous.valid_to());
        record(store, entry)?;
    }

    info!(%grid_area_id, "Updated grid area");
    Ok(())
}

fn instant_value(instant: Option<OffsetDateTime>) -> Option<String> {
    instant.and_then(|instant| instant.format(&Rfc3339).ok())
}

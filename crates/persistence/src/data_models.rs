// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row models and their conversions to and from domain aggregates.
//!
//! Identities are stored as hyphenated uuid text, coded values by their
//! stable string code, and instants as RFC 3339 text normalized to UTC.

use diesel::prelude::*;
use mp_registry_audit::{AuditLogEntry, AuditedChange};
use mp_registry_domain::{
    Actor, ActorConsolidation, ActorCredentials, ActorGridArea, ActorMarketRole, ActorName,
    ActorNumber, Address, BusinessRegisterIdentifier, DelegationPeriod, DomainEvent, EmailAddress,
    EmailEvent, GridArea, GridAreaCode, MeteringPointType, Organization, OrganizationDomain,
    Permission, User, UserRole, UserRoleAssignment,
};
use std::collections::BTreeSet;
use std::fmt::Display;
use std::str::FromStr;
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

use crate::diesel_schema::{
    actor_consolidations, actor_grid_areas, actors, audit_log, domain_events, email_events,
    grid_area_reservations, grid_areas, message_delegation_periods, message_delegations,
    organization_domains, organizations, process_delegation_periods, process_delegations,
    user_role_assignments, user_role_permissions, user_roles, users,
};
use crate::error::PersistenceError;

const CERTIFICATE: &str = "Certificate";
const CLIENT_SECRET: &str = "ClientSecret";

pub fn invalid(table: &'static str, reason: impl Display) -> PersistenceError {
    PersistenceError::InvalidStoredValue {
        table,
        reason: reason.to_string(),
    }
}

/// Formats an instant as RFC 3339 in UTC.
///
/// # Errors
///
/// Returns an error if the instant cannot be represented in RFC 3339.
pub fn format_timestamp(value: OffsetDateTime) -> Result<String, PersistenceError> {
    Ok(value.to_offset(UtcOffset::UTC).format(&Rfc3339)?)
}

fn format_optional_timestamp(
    value: Option<OffsetDateTime>,
) -> Result<Option<String>, PersistenceError> {
    value.map(format_timestamp).transpose()
}

fn parse_timestamp(table: &'static str, value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| invalid(table, e))
}

fn parse_optional_timestamp(
    table: &'static str,
    value: Option<&str>,
) -> Result<Option<OffsetDateTime>, PersistenceError> {
    value.map(|value| parse_timestamp(table, value)).transpose()
}

/// Parses an identity or code read back from `table`.
pub fn parse_stored<T>(table: &'static str, value: &str) -> Result<T, PersistenceError>
where
    T: FromStr,
    T::Err: Display,
{
    value.parse::<T>().map_err(|e| invalid(table, e))
}

// ============================================================================
// Organizations
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = organizations)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrganizationRow {
    pub id: String,
    pub name: String,
    pub business_register_identifier: String,
    pub street_name: Option<String>,
    pub number: Option<String>,
    pub zip_code: Option<String>,
    pub city: Option<String>,
    pub country: String,
    pub status: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = organization_domains)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrganizationDomainRow {
    pub organization_id: String,
    pub domain: String,
}

impl OrganizationRow {
    const TABLE: &'static str = "organizations";

    pub fn from_domain(organization: &Organization) -> Self {
        let address: &Address = organization.address();
        Self {
            id: organization.id().to_string(),
            name: organization.name().to_string(),
            business_register_identifier: organization
                .business_register_identifier()
                .value()
                .to_string(),
            street_name: address.street_name.clone(),
            number: address.number.clone(),
            zip_code: address.zip_code.clone(),
            city: address.city.clone(),
            country: address.country.clone(),
            status: organization.status().to_string(),
        }
    }

    pub fn domain_rows(organization: &Organization) -> Vec<OrganizationDomainRow> {
        organization
            .domains()
            .iter()
            .map(|domain| OrganizationDomainRow {
                organization_id: organization.id().to_string(),
                domain: domain.value().to_string(),
            })
            .collect()
    }

    pub fn into_domain(
        self,
        domains: Vec<OrganizationDomainRow>,
    ) -> Result<Organization, PersistenceError> {
        let domains: Vec<OrganizationDomain> = domains
            .iter()
            .map(|row| {
                OrganizationDomain::new(&row.domain).map_err(|e| invalid("organization_domains", e))
            })
            .collect::<Result<_, _>>()?;
        let business_register_identifier: BusinessRegisterIdentifier =
            BusinessRegisterIdentifier::new(&self.business_register_identifier)
                .map_err(|e| invalid(Self::TABLE, e))?;
        let address: Address = Address {
            street_name: self.street_name,
            number: self.number,
            zip_code: self.zip_code,
            city: self.city,
            country: self.country,
        };

        Organization::with_id(
            parse_stored(Self::TABLE, &self.id)?,
            &self.name,
            business_register_identifier,
            address,
            domains,
            parse_stored(Self::TABLE, &self.status)?,
        )
        .map_err(|e| invalid(Self::TABLE, e))
    }
}

// ============================================================================
// Actors
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = actors)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ActorRow {
    pub id: String,
    pub organization_id: String,
    pub external_actor_id: Option<String>,
    pub actor_number: String,
    pub status: String,
    pub name: String,
    pub eic_function: String,
    pub market_role_comment: Option<String>,
    pub credentials_kind: Option<String>,
    pub credentials_identifier: Option<String>,
    pub credentials_lookup_identifier: Option<String>,
    pub credentials_expires_at: Option<String>,
}

/// Metering point types are stored as a comma separated list of codes.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = actor_grid_areas)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ActorGridAreaRow {
    pub actor_id: String,
    pub grid_area_id: String,
    pub metering_point_types: String,
    pub position: i32,
}

impl ActorRow {
    const TABLE: &'static str = "actors";

    pub fn from_domain(actor: &Actor) -> Result<Self, PersistenceError> {
        let (credentials_kind, credentials_identifier, credentials_lookup_identifier, expires_at) =
            match actor.credentials() {
                None => (None, None, None, None),
                Some(ActorCredentials::Certificate {
                    thumbprint,
                    lookup_identifier,
                    expires_at,
                }) => (
                    Some(CERTIFICATE.to_string()),
                    Some(thumbprint.clone()),
                    Some(lookup_identifier.clone()),
                    Some(*expires_at),
                ),
                Some(ActorCredentials::ClientSecret {
                    secret_identifier,
                    expires_at,
                }) => (
                    Some(CLIENT_SECRET.to_string()),
                    Some(secret_identifier.clone()),
                    None,
                    Some(*expires_at),
                ),
            };

        Ok(Self {
            id: actor.id().to_string(),
            organization_id: actor.organization_id().to_string(),
            external_actor_id: actor.external_actor_id().map(|id| id.to_string()),
            actor_number: actor.actor_number().value().to_string(),
            status: actor.status().to_string(),
            name: actor.name().value().to_string(),
            eic_function: actor.market_role().function().to_string(),
            market_role_comment: actor.market_role().comment().map(str::to_string),
            credentials_kind,
            credentials_identifier,
            credentials_lookup_identifier,
            credentials_expires_at: format_optional_timestamp(expires_at)?,
        })
    }

    pub fn grid_area_rows(actor: &Actor) -> Vec<ActorGridAreaRow> {
        (0_i32..)
            .zip(actor.market_role().grid_areas())
            .map(|(position, grid_area)| ActorGridAreaRow {
                actor_id: actor.id().to_string(),
                grid_area_id: grid_area.grid_area_id.to_string(),
                metering_point_types: grid_area
                    .metering_point_types
                    .iter()
                    .map(MeteringPointType::as_str)
                    .collect::<Vec<&str>>()
                    .join(","),
                position,
            })
            .collect()
    }

    fn credentials(&self) -> Result<Option<ActorCredentials>, PersistenceError> {
        let Some(kind) = self.credentials_kind.as_deref() else {
            return Ok(None);
        };
        let identifier: String = self
            .credentials_identifier
            .clone()
            .ok_or_else(|| invalid(Self::TABLE, "credentials without identifier"))?;
        let expires_at: OffsetDateTime = parse_timestamp(
            Self::TABLE,
            self.credentials_expires_at
                .as_deref()
                .ok_or_else(|| invalid(Self::TABLE, "credentials without expiry"))?,
        )?;

        match kind {
            CERTIFICATE => Ok(Some(ActorCredentials::Certificate {
                thumbprint: identifier,
                lookup_identifier: self
                    .credentials_lookup_identifier
                    .clone()
                    .ok_or_else(|| invalid(Self::TABLE, "certificate without lookup identifier"))?,
                expires_at,
            })),
            CLIENT_SECRET => Ok(Some(ActorCredentials::ClientSecret {
                secret_identifier: identifier,
                expires_at,
            })),
            other => Err(invalid(
                Self::TABLE,
                format!("unknown credentials kind '{other}'"),
            )),
        }
    }

    pub fn into_domain(self, grid_areas: Vec<ActorGridAreaRow>) -> Result<Actor, PersistenceError> {
        let grid_areas: Vec<ActorGridArea> = grid_areas
            .into_iter()
            .map(ActorGridAreaRow::into_domain)
            .collect::<Result<_, _>>()?;
        let credentials: Option<ActorCredentials> = self.credentials()?;
        let market_role: ActorMarketRole = ActorMarketRole::new(
            parse_stored(Self::TABLE, &self.eic_function)?,
            grid_areas,
            self.market_role_comment,
        )
        .map_err(|e| invalid(Self::TABLE, e))?;

        Ok(Actor::with_id(
            parse_stored(Self::TABLE, &self.id)?,
            parse_stored(Self::TABLE, &self.organization_id)?,
            self.external_actor_id
                .as_deref()
                .map(|id| parse_stored(Self::TABLE, id))
                .transpose()?,
            ActorNumber::new(&self.actor_number).map_err(|e| invalid(Self::TABLE, e))?,
            parse_stored(Self::TABLE, &self.status)?,
            ActorName::new(&self.name).map_err(|e| invalid(Self::TABLE, e))?,
            market_role,
            credentials,
        ))
    }
}

impl ActorGridAreaRow {
    const TABLE: &'static str = "actor_grid_areas";

    fn into_domain(self) -> Result<ActorGridArea, PersistenceError> {
        let metering_point_types: Vec<MeteringPointType> = self
            .metering_point_types
            .split(',')
            .filter(|code| !code.is_empty())
            .map(|code| parse_stored(Self::TABLE, code))
            .collect::<Result<_, _>>()?;

        Ok(ActorGridArea::new(
            parse_stored(Self::TABLE, &self.grid_area_id)?,
            metering_point_types,
        ))
    }
}

/// A held (function, grid area) pair.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = grid_area_reservations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ReservationRow {
    pub eic_function: String,
    pub grid_area_id: String,
    pub actor_id: String,
}

// ============================================================================
// Grid areas
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = grid_areas)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GridAreaRow {
    pub id: String,
    pub name: String,
    pub code: String,
    pub price_area_code: String,
    pub grid_area_type: String,
    pub valid_from: String,
    pub valid_to: Option<String>,
}

impl GridAreaRow {
    const TABLE: &'static str = "grid_areas";

    pub fn from_domain(grid_area: &GridArea) -> Result<Self, PersistenceError> {
        Ok(Self {
            id: grid_area.id().to_string(),
            name: grid_area.name().to_string(),
            code: grid_area.code().value().to_string(),
            price_area_code: grid_area.price_area_code().to_string(),
            grid_area_type: grid_area.grid_area_type().to_string(),
            valid_from: format_timestamp(grid_area.valid_from())?,
            valid_to: format_optional_timestamp(grid_area.valid_to())?,
        })
    }

    pub fn into_domain(self) -> Result<GridArea, PersistenceError> {
        GridArea::with_id(
            parse_stored(Self::TABLE, &self.id)?,
            &self.name,
            GridAreaCode::new(&self.code).map_err(|e| invalid(Self::TABLE, e))?,
            parse_stored(Self::TABLE, &self.price_area_code)?,
            parse_stored(Self::TABLE, &self.grid_area_type)?,
            parse_timestamp(Self::TABLE, &self.valid_from)?,
            parse_optional_timestamp(Self::TABLE, self.valid_to.as_deref())?,
        )
        .map_err(|e| invalid(Self::TABLE, e))
    }
}

// ============================================================================
// Users and user roles
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = user_roles)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserRoleRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub eic_function: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = user_role_permissions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserRolePermissionRow {
    pub user_role_id: String,
    pub permission: String,
}

impl UserRoleRow {
    const TABLE: &'static str = "user_roles";

    pub fn from_domain(user_role: &UserRole) -> Self {
        Self {
            id: user_role.id().to_string(),
            name: user_role.name().to_string(),
            description: user_role.description().map(str::to_string),
            status: user_role.status().to_string(),
            eic_function: user_role.eic_function().to_string(),
        }
    }

    pub fn permission_rows(user_role: &UserRole) -> Vec<UserRolePermissionRow> {
        user_role
            .permissions()
            .iter()
            .map(|permission| UserRolePermissionRow {
                user_role_id: user_role.id().to_string(),
                permission: permission.to_string(),
            })
            .collect()
    }

    pub fn into_domain(
        self,
        permissions: Vec<UserRolePermissionRow>,
    ) -> Result<UserRole, PersistenceError> {
        let permissions: BTreeSet<Permission> = permissions
            .iter()
            .map(|row| parse_stored("user_role_permissions", &row.permission))
            .collect::<Result<_, _>>()?;

        UserRole::with_id(
            parse_stored(Self::TABLE, &self.id)?,
            &self.name,
            self.description,
            parse_stored(Self::TABLE, &self.status)?,
            parse_stored(Self::TABLE, &self.eic_function)?,
            permissions,
        )
        .map_err(|e| invalid(Self::TABLE, e))
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserRow {
    pub id: String,
    pub external_id: String,
    pub invitation_expires_at: Option<String>,
    pub mitid_signup_initiated_at: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = user_role_assignments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserRoleAssignmentRow {
    pub user_id: String,
    pub actor_id: String,
    pub user_role_id: String,
}

impl UserRow {
    const TABLE: &'static str = "users";

    pub fn from_domain(user: &User) -> Result<Self, PersistenceError> {
        Ok(Self {
            id: user.id().to_string(),
            external_id: user.external_id().to_string(),
            invitation_expires_at: format_optional_timestamp(user.invitation_expires_at())?,
            mitid_signup_initiated_at: format_optional_timestamp(
                user.mitid_signup_initiated_at(),
            )?,
        })
    }

    pub fn assignment_rows(user: &User) -> Vec<UserRoleAssignmentRow> {
        user.role_assignments()
            .iter()
            .map(|assignment| UserRoleAssignmentRow {
                user_id: user.id().to_string(),
                actor_id: assignment.actor_id.to_string(),
                user_role_id: assignment.user_role_id.to_string(),
            })
            .collect()
    }

    pub fn into_domain(
        self,
        assignments: Vec<UserRoleAssignmentRow>,
    ) -> Result<User, PersistenceError> {
        const ASSIGNMENTS: &str = "user_role_assignments";
        let role_assignments: BTreeSet<UserRoleAssignment> = assignments
            .iter()
            .map(|row| {
                Ok(UserRoleAssignment::new(
                    parse_stored(ASSIGNMENTS, &row.actor_id)?,
                    parse_stored(ASSIGNMENTS, &row.user_role_id)?,
                ))
            })
            .collect::<Result<_, PersistenceError>>()?;

        Ok(User::with_id(
            parse_stored(Self::TABLE, &self.id)?,
            parse_stored(Self::TABLE, &self.external_id)?,
            role_assignments,
            parse_optional_timestamp(Self::TABLE, self.invitation_expires_at.as_deref())?,
            parse_optional_timestamp(Self::TABLE, self.mitid_signup_initiated_at.as_deref())?,
        ))
    }
}

// ============================================================================
// Delegations
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = message_delegations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MessageDelegationRow {
    pub id: String,
    pub delegated_by: String,
    pub message_type: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = process_delegations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProcessDelegationRow {
    pub id: String,
    pub delegated_by: String,
    pub process: String,
}

/// Declares a period row for one of the delegation period tables.
macro_rules! delegation_period_row {
    ($name:ident, $table:ident) => {
        #[derive(Debug, Clone, Queryable, Selectable, Insertable)]
        #[diesel(table_name = $table)]
        #[diesel(check_for_backend(diesel::sqlite::Sqlite))]
        pub struct $name {
            pub id: String,
            pub delegation_id: String,
            pub delegated_to: String,
            pub grid_area_id: String,
            pub starts_at: String,
            pub stops_at: Option<String>,
            pub position: i32,
        }

        impl $name {
            pub fn from_domain(
                delegation_id: String,
                periods: &[DelegationPeriod],
            ) -> Result<Vec<Self>, PersistenceError> {
                (0_i32..)
                    .zip(periods)
                    .map(|(position, period)| {
                        Ok(Self {
                            id: period.id.to_string(),
                            delegation_id: delegation_id.clone(),
                            delegated_to: period.delegated_to.to_string(),
                            grid_area_id: period.grid_area_id.to_string(),
                            starts_at: format_timestamp(period.starts_at)?,
                            stops_at: format_optional_timestamp(period.stops_at)?,
                            position,
                        })
                    })
                    .collect()
            }

            pub fn into_domain(self) -> Result<DelegationPeriod, PersistenceError> {
                const TABLE: &str = stringify!($table);
                Ok(DelegationPeriod {
                    id: parse_stored(TABLE, &self.id)?,
                    delegated_to: parse_stored(TABLE, &self.delegated_to)?,
                    grid_area_id: parse_stored(TABLE, &self.grid_area_id)?,
                    starts_at: parse_timestamp(TABLE, &self.starts_at)?,
                    stops_at: parse_optional_timestamp(TABLE, self.stops_at.as_deref())?,
                })
            }
        }
    };
}

delegation_period_row!(MessageDelegationPeriodRow, message_delegation_periods);
delegation_period_row!(ProcessDelegationPeriodRow, process_delegation_periods);

// ============================================================================
// Consolidations
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = actor_consolidations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ActorConsolidationRow {
    pub id: String,
    pub actor_from: String,
    pub actor_to: String,
    pub consolidate_at: String,
    pub status: String,
}

impl ActorConsolidationRow {
    const TABLE: &'static str = "actor_consolidations";

    pub fn from_domain(consolidation: &ActorConsolidation) -> Result<Self, PersistenceError> {
        Ok(Self {
            id: consolidation.id().to_string(),
            actor_from: consolidation.actor_from().to_string(),
            actor_to: consolidation.actor_to().to_string(),
            consolidate_at: format_timestamp(consolidation.consolidate_at())?,
            status: consolidation.status().to_string(),
        })
    }

    pub fn into_domain(self) -> Result<ActorConsolidation, PersistenceError> {
        Ok(ActorConsolidation::with_id(
            parse_stored(Self::TABLE, &self.id)?,
            parse_stored(Self::TABLE, &self.actor_from)?,
            parse_stored(Self::TABLE, &self.actor_to)?,
            parse_timestamp(Self::TABLE, &self.consolidate_at)?,
            parse_stored(Self::TABLE, &self.status)?,
        ))
    }
}

// ============================================================================
// Audit log
// ============================================================================

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = audit_log)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NewAuditLogRow {
    pub kind: String,
    pub subject: String,
    pub change: String,
    pub changed_by: String,
    pub changed_at: String,
    pub current_value: Option<String>,
    pub previous_value: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = audit_log)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AuditLogRow {
    pub subject: String,
    pub change: String,
    pub changed_by: String,
    pub changed_at: String,
    pub current_value: Option<String>,
    pub previous_value: Option<String>,
}

impl NewAuditLogRow {
    pub fn from_entry<C: AuditedChange>(
        entry: &AuditLogEntry<C>,
    ) -> Result<Self, PersistenceError> {
        Ok(Self {
            kind: entry.kind().to_string(),
            subject: entry.subject.to_string(),
            change: entry.change.to_string(),
            changed_by: entry.changed_by.to_string(),
            changed_at: format_timestamp(entry.timestamp)?,
            current_value: entry.current_value.clone(),
            previous_value: entry.previous_value.clone(),
        })
    }
}

impl AuditLogRow {
    const TABLE: &'static str = "audit_log";

    pub fn into_entry<C: AuditedChange>(self) -> Result<AuditLogEntry<C>, PersistenceError> {
        Ok(AuditLogEntry {
            subject: parse_stored(Self::TABLE, &self.subject)?,
            change: parse_stored(Self::TABLE, &self.change)?,
            changed_by: parse_stored(Self::TABLE, &self.changed_by)?,
            timestamp: parse_timestamp(Self::TABLE, &self.changed_at)?,
            current_value: self.current_value,
            previous_value: self.previous_value,
        })
    }
}

// ============================================================================
// Outboxes
// ============================================================================

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = domain_events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NewDomainEventRow {
    pub event_type: String,
    pub aggregate_id: String,
    pub payload: String,
}

impl NewDomainEventRow {
    pub fn from_event(event: &DomainEvent) -> Result<Self, PersistenceError> {
        Ok(Self {
            event_type: event.event_type().to_string(),
            aggregate_id: event.aggregate_id(),
            payload: serde_json::to_string(event)?,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = domain_events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DomainEventRow {
    pub event_id: i64,
    pub payload: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = email_events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NewEmailEventRow {
    pub email: String,
    pub template: String,
    pub user_id: String,
    pub actor_id: String,
}

impl NewEmailEventRow {
    pub fn from_event(event: &EmailEvent) -> Self {
        Self {
            email: event.email.value().to_string(),
            template: event.template.to_string(),
            user_id: event.user_id.to_string(),
            actor_id: event.actor_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = email_events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EmailEventRow {
    pub event_id: i64,
    pub email: String,
    pub template: String,
    pub user_id: String,
    pub actor_id: String,
}

/// A domain event waiting in the outbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboxDomainEvent {
    /// Outbox sequence number.
    pub event_id: i64,
    pub event: DomainEvent,
}

/// An email waiting in the outbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboxEmailEvent {
    /// Outbox sequence number.
    pub event_id: i64,
    pub event: EmailEvent,
}

impl DomainEventRow {
    pub fn into_outbox(self) -> Result<OutboxDomainEvent, PersistenceError> {
        Ok(OutboxDomainEvent {
            event_id: self.event_id,
            event: serde_json::from_str(&self.payload)?,
        })
    }
}

impl EmailEventRow {
    const TABLE: &'static str = "email_events";

    pub fn into_outbox(self) -> Result<OutboxEmailEvent, PersistenceError> {
        Ok(OutboxEmailEvent {
            event_id: self.event_id,
            event: EmailEvent {
                email: EmailAddress::new(&self.email).map_err(|e| invalid(Self::TABLE, e))?,
                template: parse_stored(Self::TABLE, &self.template)?,
                user_id: parse_stored(Self::TABLE, &self.user_id)?,
                actor_id: parse_stored(Self::TABLE, &self.actor_id)?,
            },
        })
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

#[macro_use]
mod code_enum;

mod actor;
mod actor_number;
mod consolidation;
mod delegation;
mod error;
mod events;
mod grid_area;
mod ids;
mod market_role;
mod organization;
mod user;
mod user_role;
mod validation;

#[cfg(test)]
mod tests;

pub use actor::{Actor, ActorCredentials, ActorName, ActorStatus};
pub use actor_number::ActorNumber;
pub use consolidation::{ActorConsolidation, ActorConsolidationStatus};
pub use delegation::{
    DelegatedProcess, Delegation, DelegationMessageType, DelegationPeriod, MessageDelegation,
    ProcessDelegation,
};
pub use error::DomainError;
pub use events::{DomainEvent, EmailEvent, EmailTemplate};
pub use grid_area::{GridArea, GridAreaCode, GridAreaType, PriceAreaCode};
pub use ids::{
    ActorConsolidationId, ActorId, DelegationPeriodId, ExternalActorId, ExternalUserId,
    GridAreaId, MessageDelegationId, OrganizationId, ProcessDelegationId, UserId, UserRoleId,
};
pub use market_role::{ActorGridArea, ActorMarketRole, EicFunction, MeteringPointType};
pub use organization::{
    Address, BusinessRegisterIdentifier, Organization, OrganizationDomain, OrganizationStatus,
};
pub use user::{
    EmailAddress, INVITATION_VALIDITY, User, UserIdentity, UserInvitation, UserRoleAssignment,
};
pub use user_role::{Permission, REQUIRED_PERMISSIONS, UserRole, UserRoleStatus};
pub use validation::{
    validate_business_register_identifier_unique, validate_delegation_actors,
    validate_eic_functions_across_actors, validate_email_domain, validate_market_role_change,
    validate_required_permissions,
};

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::ids::{ActorId, GridAreaId};
use crate::market_role::EicFunction;
use crate::user_role::Permission;

/// Errors raised when a domain invariant would be violated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// An identifier could not be parsed.
    #[error("Invalid identifier '{value}': {reason}")]
    InvalidIdentifier {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
    /// A coded value is not part of its catalogue.
    #[error("Unknown {kind} code '{value}'")]
    UnknownCode {
        /// The catalogue that was searched.
        kind: &'static str,
        /// The rejected code.
        value: String,
    },
    /// Actor number is neither a GLN nor an EIC.
    #[error("Invalid actor number '{0}': expected a 13 digit GLN or a 16 character EIC")]
    InvalidActorNumber(String),
    /// A name is empty or too long.
    #[error("Invalid name: {0}")]
    InvalidName(String),
    /// Business register identifier is malformed.
    #[error("Invalid business register identifier '{0}'")]
    InvalidBusinessRegisterIdentifier(String),
    /// Another organization already uses the business register identifier.
    #[error("Business register identifier '{0}' is already in use by another organization")]
    DuplicateBusinessRegisterIdentifier(String),
    /// Organization domain is not a valid DNS name.
    #[error("Invalid organization domain '{0}'")]
    InvalidDomain(String),
    /// An organization must keep at least one domain.
    #[error("An organization must have at least one domain")]
    MissingOrganizationDomain,
    /// Email address is malformed.
    #[error("Invalid email address '{0}'")]
    InvalidEmail(String),
    /// Email address is outside every domain registered for the organization.
    #[error("Email address '{email}' does not belong to any domain of organization '{organization}'")]
    EmailDomainNotAllowed {
        /// The rejected email address.
        email: String,
        /// The organization name.
        organization: String,
    },
    /// Grid area code is malformed.
    #[error("Invalid grid area code '{0}': expected exactly 3 digits")]
    InvalidGridAreaCode(String),
    /// Another grid area already uses the code.
    #[error("Grid area code {0} is already in use")]
    DuplicateGridAreaCode(String),
    /// Validity period ends before it starts.
    #[error("Invalid validity period: {valid_from} is not before {valid_to}")]
    InvalidValidityPeriod {
        /// Start of the period.
        valid_from: time::OffsetDateTime,
        /// End of the period.
        valid_to: time::OffsetDateTime,
    },
    /// A status transition is not allowed.
    #[error("{entity} cannot transition from {from} to {to}")]
    InvalidStatusTransition {
        /// The entity kind.
        entity: &'static str,
        /// Current status.
        from: &'static str,
        /// Requested status.
        to: &'static str,
    },
    /// A grid area appears twice within one market role.
    #[error("Grid area {0} is assigned more than once")]
    DuplicateGridArea(GridAreaId),
    /// Two actors sharing an actor number hold the same function.
    #[error(
        "Cannot assign market role {function}: it is already held by another actor with actor number {actor_number}"
    )]
    OverlappingEicFunction {
        /// The shared actor number.
        actor_number: String,
        /// The function held twice.
        function: EicFunction,
    },
    /// An operational actor attempted a non-additive market role change.
    #[error("Market role of actor {actor_id} cannot be changed: {reason}")]
    MarketRoleChangeNotAllowed {
        /// The actor being updated.
        actor_id: ActorId,
        /// Which part of the change is not additive.
        reason: String,
    },
    /// Credentials must be removed before new ones are assigned.
    #[error("Actor {0} already has credentials assigned")]
    CredentialsAlreadyAssigned(ActorId),
    /// Permission cannot be granted to the role's function.
    #[error("Permission {permission} cannot be assigned to a user role for {function}")]
    PermissionNotAssignable {
        /// The permission.
        permission: Permission,
        /// The role function.
        function: EicFunction,
    },
    /// A required permission would no longer be granted by any active role.
    #[error(
        "Permission {permission} for {function} is required and must remain granted by at least one active user role"
    )]
    RequiredPermissionMissing {
        /// The required permission.
        permission: Permission,
        /// The function it is required for.
        function: EicFunction,
    },
    /// The user role cannot be assigned because it is not active.
    #[error("User role '{0}' is not active")]
    UserRoleNotActive(String),
    /// The user role is for another function than the actor performs.
    #[error("User role '{user_role}' is for {role_function}, but the actor is a {actor_function}")]
    UserRoleFunctionMismatch {
        user_role: String,
        role_function: EicFunction,
        actor_function: EicFunction,
    },
    /// Both parties of a delegation must be active actors.
    #[error("Both actors must be active to create a delegation: {delegated_by} and {delegated_to}")]
    DelegationActorsNotActive {
        /// The delegating actor.
        delegated_by: ActorId,
        /// The receiving actor.
        delegated_to: ActorId,
    },
    /// An actor cannot delegate to itself.
    #[error("Actor {0} cannot delegate to itself")]
    SelfDelegation(ActorId),
    /// An open delegation period already exists for the grid area.
    #[error("An open delegation period already exists for grid area {0}")]
    DelegationPeriodOverlap(GridAreaId),
    /// Stop instant precedes the period start.
    #[error("Delegation period cannot stop at {stops_at}, before it starts at {starts_at}")]
    InvalidDelegationStop {
        /// Period start.
        starts_at: time::OffsetDateTime,
        /// Requested stop.
        stops_at: time::OffsetDateTime,
    },
    /// An actor cannot be consolidated into itself.
    #[error("Actor {0} cannot be consolidated into itself")]
    ConsolidationIntoSelf(ActorId),
    /// The actor already takes part in a pending consolidation.
    #[error("Actor {0} is already part of a pending consolidation")]
    ConsolidationAlreadyScheduled(ActorId),
    /// Grid areas can only be consolidated between grid access providers.
    #[error("Actor {0} must be a grid access provider to receive consolidated grid areas")]
    ConsolidationTargetNotGridAccessProvider(ActorId),
    /// Consolidation was already carried out.
    #[error("Consolidation has already been executed")]
    ConsolidationAlreadyExecuted,
}

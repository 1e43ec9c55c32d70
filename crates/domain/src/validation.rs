// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Cross-aggregate rules evaluated over snapshots.
//!
//! Every function here is pure: callers load the snapshot, these functions
//! decide. Nothing is mutated.

use crate::actor::{Actor, ActorStatus};
use crate::actor_number::ActorNumber;
use crate::error::DomainError;
use crate::market_role::{ActorGridArea, EicFunction};
use crate::organization::{Organization, OrganizationStatus};
use crate::user::EmailAddress;
use crate::user_role::{REQUIRED_PERMISSIONS, UserRole};
use std::collections::BTreeSet;

/// Validates that no two actors sharing an actor number hold the same function.
///
/// `organization_actors` is the persisted set of actors in the candidate's
/// organization. The candidate's persisted copy, if present, is replaced by
/// the candidate itself. `DataHubAdministrator` may be held any number of times.
///
/// # Errors
///
/// Returns `DomainError::OverlappingEicFunction` on the first duplicate.
pub fn validate_eic_functions_across_actors(
    candidate: &Actor,
    organization_actors: &[Actor],
) -> Result<(), DomainError> {
    let actor_number: &ActorNumber = candidate.actor_number();

    let mut used_functions: BTreeSet<EicFunction> = BTreeSet::new();
    let same_number = organization_actors
        .iter()
        .filter(|actor| actor.id() != candidate.id())
        .filter(|actor| actor.actor_number() == actor_number)
        .chain(std::iter::once(candidate));

    for actor in same_number {
        let function: EicFunction = actor.market_role().function();
        if function.may_overlap() {
            continue;
        }
        // Rule: one holder per function per actor number
        if !used_functions.insert(function) {
            return Err(DomainError::OverlappingEicFunction {
                actor_number: actor_number.to_string(),
                function,
            });
        }
    }

    Ok(())
}

/// Validates a market role change against the last persisted version.
///
/// Actors in status `New` may change freely. Once operational, the function
/// is fixed and grid areas and metering point types may only be added.
///
/// # Errors
///
/// Returns `DomainError::MarketRoleChangeNotAllowed` describing the first
/// non-additive change.
pub fn validate_market_role_change(persisted: &Actor, updated: &Actor) -> Result<(), DomainError> {
    if persisted.status() == ActorStatus::New {
        return Ok(());
    }

    let not_allowed = |reason: String| DomainError::MarketRoleChangeNotAllowed {
        actor_id: persisted.id(),
        reason,
    };

    let before = persisted.market_role();
    let after = updated.market_role();

    if before.function() != after.function() {
        return Err(not_allowed(format!(
            "market role {} cannot be removed from an actor in status {}",
            before.function(),
            persisted.status()
        )));
    }

    for existing in before.grid_areas() {
        let Some(current) = after.grid_area(existing.grid_area_id) else {
            return Err(not_allowed(format!(
                "grid area {} cannot be removed",
                existing.grid_area_id
            )));
        };

        if !existing
            .metering_point_types
            .is_subset(&current.metering_point_types)
        {
            let removed: Vec<&str> = removed_metering_point_types(existing, current);
            return Err(not_allowed(format!(
                "metering point types {} cannot be removed from grid area {}",
                removed.join(", "),
                existing.grid_area_id
            )));
        }
    }

    Ok(())
}

fn removed_metering_point_types<'a>(
    existing: &'a ActorGridArea,
    current: &ActorGridArea,
) -> Vec<&'a str> {
    existing
        .metering_point_types
        .difference(&current.metering_point_types)
        .map(|metering_point_type| metering_point_type.as_str())
        .collect()
}

/// Validates that no other non-deleted organization uses the candidate's
/// business register identifier.
///
/// # Errors
///
/// Returns `DomainError::DuplicateBusinessRegisterIdentifier` on a clash.
pub fn validate_business_register_identifier_unique(
    candidate: &Organization,
    organizations: &[Organization],
) -> Result<(), DomainError> {
    let identifier = candidate.business_register_identifier();
    let clash: bool = organizations.iter().any(|organization| {
        organization.id() != candidate.id()
            && organization.status() != OrganizationStatus::Deleted
            && organization.business_register_identifier() == identifier
    });

    if clash {
        return Err(DomainError::DuplicateBusinessRegisterIdentifier(
            identifier.value().to_string(),
        ));
    }
    Ok(())
}

/// Validates that an email address belongs to one of the organization's domains.
///
/// # Errors
///
/// Returns `DomainError::EmailDomainNotAllowed` otherwise.
pub fn validate_email_domain(
    email: &EmailAddress,
    organization: &Organization,
) -> Result<(), DomainError> {
    let domain: &str = email.domain();
    if organization
        .domains()
        .iter()
        .any(|allowed| allowed.value().eq_ignore_ascii_case(domain))
    {
        return Ok(());
    }

    Err(DomainError::EmailDomainNotAllowed {
        email: email.value().to_string(),
        organization: organization.name().to_string(),
    })
}

/// Validates that a change to a user role keeps every required permission
/// granted by at least one active role.
///
/// `before` and `after` are the persisted and changed versions of the role;
/// `all_roles` is every persisted role. When no user holds the role the
/// change cannot strand anyone, so it is allowed.
///
/// # Errors
///
/// Returns `DomainError::RequiredPermissionMissing` for the first required
/// combination that would no longer be granted.
pub fn validate_required_permissions(
    before: &UserRole,
    after: &UserRole,
    all_roles: &[UserRole],
    role_in_use: bool,
) -> Result<(), DomainError> {
    if !role_in_use {
        return Ok(());
    }

    for &(permission, function) in REQUIRED_PERMISSIONS {
        let lost: bool = before.grants(permission, function) && !after.grants(permission, function);
        if !lost {
            continue;
        }

        let granted_elsewhere: bool = all_roles
            .iter()
            .filter(|role| role.id() != before.id())
            .any(|role| role.grants(permission, function));

        if !granted_elsewhere {
            return Err(DomainError::RequiredPermissionMissing {
                permission,
                function,
            });
        }
    }

    Ok(())
}

/// Validates that both parties of a new delegation are active.
///
/// # Errors
///
/// Returns `DomainError::DelegationActorsNotActive` unless both are `Active`.
pub fn validate_delegation_actors(
    delegated_by: &Actor,
    delegated_to: &Actor,
) -> Result<(), DomainError> {
    if delegated_by.status() != ActorStatus::Active || delegated_to.status() != ActorStatus::Active
    {
        return Err(DomainError::DelegationActorsNotActive {
            delegated_by: delegated_by.id(),
            delegated_to: delegated_to.id(),
        });
    }
    Ok(())
}

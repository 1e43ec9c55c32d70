// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::ids::{ActorId, ExternalUserId, UserId, UserRoleId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use time::{Duration, OffsetDateTime};

/// How long an invitation stays valid after it is sent.
pub const INVITATION_VALIDITY: Duration = Duration::days(7);

/// A normalized email address.
///
/// The domain part is lowercased so it can be compared with organization domains.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parses an email address.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidEmail` unless the value has exactly one `@`
    /// with a non-empty local part and a dotted domain.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let trimmed: &str = value.trim();
        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(DomainError::InvalidEmail(value.to_string()));
        };

        if local.is_empty()
            || domain.contains('@')
            || !domain.contains('.')
            || domain.starts_with('.')
            || domain.ends_with('.')
            || trimmed.chars().any(char::is_whitespace)
        {
            return Err(DomainError::InvalidEmail(value.to_string()));
        }

        Ok(Self(format!("{local}@{}", domain.to_lowercase())))
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }

    /// Returns the part after `@`.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, domain)| domain)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user role granted to a user on behalf of one actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserRoleAssignment {
    pub actor_id: ActorId,
    pub user_role_id: UserRoleId,
}

impl UserRoleAssignment {
    #[must_use]
    pub const fn new(actor_id: ActorId, user_role_id: UserRoleId) -> Self {
        Self {
            actor_id,
            user_role_id,
        }
    }
}

/// Identity record held by the external directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub external_id: ExternalUserId,
    pub email: EmailAddress,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
}

/// Request to invite a person to act for an actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInvitation {
    pub email: EmailAddress,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub assigned_actor: ActorId,
    pub assigned_roles: BTreeSet<UserRoleId>,
}

impl UserInvitation {
    /// The assignments the invitation requests.
    #[must_use]
    pub fn requested_assignments(&self) -> BTreeSet<UserRoleAssignment> {
        self.assigned_roles
            .iter()
            .map(|user_role_id| UserRoleAssignment::new(self.assigned_actor, *user_role_id))
            .collect()
    }
}

/// A local user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    external_id: ExternalUserId,
    role_assignments: BTreeSet<UserRoleAssignment>,
    invitation_expires_at: Option<OffsetDateTime>,
    mitid_signup_initiated_at: Option<OffsetDateTime>,
}

impl User {
    /// Creates a user without any role assignments.
    #[must_use]
    pub fn new(external_id: ExternalUserId) -> Self {
        Self {
            id: UserId::new(),
            external_id,
            role_assignments: BTreeSet::new(),
            invitation_expires_at: None,
            mitid_signup_initiated_at: None,
        }
    }

    /// Rebuilds a user from its persisted parts.
    #[must_use]
    pub const fn with_id(
        id: UserId,
        external_id: ExternalUserId,
        role_assignments: BTreeSet<UserRoleAssignment>,
        invitation_expires_at: Option<OffsetDateTime>,
        mitid_signup_initiated_at: Option<OffsetDateTime>,
    ) -> Self {
        Self {
            id,
            external_id,
            role_assignments,
            invitation_expires_at,
            mitid_signup_initiated_at,
        }
    }

    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub const fn external_id(&self) -> ExternalUserId {
        self.external_id
    }

    #[must_use]
    pub const fn role_assignments(&self) -> &BTreeSet<UserRoleAssignment> {
        &self.role_assignments
    }

    #[must_use]
    pub const fn invitation_expires_at(&self) -> Option<OffsetDateTime> {
        self.invitation_expires_at
    }

    #[must_use]
    pub const fn mitid_signup_initiated_at(&self) -> Option<OffsetDateTime> {
        self.mitid_signup_initiated_at
    }

    /// Adds an assignment. Returns `true` if it was not already present.
    pub fn add_assignment(&mut self, assignment: UserRoleAssignment) -> bool {
        self.role_assignments.insert(assignment)
    }

    /// Removes an assignment. Returns `true` if it was present.
    pub fn remove_assignment(&mut self, assignment: &UserRoleAssignment) -> bool {
        self.role_assignments.remove(assignment)
    }

    /// Removes every assignment of a role, across all actors.
    pub fn remove_role(&mut self, user_role_id: UserRoleId) -> Vec<UserRoleAssignment> {
        let removed: Vec<UserRoleAssignment> = self
            .role_assignments
            .iter()
            .filter(|assignment| assignment.user_role_id == user_role_id)
            .copied()
            .collect();
        for assignment in &removed {
            self.role_assignments.remove(assignment);
        }
        removed
    }

    /// Starts a new invitation window.
    pub fn renew_invitation(&mut self, now: OffsetDateTime) {
        self.invitation_expires_at = Some(now + INVITATION_VALIDITY);
    }

    /// Records the start of MitID signup, which consumes the invitation.
    pub const fn initiate_mitid_signup(&mut self, now: OffsetDateTime) {
        self.mitid_signup_initiated_at = Some(now);
        self.invitation_expires_at = None;
    }
}

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
    clippy::all
)]

use mp_registry_domain::{
    ActorId, DomainError, GridAreaId, OrganizationId, Permission, UserId, UserRoleId, code_enum,
};
use std::fmt::{Debug, Display};
use std::str::FromStr;
use time::OffsetDateTime;

#[cfg(test)]
mod tests;

/// Who made a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangedBy {
    /// A signed-in user.
    User(UserId),
    /// A background process acting without a user, such as the consolidation worker.
    System,
}

impl ChangedBy {
    const SYSTEM: &'static str = "system";

    /// Returns the user id, or `None` for system changes.
    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        match self {
            Self::User(user_id) => Some(*user_id),
            Self::System => None,
        }
    }
}

impl Display for ChangedBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User(user_id) => write!(f, "{user_id}"),
            Self::System => f.write_str(Self::SYSTEM),
        }
    }
}

impl FromStr for ChangedBy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::SYSTEM {
            return Ok(Self::System);
        }
        s.parse::<UserId>().map(Self::User)
    }
}

code_enum! {
    /// The audited entity kinds. Each kind has its own log.
    pub enum AuditLogKind {
        Organization => "Organization",
        Actor => "Actor",
        ActorConsolidation => "ActorConsolidation",
        Permission => "Permission",
        UserRole => "UserRole",
        UserInvite => "UserInvite",
        UserRoleAssignment => "UserRoleAssignment",
        GridArea => "GridArea",
    }
}

/// A catalogue of changes recorded for one audited entity kind.
pub trait AuditedChange:
    Copy + Eq + Debug + Display + FromStr<Err = DomainError> + 'static
{
    /// The log the change belongs to.
    const KIND: AuditLogKind;

    /// Identity of the audited entity.
    type Subject: Copy + Eq + Debug + Display + FromStr<Err = DomainError>;
}

macro_rules! audited_change {
    (
        $(#[$meta:meta])*
        pub enum $name:ident: $kind:ident for $subject:ty {
            $($variant:ident => $code:literal),+ $(,)?
        }
    ) => {
        code_enum! {
            $(#[$meta])*
            pub enum $name {
                $($variant => $code),+
            }
        }

        impl AuditedChange for $name {
            const KIND: AuditLogKind = AuditLogKind::$kind;
            type Subject = $subject;
        }
    };
}

audited_change! {
    /// Changes recorded against an organization.
    pub enum OrganizationAuditedChange: Organization for OrganizationId {
        Created => "Created",
        Name => "Name",
        Domain => "Domain",
        Address => "Address",
        Status => "Status",
    }
}

audited_change! {
    /// Changes recorded against an actor.
    pub enum ActorAuditedChange: Actor for ActorId {
        Created => "Created",
        Name => "Name",
        Status => "Status",
        MarketRole => "MarketRole",
        CertificateCredentials => "CertificateCredentials",
        ClientSecretCredentials => "ClientSecretCredentials",
        DelegationStart => "DelegationStart",
        DelegationStop => "DelegationStop",
    }
}

audited_change! {
    /// Steps of an actor consolidation, recorded against the actors involved.
    pub enum ActorConsolidationAuditedChange: ActorConsolidation for ActorId {
        ConsolidationRequested => "ConsolidationRequested",
        ConsolidationCompleted => "ConsolidationCompleted",
    }
}

audited_change! {
    /// Grants and revocations of a permission on user roles.
    pub enum PermissionAuditedChange: Permission for Permission {
        AssignedToUserRole => "AssignedToUserRole",
        RemovedFromUserRole => "RemovedFromUserRole",
    }
}

audited_change! {
    /// Changes recorded against a user role.
    pub enum UserRoleAuditedChange: UserRole for UserRoleId {
        Created => "Created",
        Name => "Name",
        Description => "Description",
        Status => "Status",
        Permissions => "Permissions",
    }
}

audited_change! {
    /// Invitations sent to a user.
    pub enum UserInviteAuditedChange: UserInvite for UserId {
        InvitationSent => "InvitationSent",
    }
}

audited_change! {
    /// Role assignments granted to or taken from a user.
    pub enum UserRoleAssignmentAuditedChange: UserRoleAssignment for UserId {
        Added => "Added",
        Removed => "Removed",
    }
}

audited_change! {
    /// Changes recorded against a grid area.
    pub enum GridAreaAuditedChange: GridArea for GridAreaId {
        Created => "Created",
        Name => "Name",
        ValidTo => "ValidTo",
    }
}

/// An immutable audit log entry.
///
/// Entries are only ever inserted. `current_value` holds the value after the
/// change and `previous_value` the value before it, when one existed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogEntry<C: AuditedChange> {
    /// The audited entity.
    pub subject: C::Subject,
    /// What changed.
    pub change: C,
    /// Who changed it.
    pub changed_by: ChangedBy,
    /// When it changed.
    pub timestamp: OffsetDateTime,
    pub current_value: Option<String>,
    pub previous_value: Option<String>,
}

impl<C: AuditedChange> AuditLogEntry<C> {
    /// Creates an entry without values.
    #[must_use]
    pub const fn new(
        subject: C::Subject,
        change: C,
        changed_by: ChangedBy,
        timestamp: OffsetDateTime,
    ) -> Self {
        Self {
            subject,
            change,
            changed_by,
            timestamp,
            current_value: None,
            previous_value: None,
        }
    }

    /// Sets the value after the change.
    #[must_use]
    pub fn with_current(mut self, value: impl Into<String>) -> Self {
        self.current_value = Some(value.into());
        self
    }

    /// Sets the value before the change.
    #[must_use]
    pub fn with_previous(mut self, value: impl Into<String>) -> Self {
        self.previous_value = Some(value.into());
        self
    }

    /// The log this entry is written to.
    #[must_use]
    pub const fn kind(&self) -> AuditLogKind {
        C::KIND
    }
}

pub type OrganizationAuditLogEntry = AuditLogEntry<OrganizationAuditedChange>;
pub type ActorAuditLogEntry = AuditLogEntry<ActorAuditedChange>;
pub type ActorConsolidationAuditLogEntry = AuditLogEntry<ActorConsolidationAuditedChange>;
pub type PermissionAuditLogEntry = AuditLogEntry<PermissionAuditedChange>;
pub type UserRoleAuditLogEntry = AuditLogEntry<UserRoleAuditedChange>;
pub type UserInviteAuditLogEntry = AuditLogEntry<UserInviteAuditedChange>;
pub type UserRoleAssignmentAuditLogEntry = AuditLogEntry<UserRoleAssignmentAuditedChange>;
pub type GridAreaAuditLogEntry = AuditLogEntry<GridAreaAuditedChange>;

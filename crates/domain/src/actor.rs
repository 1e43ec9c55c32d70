// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::actor_number::ActorNumber;
use crate::error::DomainError;
use crate::events::DomainEvent;
use crate::ids::{ActorId, ExternalActorId, OrganizationId};
use crate::market_role::{ActorGridArea, ActorMarketRole};
use time::OffsetDateTime;

code_enum! {
    /// Lifecycle of an actor.
    pub enum ActorStatus {
        /// Created but not yet operational. Market role is freely editable.
        New => "New",
        /// Operational.
        Active => "Active",
        /// Retired. Terminal.
        Inactive => "Inactive",
        /// Operational but not receiving new data flows.
        Passive => "Passive",
    }
}

impl ActorStatus {
    /// Checks if a transition from this status to another is valid.
    ///
    /// Valid transitions are:
    /// - New → Active
    /// - Active → Passive, Active → Inactive
    /// - Passive → Active, Passive → Inactive
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::New, Self::Active)
                | (Self::Active, Self::Passive | Self::Inactive)
                | (Self::Passive, Self::Active | Self::Inactive)
        )
    }

    /// Whether existing market role data is locked against removal.
    #[must_use]
    pub const fn is_operational(&self) -> bool {
        !matches!(self, Self::New)
    }
}

/// Display name of an actor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActorName(String);

impl ActorName {
    /// Maximum length of an actor name.
    pub const MAX_LENGTH: usize = 512;

    /// Creates an actor name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidName` if the name is blank or too long.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let trimmed: &str = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidName(String::from(
                "Actor name cannot be empty",
            )));
        }
        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(DomainError::InvalidName(format!(
                "Actor name cannot exceed {} characters",
                Self::MAX_LENGTH
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

/// Credentials an actor authenticates with. At most one kind at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActorCredentials {
    /// A certificate registered by thumbprint.
    Certificate {
        /// Certificate thumbprint.
        thumbprint: String,
        /// Key used to look the certificate up in the secret store.
        lookup_identifier: String,
        /// Expiry of the certificate.
        expires_at: OffsetDateTime,
    },
    /// A client secret issued by the external directory.
    ClientSecret {
        /// Identifier of the secret in the external directory.
        secret_identifier: String,
        /// Expiry of the secret.
        expires_at: OffsetDateTime,
    },
}

impl ActorCredentials {
    #[must_use]
    pub const fn expires_at(&self) -> OffsetDateTime {
        match self {
            Self::Certificate { expires_at, .. } | Self::ClientSecret { expires_at, .. } => {
                *expires_at
            }
        }
    }
}

/// A market participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    id: ActorId,
    organization_id: OrganizationId,
    external_actor_id: Option<ExternalActorId>,
    actor_number: ActorNumber,
    status: ActorStatus,
    name: ActorName,
    market_role: ActorMarketRole,
    credentials: Option<ActorCredentials>,
}

impl Actor {
    /// Creates a new actor in status `New`.
    #[must_use]
    pub fn new(
        organization_id: OrganizationId,
        actor_number: ActorNumber,
        name: ActorName,
        market_role: ActorMarketRole,
    ) -> Self {
        Self {
            id: ActorId::new(),
            organization_id,
            external_actor_id: None,
            actor_number,
            status: ActorStatus::New,
            name,
            market_role,
            credentials: None,
        }
    }

    /// Rebuilds an actor from its persisted parts.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub const fn with_id(
        id: ActorId,
        organization_id: OrganizationId,
        external_actor_id: Option<ExternalActorId>,
        actor_number: ActorNumber,
        status: ActorStatus,
        name: ActorName,
        market_role: ActorMarketRole,
        credentials: Option<ActorCredentials>,
    ) -> Self {
        Self {
            id,
            organization_id,
            external_actor_id,
            actor_number,
            status,
            name,
            market_role,
            credentials,
        }
    }

    #[must_use]
    pub const fn id(&self) -> ActorId {
        self.id
    }

    #[must_use]
    pub const fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }

    #[must_use]
    pub const fn external_actor_id(&self) -> Option<ExternalActorId> {
        self.external_actor_id
    }

    #[must_use]
    pub const fn actor_number(&self) -> &ActorNumber {
        &self.actor_number
    }

    #[must_use]
    pub const fn status(&self) -> ActorStatus {
        self.status
    }

    #[must_use]
    pub const fn name(&self) -> &ActorName {
        &self.name
    }

    #[must_use]
    pub const fn market_role(&self) -> &ActorMarketRole {
        &self.market_role
    }

    #[must_use]
    pub const fn credentials(&self) -> Option<&ActorCredentials> {
        self.credentials.as_ref()
    }

    pub fn set_name(&mut self, name: ActorName) {
        self.name = name;
    }

    pub const fn set_external_actor_id(&mut self, external_actor_id: Option<ExternalActorId>) {
        self.external_actor_id = external_actor_id;
    }

    /// Replaces the market role.
    ///
    /// Whether the replacement is permitted for the actor's status is a
    /// cross-version rule checked against the persisted actor, not here.
    pub fn set_market_role(&mut self, market_role: ActorMarketRole) {
        self.market_role = market_role;
    }

    /// Activates the actor, returning the events announcing it.
    ///
    /// Grid access providers announce ownership of each of their grid areas.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the actor cannot become active.
    pub fn activate(&mut self, at: OffsetDateTime) -> Result<Vec<DomainEvent>, DomainError> {
        self.transition_to(ActorStatus::Active)?;

        let function = self.market_role.function();
        let mut events: Vec<DomainEvent> = vec![DomainEvent::ActorActivated {
            actor_id: self.id,
            actor_number: self.actor_number.clone(),
            function,
            external_actor_id: self.external_actor_id,
            valid_from: at,
        }];

        if function.reserves_grid_areas() {
            events.extend(self.market_role.grid_areas().iter().map(|grid_area| {
                DomainEvent::GridAreaOwnershipAssigned {
                    actor_id: self.id,
                    actor_number: self.actor_number.clone(),
                    function,
                    grid_area_id: grid_area.grid_area_id,
                    valid_from: at,
                }
            }));
        }

        Ok(events)
    }

    /// Moves the actor to another status.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` for transitions outside
    /// [`ActorStatus::can_transition_to`].
    pub fn transition_to(&mut self, target: ActorStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(target) {
            return Err(DomainError::InvalidStatusTransition {
                entity: "Actor",
                from: self.status.as_str(),
                to: target.as_str(),
            });
        }
        self.status = target;
        Ok(())
    }

    /// Retires the actor as the source of a consolidation, from any status.
    pub const fn deactivate_for_consolidation(&mut self) {
        self.status = ActorStatus::Inactive;
    }

    /// Removes every grid area from the market role.
    pub fn take_grid_areas(&mut self) -> Vec<ActorGridArea> {
        self.market_role.take_grid_areas()
    }

    /// Merges a grid area into the market role. Returns `true` if it is new to the actor.
    pub fn merge_grid_area(&mut self, grid_area: ActorGridArea) -> bool {
        self.market_role.merge_grid_area(grid_area)
    }

    /// Assigns credentials.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::CredentialsAlreadyAssigned` if any credentials exist.
    pub fn assign_credentials(&mut self, credentials: ActorCredentials) -> Result<(), DomainError> {
        if self.credentials.is_some() {
            return Err(DomainError::CredentialsAlreadyAssigned(self.id));
        }
        self.credentials = Some(credentials);
        Ok(())
    }

    /// Removes the current credentials, if any, returning the event announcing it.
    pub fn remove_credentials(&mut self) -> Option<DomainEvent> {
        self.credentials.take().map(|_| DomainEvent::ActorCredentialsRemoved {
            actor_id: self.id,
            actor_number: self.actor_number.clone(),
        })
    }
}

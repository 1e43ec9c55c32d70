// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Integration events written to the outbox.
//!
//! Events are serialized to JSON and dispatched to external systems by a
//! separate process. The serialized shape is the wire contract, so field
//! names are stable.

use crate::actor_number::ActorNumber;
use crate::delegation::{DelegatedProcess, DelegationMessageType};
use crate::ids::{
    ActorId, DelegationPeriodId, ExternalActorId, ExternalUserId, GridAreaId,
    MessageDelegationId, ProcessDelegationId, UserId, UserRoleId,
};
use crate::market_role::EicFunction;
use crate::user::EmailAddress;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// An event raised by a mutation, destined for external consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type")]
pub enum DomainEvent {
    ActorActivated {
        actor_id: ActorId,
        actor_number: ActorNumber,
        function: EicFunction,
        external_actor_id: Option<ExternalActorId>,
        #[serde(with = "time::serde::rfc3339")]
        valid_from: OffsetDateTime,
    },
    GridAreaOwnershipAssigned {
        actor_id: ActorId,
        actor_number: ActorNumber,
        function: EicFunction,
        grid_area_id: GridAreaId,
        #[serde(with = "time::serde::rfc3339")]
        valid_from: OffsetDateTime,
    },
    ActorCredentialsRemoved {
        actor_id: ActorId,
        actor_number: ActorNumber,
    },
    /// Raised once for each side of a consolidation.
    ActorConsolidationCompleted {
        actor_id: ActorId,
        consolidated_from: ActorId,
        consolidated_into: ActorId,
        transferred_grid_areas: Vec<GridAreaId>,
        #[serde(with = "time::serde::rfc3339")]
        consolidated_at: OffsetDateTime,
    },
    MessageDelegationConfigured {
        delegation_id: MessageDelegationId,
        period_id: DelegationPeriodId,
        delegated_by: ActorId,
        delegated_to: ActorId,
        message_type: DelegationMessageType,
        grid_area_id: GridAreaId,
        #[serde(with = "time::serde::rfc3339")]
        starts_at: OffsetDateTime,
        #[serde(with = "time::serde::rfc3339::option")]
        stops_at: Option<OffsetDateTime>,
    },
    ProcessDelegationConfigured {
        delegation_id: ProcessDelegationId,
        period_id: DelegationPeriodId,
        delegated_by: ActorId,
        delegated_to: ActorId,
        process: DelegatedProcess,
        grid_area_id: GridAreaId,
        #[serde(with = "time::serde::rfc3339")]
        starts_at: OffsetDateTime,
        #[serde(with = "time::serde::rfc3339::option")]
        stops_at: Option<OffsetDateTime>,
    },
    /// Raised once per user and actor whose role assignments changed.
    UserRoleAssignmentsChanged {
        user_id: UserId,
        external_user_id: ExternalUserId,
        actor_id: ActorId,
        added_user_roles: Vec<UserRoleId>,
        removed_user_roles: Vec<UserRoleId>,
    },
}

impl DomainEvent {
    /// Stable name of the event, used as the outbox discriminator.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::ActorActivated { .. } => "ActorActivated",
            Self::GridAreaOwnershipAssigned { .. } => "GridAreaOwnershipAssigned",
            Self::ActorCredentialsRemoved { .. } => "ActorCredentialsRemoved",
            Self::ActorConsolidationCompleted { .. } => "ActorConsolidationCompleted",
            Self::MessageDelegationConfigured { .. } => "MessageDelegationConfigured",
            Self::ProcessDelegationConfigured { .. } => "ProcessDelegationConfigured",
            Self::UserRoleAssignmentsChanged { .. } => "UserRoleAssignmentsChanged",
        }
    }

    /// The aggregate the event belongs to.
    #[must_use]
    pub fn aggregate_id(&self) -> String {
        match self {
            Self::ActorActivated { actor_id, .. }
            | Self::GridAreaOwnershipAssigned { actor_id, .. }
            | Self::ActorCredentialsRemoved { actor_id, .. }
            | Self::ActorConsolidationCompleted { actor_id, .. } => actor_id.to_string(),
            Self::MessageDelegationConfigured { delegation_id, .. } => delegation_id.to_string(),
            Self::ProcessDelegationConfigured { delegation_id, .. } => delegation_id.to_string(),
            Self::UserRoleAssignmentsChanged { user_id, .. } => user_id.to_string(),
        }
    }
}

code_enum! {
    /// Which email to send.
    pub enum EmailTemplate {
        UserInvite => "UserInvite",
        UserAssignedToActor => "UserAssignedToActor",
    }
}

/// A request to send an email, written to the outbox for the mail sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailEvent {
    pub email: EmailAddress,
    pub template: EmailTemplate,
    pub user_id: UserId,
    pub actor_id: ActorId,
}

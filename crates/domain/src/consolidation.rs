// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::ids::{ActorConsolidationId, ActorId};
use time::OffsetDateTime;

code_enum! {
    /// Progress of a scheduled consolidation.
    pub enum ActorConsolidationStatus {
        Pending => "Pending",
        Executed => "Executed",
    }
}

/// A planned merge of one actor's responsibilities into another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorConsolidation {
    id: ActorConsolidationId,
    actor_from: ActorId,
    actor_to: ActorId,
    consolidate_at: OffsetDateTime,
    status: ActorConsolidationStatus,
}

impl ActorConsolidation {
    /// Schedules a consolidation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ConsolidationIntoSelf` if both actors are the same.
    pub fn new(
        actor_from: ActorId,
        actor_to: ActorId,
        consolidate_at: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        if actor_from == actor_to {
            return Err(DomainError::ConsolidationIntoSelf(actor_from));
        }
        Ok(Self {
            id: ActorConsolidationId::new(),
            actor_from,
            actor_to,
            consolidate_at,
            status: ActorConsolidationStatus::Pending,
        })
    }

    /// Rebuilds a consolidation from its persisted parts.
    #[must_use]
    pub const fn with_id(
        id: ActorConsolidationId,
        actor_from: ActorId,
        actor_to: ActorId,
        consolidate_at: OffsetDateTime,
        status: ActorConsolidationStatus,
    ) -> Self {
        Self {
            id,
            actor_from,
            actor_to,
            consolidate_at,
            status,
        }
    }

    #[must_use]
    pub const fn id(&self) -> ActorConsolidationId {
        self.id
    }

    #[must_use]
    pub const fn actor_from(&self) -> ActorId {
        self.actor_from
    }

    #[must_use]
    pub const fn actor_to(&self) -> ActorId {
        self.actor_to
    }

    #[must_use]
    pub const fn consolidate_at(&self) -> OffsetDateTime {
        self.consolidate_at
    }

    #[must_use]
    pub const fn status(&self) -> ActorConsolidationStatus {
        self.status
    }

    /// Whether the consolidation is pending and its instant has passed.
    #[must_use]
    pub fn is_due(&self, now: OffsetDateTime) -> bool {
        self.status == ActorConsolidationStatus::Pending && self.consolidate_at <= now
    }

    /// Whether the consolidation involves `actor_id` on either side.
    #[must_use]
    pub fn involves(&self, actor_id: ActorId) -> bool {
        self.actor_from == actor_id || self.actor_to == actor_id
    }

    /// Marks the consolidation as carried out.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ConsolidationAlreadyExecuted` if it already ran.
    pub fn mark_executed(&mut self) -> Result<(), DomainError> {
        if self.status == ActorConsolidationStatus::Executed {
            return Err(DomainError::ConsolidationAlreadyExecuted);
        }
        self.status = ActorConsolidationStatus::Executed;
        Ok(())
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::ids::{ActorId, DelegationPeriodId, GridAreaId, MessageDelegationId, ProcessDelegationId};
use time::OffsetDateTime;

code_enum! {
    /// Business messages whose handling can be delegated.
    pub enum DelegationMessageType {
        Rsm012Inbound => "RSM012Inbound",
        Rsm012Outbound => "RSM012Outbound",
        Rsm014Inbound => "RSM014Inbound",
        Rsm014Outbound => "RSM014Outbound",
        Rsm016Inbound => "RSM016Inbound",
        Rsm016Outbound => "RSM016Outbound",
        Rsm017Inbound => "RSM017Inbound",
        Rsm017Outbound => "RSM017Outbound",
        Rsm018Inbound => "RSM018Inbound",
        Rsm019Inbound => "RSM019Inbound",
    }
}

code_enum! {
    /// Business processes whose execution can be delegated.
    pub enum DelegatedProcess {
        RequestEnergyResults => "RequestEnergyResults",
        ReceiveEnergyResults => "ReceiveEnergyResults",
        RequestWholesaleResults => "RequestWholesaleResults",
        ReceiveWholesaleResults => "ReceiveWholesaleResults",
        RequestMeteringPointData => "RequestMeteringPointData",
        ReceiveMeteringPointData => "ReceiveMeteringPointData",
    }
}

/// A window during which an actor acts for the delegating actor in one grid area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegationPeriod {
    pub id: DelegationPeriodId,
    pub delegated_to: ActorId,
    pub grid_area_id: GridAreaId,
    pub starts_at: OffsetDateTime,
    pub stops_at: Option<OffsetDateTime>,
}

impl DelegationPeriod {
    /// A period without a stop instant is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.stops_at.is_none()
    }

    /// Closes the period at `stops_at`.
    ///
    /// Stopping at the start instant cancels the period.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDelegationStop` if `stops_at` precedes the start.
    pub fn stop(&mut self, stops_at: OffsetDateTime) -> Result<(), DomainError> {
        if stops_at < self.starts_at {
            return Err(DomainError::InvalidDelegationStop {
                starts_at: self.starts_at,
                stops_at,
            });
        }
        self.stops_at = Some(stops_at);
        Ok(())
    }
}

/// Delegation of a message type or process from one actor to others.
///
/// `I` is the delegation identity and `S` what is delegated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delegation<I, S> {
    id: I,
    delegated_by: ActorId,
    subject: S,
    periods: Vec<DelegationPeriod>,
}

/// Delegation of a business message type.
pub type MessageDelegation = Delegation<MessageDelegationId, DelegationMessageType>;

/// Delegation of a business process.
pub type ProcessDelegation = Delegation<ProcessDelegationId, DelegatedProcess>;

impl<I: Copy + Default, S: Copy> Delegation<I, S> {
    /// Creates a delegation without periods.
    #[must_use]
    pub fn new(delegated_by: ActorId, subject: S) -> Self {
        Self {
            id: I::default(),
            delegated_by,
            subject,
            periods: Vec::new(),
        }
    }
}

impl<I: Copy, S: Copy> Delegation<I, S> {
    /// Rebuilds a delegation from its persisted parts.
    #[must_use]
    pub const fn with_id(
        id: I,
        delegated_by: ActorId,
        subject: S,
        periods: Vec<DelegationPeriod>,
    ) -> Self {
        Self {
            id,
            delegated_by,
            subject,
            periods,
        }
    }

    #[must_use]
    pub const fn id(&self) -> I {
        self.id
    }

    #[must_use]
    pub const fn delegated_by(&self) -> ActorId {
        self.delegated_by
    }

    #[must_use]
    pub const fn subject(&self) -> S {
        self.subject
    }

    #[must_use]
    pub fn periods(&self) -> &[DelegationPeriod] {
        &self.periods
    }

    /// Opens a new period delegating `grid_area_id` to `delegated_to`.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor delegates to itself or an open period
    /// already exists for the grid area.
    pub fn add_period(
        &mut self,
        delegated_to: ActorId,
        grid_area_id: GridAreaId,
        starts_at: OffsetDateTime,
    ) -> Result<DelegationPeriodId, DomainError> {
        if delegated_to == self.delegated_by {
            return Err(DomainError::SelfDelegation(delegated_to));
        }
        if self
            .periods
            .iter()
            .any(|period| period.grid_area_id == grid_area_id && period.is_open())
        {
            return Err(DomainError::DelegationPeriodOverlap(grid_area_id));
        }

        let id: DelegationPeriodId = DelegationPeriodId::new();
        self.periods.push(DelegationPeriod {
            id,
            delegated_to,
            grid_area_id,
            starts_at,
            stops_at: None,
        });
        Ok(id)
    }

    /// Looks up a period for modification.
    pub fn period_mut(&mut self, period_id: DelegationPeriodId) -> Option<&mut DelegationPeriod> {
        self.periods.iter_mut().find(|period| period.id == period_id)
    }
}

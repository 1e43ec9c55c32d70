// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use mp_registry_domain::{ActorId, DomainError, EicFunction, GridAreaId};
use std::error::Error;
use std::fmt::Display;

/// Errors raised by rule and workflow services.
///
/// Each variant is a distinct category so callers can map them separately:
/// `NotFound` and `Validation` are caller mistakes, `Conflict` is a lost race
/// for a reservation, `Infrastructure` is a storage failure passed through
/// untouched.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced entity does not exist.
    #[error("{entity} {id} does not exist")]
    NotFound { entity: &'static str, id: String },
    /// A domain rule would be violated.
    #[error("Validation failed: {0}")]
    Validation(#[from] DomainError),
    /// The reservation ledger already holds the grid area for the function.
    #[error("Grid area {grid_area_id} is already reserved for {function}; actor {actor_id} cannot take it")]
    Conflict {
        actor_id: ActorId,
        function: EicFunction,
        grid_area_id: GridAreaId,
    },
    /// The store failed.
    #[error(transparent)]
    Infrastructure(#[from] StoreError),
}

impl CoreError {
    pub(crate) fn not_found(entity: &'static str, id: impl Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// An opaque failure reported by a store implementation.
#[derive(Debug)]
pub struct StoreError(Box<dyn Error + Send + Sync + 'static>);

impl StoreError {
    /// Wraps an implementation error.
    pub fn new(err: impl Error + Send + Sync + 'static) -> Self {
        Self(Box::new(err))
    }

    /// Creates an error from a message.
    pub fn message(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self(message.into())
    }

    /// Returns the wrapped error.
    #[must_use]
    pub fn into_inner(self) -> Box<dyn Error + Send + Sync + 'static> {
        self.0
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.0.source()
    }
}

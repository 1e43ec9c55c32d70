// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

macro_rules! uuid_identity {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a fresh random identity.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing uuid.
            #[must_use]
            pub const fn from_uuid(value: Uuid) -> Self {
                Self(value)
            }

            /// Returns the wrapped uuid.
            #[must_use]
            pub const fn value(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|e| DomainError::InvalidIdentifier {
                        value: s.to_string(),
                        reason: e.to_string(),
                    })
            }
        }
    };
}

uuid_identity!(
    /// Identity of an organization.
    OrganizationId
);
uuid_identity!(
    /// Identity of an actor (market participant).
    ActorId
);
uuid_identity!(
    /// Identity of a grid area.
    GridAreaId
);
uuid_identity!(
    /// Identity of a local user record.
    UserId
);
uuid_identity!(
    /// Identity of a user role.
    UserRoleId
);
uuid_identity!(
    /// Identity of a message delegation.
    MessageDelegationId
);
uuid_identity!(
    /// Identity of a process delegation.
    ProcessDelegationId
);
uuid_identity!(
    /// Identity of a single delegation period.
    DelegationPeriodId
);
uuid_identity!(
    /// Identity of a scheduled actor consolidation.
    ActorConsolidationId
);
uuid_identity!(
    /// Object id of the actor's application in the external directory.
    ExternalActorId
);
uuid_identity!(
    /// Object id of the user in the external identity directory.
    ExternalUserId
);

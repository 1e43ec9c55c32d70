// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Business identifier of an actor.
///
/// Either a GS1 Global Location Number (13 digits) or an ENTSO-E
/// Energy Identification Code (16 characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ActorNumber {
    /// Global Location Number.
    Gln(String),
    /// Energy Identification Code.
    Eic(String),
}

impl ActorNumber {
    /// Parses an actor number, classifying it as GLN or EIC.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidActorNumber` if the value matches neither format.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let value: &str = value.trim();
        if is_gln(value) {
            return Ok(Self::Gln(value.to_string()));
        }
        if is_eic(value) {
            return Ok(Self::Eic(value.to_string()));
        }
        Err(DomainError::InvalidActorNumber(value.to_string()))
    }

    /// Returns the raw actor number.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Gln(value) | Self::Eic(value) => value,
        }
    }
}

fn is_gln(value: &str) -> bool {
    value.len() == 13 && value.bytes().all(|b| b.is_ascii_digit())
}

// ^\d{2}[A-Z][A-Z0-9-]{12}[A-Z0-9]$
fn is_eic(value: &str) -> bool {
    let bytes: &[u8] = value.as_bytes();
    if bytes.len() != 16 {
        return false;
    }
    let is_upper_or_digit = |b: u8| b.is_ascii_uppercase() || b.is_ascii_digit();

    bytes[..2].iter().all(u8::is_ascii_digit)
        && bytes[2].is_ascii_uppercase()
        && bytes[3..15].iter().all(|&b| is_upper_or_digit(b) || b == b'-')
        && is_upper_or_digit(bytes[15])
}

impl FromStr for ActorNumber {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ActorNumber {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<ActorNumber> for String {
    fn from(value: ActorNumber) -> Self {
        match value {
            ActorNumber::Gln(value) | ActorNumber::Eic(value) => value,
        }
    }
}

impl std::fmt::Display for ActorNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.value())
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::ids::GridAreaId;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

code_enum! {
    /// Price area a grid area settles in.
    pub enum PriceAreaCode {
        Dk1 => "DK1",
        Dk2 => "DK2",
    }
}

code_enum! {
    /// Classification of a grid area.
    pub enum GridAreaType {
        NotSet => "NotSet",
        Transmission => "Transmission",
        Distribution => "Distribution",
        Other => "Other",
        Test => "Test",
        GridLossDk => "GridLossDK",
        GridLossAbroad => "GridLossAbroad",
        NonDanish => "NonDanish",
    }
}

/// Three digit grid area code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GridAreaCode(String);

impl GridAreaCode {
    /// Creates a grid area code.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidGridAreaCode` unless the code is exactly three digits.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        if value.len() != 3 || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::InvalidGridAreaCode(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    /// Returns the code.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

/// A geographic distribution network zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridArea {
    id: GridAreaId,
    name: String,
    code: GridAreaCode,
    price_area_code: PriceAreaCode,
    grid_area_type: GridAreaType,
    valid_from: OffsetDateTime,
    valid_to: Option<OffsetDateTime>,
}

impl GridArea {
    /// Creates a grid area.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or the validity period is inverted.
    pub fn with_id(
        id: GridAreaId,
        name: &str,
        code: GridAreaCode,
        price_area_code: PriceAreaCode,
        grid_area_type: GridAreaType,
        valid_from: OffsetDateTime,
        valid_to: Option<OffsetDateTime>,
    ) -> Result<Self, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidName(String::from(
                "Grid area name cannot be empty",
            )));
        }
        if let Some(valid_to) = valid_to
            && valid_to <= valid_from
        {
            return Err(DomainError::InvalidValidityPeriod {
                valid_from,
                valid_to,
            });
        }

        Ok(Self {
            id,
            name: name.trim().to_string(),
            code,
            price_area_code,
            grid_area_type,
            valid_from,
            valid_to,
        })
    }

    #[must_use]
    pub const fn id(&self) -> GridAreaId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn code(&self) -> &GridAreaCode {
        &self.code
    }

    #[must_use]
    pub const fn price_area_code(&self) -> PriceAreaCode {
        self.price_area_code
    }

    #[must_use]
    pub const fn grid_area_type(&self) -> GridAreaType {
        self.grid_area_type
    }

    #[must_use]
    pub const fn valid_from(&self) -> OffsetDateTime {
        self.valid_from
    }

    #[must_use]
    pub const fn valid_to(&self) -> Option<OffsetDateTime> {
        self.valid_to
    }

    /// Whether the validity period `[valid_from, valid_to)` overlaps `[from, to)`.
    ///
    /// An absent `to` (or `valid_to`) is open-ended.
    #[must_use]
    pub fn is_relevant_for(&self, from: OffsetDateTime, to: Option<OffsetDateTime>) -> bool {
        let starts_before_range_ends: bool = to.is_none_or(|to| self.valid_from < to);
        let ends_after_range_starts: bool = self.valid_to.is_none_or(|valid_to| valid_to > from);
        starts_before_range_ends && ends_after_range_starts
    }
}

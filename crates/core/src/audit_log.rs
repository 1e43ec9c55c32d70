// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::{CoreError, StoreError};
use crate::repository::AuditLogRepository;
use mp_registry_audit::{AuditLogEntry, AuditedChange};
use mp_registry_domain::{ActorMarketRole, Address, UserRoleAssignment};
use std::fmt::Write;

/// Inserts an entry into the log for its kind.
pub fn record<C, S>(store: &mut S, entry: AuditLogEntry<C>) -> Result<(), CoreError>
where
    C: AuditedChange,
    S: AuditLogRepository<C> + ?Sized,
{
    store.insert_audit_log_entry(&entry)?;
    Ok(())
}

/// JSON form of an assignment, as stored in role assignment audit values.
pub fn assignment_value(assignment: &UserRoleAssignment) -> Result<String, CoreError> {
    serde_json::to_string(assignment).map_err(|e| CoreError::Infrastructure(StoreError::new(e)))
}

pub fn address_value(address: &Address) -> String {
    [
        address.street_name.as_deref(),
        address.number.as_deref(),
        address.zip_code.as_deref(),
        address.city.as_deref(),
        Some(address.country.as_str()),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect::<Vec<&str>>()
    .join(" ")
}

/// `function: grid_area[types] ...`
pub fn market_role_value(market_role: &ActorMarketRole) -> String {
    let mut value: String = market_role.function().to_string();
    for grid_area in market_role.grid_areas() {
        let types: Vec<&str> = grid_area
            .metering_point_types
            .iter()
            .map(|metering_point_type| metering_point_type.as_str())
            .collect();
        let _ = write!(value, " {}[{}]", grid_area.grid_area_id, types.join(","));
    }
    value
}

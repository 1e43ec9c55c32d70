// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! Every aggregate loader returns a fully populated aggregate: child rows
//! (domains, grid areas, permissions, assignments, periods) are loaded
//! eagerly alongside the parent row.

mod actors;
mod audit;
mod consolidations;
mod delegations;
mod grid_areas;
mod organizations;
mod outbox;
mod user_roles;
mod users;

pub use actors::{get_actor, get_actors_by_organization, get_reservation_holder};
pub use audit::get_audit_log_entries;
pub use consolidations::{get_actor_consolidation, get_actor_consolidations};
pub use delegations::{
    get_message_delegation, get_message_delegation_for, get_process_delegation,
    get_process_delegation_for,
};
pub use grid_areas::{get_grid_area, get_grid_areas};
pub use organizations::{get_organization, get_organizations};
pub use outbox::{pending_domain_events, pending_email_events};
pub use user_roles::{get_user_role, get_user_roles};
pub use users::{get_user, get_user_by_external_id, get_users_with_role};

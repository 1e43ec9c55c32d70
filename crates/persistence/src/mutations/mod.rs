// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations.
//!
//! Aggregates are saved with an upsert on the parent row followed by a
//! rewrite of their child rows, so a save always leaves the stored aggregate
//! equal to the one passed in. None of these functions open a transaction;
//! they run inside the caller's unit of work.

mod actors;
mod audit;
mod consolidations;
mod delegations;
mod grid_areas;
mod organizations;
mod outbox;
mod reservations;
mod user_roles;
mod users;

pub use actors::upsert_actor;
pub use audit::insert_audit_log_entry;
pub use consolidations::upsert_actor_consolidation;
pub use delegations::{upsert_message_delegation, upsert_process_delegation};
pub use grid_areas::upsert_grid_area;
pub use organizations::upsert_organization;
pub use outbox::{enqueue_domain_event, enqueue_email_event};
pub use reservations::{remove_all_reservations, try_reserve};
pub use user_roles::upsert_user_role;
pub use users::upsert_user;

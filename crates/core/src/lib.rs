// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::missing_errors_doc)]

mod actor;
mod audit_log;
mod command;
mod consolidation;
mod delegation;
mod error;
mod invitation;
mod lookup;
mod organization;
mod repository;
mod rules;
mod user_role;

#[cfg(test)]
mod tests;

pub use actor::{
    ActorUpdate, NewActor, activate_actor, assign_actor_credentials, change_actor_status,
    create_actor, remove_actor_credentials, update_actor,
};
pub use command::{Command, CommandOutcome, apply, execute, execute_invitation};
pub use consolidation::{
    ConsolidationRun, consolidate, consolidate_due, due_consolidations, execute_consolidation,
    execute_due_consolidations, schedule_consolidation,
};
pub use delegation::{
    NewDelegation, NewMessageDelegation, NewProcessDelegation, create_message_delegation,
    create_process_delegation, stop_message_delegation, stop_process_delegation,
};
pub use error::{CoreError, StoreError};
pub use invitation::{invite_user, update_user_role_assignments};
pub use organization::{
    NewGridArea, NewOrganization, OrganizationUpdate, create_grid_area, create_organization,
    update_grid_area, update_organization,
};
pub use repository::{
    ActorConsolidationRepository, ActorRepository, AuditLogRepository, DomainEventOutbox,
    EmailEventOutbox, ExternalIdentityProvider, GridAreaRepository, MessageDelegationRepository,
    OrganizationRepository, ProcessDelegationRepository, ReservationLedger, Store, UnitOfWork,
    UnitOfWorkProvider, UserRepository, UserRoleRepository,
};
pub use rules::{
    ensure_email_in_organization_domain, ensure_market_role_change_allowed,
    ensure_required_permissions_kept, ensure_unique_business_register_identifier,
    ensure_unique_eic_functions, validate_and_reserve,
};
pub use user_role::{
    NewUserRole, create_user_role, deactivate_user_role, update_user_role_permissions,
};

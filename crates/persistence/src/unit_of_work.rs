// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use mp_registry::{
    ActorConsolidationRepository, ActorRepository, AuditLogRepository, DomainEventOutbox,
    EmailEventOutbox, GridAreaRepository, MessageDelegationRepository, OrganizationRepository,
    ProcessDelegationRepository, ReservationLedger, StoreError, UnitOfWork, UserRepository,
    UserRoleRepository,
};
use mp_registry_audit::{AuditLogEntry, AuditedChange};
use mp_registry_domain::{
    Actor, ActorConsolidation, ActorConsolidationId, ActorId, DelegatedProcess,
    DelegationMessageType, DomainEvent, EicFunction, EmailEvent, ExternalUserId, GridArea,
    GridAreaId, MessageDelegation, MessageDelegationId, Organization, OrganizationId,
    ProcessDelegation, ProcessDelegationId, User, UserId, UserRole, UserRoleId,
};
use tracing::{debug, warn};

use crate::backend::sqlite;
use crate::error::PersistenceError;
use crate::{mutations, queries};

/// A `BEGIN IMMEDIATE` transaction on one `SQLite` connection.
///
/// Every repository call made through the unit of work joins the
/// transaction. Dropping it without `commit` rolls the transaction back.
pub struct SqliteUnitOfWork<'a> {
    conn: &'a mut SqliteConnection,
    finished: bool,
}

impl<'a> SqliteUnitOfWork<'a> {
    pub(crate) fn begin(conn: &'a mut SqliteConnection) -> Result<Self, PersistenceError> {
        sqlite::begin_immediate(conn)?;
        debug!("Began unit of work");
        Ok(Self {
            conn,
            finished: false,
        })
    }
}

impl Drop for SqliteUnitOfWork<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        match sqlite::rollback(self.conn) {
            Ok(()) => debug!("Rolled back unit of work dropped without commit"),
            Err(e) => warn!(error = %e, "Failed to roll back dropped unit of work"),
        }
    }
}

impl UnitOfWork for SqliteUnitOfWork<'_> {
    fn commit(mut self) -> Result<(), StoreError> {
        self.finished = true;
        sqlite::commit(self.conn)?;
        debug!("Committed unit of work");
        Ok(())
    }

    fn rollback(mut self) -> Result<(), StoreError> {
        self.finished = true;
        sqlite::rollback(self.conn)?;
        debug!("Rolled back unit of work");
        Ok(())
    }
}

impl OrganizationRepository for SqliteUnitOfWork<'_> {
    fn get_organization(
        &mut self,
        id: OrganizationId,
    ) -> Result<Option<Organization>, StoreError> {
        Ok(queries::get_organization(self.conn, id)?)
    }

    fn get_organizations(&mut self) -> Result<Vec<Organization>, StoreError> {
        Ok(queries::get_organizations(self.conn)?)
    }

    fn add_or_update_organization(
        &mut self,
        organization: &Organization,
    ) -> Result<OrganizationId, StoreError> {
        Ok(mutations::upsert_organization(self.conn, organization)?)
    }
}

impl ActorRepository for SqliteUnitOfWork<'_> {
    fn get_actor(&mut self, id: ActorId) -> Result<Option<Actor>, StoreError> {
        Ok(queries::get_actor(self.conn, id)?)
    }

    fn get_actors_by_organization(
        &mut self,
        organization_id: OrganizationId,
    ) -> Result<Vec<Actor>, StoreError> {
        Ok(queries::get_actors_by_organization(
            self.conn,
            organization_id,
        )?)
    }

    fn add_or_update_actor(&mut self, actor: &Actor) -> Result<ActorId, StoreError> {
        Ok(mutations::upsert_actor(self.conn, actor)?)
    }
}

impl GridAreaRepository for SqliteUnitOfWork<'_> {
    fn get_grid_area(&mut self, id: GridAreaId) -> Result<Option<GridArea>, StoreError> {
        Ok(queries::get_grid_area(self.conn, id)?)
    }

    fn get_grid_areas(&mut self) -> Result<Vec<GridArea>, StoreError> {
        Ok(queries::get_grid_areas(self.conn)?)
    }

    fn add_or_update_grid_area(&mut self, grid_area: &GridArea) -> Result<GridAreaId, StoreError> {
        Ok(mutations::upsert_grid_area(self.conn, grid_area)?)
    }
}

impl UserRepository for SqliteUnitOfWork<'_> {
    fn get_user(&mut self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(queries::get_user(self.conn, id)?)
    }

    fn get_user_by_external_id(
        &mut self,
        external_id: ExternalUserId,
    ) -> Result<Option<User>, StoreError> {
        Ok(queries::get_user_by_external_id(self.conn, external_id)?)
    }

    fn get_users_with_role(&mut self, user_role_id: UserRoleId) -> Result<Vec<User>, StoreError> {
        Ok(queries::get_users_with_role(self.conn, user_role_id)?)
    }

    fn add_or_update_user(&mut self, user: &User) -> Result<UserId, StoreError> {
        Ok(mutations::upsert_user(self.conn, user)?)
    }
}

impl UserRoleRepository for SqliteUnitOfWork<'_> {
    fn get_user_role(&mut self, id: UserRoleId) -> Result<Option<UserRole>, StoreError> {
        Ok(queries::get_user_role(self.conn, id)?)
    }

    fn get_user_roles(&mut self) -> Result<Vec<UserRole>, StoreError> {
        Ok(queries::get_user_roles(self.conn)?)
    }

    fn add_or_update_user_role(&mut self, user_role: &UserRole) -> Result<UserRoleId, StoreError> {
        Ok(mutations::upsert_user_role(self.conn, user_role)?)
    }
}

impl MessageDelegationRepository for SqliteUnitOfWork<'_> {
    fn get_message_delegation(
        &mut self,
        id: MessageDelegationId,
    ) -> Result<Option<MessageDelegation>, StoreError> {
        Ok(queries::get_message_delegation(self.conn, id)?)
    }

    fn get_message_delegation_for(
        &mut self,
        delegated_by: ActorId,
        message_type: DelegationMessageType,
    ) -> Result<Option<MessageDelegation>, StoreError> {
        Ok(queries::get_message_delegation_for(
            self.conn,
            delegated_by,
            message_type,
        )?)
    }

    fn add_or_update_message_delegation(
        &mut self,
        delegation: &MessageDelegation,
    ) -> Result<MessageDelegationId, StoreError> {
        Ok(mutations::upsert_message_delegation(self.conn, delegation)?)
    }
}

impl ProcessDelegationRepository for SqliteUnitOfWork<'_> {
    fn get_process_delegation(
        &mut self,
        id: ProcessDelegationId,
    ) -> Result<Option<ProcessDelegation>, StoreError> {
        Ok(queries::get_process_delegation(self.conn, id)?)
    }

    fn get_process_delegation_for(
        &mut self,
        delegated_by: ActorId,
        process: DelegatedProcess,
    ) -> Result<Option<ProcessDelegation>, StoreError> {
        Ok(queries::get_process_delegation_for(
            self.conn,
            delegated_by,
            process,
        )?)
    }

    fn add_or_update_process_delegation(
        &mut self,
        delegation: &ProcessDelegation,
    ) -> Result<ProcessDelegationId, StoreError> {
        Ok(mutations::upsert_process_delegation(self.conn, delegation)?)
    }
}

impl ActorConsolidationRepository for SqliteUnitOfWork<'_> {
    fn get_actor_consolidation(
        &mut self,
        id: ActorConsolidationId,
    ) -> Result<Option<ActorConsolidation>, StoreError> {
        Ok(queries::get_actor_consolidation(self.conn, id)?)
    }

    fn get_actor_consolidations(&mut self) -> Result<Vec<ActorConsolidation>, StoreError> {
        Ok(queries::get_actor_consolidations(self.conn)?)
    }

    fn add_or_update_actor_consolidation(
        &mut self,
        consolidation: &ActorConsolidation,
    ) -> Result<ActorConsolidationId, StoreError> {
        Ok(mutations::upsert_actor_consolidation(
            self.conn,
            consolidation,
        )?)
    }
}

impl ReservationLedger for SqliteUnitOfWork<'_> {
    fn try_reserve(
        &mut self,
        actor_id: ActorId,
        function: EicFunction,
        grid_area_id: GridAreaId,
    ) -> Result<bool, StoreError> {
        Ok(mutations::try_reserve(
            self.conn,
            actor_id,
            function,
            grid_area_id,
        )?)
    }

    fn remove_all_reservations(&mut self, actor_id: ActorId) -> Result<(), StoreError> {
        Ok(mutations::remove_all_reservations(self.conn, actor_id)?)
    }
}

impl DomainEventOutbox for SqliteUnitOfWork<'_> {
    fn enqueue_domain_event(&mut self, event: &DomainEvent) -> Result<(), StoreError> {
        Ok(mutations::enqueue_domain_event(self.conn, event)?)
    }
}

impl EmailEventOutbox for SqliteUnitOfWork<'_> {
    fn enqueue_email_event(&mut self, event: &EmailEvent) -> Result<(), StoreError> {
        Ok(mutations::enqueue_email_event(self.conn, event)?)
    }
}

impl<C: AuditedChange> AuditLogRepository<C> for SqliteUnitOfWork<'_> {
    fn insert_audit_log_entry(&mut self, entry: &AuditLogEntry<C>) -> Result<(), StoreError> {
        Ok(mutations::insert_audit_log_entry(self.conn, entry)?)
    }

    fn get_audit_log_entries(
        &mut self,
        subject: C::Subject,
    ) -> Result<Vec<AuditLogEntry<C>>, StoreError> {
        Ok(queries::get_audit_log_entries(self.conn, subject)?)
    }
}

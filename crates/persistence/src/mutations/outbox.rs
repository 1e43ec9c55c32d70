// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use mp_registry_domain::{DomainEvent, EmailEvent};
use tracing::debug;

use crate::data_models::{NewDomainEventRow, NewEmailEventRow};
use crate::diesel_schema::{domain_events, email_events};
use crate::error::PersistenceError;

/// Appends a domain event to the outbox.
///
/// # Errors
///
/// Returns an error if the event cannot be serialized or the insert fails.
pub fn enqueue_domain_event(
    conn: &mut SqliteConnection,
    event: &DomainEvent,
) -> Result<(), PersistenceError> {
    let row: NewDomainEventRow = NewDomainEventRow::from_event(event)?;
    diesel::insert_into(domain_events::table)
        .values(&row)
        .execute(conn)?;

    debug!(
        event_type = %row.event_type,
        aggregate_id = %row.aggregate_id,
        "Enqueued domain event"
    );
    Ok(())
}

/// Appends an email to the outbox.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn enqueue_email_event(
    conn: &mut SqliteConnection,
    event: &EmailEvent,
) -> Result<(), PersistenceError> {
    let row: NewEmailEventRow = NewEmailEventRow::from_event(event);
    diesel::insert_into(email_events::table)
        .values(&row)
        .execute(conn)?;

    debug!(template = %row.template, user_id = %row.user_id, "Enqueued email event");
    Ok(())
}

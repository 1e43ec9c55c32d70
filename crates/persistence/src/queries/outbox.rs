// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::{DomainEventRow, EmailEventRow, OutboxDomainEvent, OutboxEmailEvent};
use crate::diesel_schema::{domain_events, email_events};
use crate::error::PersistenceError;

/// Domain events not yet dispatched, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a payload cannot be decoded.
pub fn pending_domain_events(
    conn: &mut SqliteConnection,
) -> Result<Vec<OutboxDomainEvent>, PersistenceError> {
    let rows: Vec<DomainEventRow> = domain_events::table
        .filter(domain_events::dispatched_at.is_null())
        .order(domain_events::event_id.asc())
        .select(DomainEventRow::as_select())
        .load(conn)?;

    rows.into_iter().map(DomainEventRow::into_outbox).collect()
}

/// Emails not yet dispatched, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is invalid.
pub fn pending_email_events(
    conn: &mut SqliteConnection,
) -> Result<Vec<OutboxEmailEvent>, PersistenceError> {
    let rows: Vec<EmailEventRow> = email_events::table
        .filter(email_events::dispatched_at.is_null())
        .order(email_events::event_id.asc())
        .select(EmailEventRow::as_select())
        .load(conn)?;

    rows.into_iter().map(EmailEventRow::into_outbox).collect()
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Scheduled jobs for the market participant registry.
//!
//! The worker opens the registry database, applies pending migrations and
//! runs one job per invocation. It is meant to be started by an external
//! scheduler.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{Result, eyre::Context};
use mp_registry::{CommandOutcome, execute};
use mp_registry_audit::ChangedBy;
use mp_registry_persistence::{OutboxDomainEvent, OutboxEmailEvent, Persistence};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::level_filters::LevelFilter;
use tracing::{error, info, warn};
use tracing_log::AsTrace;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args: Args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            error!("{err:#}");
            std::process::exit(1);
        }
    }
    Ok(())
}

/// Market participant registry worker
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, global = true)]
    database: Option<String>,

    #[command(subcommand)]
    command: Job,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        let mut persistence: Persistence = open(self.database.as_deref())?;
        self.command.run(&mut persistence)
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Job {
    /// Apply pending database migrations
    #[command(visible_alias = "m")]
    Migrate,

    /// Execute every actor consolidation that is due
    #[command(visible_alias = "c")]
    ExecuteConsolidations {
        /// Instant to treat as now, in RFC 3339. Defaults to the current time.
        #[arg(long, value_parser = parse_instant)]
        now: Option<OffsetDateTime>,
    },

    /// Report integration events and emails waiting for dispatch
    #[command(visible_alias = "o")]
    Outbox,
}

impl Job {
    fn run(self, persistence: &mut Persistence) -> Result<()> {
        match self {
            Self::Migrate => {
                persistence
                    .run_migrations()
                    .wrap_err("Failed to apply migrations")?;
                persistence
                    .verify_foreign_key_enforcement()
                    .wrap_err("Database does not enforce foreign keys")?;
                info!("Database is up to date");
                Ok(())
            }
            Self::ExecuteConsolidations { now } => {
                let now: OffsetDateTime = now.unwrap_or_else(OffsetDateTime::now_utc);
                let executed: usize = execute_consolidations(persistence, now)?;
                info!(executed, "Consolidation run finished");
                Ok(())
            }
            Self::Outbox => {
                let domain_events: Vec<OutboxDomainEvent> = persistence
                    .pending_domain_events()
                    .wrap_err("Failed to read the domain event outbox")?;
                let email_events: Vec<OutboxEmailEvent> = persistence
                    .pending_email_events()
                    .wrap_err("Failed to read the email outbox")?;
                for pending in &domain_events {
                    info!(
                        event_id = pending.event_id,
                        event_type = pending.event.event_type(),
                        aggregate_id = %pending.event.aggregate_id(),
                        "Pending domain event"
                    );
                }
                for pending in &email_events {
                    info!(
                        event_id = pending.event_id,
                        template = %pending.event.template,
                        user_id = %pending.event.user_id,
                        "Pending email"
                    );
                }
                info!(
                    domain_events = domain_events.len(),
                    email_events = email_events.len(),
                    "Outbox inspected"
                );
                Ok(())
            }
        }
    }
}

fn parse_instant(value: &str) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(value, &Rfc3339)
}

fn open(database: Option<&str>) -> Result<Persistence> {
    let persistence: Persistence = if let Some(path) = database {
        info!("Using file-based database at: {}", path);
        Persistence::new_with_file(path)
            .wrap_err_with(|| format!("Failed to open database at {path}"))?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory().wrap_err("Failed to open in-memory database")?
    };
    Ok(persistence)
}

/// Runs every due consolidation as the system, each in its own unit of work.
fn execute_consolidations(persistence: &mut Persistence, now: OffsetDateTime) -> Result<usize> {
    let outcome: CommandOutcome = execute(
        persistence,
        mp_registry::Command::ExecuteDueConsolidations,
        ChangedBy::System,
        now,
    )
    .wrap_err("Failed to execute due consolidations")?;

    match outcome {
        CommandOutcome::ConsolidationsExecuted(run) => {
            for consolidation_id in &run.executed {
                info!(%consolidation_id, "Executed consolidation");
            }
            for consolidation_id in &run.failed {
                warn!(%consolidation_id, "Consolidation left pending");
            }
            Ok(run.executed.len())
        }
        other => Err(color_eyre::eyre::eyre!(
            "Unexpected outcome from consolidation run: {other:?}"
        )),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_parse_execute_consolidations_with_now() {
        let args: Args = Args::try_parse_from([
            "mp-registry-worker",
            "execute-consolidations",
            "--now",
            "2026-03-01T12:00:00Z",
        ])
        .unwrap();

        let Job::ExecuteConsolidations { now } = args.command else {
            panic!("Expected the consolidation job, got {:?}", args.command);
        };
        assert_eq!(now, Some(datetime!(2026-03-01 12:00 UTC)));
        assert!(args.database.is_none());
    }

    #[test]
    fn test_parse_rejects_invalid_instant() {
        let result = Args::try_parse_from([
            "mp-registry-worker",
            "execute-consolidations",
            "--now",
            "yesterday",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn test_database_flag_is_global() {
        let args: Args =
            Args::try_parse_from(["mp-registry-worker", "migrate", "--database", "registry.db"])
                .unwrap();

        assert_eq!(args.database.as_deref(), Some("registry.db"));
    }

    #[test]
    fn test_execute_consolidations_on_empty_registry() {
        let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

        let executed: usize =
            execute_consolidations(&mut persistence, datetime!(2026-03-01 00:00 UTC)).unwrap();

        assert_eq!(executed, 0);
    }

    #[test]
    fn test_jobs_run_against_in_memory_database() {
        let mut persistence: Persistence = open(None).unwrap();

        Job::Migrate.run(&mut persistence).unwrap();
        Job::Outbox.run(&mut persistence).unwrap();
        Job::ExecuteConsolidations {
            now: Some(datetime!(2026-03-01 00:00 UTC)),
        }
        .run(&mut persistence)
        .unwrap();
    }
}

//! Periodic background loops for the auto-cancel and reminder passes.
//!
//! Each loop owns its own [`Database`] connection and runs its pass on the
//! blocking pool. A pass that fails is logged and the loop keeps going; the
//! next tick retries from current state.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::clock::Clock;
use crate::config::ReservationPolicy;
use crate::database::{Database, DatabaseConfig};
use crate::error::{Error, Result};
use crate::notification::{Mailer, Notifier};
use crate::scheduler::{ExpiryOperations, ReminderOperations};

/// Which periodic pass a loop runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Cancel reservations left pending past the grace period.
    AutoCancel,
    /// Send reminders for reservations starting soon.
    Reminders,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AutoCancel => write!(f, "auto-cancel"),
            Self::Reminders => write!(f, "reminder"),
        }
    }
}

struct PassContext {
    mailer: Mailer,
    clock: Arc<dyn Clock>,
    policy: ReservationPolicy,
}

impl Pass {
    /// Runs one pass and returns how many reservations it acted on.
    fn run(self, db: &mut Database, ctx: &PassContext) -> Result<usize> {
        match self {
            Self::AutoCancel => {
                ExpiryOperations::auto_cancel(db, &ctx.mailer, ctx.clock.as_ref(), &ctx.policy, false)
                    .map(|r| r.cancelled_count)
            }
            Self::Reminders => {
                ReminderOperations::send_due(db, &ctx.mailer, ctx.clock.as_ref(), &ctx.policy, false)
                    .map(|r| r.sent_count)
            }
        }
    }
}

/// Builds and starts the scheduler loops.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use tablekeep::clock::SystemClock;
/// use tablekeep::config::ReservationPolicy;
/// use tablekeep::database::DatabaseConfig;
/// use tablekeep::notification::LogNotifier;
/// use tablekeep::scheduler::SchedulerRunner;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn run() -> tablekeep::Result<()> {
/// let runner = SchedulerRunner::new(
///     DatabaseConfig::new("/tmp/tablekeep.db"),
///     Arc::new(LogNotifier),
///     Arc::new(SystemClock),
///     ReservationPolicy::default(),
/// );
/// let shutdown = CancellationToken::new();
/// let handle = runner.spawn(shutdown.clone())?;
/// tokio::signal::ctrl_c().await?;
/// shutdown.cancel();
/// handle.join().await
/// # }
/// ```
pub struct SchedulerRunner {
    db_config: DatabaseConfig,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    policy: ReservationPolicy,
}

impl fmt::Debug for SchedulerRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchedulerRunner")
            .field("db_config", &self.db_config)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl SchedulerRunner {
    /// Creates a runner that opens its connections from `db_config`.
    #[must_use]
    pub fn new(
        db_config: DatabaseConfig,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        policy: ReservationPolicy,
    ) -> Self {
        Self {
            db_config,
            notifier,
            clock,
            policy,
        }
    }

    /// Opens one connection per enabled loop and starts the loops on the
    /// current tokio runtime. They stop once `shutdown` is cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error if a connection cannot be opened.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn(self, shutdown: CancellationToken) -> Result<SchedulerHandle> {
        let ctx = Arc::new(PassContext {
            mailer: Mailer::new(self.notifier, self.policy.messages.clone()),
            clock: self.clock,
            policy: self.policy,
        });

        let mut loops = Vec::new();
        if ctx.policy.auto_cancel_enabled {
            loops.push((Pass::AutoCancel, ctx.policy.auto_cancel_interval));
        }
        if ctx.policy.reminders_enabled {
            loops.push((Pass::Reminders, ctx.policy.reminder_interval));
        }

        let mut tasks = Vec::with_capacity(loops.len());
        for (pass, period) in loops {
            let db = Database::open(self.db_config.clone())?;
            log::info!("starting {pass} loop every {}s", period.as_secs_f64());
            tasks.push(tokio::spawn(run_loop(
                pass,
                period,
                db,
                Arc::clone(&ctx),
                shutdown.clone(),
            )));
        }

        Ok(SchedulerHandle { tasks })
    }
}

/// Handle to the running loops.
#[derive(Debug)]
pub struct SchedulerHandle {
    tasks: Vec<JoinHandle<Result<()>>>,
}

impl SchedulerHandle {
    /// Number of loops started.
    #[must_use]
    pub fn loop_count(&self) -> usize {
        self.tasks.len()
    }

    /// Waits for every loop to stop.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Scheduler`] if a loop panicked or was aborted.
    pub async fn join(self) -> Result<()> {
        for task in self.tasks {
            task.await.map_err(|e| Error::Scheduler {
                message: format!("scheduler loop ended abnormally: {e}"),
            })??;
        }
        Ok(())
    }
}

async fn run_loop(
    pass: Pass,
    period: Duration,
    mut db: Database,
    ctx: Arc<PassContext>,
    shutdown: CancellationToken,
) -> Result<()> {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = shutdown.cancelled() => break,
            _ = interval.tick() => {}
        }

        let pass_ctx = Arc::clone(&ctx);
        let (returned, outcome) = tokio::task::spawn_blocking(move || {
            let outcome = pass.run(&mut db, &pass_ctx);
            (db, outcome)
        })
        .await
        .map_err(|e| Error::Scheduler {
            message: format!("{pass} pass panicked: {e}"),
        })?;
        db = returned;

        match outcome {
            Ok(0) => log::debug!("{pass} pass: nothing to do"),
            Ok(count) => log::info!("{pass} pass handled {count} reservation(s)"),
            Err(e) => log::error!("{pass} pass failed: {e}"),
        }
    }

    log::info!("{pass} loop stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::database::test_util::{at, seed_restaurant, test_reservation};
    use crate::notification::MockNotifier;
    use crate::reservation::ReservationStatus;
    use tempfile::tempdir;

    fn fast_policy() -> ReservationPolicy {
        ReservationPolicy {
            auto_cancel_interval: Duration::from_millis(10),
            reminder_interval: Duration::from_millis(10),
            ..ReservationPolicy::default()
        }
    }

    #[tokio::test]
    async fn test_loops_run_and_stop_on_shutdown() {
        let dir = tempdir().unwrap();
        let config = DatabaseConfig::new(dir.path().join("scheduler.db"));

        let mut db = Database::open(config.clone()).unwrap();
        seed_restaurant(&mut db, "r-1", &[(1, 4), (2, 4)]);
        let stale = test_reservation("r-1", Some("r-1-t1"), at(17, 0), at(20, 0), 2);
        let soon = test_reservation("r-1", Some("r-1-t2"), at(19, 20), at(21, 0), 2);
        db.create_reservation(&stale).unwrap();
        db.create_reservation(&soon).unwrap();

        // One auto-cancel email and one reminder, however many ticks run.
        let mut mock = MockNotifier::new();
        mock.expect_send_email()
            .times(2)
            .returning(|_, _, _| Ok(()));

        let runner = SchedulerRunner::new(
            config,
            Arc::new(mock),
            Arc::new(ManualClock::new(at(19, 0))),
            fast_policy(),
        );
        let shutdown = CancellationToken::new();
        let handle = runner.spawn(shutdown.clone()).unwrap();
        assert_eq!(handle.loop_count(), 2);

        tokio::time::sleep(Duration::from_millis(200)).await;
        shutdown.cancel();
        handle.join().await.unwrap();

        let cancelled = Database::get_reservation(db.connection(), stale.id())
            .unwrap()
            .unwrap();
        assert_eq!(cancelled.status(), ReservationStatus::Cancelled);
        let reminded = Database::get_reservation(db.connection(), soon.id())
            .unwrap()
            .unwrap();
        assert!(reminded.reminder_sent());
    }

    #[tokio::test]
    async fn test_disabled_loops_are_not_started() {
        let dir = tempdir().unwrap();
        let policy = ReservationPolicy {
            auto_cancel_enabled: false,
            reminders_enabled: false,
            ..fast_policy()
        };
        let runner = SchedulerRunner::new(
            DatabaseConfig::new(dir.path().join("idle.db")),
            Arc::new(MockNotifier::new()),
            Arc::new(ManualClock::new(at(19, 0))),
            policy,
        );

        let handle = runner.spawn(CancellationToken::new()).unwrap();
        assert_eq!(handle.loop_count(), 0);
        handle.join().await.unwrap();
    }
}

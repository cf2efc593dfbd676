//! Run-scheduler command implementation.
//!
//! Runs the auto-cancel and reminder loops until Ctrl-C (or `--for`
//! seconds), then waits for in-flight passes to finish.

use crate::error::CliError;
use crate::utils::{clock, database_config, load_configuration, load_policy, GlobalOptions};
use clap::Args;
use std::sync::Arc;
use std::time::Duration;
use tablekeep::notification::LogNotifier;
use tablekeep::SchedulerRunner;
use tokio_util::sync::CancellationToken;

/// Run the background scheduler.
#[derive(Args)]
pub struct RunSchedulerCommand {
    /// Stop after this many seconds instead of waiting for Ctrl-C
    #[arg(long = "for", value_name = "SECONDS")]
    pub duration: Option<u64>,
}

impl RunSchedulerCommand {
    /// Execute the run-scheduler command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let policy = load_policy(&config)?;
        let db_config = database_config(global, &config)?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        runtime.block_on(async {
            let runner =
                SchedulerRunner::new(db_config, Arc::new(LogNotifier), clock(global), policy);
            let shutdown = CancellationToken::new();
            let handle = runner.spawn(shutdown.clone())?;

            if !global.quiet {
                eprintln!("Scheduler running {} loop(s)", handle.loop_count());
            }

            match self.duration {
                Some(seconds) => tokio::time::sleep(Duration::from_secs(seconds)).await,
                None => tokio::signal::ctrl_c().await?,
            }

            shutdown.cancel();
            handle.join().await?;
            if !global.quiet {
                eprintln!("Scheduler stopped");
            }
            Ok::<(), CliError>(())
        })
    }
}

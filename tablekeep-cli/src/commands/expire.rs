//! Expire and remind command implementations.
//!
//! Each runs a single scheduler pass, the same one `run-scheduler` repeats.

use crate::error::CliError;
use crate::utils::{format_time, load_configuration, open_manager, GlobalOptions};
use clap::Args;

/// Cancel pending reservations nobody confirmed in time.
#[derive(Args)]
pub struct ExpireCommand {
    /// Perform a dry run
    #[arg(long)]
    pub dry_run: bool,
}

impl ExpireCommand {
    /// Execute the expire command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut manager = open_manager(global, &config)?;
        let tz = manager.policy().timezone;
        let grace = manager.policy().pending_grace.num_minutes();

        if self.dry_run && !global.quiet {
            eprintln!("[DRY RUN] Scanning for reservations pending more than {grace} minutes past start...");
        }

        let result = manager.run_auto_cancel(self.dry_run)?;

        if global.quiet {
            if result.cancelled_count > 0 {
                println!("{}", result.cancelled_count);
            }
            return Ok(());
        }

        let verb = if self.dry_run { "[DRY RUN] Would cancel" } else { "Cancelled" };
        eprintln!("{verb} {} unconfirmed reservation(s)", result.cancelled_count);
        if global.verbose {
            for r in &result.cancelled_reservations {
                eprintln!(
                    "  - {} at {} table {} (started {})",
                    r.id(),
                    r.restaurant_id(),
                    r.table_number().map_or_else(|| "-".into(), |n| n.to_string()),
                    format_time(r.window().start(), tz)
                );
            }
        }
        Ok(())
    }
}

/// Send reminders for reservations starting soon.
#[derive(Args)]
pub struct RemindCommand {
    /// Perform a dry run
    #[arg(long)]
    pub dry_run: bool,
}

impl RemindCommand {
    /// Execute the remind command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut manager = open_manager(global, &config)?;
        let tz = manager.policy().timezone;

        let result = manager.run_reminders(self.dry_run)?;

        if global.quiet {
            if result.sent_count > 0 {
                println!("{}", result.sent_count);
            }
            return Ok(());
        }

        let verb = if self.dry_run { "[DRY RUN] Would remind" } else { "Reminded" };
        eprintln!("{verb} {} client(s)", result.sent_count);
        if result.failed_count > 0 {
            eprintln!("  {} reminder(s) could not be delivered", result.failed_count);
        }
        if global.verbose {
            for r in &result.reminded {
                eprintln!(
                    "  - {} <{}> at {}",
                    r.id(),
                    r.client_email(),
                    format_time(r.window().start(), tz)
                );
            }
        }
        Ok(())
    }
}

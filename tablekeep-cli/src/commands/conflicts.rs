//! Conflicts command implementation.

use crate::error::CliError;
use crate::output::{print_reservations, Format};
use crate::utils::{load_configuration, open_manager, parse_time, GlobalOptions};
use clap::Args;
use tablekeep::{ReservationId, ReservationWindow, TableId};

/// Show live reservations on a table that overlap a time window.
#[derive(Args)]
pub struct ConflictsCommand {
    /// Table id
    #[arg(long, value_name = "ID")]
    pub table: TableId,

    /// Window start
    #[arg(long, value_name = "TIME")]
    pub from: String,

    /// Window end
    #[arg(long, value_name = "TIME")]
    pub until: String,

    /// Ignore this reservation
    #[arg(long, value_name = "ID")]
    pub exclude: Option<ReservationId>,

    /// Output format
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<Format>,
}

impl ConflictsCommand {
    /// Execute the conflicts command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let manager = open_manager(global, &config)?;
        let tz = manager.policy().timezone;

        let window = ReservationWindow::new(parse_time(&self.from, tz)?, parse_time(&self.until, tz)?)?;
        let conflicts = manager.find_conflicting_reservations(&self.table, &window, self.exclude)?;

        print_reservations(&conflicts, Format::resolve(self.format, &config), tz)?;
        if !global.quiet && conflicts.is_empty() {
            eprintln!("Table {} is free for {window}", self.table);
        }
        Ok(())
    }
}

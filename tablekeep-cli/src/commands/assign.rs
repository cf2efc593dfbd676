//! Assign command implementation.

use crate::error::CliError;
use crate::utils::{load_configuration, open_manager, GlobalOptions};
use clap::Args;
use tablekeep::{ReservationId, TableId};

/// Move a reservation onto a specific table.
#[derive(Args)]
pub struct AssignCommand {
    /// Reservation id
    pub id: ReservationId,

    /// Table id
    #[arg(long, value_name = "ID")]
    pub table: TableId,
}

impl AssignCommand {
    /// Execute the assign command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut manager = open_manager(global, &config)?;

        let reservation = manager.assign_table(self.id, &self.table)?;
        if !global.quiet {
            eprintln!(
                "Reservation {} is now on table {}",
                reservation.id(),
                reservation.table_number().unwrap_or_default()
            );
        }
        Ok(())
    }
}

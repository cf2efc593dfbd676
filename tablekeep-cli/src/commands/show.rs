//! Show command implementation.

use crate::error::CliError;
use crate::output::{print_reservation, Format};
use crate::utils::{load_configuration, open_manager, GlobalOptions};
use clap::Args;
use tablekeep::{Error, ReservationId};

/// Show one reservation.
#[derive(Args)]
pub struct ShowCommand {
    /// Reservation id
    pub id: ReservationId,

    /// Output format
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<Format>,
}

impl ShowCommand {
    /// Execute the show command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let manager = open_manager(global, &config)?;

        let reservation = manager
            .find_reservation(self.id)?
            .ok_or_else(|| Error::NotFound {
                resource: format!("reservation {}", self.id),
            })?;
        print_reservation(
            &reservation,
            Format::resolve(self.format, &config),
            manager.policy().timezone,
        )
    }
}

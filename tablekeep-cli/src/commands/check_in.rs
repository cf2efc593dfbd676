//! Check-in command implementations.

use crate::error::CliError;
use crate::utils::{format_time, load_configuration, open_manager, GlobalOptions};
use clap::Args;
use tablekeep::{Reservation, ReservationId, RestaurantId};

fn report(reservation: &Reservation, tz: chrono_tz::Tz, global: &GlobalOptions) {
    println!("{}", reservation.id());
    if !global.quiet {
        if let Some(at) = reservation.checked_in_at() {
            eprintln!(
                "Checked in party of {} at table {} ({})",
                reservation.party_size(),
                reservation.table_number().unwrap_or_default(),
                format_time(at, tz)
            );
        }
    }
}

/// Mark a confirmed party as arrived.
#[derive(Args)]
pub struct CheckInCommand {
    /// Reservation id
    pub id: ReservationId,
}

impl CheckInCommand {
    /// Execute the check-in command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut manager = open_manager(global, &config)?;

        let reservation = manager.check_in_reserve(self.id)?;
        report(&reservation, manager.policy().timezone, global);
        Ok(())
    }
}

/// Check in the client's current reservation by email.
#[derive(Args)]
pub struct CheckInEmailCommand {
    /// Restaurant the client is at
    #[arg(long, value_name = "ID")]
    pub restaurant: RestaurantId,

    /// Email the reservation was made with
    #[arg(long)]
    pub email: String,
}

impl CheckInEmailCommand {
    /// Execute the check-in-email command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut manager = open_manager(global, &config)?;

        let reservation = manager.check_in_by_email(&self.restaurant, &self.email)?;
        report(&reservation, manager.policy().timezone, global);
        Ok(())
    }
}

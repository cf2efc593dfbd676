//! Confirm and cancel command implementations.
//!
//! Both act on behalf of either party, chosen with `--by`.

use crate::error::CliError;
use crate::utils::{load_configuration, open_manager, GlobalOptions};
use clap::{Args, ValueEnum};
use tablekeep::{Actor, ReservationId};

/// Who is acting on the reservation.
#[derive(Clone, Copy, Debug, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum ActorArg {
    /// The client who booked
    Client,
    /// The restaurant
    Restaurant,
}

impl From<ActorArg> for Actor {
    fn from(arg: ActorArg) -> Self {
        match arg {
            ActorArg::Client => Actor::Client,
            ActorArg::Restaurant => Actor::Restaurant,
        }
    }
}

/// Confirm a reservation.
#[derive(Args)]
pub struct ConfirmCommand {
    /// Reservation id
    pub id: ReservationId,

    /// Who is confirming
    #[arg(long, value_enum, default_value = "client")]
    pub by: ActorArg,
}

impl ConfirmCommand {
    /// Execute the confirm command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut manager = open_manager(global, &config)?;

        let reservation = manager.confirm_reserve(self.id, self.by.into())?;
        println!("{}", reservation.status());
        Ok(())
    }
}

/// Cancel a reservation.
#[derive(Args)]
pub struct CancelCommand {
    /// Reservation id
    pub id: ReservationId,

    /// Who is cancelling
    #[arg(long, value_enum, default_value = "client")]
    pub by: ActorArg,
}

impl CancelCommand {
    /// Execute the cancel command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut manager = open_manager(global, &config)?;

        let reservation = manager.cancel_reserve(self.id, self.by.into())?;
        println!("{}", reservation.status());
        Ok(())
    }
}

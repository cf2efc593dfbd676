//! Upcoming and current command implementations.

use crate::error::CliError;
use crate::output::{print_reservations, Format};
use crate::utils::{load_configuration, open_manager, parse_time, GlobalOptions};
use chrono::Duration;
use clap::Args;
use tablekeep::{ClientId, RestaurantId};

/// Show a restaurant's live reservations starting soon.
#[derive(Args)]
pub struct UpcomingCommand {
    /// Restaurant id
    #[arg(long, value_name = "ID")]
    pub restaurant: RestaurantId,

    /// Window start (default: now)
    #[arg(long, value_name = "TIME")]
    pub from: Option<String>,

    /// Hours to look ahead
    #[arg(long, default_value_t = 24)]
    pub hours: u32,

    /// Maximum rows
    #[arg(long, default_value_t = 20)]
    pub limit: u32,

    /// Output format
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<Format>,
}

impl UpcomingCommand {
    /// Execute the upcoming command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let manager = open_manager(global, &config)?;
        let tz = manager.policy().timezone;

        let from = match self.from {
            Some(ref from) => parse_time(from, tz)?,
            None => manager.now(),
        };
        let to = from + Duration::hours(self.hours.into());
        let upcoming = manager.upcoming_reservations(&self.restaurant, from, to, self.limit)?;

        print_reservations(&upcoming, Format::resolve(self.format, &config), tz)
    }
}

/// Show a client's reservations that are underway right now.
#[derive(Args)]
pub struct CurrentCommand {
    /// Client id
    #[arg(long, value_name = "ID")]
    pub client: ClientId,

    /// Restaurant id
    #[arg(long, value_name = "ID")]
    pub restaurant: RestaurantId,

    /// Output format
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<Format>,
}

impl CurrentCommand {
    /// Execute the current command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let manager = open_manager(global, &config)?;

        let current = manager.current_reservations(&self.client, &self.restaurant)?;
        print_reservations(
            &current,
            Format::resolve(self.format, &config),
            manager.policy().timezone,
        )
    }
}

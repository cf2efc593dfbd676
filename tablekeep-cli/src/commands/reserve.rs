//! Reserve command implementation.
//!
//! Books the best-fit free table and prints the new reservation id.

use crate::error::CliError;
use crate::utils::{format_time, load_configuration, open_manager, parse_time, GlobalOptions};
use clap::Args;
use tablekeep::{ClientId, CreateReservationRequest, RestaurantId};

/// Book a table.
#[derive(Args)]
pub struct ReserveCommand {
    /// Restaurant to book at
    #[arg(long, value_name = "ID")]
    pub restaurant: RestaurantId,

    /// Client making the booking
    #[arg(long, value_name = "ID")]
    pub client: ClientId,

    /// Client display name
    #[arg(long, default_value = "")]
    pub name: String,

    /// Client email, used for notifications and check-in
    #[arg(long, default_value = "")]
    pub email: String,

    /// Start time (RFC 3339, or local 'YYYY-MM-DD HH:MM')
    #[arg(long, value_name = "TIME")]
    pub at: String,

    /// End time; defaults to the restaurant's maximum booking length
    #[arg(long, value_name = "TIME")]
    pub until: Option<String>,

    /// Number of guests
    #[arg(long, short = 'p')]
    pub party: u32,
}

impl ReserveCommand {
    /// Execute the reserve command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut manager = open_manager(global, &config)?;
        let tz = manager.policy().timezone;

        let mut request = CreateReservationRequest::new(
            self.restaurant,
            self.client,
            parse_time(&self.at, tz)?,
            self.party,
        )
        .with_client(self.name, self.email);
        if let Some(ref until) = self.until {
            request = request.with_end(parse_time(until, tz)?);
        }

        let reservation = manager.create_reservation(request)?;

        println!("{}", reservation.id());
        if !global.quiet {
            eprintln!(
                "Booked table {} for {} at {} ({} - {}), awaiting client confirmation",
                reservation.table_number().unwrap_or_default(),
                reservation.party_size(),
                reservation.restaurant_id(),
                format_time(reservation.window().start(), tz),
                format_time(reservation.window().end(), tz),
            );
        }
        Ok(())
    }
}

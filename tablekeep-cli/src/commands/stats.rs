//! Stats command implementation.

use crate::error::CliError;
use crate::output::Format;
use crate::utils::{format_time, load_configuration, open_manager, parse_time, GlobalOptions};
use clap::Args;
use tablekeep::RestaurantId;

/// Show reservation counts for a restaurant.
#[derive(Args)]
pub struct StatsCommand {
    /// Restaurant id
    #[arg(long, value_name = "ID")]
    pub restaurant: RestaurantId,

    /// Count reservations starting at or after this time (default: start of today)
    #[arg(long, value_name = "TIME")]
    pub since: Option<String>,

    /// Output format
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<Format>,
}

impl StatsCommand {
    /// Execute the stats command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let manager = open_manager(global, &config)?;
        let tz = manager.policy().timezone;

        let since = match self.since {
            Some(ref since) => parse_time(since, tz)?,
            None => manager.today()?.start(),
        };
        let stats = manager.restaurant_stats(&self.restaurant, since)?;

        if Format::resolve(self.format, &config) == Format::Json {
            let json = serde_json::json!({
                "restaurant": self.restaurant.as_str(),
                "since": since.to_rfc3339(),
                "total": stats.total,
                "pending": stats.pending,
                "confirmed": stats.confirmed,
                "cancelled": stats.cancelled,
                "total_people": stats.total_people,
            });
            println!("{json:#}");
        } else {
            println!("restaurant:   {}", self.restaurant);
            println!("since:        {}", format_time(since, tz));
            println!("total:        {}", stats.total);
            println!("pending:      {}", stats.pending);
            println!("confirmed:    {}", stats.confirmed);
            println!("cancelled:    {}", stats.cancelled);
            println!("total people: {}", stats.total_people);
        }
        Ok(())
    }
}

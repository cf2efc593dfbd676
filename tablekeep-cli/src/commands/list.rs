//! List command implementation.
//!
//! Displays reservations matching a filter in various formats (table,
//! JSON, CSV, TSV), one page at a time.

use crate::error::CliError;
use crate::output::{print_reservations, Format};
use crate::utils::{load_configuration, open_manager, parse_time, GlobalOptions};
use clap::{Args, ValueEnum};
use tablekeep::{ClientId, ReservationFilter, ReservationStatus, RestaurantId, SortOrder};

/// Status filter flag.
#[derive(Clone, Copy, Debug, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum StatusArg {
    /// Awaiting confirmation
    Pending,
    /// Confirmed by the client
    Confirmed,
    /// Cancelled by anyone
    Cancelled,
}

impl From<StatusArg> for ReservationStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => ReservationStatus::Pending,
            StatusArg::Confirmed => ReservationStatus::Confirmed,
            StatusArg::Cancelled => ReservationStatus::Cancelled,
        }
    }
}

/// List reservations.
#[derive(Args)]
pub struct ListCommand {
    /// Output format
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<Format>,

    /// Only this restaurant's reservations
    #[arg(long, value_name = "ID")]
    pub restaurant: Option<RestaurantId>,

    /// Only this client's reservations
    #[arg(long, value_name = "ID")]
    pub client: Option<ClientId>,

    /// Only reservations in this status
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,

    /// Only reservations starting today (local time)
    #[arg(long, conflicts_with = "from")]
    pub today: bool,

    /// Only reservations starting at or after this time
    #[arg(long, value_name = "TIME")]
    pub from: Option<String>,

    /// Match client name or email
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Earliest first (default is latest first)
    #[arg(long)]
    pub asc: bool,

    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Page size
    #[arg(long, default_value_t = tablekeep::query::DEFAULT_PAGE_SIZE)]
    pub limit: u32,
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let manager = open_manager(global, &config)?;
        let tz = manager.policy().timezone;

        let mut filter = ReservationFilter::new().page(self.page, self.limit);
        filter.restaurant_id = self.restaurant;
        filter.client_id = self.client;
        if let Some(status) = self.status {
            filter = filter.with_status(status.into());
        }
        if self.today {
            let day = manager.today()?;
            filter = filter.starting_between(day.start(), day.end());
        } else if let Some(ref from) = self.from {
            filter.starting_from = Some(parse_time(from, tz)?);
        }
        if let Some(search) = self.search {
            filter = filter.with_search(search);
        }
        if self.asc {
            filter = filter.ordered(SortOrder::Asc);
        }

        let page = manager.list_reservations(&filter)?;
        print_reservations(&page.items, Format::resolve(self.format, &config), tz)?;

        if !global.quiet {
            eprintln!(
                "page {} of {} ({} reservation(s))",
                page.page,
                page.total_pages().max(1),
                page.total_items
            );
        }
        Ok(())
    }
}

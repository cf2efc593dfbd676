//! CLI command implementations.
//!
//! - `init`: Create the data directory and database
//! - `seed`: Import restaurants and tables from a catalog
//! - `reserve`, `assign`: Book a table, or move a booking to another
//! - `confirm`, `cancel`: Lifecycle transitions for client or restaurant
//! - `check-in`, `check-in-email`: Mark a party as arrived
//! - `show`, `list`, `conflicts`, `stats`, `upcoming`, `current`: Queries
//! - `expire`, `remind`: One scheduler pass each
//! - `run-scheduler`: The periodic scheduler
//! - `validate`, `completions`: Tooling

pub mod assign;
pub mod check_in;
pub mod completions;
pub mod confirm;
pub mod conflicts;
pub mod expire;
pub mod init;
pub mod list;
pub mod reserve;
pub mod run_scheduler;
pub mod seed;
pub mod show;
pub mod stats;
pub mod upcoming;
pub mod validate;

pub use assign::AssignCommand;
pub use check_in::{CheckInCommand, CheckInEmailCommand};
pub use completions::CompletionsCommand;
pub use confirm::{CancelCommand, ConfirmCommand};
pub use conflicts::ConflictsCommand;
pub use expire::{ExpireCommand, RemindCommand};
pub use init::InitCommand;
pub use list::ListCommand;
pub use reserve::ReserveCommand;
pub use run_scheduler::RunSchedulerCommand;
pub use seed::SeedCommand;
pub use show::ShowCommand;
pub use stats::StatsCommand;
pub use upcoming::{CurrentCommand, UpcomingCommand};
pub use validate::ValidateCommand;

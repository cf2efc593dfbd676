//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    AssignCommand, CancelCommand, CheckInCommand, CheckInEmailCommand, CompletionsCommand,
    ConfirmCommand, ConflictsCommand, CurrentCommand, ExpireCommand, InitCommand, ListCommand,
    RemindCommand, ReserveCommand, RunSchedulerCommand, SeedCommand, ShowCommand, StatsCommand,
    UpcomingCommand, ValidateCommand,
};
use crate::utils::parse_instant;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for restaurant table reservations.
#[derive(Parser)]
#[command(name = "tablekeep")]
#[command(version, about = "Book, confirm and track restaurant tables", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "TABLEKEEP_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds)
    #[arg(long, value_name = "SECONDS", global = true, env = "TABLEKEEP_BUSY_TIMEOUT")]
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization
    #[arg(long, global = true, env = "TABLEKEEP_DISABLE_AUTOINIT")]
    pub disable_autoinit: bool,

    /// Pretend the current time is this RFC 3339 instant
    #[arg(
        long,
        value_name = "TIME",
        global = true,
        hide = true,
        env = "TABLEKEEP_NOW",
        value_parser = parse_instant
    )]
    pub now: Option<DateTime<Utc>>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize the data directory and database
    Init(InitCommand),

    /// Import restaurants and tables from a catalog file
    Seed(SeedCommand),

    /// Book the best-fitting free table
    Reserve(ReserveCommand),

    /// Move a reservation onto a specific table
    Assign(AssignCommand),

    /// Confirm a reservation as client or restaurant
    Confirm(ConfirmCommand),

    /// Cancel a reservation as client or restaurant
    Cancel(CancelCommand),

    /// Mark a confirmed party as arrived
    CheckIn(CheckInCommand),

    /// Check in a client's current reservation by email
    CheckInEmail(CheckInEmailCommand),

    /// Show one reservation
    Show(ShowCommand),

    /// List reservations
    List(ListCommand),

    /// Show reservations overlapping a window on one table
    Conflicts(ConflictsCommand),

    /// Show reservation counts for a restaurant
    Stats(StatsCommand),

    /// Show a restaurant's reservations starting soon
    Upcoming(UpcomingCommand),

    /// Show a client's reservations underway now
    Current(CurrentCommand),

    /// Cancel reservations left unconfirmed past the grace period
    Expire(ExpireCommand),

    /// Send reminders for reservations starting soon
    Remind(RemindCommand),

    /// Run the auto-cancel and reminder loops until interrupted
    RunScheduler(RunSchedulerCommand),

    /// Validate a configuration file
    Validate(ValidateCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}

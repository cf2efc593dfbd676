//! Main entry point for the tablekeep CLI.
//!
//! This is the command-line interface for the tablekeep reservation engine.
//! It provides commands for managing table reservations:
//! - `reserve`: Book a table
//! - `confirm` / `cancel`: Move a reservation through its lifecycle
//! - `check-in`: Mark a party as arrived
//! - `list`: Query reservations
//! - `run-scheduler`: Auto-cancel stale bookings and send reminders

mod cli;
mod commands;
mod error;
mod output;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    let cli = Cli::parse();

    tablekeep::init_logger(cli.verbose, cli.quiet).install();

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        data_dir: cli.data_dir,
        busy_timeout: cli.busy_timeout,
        disable_autoinit: cli.disable_autoinit,
        now: cli.now,
    };

    let result = match cli.command {
        cli::Command::Init(cmd) => cmd.execute(&global),
        cli::Command::Seed(cmd) => cmd.execute(&global),
        cli::Command::Reserve(cmd) => cmd.execute(&global),
        cli::Command::Assign(cmd) => cmd.execute(&global),
        cli::Command::Confirm(cmd) => cmd.execute(&global),
        cli::Command::Cancel(cmd) => cmd.execute(&global),
        cli::Command::CheckIn(cmd) => cmd.execute(&global),
        cli::Command::CheckInEmail(cmd) => cmd.execute(&global),
        cli::Command::Show(cmd) => cmd.execute(&global),
        cli::Command::List(cmd) => cmd.execute(&global),
        cli::Command::Conflicts(cmd) => cmd.execute(&global),
        cli::Command::Stats(cmd) => cmd.execute(&global),
        cli::Command::Upcoming(cmd) => cmd.execute(&global),
        cli::Command::Current(cmd) => cmd.execute(&global),
        cli::Command::Expire(cmd) => cmd.execute(&global),
        cli::Command::Remind(cmd) => cmd.execute(&global),
        cli::Command::RunScheduler(cmd) => cmd.execute(&global),
        cli::Command::Validate(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}

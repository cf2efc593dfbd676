//! Build script for tablekeep-cli.
//!
//! This script generates man pages at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
/// When adding/removing/modifying commands, update both files.
fn build_cli() -> Command {
    Command::new("tablekeep")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Book, confirm and track restaurant tables")
        .long_about(
            "Command-line tool for allocating restaurant tables and managing the reservation lifecycle",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Override the data directory location")
                .value_name("PATH")
                .global(true)
                .env("TABLEKEEP_DATA_DIR"),
        )
        .arg(
            Arg::new("busy-timeout")
                .long("busy-timeout")
                .help("Override the default busy timeout (in seconds)")
                .value_name("SECONDS")
                .global(true)
                .env("TABLEKEEP_BUSY_TIMEOUT"),
        )
        .arg(
            Arg::new("disable-autoinit")
                .long("disable-autoinit")
                .help("Disable automatic database initialization")
                .global(true)
                .action(clap::ArgAction::SetTrue)
                .env("TABLEKEEP_DISABLE_AUTOINIT"),
        )
        .subcommands(vec![
            Command::new("init")
                .about("Initialize the data directory and database")
                .long_about("Set up the tablekeep database and optional configuration file"),
            Command::new("seed")
                .about("Import restaurants and tables from a catalog file")
                .long_about("Create or update restaurants and their tables from a YAML catalog"),
            Command::new("reserve")
                .about("Book the best-fitting free table")
                .long_about("Pick the smallest free table that seats the party and book it"),
            Command::new("assign")
                .about("Move a reservation onto a specific table")
                .long_about("Reassign a live reservation to another free table that fits"),
            Command::new("confirm")
                .about("Confirm a reservation as client or restaurant")
                .long_about("Record confirmation by the client or reconfirmation by the restaurant"),
            Command::new("cancel")
                .about("Cancel a reservation as client or restaurant")
                .long_about("Cancel a reservation and notify the other party"),
            Command::new("check-in")
                .about("Mark a confirmed party as arrived")
                .long_about("Check in a confirmed reservation by id"),
            Command::new("check-in-email")
                .about("Check in a client's current reservation by email")
                .long_about("Find the reservation underway for an email address and check it in"),
            Command::new("show")
                .about("Show one reservation")
                .long_about("Display every field of a reservation"),
            Command::new("list")
                .about("List reservations")
                .long_about("Filter, search and page through reservations in various formats"),
            Command::new("conflicts")
                .about("Show reservations overlapping a window on one table")
                .long_about("List live reservations that would collide with a time window"),
            Command::new("stats")
                .about("Show reservation counts for a restaurant")
                .long_about("Count reservations by status and total guests since a point in time"),
            Command::new("upcoming")
                .about("Show a restaurant's reservations starting soon")
                .long_about("List live reservations starting within the next hours"),
            Command::new("current")
                .about("Show a client's reservations underway now")
                .long_about("List a client's live reservations whose window contains the current time"),
            Command::new("expire")
                .about("Cancel reservations left unconfirmed past the grace period")
                .long_about("Run one auto-cancel pass and notify affected clients"),
            Command::new("remind")
                .about("Send reminders for reservations starting soon")
                .long_about("Run one reminder pass; each reservation is reminded at most once"),
            Command::new("run-scheduler")
                .about("Run the auto-cancel and reminder loops until interrupted")
                .long_about("Run the periodic scheduler until Ctrl-C or a fixed duration"),
            Command::new("validate")
                .about("Validate a configuration file")
                .long_about("Check a tablekeep configuration file for errors"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    let app = build_cli();
    let man = Man::new(app);
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("tablekeep.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}

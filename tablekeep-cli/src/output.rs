//! Rendering reservations for the terminal.

use crate::error::CliError;
use crate::utils::format_time;
use chrono_tz::Tz;
use clap::ValueEnum;
use std::io::Write;
use tablekeep::config::OutputFormat;
use tablekeep::{Config, Reservation};

/// Column headers for CSV/TSV output.
const COLUMN_HEADERS: [&str; 9] = [
    "id",
    "restaurant",
    "table",
    "party",
    "start",
    "end",
    "status",
    "client",
    "email",
];

/// Output format flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum Format {
    /// Tab-separated table format (human-readable)
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// TSV format (tab-separated values)
    Tsv,
}

impl Format {
    /// The flag if given, else the configured default, else a table.
    pub fn resolve(flag: Option<Self>, config: &Config) -> Self {
        flag.unwrap_or(match config.output_format {
            Some(OutputFormat::Json) => Self::Json,
            Some(OutputFormat::Csv) => Self::Csv,
            Some(OutputFormat::Tsv) => Self::Tsv,
            Some(OutputFormat::Table) | None => Self::Table,
        })
    }
}

fn status_label(r: &Reservation) -> String {
    if r.checked_in() {
        format!("{} (checked in)", r.status())
    } else {
        r.status().to_string()
    }
}

fn row(r: &Reservation, tz: Tz) -> [String; 9] {
    [
        r.id().to_string(),
        r.restaurant_id().to_string(),
        r.table_number().map_or_else(|| "-".into(), |n| n.to_string()),
        r.party_size().to_string(),
        format_time(r.window().start(), tz),
        format_time(r.window().end(), tz),
        status_label(r),
        r.client_name().to_string(),
        r.client_email().to_string(),
    ]
}

/// Print reservations in `format`.
pub fn print_reservations(
    reservations: &[Reservation],
    format: Format,
    tz: Tz,
) -> Result<(), CliError> {
    match format {
        Format::Table => print_table(reservations, tz),
        Format::Json => print_json(reservations),
        Format::Csv => print_delimited(reservations, b',', tz),
        Format::Tsv => print_delimited(reservations, b'\t', tz),
    }
}

fn print_table(reservations: &[Reservation], tz: Tz) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let header_line = COLUMN_HEADERS
        .iter()
        .map(|s| s.to_uppercase())
        .collect::<Vec<_>>()
        .join("\t");
    writeln!(handle, "{header_line}")?;

    for r in reservations {
        writeln!(handle, "{}", row(r, tz).join("\t"))?;
    }
    Ok(())
}

fn print_json(reservations: &[Reservation]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, reservations)
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    writeln!(handle)?;
    Ok(())
}

/// Convert csv::Error to CliError.
fn csv_error(e: csv::Error) -> CliError {
    CliError::Io(std::io::Error::other(e))
}

fn print_delimited(reservations: &[Reservation], delimiter: u8, tz: Tz) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(stdout.lock());

    writer.write_record(COLUMN_HEADERS).map_err(csv_error)?;
    for r in reservations {
        writer.write_record(row(r, tz)).map_err(csv_error)?;
    }
    writer.flush()?;
    Ok(())
}

/// Print one reservation as `key: value` lines, or JSON.
pub fn print_reservation(r: &Reservation, format: Format, tz: Tz) -> Result<(), CliError> {
    if format == Format::Json {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        serde_json::to_writer_pretty(&mut handle, r)
            .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
        writeln!(handle)?;
        return Ok(());
    }

    println!("id:          {}", r.id());
    println!("restaurant:  {}", r.restaurant_id());
    println!(
        "table:       {}",
        r.table_number().map_or_else(|| "unassigned".into(), |n| n.to_string())
    );
    println!("party:       {}", r.party_size());
    println!(
        "window:      {} - {}",
        format_time(r.window().start(), tz),
        format_time(r.window().end(), tz)
    );
    println!("status:      {}", status_label(r));
    println!("client:      {} <{}>", r.client_name(), r.client_email());
    println!(
        "confirmed:   client={} restaurant={}",
        r.client_confirmed(),
        r.restaurant_confirmed()
    );
    if let (Some(by), Some(at)) = (r.canceled_by(), r.canceled_at()) {
        println!("cancelled:   by {by} at {}", format_time(at, tz));
    }
    if let Some(at) = r.checked_in_at() {
        println!("checked in:  {}", format_time(at, tz));
    }
    println!("reminded:    {}", r.reminder_sent());
    Ok(())
}

//! Validate command implementation.

use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::Args;
use std::path::PathBuf;
use tablekeep::config::{ConfigLoader, ConfigValidator, ReservationPolicy};

/// Check a configuration file for errors.
#[derive(Args)]
pub struct ValidateCommand {
    /// Configuration file to check
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

impl ValidateCommand {
    /// Execute the validate command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = ConfigLoader::load_file(&self.file)
            .and_then(|config| ConfigValidator::validate(&config).map(|()| config))
            .and_then(|config| ReservationPolicy::from_config(&config))
            .map_err(|e| CliError::Config(format!("{}: {e}", self.file.display())))?;

        if !global.quiet {
            println!(
                "{} is valid (grace {} min, reminders {} min ahead, {})",
                self.file.display(),
                config.pending_grace.num_minutes(),
                config.reminder_lead.num_minutes(),
                config.timezone
            );
        }
        Ok(())
    }
}

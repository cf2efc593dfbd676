//! Seed command implementation.
//!
//! Imports restaurants and tables from a YAML catalog file.

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, GlobalOptions};
use clap::Args;
use std::path::PathBuf;
use tablekeep::operations::Catalog;

/// Import restaurants and tables from a catalog file.
#[derive(Args)]
pub struct SeedCommand {
    /// Catalog file (YAML)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

impl SeedCommand {
    /// Execute the seed command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let catalog = Catalog::load(&self.file)?;
        let mut db = open_database(global, &config)?;

        let result = catalog.import(&mut db)?;
        if !global.quiet {
            eprintln!(
                "Imported {} restaurant(s) and {} table(s) from {}",
                result.restaurants,
                result.tables,
                self.file.display()
            );
        }
        Ok(())
    }
}

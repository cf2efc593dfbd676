//! Shell completion generation command.

use crate::cli::Cli;
use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::io;

/// Generate shell completion scripts
#[derive(Args)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsCommand {
    /// Execute the completions command.
    pub fn execute(&self, _global: &GlobalOptions) -> Result<(), CliError> {
        let mut cmd = Cli::command();

        eprintln!("# Generating {} completion script", self.shell);
        match self.shell {
            Shell::Bash => {
                eprintln!("#   tablekeep completions bash > ~/.local/share/bash-completion/completions/tablekeep");
            }
            Shell::Zsh => {
                eprintln!("#   tablekeep completions zsh > ~/.zsh/completions/_tablekeep");
            }
            Shell::Fish => {
                eprintln!("#   tablekeep completions fish > ~/.config/fish/completions/tablekeep.fish");
            }
            _ => {}
        }

        generate(self.shell, &mut cmd, "tablekeep", &mut io::stdout());
        Ok(())
    }
}

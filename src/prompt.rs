//! Interactive terminal prompts.
//!
//! Commands never read stdin directly; they go through [`Prompt`] so
//! the confirmation and credential flows stay testable.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use zeroize::Zeroizing;

use crate::error::{CliError, Result};

/// Terminal interaction seam.
pub trait Prompt {
    /// Read a secret with echo disabled. The returned buffer is wiped
    /// on drop.
    fn secret(&self, message: &str) -> Result<Zeroizing<String>>;

    /// Ask the user to pick one of `items`, returning its index.
    fn select(&self, message: &str, items: &[String]) -> Result<usize>;

    /// Read one visible line of input.
    fn read_line(&self, message: &str) -> Result<String>;
}

/// Production prompt bound to the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    pub fn new() -> Self {
        Self
    }
}

impl Prompt for TerminalPrompt {
    fn secret(&self, message: &str) -> Result<Zeroizing<String>> {
        let value = rpassword::prompt_password(format!("{}: ", message))
            .map_err(|e| CliError::Prompt(format!("could not read secret: {}", e)))?;
        Ok(Zeroizing::new(value))
    }

    fn select(&self, message: &str, items: &[String]) -> Result<usize> {
        Select::with_theme(&ColorfulTheme::default())
            .with_prompt(message)
            .items(items)
            .default(0)
            .interact()
            .map_err(|e| CliError::Prompt(format!("selection failed: {}", e)))
    }

    fn read_line(&self, message: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(message)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| CliError::Prompt(format!("could not read input: {}", e)))
    }
}

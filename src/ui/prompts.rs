//! ui::prompts
//!
//! Interactive prompts.
//!
//! # Design
//!
//! Prompts are only shown in interactive mode. In non-interactive mode,
//! commands needing a secret must receive it through a flag or fail with
//! a clear error message. Secret input is never echoed.

use std::io::{self, Write};

use thiserror::Error;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt cancelled by user")]
    Cancelled,

    #[error("not in interactive mode")]
    NotInteractive,

    #[error("entries did not match")]
    Mismatch,

    #[error("IO error: {0}")]
    IoError(String),
}

/// Prompt for masked input (e.g., passwords, tokens).
///
/// The input is not echoed to the terminal. An empty entry is reported
/// as [`PromptError::Cancelled`].
pub fn password(message: &str, interactive: bool) -> Result<String, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }

    print!("{}: ", message);
    io::stdout()
        .flush()
        .map_err(|e| PromptError::IoError(e.to_string()))?;

    let value = rpassword::read_password().map_err(|e| PromptError::IoError(e.to_string()))?;
    if value.is_empty() {
        return Err(PromptError::Cancelled);
    }
    Ok(value)
}

/// Prompt for masked input twice and require both entries to match.
pub fn password_confirmed(message: &str, interactive: bool) -> Result<String, PromptError> {
    let first = password(message, interactive)?;
    let second = password("Repeat for confirmation", interactive)?;
    if first != second {
        return Err(PromptError::Mismatch);
    }
    Ok(first)
}

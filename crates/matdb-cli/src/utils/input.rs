//! Interactive confirmation for destructive commands.

use anyhow::{Context, Result};
use std::io::{self, Write};

/// Interpret a yes/no answer. Empty input means no; `None` asks again.
fn parse_confirmation(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" | "" => Some(false),
        _ => None,
    }
}

/// Prompts the user for a string input, returned trimmed.
pub fn prompt_string(prompt: &str) -> Result<String> {
    print!("{prompt}: ");
    io::stdout().flush().context("Failed to flush prompt")?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Failed to read user input")?;
    Ok(input.trim().to_string())
}

/// Prompts the user for a yes/no confirmation.
///
/// Accepts 'y', 'yes', 'n', 'no' (case insensitive).
/// Empty input is treated as 'no'.
pub fn prompt_confirmation(prompt: &str) -> Result<bool> {
    loop {
        let input = prompt_string(&format!("{prompt} (y/N)"))?;
        match parse_confirmation(&input) {
            Some(answer) => return Ok(answer),
            None => eprintln!("Please enter 'y' for yes or 'n' for no."),
        }
    }
}

/// Ask before a destructive step unless `force` is set.
pub fn confirm_unless_forced(force: bool, prompt: &str) -> Result<bool> {
    if force {
        return Ok(true);
    }
    prompt_confirmation(prompt)
}

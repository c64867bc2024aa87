//! Interactive prompts for the claiming workflow
//!
//! Thin dialoguer wrappers plus the status-line vocabulary used across
//! the command output.

use crate::error::Result;
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input};

/// Prompt for one line of text input
pub fn input(message: &str) -> Result<String> {
    let result: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(message)
        .interact_text()?;
    Ok(result)
}

/// Prompt for one line of text input, accepting an empty answer
pub fn input_allow_empty(message: &str) -> Result<String> {
    let result: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(message)
        .allow_empty(true)
        .interact_text()?;
    Ok(result)
}

/// Display a section header
pub fn section_header(title: &str) {
    println!();
    println!("{}", "─".repeat(60).dimmed());
    println!("{}", title.cyan().bold());
    println!("{}", "─".repeat(60).dimmed());
}

/// Display a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Display an info message
pub fn info(message: &str) {
    println!("{} {}", "→".cyan(), message);
}

/// Display a warning message
pub fn warning(message: &str) {
    println!("{} {}", "!".yellow().bold(), message);
}

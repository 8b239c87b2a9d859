//! Config command - Manage CLI configuration

use crate::config::{normalize_server_url, Settings, SettingsManager};
use anyhow::{Context, Result};
use colored::Colorize;

/// Set the server URL
pub async fn set_server(url: &str) -> Result<()> {
    let mut settings = SettingsManager::load().context("Failed to load settings")?;
    settings.server_url = normalize_server_url(url)?;

    SettingsManager::save(&settings).context("Failed to save settings")?;

    println!("{} Server URL set to: {}", "✓".green(), settings.server_url.cyan());
    Ok(())
}

/// Show current configuration
pub async fn show() -> Result<()> {
    let settings = SettingsManager::load().context("Failed to load settings")?;
    let path = SettingsManager::settings_path()?;

    println!("{}", "Wildlife CLI Configuration".bold().underline());
    println!();
    println!("  Server URL:    {}", settings.server_url.cyan());
    println!("  Settings file: {}", path.display().to_string().dimmed());

    Ok(())
}

/// Reset configuration to defaults
pub async fn reset() -> Result<()> {
    use dialoguer::Confirm;

    let confirm = Confirm::new()
        .with_prompt("Reset the CLI configuration to defaults?")
        .default(false)
        .interact()?;

    if !confirm {
        println!("{}", "Reset cancelled.".yellow());
        return Ok(());
    }

    SettingsManager::save(&Settings::default()).context("Failed to save default settings")?;
    println!("{} Configuration reset to defaults.", "✓".green());

    Ok(())
}

//! Spatha - ROG Spatha X configuration tool
//!
//! Command line front end over the button model and profile store.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use spatha::{AppSettings, DeviceSettings, LoggingBackend, ProfileStore, apply_with};
use tracing::{info, warn};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut app_settings = AppSettings::load().unwrap_or_else(|e| {
        warn!("Failed to load settings, using defaults: {:#}", e);
        AppSettings::default()
    });
    if let Some(dir) = cli.profile_dir.clone() {
        app_settings.profile_dir = Some(dir);
    }

    let store = ProfileStore::from_app_settings(&app_settings);
    info!("Using profile directory {:?}", store.dir());

    match cli.command {
        Command::Show { profile } => {
            let name = profile.unwrap_or_else(|| app_settings.default_profile.clone());
            let (settings, description) = working_copy(&store, &name)?;
            print_settings(&name, &description, &settings);
            Ok(())
        }
        Command::Save {
            profile,
            dpi,
            polling_rate,
            description,
            buttons,
            macros,
            dpi_stages,
            angle_snapping,
        } => {
            let (mut settings, previous_description) = working_copy(&store, &profile)?;

            if let Some(dpi) = dpi {
                settings.set_dpi(dpi)?;
            }
            if let Some(rate) = polling_rate {
                settings.set_polling_rate(rate);
            }
            if let Some(stages) = dpi_stages {
                settings.advanced.set_dpi_stages(stages as i64);
            }
            if let Some(enabled) = angle_snapping {
                settings.advanced.angle_snapping = enabled;
            }
            for assignment in buttons.into_iter().chain(macros) {
                settings
                    .buttons
                    .set_function(assignment.index, assignment.function)?;
                if let Some(parameter) = assignment.parameter {
                    settings.buttons.set_parameter(assignment.index, parameter)?;
                }
            }

            let description = description.unwrap_or(previous_description);
            let path = store
                .save(&profile, &settings, &description)
                .with_context(|| format!("Failed to save profile '{}'", profile))?;
            println!("Profile '{}' saved to {}", profile, path.display());
            Ok(())
        }
        Command::Apply { profile } => {
            let name = profile.unwrap_or_else(|| app_settings.default_profile.clone());
            let (settings, _) = working_copy(&store, &name)?;
            let summary = apply_with(&mut LoggingBackend, &settings)?;
            println!("{}", summary);
            Ok(())
        }
        Command::List => {
            for name in store.catalog() {
                let marker = if store.exists(&name) { "*" } else { " " };
                println!("{} {}", marker, name);
            }
            Ok(())
        }
    }
}

/// Settings and description stored under `name`, or the defaults when there is no usable profile
fn working_copy(store: &ProfileStore, name: &str) -> Result<(DeviceSettings, String)> {
    let profile = store
        .load_or_default(name)
        .with_context(|| format!("Failed to load profile '{}'", name))?;
    Ok((profile.settings, profile.description))
}

fn print_settings(name: &str, description: &str, settings: &DeviceSettings) {
    println!("Profile: {}", name);
    if !description.is_empty() {
        println!("Description: {}", description);
    }
    println!("DPI: {}", settings.dpi);
    println!("Polling rate: {}", settings.polling_rate);
    println!(
        "DPI stages: {}, angle snapping: {}, surface: {}",
        settings.advanced.dpi_stages, settings.advanced.angle_snapping, settings.advanced.surface
    );
    for (i, button) in settings.buttons.iter().enumerate() {
        let function = button.function;
        match function.parameter_hint() {
            Some(hint) if button.parameter.is_empty() => {
                println!("  Button {:>2}: {} (no {} set)", i, function, hint);
            }
            _ if function.takes_parameter() => {
                println!("  Button {:>2}: {} ({})", i, function, button.parameter);
            }
            _ => println!("  Button {:>2}: {}", i, function),
        }
    }
}

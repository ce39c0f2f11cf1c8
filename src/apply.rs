//! Committing the working copy to the device
//!
//! There is no hardware driver yet; a [`DeviceBackend`] receives the settings and the summary,
//! and the default backend only logs what it would send.

use crate::device::{DeviceSettings, Dpi, PollingRate};
use anyhow::Result;
use std::fmt;
use tracing::info;

/// Result of applying the working copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplySummary {
    pub dpi: Dpi,
    pub polling_rate: PollingRate,
    pub configured_buttons: usize,
    pub text: String,
}

impl fmt::Display for ApplySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Summarise the settings to be committed
pub fn apply_all(settings: &DeviceSettings) -> ApplySummary {
    let configured_buttons = settings.buttons.configured_count();

    let mut text = format!(
        "Applied: DPI={}, Polling Rate={}",
        settings.dpi, settings.polling_rate
    );
    if configured_buttons > 0 {
        text.push_str(&format!(", {} buttons configured", configured_buttons));
    }

    ApplySummary {
        dpi: settings.dpi,
        polling_rate: settings.polling_rate,
        configured_buttons,
        text,
    }
}

/// Receiver of device settings
pub trait DeviceBackend {
    fn set_dpi(&mut self, dpi: Dpi) -> Result<()>;
    fn set_polling_rate(&mut self, rate: PollingRate) -> Result<()>;

    /// Commit a whole settings snapshot
    fn apply(&mut self, settings: &DeviceSettings, summary: &ApplySummary) -> Result<()> {
        self.set_dpi(settings.dpi)?;
        self.set_polling_rate(settings.polling_rate)?;
        info!("{}", summary);
        Ok(())
    }
}

/// Backend that only logs the requested changes
#[derive(Debug, Default)]
pub struct LoggingBackend;

impl DeviceBackend for LoggingBackend {
    fn set_dpi(&mut self, dpi: Dpi) -> Result<()> {
        info!("Setting DPI to {}", dpi);
        Ok(())
    }

    fn set_polling_rate(&mut self, rate: PollingRate) -> Result<()> {
        info!("Setting polling rate to {}", rate);
        Ok(())
    }
}

/// Summarise `settings` and hand them to `backend`
pub fn apply_with<B: DeviceBackend + ?Sized>(
    backend: &mut B,
    settings: &DeviceSettings,
) -> Result<ApplySummary> {
    let summary = apply_all(settings);
    backend.apply(settings, &summary)?;
    Ok(summary)
}

//! Per-button function assignment
//!
//! The Spatha X exposes 12 programmable buttons. Each one carries a function and a free-form
//! parameter whose meaning depends on the function (key combo, application path or macro
//! sequence). The parameter is deliberately left alone when the function changes.

use crate::error::{ProfileError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use tracing::{debug, warn};

/// Number of programmable buttons on the device
pub const BUTTON_COUNT: usize = 12;

/// Action a physical button performs when pressed
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, IntoStaticStr,
)]
pub enum ButtonFunction {
    #[default]
    #[strum(serialize = "Left Click")]
    LeftClick,
    #[strum(serialize = "Right Click")]
    RightClick,
    #[strum(serialize = "Middle Click")]
    MiddleClick,
    #[strum(serialize = "Scroll Up")]
    ScrollUp,
    #[strum(serialize = "Scroll Down")]
    ScrollDown,
    #[strum(serialize = "DPI Up")]
    DpiUp,
    #[strum(serialize = "DPI Down")]
    DpiDown,
    Keystroke,
    Macro,
    Application,
    Disabled,
}

impl ButtonFunction {
    /// Whether the parameter string means anything for this function
    pub fn takes_parameter(self) -> bool {
        matches!(
            self,
            ButtonFunction::Keystroke | ButtonFunction::Macro | ButtonFunction::Application
        )
    }

    /// Label as stored in profile files and shown to the user
    pub fn label(self) -> &'static str {
        self.into()
    }

    /// All functions in menu order
    pub fn all() -> impl Iterator<Item = ButtonFunction> {
        ButtonFunction::iter()
    }

    /// Hint for what the parameter should contain, if anything
    pub fn parameter_hint(self) -> Option<&'static str> {
        match self {
            ButtonFunction::Keystroke => Some("key combination (e.g. Ctrl+C)"),
            ButtonFunction::Application => Some("application path"),
            ButtonFunction::Macro => Some("macro sequence"),
            _ => None,
        }
    }
}

/// Configuration of a single button
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonConfig {
    pub function: ButtonFunction,
    pub parameter: String,
}

impl ButtonConfig {
    pub fn new(function: ButtonFunction, parameter: impl Into<String>) -> Self {
        Self {
            function,
            parameter: parameter.into(),
        }
    }

    /// A button counts as configured once it differs from a plain left click
    pub fn is_configured(&self) -> bool {
        self.function != ButtonFunction::LeftClick || !self.parameter.is_empty()
    }
}

/// Untyped button entry as it appears on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonEntry {
    #[serde(default = "default_function_label")]
    pub function: String,
    #[serde(default)]
    pub parameter: String,
}

fn default_function_label() -> String {
    ButtonFunction::LeftClick.label().to_string()
}

impl From<&ButtonConfig> for ButtonEntry {
    fn from(config: &ButtonConfig) -> Self {
        Self {
            function: config.function.label().to_string(),
            parameter: config.parameter.clone(),
        }
    }
}

impl ButtonEntry {
    /// Validate the function label for button `index`
    pub fn to_config(&self, index: usize) -> Result<ButtonConfig> {
        let function =
            ButtonFunction::from_str(&self.function).map_err(|_| ProfileError::InvalidFunction {
                index,
                value: self.function.clone(),
            })?;
        Ok(ButtonConfig::new(function, self.parameter.clone()))
    }
}

/// The fixed set of 12 button configurations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonBank {
    buttons: [ButtonConfig; BUTTON_COUNT],
}

impl Default for ButtonBank {
    fn default() -> Self {
        Self {
            buttons: std::array::from_fn(|_| ButtonConfig::default()),
        }
    }
}

impl ButtonBank {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_mut(&mut self, index: usize) -> Result<&mut ButtonConfig> {
        self.buttons
            .get_mut(index)
            .ok_or(ProfileError::InvalidButton(index))
    }

    pub fn get(&self, index: usize) -> Result<&ButtonConfig> {
        self.buttons
            .get(index)
            .ok_or(ProfileError::InvalidButton(index))
    }

    /// Set the function of a button. The existing parameter is kept as-is.
    pub fn set_function(&mut self, index: usize, function: ButtonFunction) -> Result<()> {
        let slot = self.slot_mut(index)?;
        slot.function = function;
        debug!("Button {} function set to {}", index, function);
        Ok(())
    }

    /// Set the raw parameter of a button; no validation is performed
    pub fn set_parameter(&mut self, index: usize, value: impl Into<String>) -> Result<()> {
        let slot = self.slot_mut(index)?;
        slot.parameter = value.into();
        debug!("Button {} parameter set to '{}'", index, slot.parameter);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ButtonConfig> {
        self.buttons.iter()
    }

    /// Ordered copy of all 12 configurations
    pub fn snapshot_all(&self) -> Vec<ButtonConfig> {
        self.buttons.to_vec()
    }

    /// Number of buttons that differ from a plain left click
    pub fn configured_count(&self) -> usize {
        self.buttons.iter().filter(|b| b.is_configured()).count()
    }

    /// Apply stored entries keyed by button index.
    ///
    /// Indices that are absent keep their current configuration. An entry with an unknown
    /// function leaves its button untouched; the remaining entries are still applied and the
    /// first such error is returned once the pass is complete.
    pub fn restore_all<I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (usize, ButtonEntry)>,
    {
        let mut first_error = None;

        for (index, entry) in entries {
            if index >= BUTTON_COUNT {
                warn!("Ignoring configuration for unknown button {}", index);
                continue;
            }

            match entry.to_config(index) {
                Ok(config) => self.buttons[index] = config,
                Err(e) => {
                    warn!("{}", e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

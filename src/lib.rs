//! Spatha - configuration model for the ROG Spatha X mouse
//!
//! Button function assignment, DPI and polling rate settings, and named profiles persisted as
//! JSON files. Nothing here talks to the hardware; see [`apply::DeviceBackend`].

pub mod apply;
pub mod button;
pub mod device;
pub mod error;
pub mod macro_engine;
pub mod profile;
pub mod settings;

pub use apply::{ApplySummary, DeviceBackend, LoggingBackend, apply_all, apply_with};
pub use button::{BUTTON_COUNT, ButtonBank, ButtonConfig, ButtonEntry, ButtonFunction};
pub use device::{AdvancedSettings, DeviceSettings, Dpi, PollingRate, Surface};
pub use error::{ErrorKind, ProfileError};
pub use macro_engine::MacroRecorder;
pub use profile::{BUILTIN_PROFILES, Profile, ProfileStore, profile_file_name};
pub use settings::AppSettings;

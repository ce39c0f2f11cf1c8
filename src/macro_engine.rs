//! Macro sequence recording
//!
//! Captures a list of key names while recording and turns it into the parameter string stored
//! on a Macro button (key names joined by `" + "`). How keys are captured is up to the caller.

use tracing::{debug, info};

/// Separator between key names in a stored macro parameter
pub const MACRO_SEPARATOR: &str = " + ";

/// Records key names into a macro sequence
#[derive(Debug, Default, Clone)]
pub struct MacroRecorder {
    keys: Vec<String>,
    recording: bool,
}

impl MacroRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh recording, discarding previously captured keys
    pub fn start(&mut self) {
        self.keys.clear();
        self.recording = true;
        info!("Started macro recording");
    }

    /// Stop recording; captured keys are kept
    pub fn stop(&mut self) {
        if self.recording {
            self.recording = false;
            info!("Stopped macro recording with {} keys", self.keys.len());
        }
    }

    /// Start when idle, stop when recording
    pub fn toggle(&mut self) {
        if self.recording {
            self.stop();
        } else {
            self.start();
        }
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Record a key press by name. Returns true if the key was added.
    ///
    /// Nothing is recorded while idle. Empty names and keys already in the sequence are skipped.
    pub fn record_key(&mut self, name: &str) -> bool {
        if !self.recording {
            return false;
        }

        let name = name.trim();
        if name.is_empty() || self.keys.iter().any(|k| k == name) {
            return false;
        }

        self.keys.push(name.to_string());
        debug!("Recorded key: {}", name);
        true
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// The parameter string for a Macro button
    pub fn sequence(&self) -> String {
        self.keys.join(MACRO_SEPARATOR)
    }
}

/// Split a stored macro parameter back into key names
pub fn split_sequence(sequence: &str) -> Vec<String> {
    sequence
        .split(MACRO_SEPARATOR)
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

//! Profile management
//!
//! Handles saving and loading named device profiles as JSON files. Each profile lives in its own
//! `profile_<name>.json` file; saving always rewrites the whole file.

use crate::button::ButtonEntry;
use crate::device::{DeviceSettings, Dpi, PollingRate, Surface};
use crate::error::{ProfileError, Result};
use crate::settings::AppSettings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Profile names offered out of the box
pub const BUILTIN_PROFILES: [&str; 5] = ["Default", "Gaming", "Office", "Custom 1", "Custom 2"];

const FILE_PREFIX: &str = "profile_";
const FILE_SUFFIX: &str = ".json";

/// File name a profile is stored under: lower-cased, spaces replaced with underscores
pub fn profile_file_name(name: &str) -> String {
    format!(
        "{}{}{}",
        FILE_PREFIX,
        name.to_lowercase().replace(' ', "_"),
        FILE_SUFFIX
    )
}

/// A named, persisted set of device settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub description: String,
    pub settings: DeviceSettings,
}

impl Profile {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        settings: DeviceSettings,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            settings,
        }
    }
}

/// On-disk layout of a profile
#[derive(Debug, Serialize, Deserialize)]
struct ProfileFile {
    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    description: String,

    #[serde(default = "default_dpi")]
    dpi: i64,

    #[serde(default = "default_polling_rate")]
    polling_rate: String,

    #[serde(default)]
    buttons: BTreeMap<usize, ButtonEntry>,

    #[serde(default = "default_dpi_stages")]
    dpi_stages: i64,

    #[serde(default)]
    angle_snapping: bool,

    #[serde(default)]
    surface: Option<String>,
}

fn default_dpi() -> i64 {
    Dpi::DEFAULT as i64
}

fn default_polling_rate() -> String {
    PollingRate::default().label().to_string()
}

fn default_dpi_stages() -> i64 {
    4
}

impl ProfileFile {
    fn from_settings(name: &str, description: &str, settings: &DeviceSettings) -> Self {
        Self {
            name: Some(name.to_string()),
            description: description.to_string(),
            dpi: settings.dpi.value() as i64,
            polling_rate: settings.polling_rate.label().to_string(),
            buttons: settings
                .buttons
                .iter()
                .enumerate()
                .map(|(i, b)| (i, ButtonEntry::from(b)))
                .collect(),
            dpi_stages: settings.advanced.dpi_stages as i64,
            angle_snapping: settings.advanced.angle_snapping,
            surface: Some(settings.advanced.surface.label().to_string()),
        }
    }

    /// Build settings on top of the defaults. Nothing outside the returned value is touched.
    fn into_profile(self, requested_name: &str, path: &Path) -> Result<Profile> {
        let mut settings = DeviceSettings::default();

        settings.dpi = u32::try_from(self.dpi)
            .ok()
            .and_then(|dpi| Dpi::new(dpi).ok())
            .ok_or_else(|| {
                ProfileError::corrupt(path, format!("dpi {} out of range", self.dpi))
            })?;

        settings.polling_rate = PollingRate::parse(&self.polling_rate)
            .map_err(|e| ProfileError::corrupt(path, e))?;

        settings.advanced.set_dpi_stages(self.dpi_stages);
        settings.advanced.angle_snapping = self.angle_snapping;
        if let Some(surface) = self.surface {
            settings.advanced.surface = Surface::from_str(&surface).unwrap_or_else(|_| {
                warn!("Unknown surface '{}', using Auto", surface);
                Surface::Auto
            });
        }

        settings.buttons.restore_all(self.buttons)?;

        Ok(Profile {
            name: self.name.unwrap_or_else(|| requested_name.to_string()),
            description: self.description,
            settings,
        })
    }
}

/// Profile store for saving/loading profiles
#[derive(Debug, Clone)]
pub struct ProfileStore {
    /// Directory where profile files are stored
    dir: PathBuf,
    /// Write through a temporary file and rename it into place
    atomic_save: bool,
}

impl ProfileStore {
    /// Create a store rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            atomic_save: true,
        }
    }

    /// Create a store in the process working directory
    pub fn in_working_dir() -> Self {
        Self::new(".")
    }

    /// Create a store as described by the application settings
    pub fn from_app_settings(settings: &AppSettings) -> Self {
        let store = match &settings.profile_dir {
            Some(dir) => Self::new(dir),
            None => Self::in_working_dir(),
        };
        store.with_atomic_save(settings.atomic_save)
    }

    pub fn with_atomic_save(mut self, enabled: bool) -> Self {
        self.atomic_save = enabled;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of the file backing `name`
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(profile_file_name(name))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    /// Save settings under `name`, replacing any existing profile of the same name
    pub fn save(
        &self,
        name: &str,
        settings: &DeviceSettings,
        description: &str,
    ) -> Result<PathBuf> {
        let path = self.path_for(name);
        let file = ProfileFile::from_settings(name, description, settings);

        let json = serde_json::to_vec_pretty(&file)
            .map_err(|e| ProfileError::io(&path, io::Error::other(e)))?;

        if self.atomic_save {
            write_atomic(&path, &json)?;
        } else {
            fs::write(&path, &json).map_err(|e| ProfileError::io(&path, e))?;
        }

        info!("Saved profile '{}' to {:?}", name, path);
        Ok(path)
    }

    /// Load the profile stored under `name`
    pub fn load(&self, name: &str) -> Result<Profile> {
        let path = self.path_for(name);

        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ProfileError::NotFound {
                name: name.to_string(),
                path: path.clone(),
            },
            _ => ProfileError::io(&path, e),
        })?;

        let value: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| ProfileError::corrupt(&path, e))?;
        if !value.is_object() {
            return Err(ProfileError::corrupt(&path, "top level is not an object"));
        }

        let file: ProfileFile =
            serde_json::from_value(value).map_err(|e| ProfileError::corrupt(&path, e))?;
        let profile = file.into_profile(name, &path)?;

        info!("Loaded profile '{}' from {:?}", profile.name, path);
        Ok(profile)
    }

    /// Load `name` into the working copy. The working copy is only replaced on full success.
    pub fn load_into(&self, name: &str, settings: &mut DeviceSettings) -> Result<Profile> {
        let profile = self.load(name)?;
        *settings = profile.settings.clone();
        Ok(profile)
    }

    /// Load `name`, falling back to a default profile when the file is missing or unusable.
    ///
    /// Only I/O errors are returned, so a broken profile can still be opened and saved over.
    pub fn load_or_default(&self, name: &str) -> Result<Profile> {
        match self.load(name) {
            Ok(profile) => Ok(profile),
            Err(ProfileError::NotFound { .. }) => {
                info!("Profile '{}' not saved yet, starting from defaults", name);
                Ok(Profile::new(name, "", DeviceSettings::default()))
            }
            Err(e @ ProfileError::Io { .. }) => Err(e),
            Err(e) => {
                warn!("{}; starting from defaults", e);
                Ok(Profile::new(name, "", DeviceSettings::default()))
            }
        }
    }

    /// Built-in profile names followed by any other profiles found in the directory
    pub fn catalog(&self) -> Vec<String> {
        let mut names: Vec<String> = BUILTIN_PROFILES.iter().map(|s| s.to_string()).collect();
        let builtin_files: Vec<String> =
            BUILTIN_PROFILES.iter().map(|n| profile_file_name(n)).collect();

        let mut extra = Vec::new();
        if let Ok(entries) = fs::read_dir(&self.dir) {
            for entry in entries.flatten() {
                let file_name = entry.file_name().to_string_lossy().to_string();
                let Some(stem) = file_name
                    .strip_prefix(FILE_PREFIX)
                    .and_then(|s| s.strip_suffix(FILE_SUFFIX))
                else {
                    continue;
                };
                if stem.is_empty() || builtin_files.contains(&file_name) {
                    continue;
                }

                let name = stored_name(&entry.path())
                    .filter(|n| profile_file_name(n) == file_name)
                    .unwrap_or_else(|| stem.replace('_', " "));
                // Not reachable through load() under any name
                if profile_file_name(&name) != file_name {
                    debug!("Skipping {:?}: name does not map back to the file", entry.path());
                    continue;
                }
                debug!("Found profile '{}' in {:?}", name, entry.path());
                extra.push(name);
            }
        }

        extra.sort_by_key(|n| n.to_lowercase());
        extra.dedup();
        names.extend(extra);
        names
    }
}

/// Name recorded inside a profile file, if it can be read
fn stored_name(path: &Path) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    let value: serde_json::Value = serde_json::from_str(&content).ok()?;
    value.get("name")?.as_str().map(str::to_string)
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let tmp_path = path.with_extension("json.tmp");

    let written = fs::File::create(&tmp_path).and_then(|mut f| {
        f.write_all(data)?;
        f.sync_all()
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(ProfileError::io(&tmp_path, e));
    }

    // Rename over an existing file fails on Windows
    if cfg!(windows) && path.exists() {
        let _ = fs::remove_file(path);
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        ProfileError::io(path, e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button::ButtonFunction;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    fn store() -> (TempDir, ProfileStore) {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_profile_file_name() {
        assert_eq!(profile_file_name("Gaming"), "profile_gaming.json");
        assert_eq!(profile_file_name("Custom 1"), "profile_custom_1.json");
        assert_eq!(profile_file_name("My Cool Setup"), "profile_my_cool_setup.json");
    }

    #[test]
    fn test_file_layout() {
        let (_dir, store) = store();
        let mut settings = DeviceSettings::default();
        settings.buttons.set_function(1, ButtonFunction::RightClick).unwrap();

        let path = store.save("Office", &settings, "work").unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();

        assert_eq!(value["name"], "Office");
        assert_eq!(value["description"], "work");
        assert_eq!(value["dpi"], 800);
        assert_eq!(value["polling_rate"], "1000Hz");
        assert_eq!(value["buttons"]["1"]["function"], "Right Click");
        assert_eq!(value["buttons"]["11"]["parameter"], "");
        assert_eq!(value["buttons"].as_object().unwrap().len(), 12);
    }

    #[test]
    fn test_load_missing() {
        let (_dir, store) = store();
        let err = store.load("Gaming").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_load_defaults() {
        let (dir, store) = store();
        fs::write(dir.path().join("profile_gaming.json"), r#"{"buttons": {}}"#).unwrap();

        let profile = store.load("Gaming").unwrap();
        assert_eq!(profile.name, "Gaming");
        assert_eq!(profile.description, "");
        assert_eq!(profile.settings, DeviceSettings::default());
    }

    #[test]
    fn test_load_ignores_unknown_fields() {
        let (dir, store) = store();
        fs::write(
            dir.path().join("profile_default.json"),
            r#"{"name": "Default", "dpi": 3200, "lighting": {"r": 1}}"#,
        )
        .unwrap();

        assert_eq!(store.load("Default").unwrap().settings.dpi.value(), 3200);
    }

    #[test]
    fn test_load_corrupt() {
        let (dir, store) = store();
        let path = dir.path().join("profile_gaming.json");

        for body in ["not valid json", "[]", r#"{"dpi": "fast"}"#, r#"{"buttons": []}"#] {
            fs::write(&path, body).unwrap();
            let err = store.load("Gaming").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Corrupt, "body: {}", body);
        }
        // The bad file is left alone
        assert!(path.exists());
    }

    #[test]
    fn test_load_out_of_range_values_are_corrupt() {
        let (dir, store) = store();
        let path = dir.path().join("profile_office.json");

        for body in [
            r#"{"dpi": 50}"#,
            r#"{"dpi": 25000}"#,
            r#"{"dpi": -1}"#,
            r#"{"polling_rate": "8000Hz"}"#,
        ] {
            fs::write(&path, body).unwrap();
            let err = store.load("Office").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Corrupt, "body: {}", body);
        }
    }

    #[test]
    fn test_load_directory_is_io_error() {
        let (dir, store) = store();
        fs::create_dir(dir.path().join("profile_gaming.json")).unwrap();

        let err = store.load("Gaming").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(store.load_or_default("Gaming").is_err());
    }

    #[test]
    fn test_load_or_default_recovers_broken_profiles() {
        let (dir, store) = store();
        let path = dir.path().join("profile_gaming.json");

        for body in [
            "not valid json",
            r#"{"polling_rate": "8000Hz"}"#,
            r#"{"buttons": {"0": {"function": "Warp", "parameter": ""}}}"#,
        ] {
            fs::write(&path, body).unwrap();
            let profile = store.load_or_default("Gaming").unwrap();
            assert_eq!(profile.name, "Gaming");
            assert_eq!(profile.settings, DeviceSettings::default());
        }

        let missing = store.load_or_default("Office").unwrap();
        assert_eq!(missing.description, "");
    }

    #[test]
    fn test_save_replaces_broken_profile() {
        let (dir, store) = store();
        let path = dir.path().join("profile_gaming.json");
        fs::write(&path, r#"{"polling_rate": "8000Hz"}"#).unwrap();

        let mut profile = store.load_or_default("Gaming").unwrap();
        profile.settings.set_polling_rate(PollingRate::Hz500);
        store.save(&profile.name, &profile.settings, "fixed").unwrap();

        let reloaded = store.load("Gaming").unwrap();
        assert_eq!(reloaded.settings.polling_rate, PollingRate::Hz500);
        assert_eq!(reloaded.description, "fixed");
    }

    #[test]
    fn test_failed_temp_write_reports_io() {
        let (dir, store) = store();
        // A directory in the way of the temp file makes File::create fail
        fs::create_dir(dir.path().join("profile_gaming.json.tmp")).unwrap();

        let err = store.save("Gaming", &DeviceSettings::default(), "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(!dir.path().join("profile_gaming.json").exists());
        // Only files are cleaned up, never a directory in the way
        assert!(dir.path().join("profile_gaming.json.tmp").is_dir());
    }

    #[test]
    fn test_store_from_app_settings() {
        let store = ProfileStore::from_app_settings(&AppSettings::default());
        assert_eq!(store.dir(), Path::new("."));

        let settings = AppSettings {
            profile_dir: Some(PathBuf::from("/tmp/spatha")),
            ..AppSettings::default()
        };
        assert_eq!(
            ProfileStore::from_app_settings(&settings).dir(),
            Path::new("/tmp/spatha")
        );
    }

    #[test]
    fn test_load_into_no_partial_mutation() {
        let (dir, store) = store();
        fs::write(
            dir.path().join("profile_gaming.json"),
            r#"{"dpi": 1600, "buttons": {"0": {"function": "Warp", "parameter": ""}}}"#,
        )
        .unwrap();

        let mut working = DeviceSettings::default();
        working.set_dpi(2400).unwrap();
        let before = working.clone();

        let err = store.load_into("Gaming", &mut working).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFunction);
        assert_eq!(working, before);
    }

    #[test]
    fn test_non_atomic_save() {
        let (dir, store) = store();
        let store = store.with_atomic_save(false);
        store.save("Default", &DeviceSettings::default(), "").unwrap();
        assert!(dir.path().join("profile_default.json").exists());
        assert!(!dir.path().join("profile_default.json.tmp").exists());
    }

    #[test]
    fn test_save_into_missing_dir_is_io_error() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path().join("nope"));
        let err = store.save("Default", &DeviceSettings::default(), "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_catalog() {
        let (dir, store) = store();
        assert_eq!(store.catalog(), BUILTIN_PROFILES.to_vec());

        store.save("Gaming", &DeviceSettings::default(), "").unwrap();
        store.save("Zed Mode", &DeviceSettings::default(), "").unwrap();
        store.save("arena", &DeviceSettings::default(), "").unwrap();
        fs::write(dir.path().join("unrelated.json"), "{}").unwrap();
        fs::write(dir.path().join("profile_Foo.json"), "{}").unwrap();

        let catalog = store.catalog();
        assert_eq!(&catalog[..5], &BUILTIN_PROFILES[..]);
        assert_eq!(&catalog[5..], &["arena".to_string(), "Zed Mode".to_string()]);
    }
}

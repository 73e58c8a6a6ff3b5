/// Persistent user settings
///
/// Stored as JSON in the user's config directory:
/// - Linux: ~/.config/caption-editor/settings.json
/// - macOS: ~/Library/Application Support/caption-editor/settings.json
/// - Windows: %APPDATA%\caption-editor\settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::media::scan::DEFAULT_EXTENSIONS;

/// When generated captions reach the disk
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PersistPolicy {
    /// Write each sidecar as soon as its caption is generated
    #[default]
    Immediate,
    /// Keep generated captions in memory until "Save All"
    Deferred,
}

/// All user-adjustable settings
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// When freshly generated captions are written
    pub persist_policy: PersistPolicy,
    /// External captioning program and its arguments
    /// - `None` = new images start with an empty caption
    pub captioner_command: Option<Vec<String>>,
    /// File extensions treated as images (case-insensitive)
    pub extensions: Vec<String>,
    /// Folder loaded most recently, used to seed the folder picker
    pub last_folder: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            persist_policy: PersistPolicy::default(),
            captioner_command: None,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            last_folder: None,
        }
    }
}

impl Settings {
    /// Convert to JSON string for storage
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Get the path where the settings should be stored
    pub fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("caption-editor");
        path.push("settings.json");
        Some(path)
    }

    /// Load settings from `path`.
    ///
    /// A missing file gives the defaults; so does a malformed or unreadable
    /// one, after a warning, so a bad edit never keeps the app from starting.
    /// The origin tells whether the file may be written back.
    pub fn load_from(path: &Path) -> (Self, SettingsOrigin) {
        match fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => (settings, SettingsOrigin::File),
                Err(e) => {
                    log::warn!("Ignoring malformed settings {}: {}", path.display(), e);
                    (Self::default(), SettingsOrigin::Unreadable)
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                (Self::default(), SettingsOrigin::Missing)
            }
            Err(e) => {
                log::warn!("Cannot read settings {}: {}", path.display(), e);
                (Self::default(), SettingsOrigin::Unreadable)
            }
        }
    }

    /// Load from the default location
    pub fn load() -> (Self, SettingsOrigin) {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                log::warn!("Could not determine config directory, using default settings");
                (Self::default(), SettingsOrigin::Unreadable)
            }
        }
    }

    /// Write settings to `path`, creating its directory if needed
    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = self.to_json().map_err(io::Error::other)?;
        fs::write(path, json)
    }

    /// Record `folder` as the last one loaded and write the settings to
    /// `path`, unless they came from a file we could not read.
    /// Returns whether the file was written.
    pub fn remember_folder_at(
        &mut self,
        folder: &Path,
        path: &Path,
        origin: SettingsOrigin,
    ) -> io::Result<bool> {
        self.last_folder = Some(folder.to_path_buf());
        if !origin.is_writable() {
            log::info!("Leaving {} untouched until it is fixed", path.display());
            return Ok(false);
        }
        self.save_to(path)?;
        Ok(true)
    }

    /// `remember_folder_at` for the default location
    pub fn remember_folder(&mut self, folder: &Path, origin: SettingsOrigin) -> io::Result<bool> {
        match Self::default_path() {
            Some(path) => self.remember_folder_at(folder, &path, origin),
            None => {
                self.last_folder = Some(folder.to_path_buf());
                Ok(false)
            }
        }
    }
}

/// Where loaded settings came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsOrigin {
    /// Parsed from the settings file
    File,
    /// No file yet; defaults in use
    Missing,
    /// The file exists but could not be read or parsed; defaults in use
    Unreadable,
}

impl SettingsOrigin {
    /// Writing back is safe only when it can't destroy the user's file
    pub fn is_writable(self) -> bool {
        !matches!(self, SettingsOrigin::Unreadable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.persist_policy, PersistPolicy::Immediate);
        assert!(settings.captioner_command.is_none());
        assert_eq!(settings.extensions, vec!["png", "jpg", "jpeg", "bmp"]);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{ "persist_policy": "deferred" }"#).unwrap();
        assert_eq!(settings.persist_policy, PersistPolicy::Deferred);
        assert_eq!(settings.extensions, Settings::default().extensions);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut settings = Settings::default();
        settings.captioner_command = Some(vec!["blip-caption".into(), "--gpu".into()]);
        settings.last_folder = Some(PathBuf::from("/photos"));
        settings.save_to(&path).unwrap();

        assert_eq!(Settings::load_from(&path), (settings, SettingsOrigin::File));
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(
            Settings::load_from(&path),
            (Settings::default(), SettingsOrigin::Unreadable)
        );
        assert_eq!(
            Settings::load_from(&dir.path().join("missing.json")),
            (Settings::default(), SettingsOrigin::Missing)
        );
    }

    #[test]
    fn test_malformed_file_is_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let broken = r#"{ "captioner_command": ["blip-caption" "--gpu"] }"#;
        fs::write(&path, broken).unwrap();

        let (mut settings, origin) = Settings::load_from(&path);
        let written = settings
            .remember_folder_at(Path::new("/photos"), &path, origin)
            .unwrap();

        assert!(!written);
        assert_eq!(settings.last_folder, Some(PathBuf::from("/photos")));
        assert_eq!(fs::read_to_string(&path).unwrap(), broken);
    }

    #[test]
    fn test_remember_folder_writes_good_or_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");

        let (mut settings, origin) = Settings::load_from(&path);
        assert!(settings
            .remember_folder_at(Path::new("/photos"), &path, origin)
            .unwrap());

        let (reloaded, origin) = Settings::load_from(&path);
        assert_eq!(origin, SettingsOrigin::File);
        assert_eq!(reloaded.last_folder, Some(PathBuf::from("/photos")));
    }
}

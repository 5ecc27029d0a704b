// Import necessary libraries and modules for file I/O and serialization.
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;
use crate::logging::data_dir;

const SETTINGS_FILE: &str = "chargen.json";

// Tunables for the history manager and the update batcher.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ChargenOptions {
    pub debounce_ms: u64,                // Quiet period before a burst of edits is committed or flushed.
    pub max_history: usize,              // Oldest undo entries are dropped beyond this depth.
    pub enable_keyboard_shortcuts: bool, // Ctrl/Cmd+Z and friends.
}

impl Default for ChargenOptions {
    fn default() -> Self {
        ChargenOptions {
            debounce_ms: 300,
            max_history: 50,
            enable_keyboard_shortcuts: true,
        }
    }
}

impl ChargenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(data_dir()?.join(SETTINGS_FILE))
    }

    // Load options from the default file path.
    pub fn load() -> Result<Self> {
        Self::load_from_file(Self::default_path()?)
    }

    // Load options, falling back to the defaults when the file is missing or broken.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(options) => options,
            Err(e) => {
                log::warn!("Using default chargen options: {e:#}");
                Self::default()
            }
        }
    }

    // Save current options to the default file path.
    pub fn save(&self) -> Result<()> {
        self.save_to_file(Self::default_path()?)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let options = serde_json::from_str(&data)?;
        Ok(options)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let data = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?; // Create the directory if it doesn't exist.
        }
        let mut file = fs::File::create(path)?;
        file.write_all(data.as_bytes())?;
        Ok(())
    }
}

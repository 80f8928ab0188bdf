//! Saved pin collection persisted to a JSON file
//!
//! Corrupted or missing files start an empty collection instead of failing.

use crate::error::Result;
use crate::pins::Pin;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
struct SavedPinsFile {
    /// Saved pins in the order they were saved
    pins: Vec<Pin>,
}

/// A user's saved pins
#[derive(Debug)]
pub struct SavedPins {
    path: PathBuf,
    pins: Vec<Pin>,
}

impl SavedPins {
    /// Default file location: ~/.local/share/pin_gallery/saved_pins.json
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pin_gallery")
            .join("saved_pins.json")
    }

    /// Load from disk, or start empty if the file is missing or unreadable
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let pins = if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match serde_json::from_str::<SavedPinsFile>(&content) {
                    Ok(file) => {
                        log::info!("Loaded {} saved pins", file.pins.len());
                        file.pins
                    }
                    Err(e) => {
                        log::warn!("Failed to parse saved pins, starting fresh: {}", e);
                        Vec::new()
                    }
                },
                Err(e) => {
                    log::warn!("Failed to read saved pins, starting fresh: {}", e);
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        Self { path, pins }
    }

    /// Write the collection to disk
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = SavedPinsFile {
            pins: self.pins.clone(),
        };
        std::fs::write(&self.path, serde_json::to_string_pretty(&file)?)?;

        log::debug!("Saved {} pins to {}", self.pins.len(), self.path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_saved(&self, id: &str) -> bool {
        self.pins.iter().any(|pin| pin.id == id)
    }

    /// Save a pin, replacing any stored copy with the same id
    pub fn save_pin(&mut self, pin: Pin) {
        match self.pins.iter_mut().find(|p| p.id == pin.id) {
            Some(existing) => *existing = pin,
            None => self.pins.push(pin),
        }
    }

    /// Returns true if the pin was saved
    pub fn remove_pin(&mut self, id: &str) -> bool {
        let before = self.pins.len();
        self.pins.retain(|pin| pin.id != id);
        self.pins.len() != before
    }

    pub fn saved_pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }
}

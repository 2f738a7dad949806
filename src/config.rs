// Analysis settings persisted in the user's config directory

use std::fs::File;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::PaddockError;
use crate::track_metadata::projection::DEFAULT_LABEL_OFFSET;

const CONFIG_FILE_NAME: &str = "config.json";

/// Default quick lap threshold: laps within 107% of the fastest one
pub const DEFAULT_QUICKLAP_THRESHOLD: f64 = 1.07;
/// Neutral color for drivers whose provider color is already taken
pub const DEFAULT_FALLBACK_COLOR: &str = "#808080";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Laps slower than this factor times the fastest lap are not representative
    pub quicklap_threshold: f64,
    pub fallback_color: String,
    /// Distance between a corner apex and its label, in provider units
    pub corner_label_offset: f64,
    /// Shown instead of a position for drivers that were not classified
    pub unclassified_marker: String,
    /// Shown for qualifying segments and lap times that were not set
    pub not_set_marker: String,
    /// Drivers shown together on the telemetry comparison
    pub max_compared_drivers: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            quicklap_threshold: DEFAULT_QUICKLAP_THRESHOLD,
            fallback_color: DEFAULT_FALLBACK_COLOR.to_string(),
            corner_label_offset: DEFAULT_LABEL_OFFSET,
            unclassified_marker: "NC".to_string(),
            not_set_marker: "N/A".to_string(),
            max_compared_drivers: 2,
        }
    }
}

impl AnalysisConfig {
    /// Location of the config file in the user's config directory
    pub fn default_path() -> Result<PathBuf, PaddockError> {
        Ok(dirs::config_dir()
            .ok_or(PaddockError::NoConfigDir)?
            .join("paddock")
            .join(CONFIG_FILE_NAME))
    }

    /// Load the config from the user's config directory, None if it was never saved
    pub fn from_local_file() -> Result<Option<Self>, PaddockError> {
        Self::from_file(&Self::default_path()?)
    }

    pub fn from_file(config_path: &PathBuf) -> Result<Option<Self>, PaddockError> {
        if !config_path.exists() {
            return Ok(None);
        }
        let file =
            File::open(config_path).map_err(|e| PaddockError::ConfigIOError { source: e })?;
        serde_json::from_reader(file)
            .map(Some)
            .map_err(|e| PaddockError::ConfigSerializeError { source: e })
    }

    pub fn save_to(&self, config_path: &PathBuf) -> Result<(), PaddockError> {
        if let Some(parent) = config_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| PaddockError::ConfigIOError { source: e })?;
            }
        }

        let file =
            File::create(config_path).map_err(|e| PaddockError::ConfigIOError { source: e })?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|e| PaddockError::ConfigSerializeError { source: e })
    }
}

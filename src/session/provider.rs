// Provider adapter for loading post-session snapshots

use std::fs;
use std::path::PathBuf;

use log::{debug, info};

use crate::errors::PaddockError;
use crate::session::{Session, SessionKey};

/// Narrow interface to the upstream timing provider
pub trait SessionProvider {
    /// Load a fully materialized session. An empty session is reported as an error
    fn load_session(&self, key: &SessionKey) -> Result<Session, PaddockError>;
}

/// Reads session snapshots exported as JSON files from a local directory
///
/// Snapshots are named `<year>_<normalized event>_<session code>.json`, for example
/// `2024_monaco_grand_prix_R.json`. Nothing is cached: every call reads the file again.
pub struct FileSessionProvider {
    /// Directory holding the session snapshot files
    storage_path: PathBuf,
}

impl FileSessionProvider {
    pub fn new(storage_path: PathBuf) -> Self {
        Self { storage_path }
    }

    /// Create a provider reading from the default application data directory
    pub fn new_default() -> Result<Self, PaddockError> {
        Ok(Self::new(Self::default_storage_path()?))
    }

    /// Get the default location of session snapshots
    pub fn default_storage_path() -> Result<PathBuf, PaddockError> {
        let app_data_dir = dirs::data_dir().ok_or(PaddockError::NoConfigDir)?;
        Ok(app_data_dir.join("paddock").join("sessions"))
    }

    /// Generate the snapshot file path for a session key
    pub fn file_path_for_session(&self, key: &SessionKey) -> PathBuf {
        let filename = format!(
            "{}_{}_{}.json",
            key.year,
            Self::normalize_event_name(&key.event),
            key.session_type.code()
        );
        self.storage_path.join(filename)
    }

    /// Keys match when they would be stored under the same file name
    fn same_session(stored: &SessionKey, requested: &SessionKey) -> bool {
        stored.year == requested.year
            && stored.session_type == requested.session_type
            && Self::normalize_event_name(&stored.event)
                == Self::normalize_event_name(&requested.event)
    }

    /// Normalize event name for consistent file naming
    fn normalize_event_name(event: &str) -> String {
        event
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect()
    }
}

impl SessionProvider for FileSessionProvider {
    fn load_session(&self, key: &SessionKey) -> Result<Session, PaddockError> {
        let file_path = self.file_path_for_session(key);
        if !file_path.exists() {
            return Err(PaddockError::SessionNotFound {
                path: format!("{:?}", file_path),
            });
        }

        debug!("Loading session {} from {:?}", key, file_path);
        let content = fs::read_to_string(&file_path)
            .map_err(|e| PaddockError::SessionLoaderError { source: e })?;
        let session: Session = serde_json::from_str(&content)
            .map_err(|e| PaddockError::SessionParseError { source: e })?;

        if !Self::same_session(&session.key, key) {
            return Err(PaddockError::SessionKeyMismatch {
                requested: key.to_string(),
                found: session.key.to_string(),
            });
        }

        if session.is_empty() {
            return Err(PaddockError::EmptySession {
                key: key.to_string(),
            });
        }

        info!(
            "Loaded session {}: {} laps, {} telemetry tables, {} results",
            key,
            session.laps.len(),
            session.telemetry.len(),
            session.results.len()
        );
        Ok(session)
    }
}

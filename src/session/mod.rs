// Session data model as handed over by the timing provider
// All analysis borrows a loaded Session read-only

pub mod provider;

pub use provider::{FileSessionProvider, SessionProvider};

use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::track_metadata::TrackGeometry;

/// Kind of session, determines which projections apply
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionType {
    Race,
    Qualifying,
    Sprint,
    SprintQualifying,
}

impl SessionType {
    /// Short code used by the provider and in snapshot file names
    pub fn code(&self) -> &'static str {
        match self {
            SessionType::Race => "R",
            SessionType::Qualifying => "Q",
            SessionType::Sprint => "S",
            SessionType::SprintQualifying => "SQ",
        }
    }

    /// Race and sprint sessions have a grid, a classification and points
    pub fn is_race_like(&self) -> bool {
        matches!(self, SessionType::Race | SessionType::Sprint)
    }
}

/// Provider lookup key for a session
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub year: u16,
    /// Event name as listed in the provider schedule (e.g., "Monaco Grand Prix")
    pub event: String,
    pub session_type: SessionType,
}

impl SessionKey {
    pub fn new(year: u16, event: impl Into<String>, session_type: SessionType) -> Self {
        Self {
            year,
            event: event.into(),
            session_type,
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.year, self.event, self.session_type.code())
    }
}

/// Tyre compound fitted for a lap
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Compound {
    Soft,
    Medium,
    Hard,
    Intermediate,
    Wet,
    #[default]
    #[serde(other)]
    Unknown,
}

/// One timed lap of one driver
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Lap {
    /// Driver abbreviation (e.g., "VER")
    pub driver: String,
    pub lap_number: u32,
    /// Lap time in seconds, absent when the provider did not time the lap
    pub lap_time_s: Option<f64>,
    /// Stint index as counted by the provider, starting at 1
    pub stint: Option<u32>,
    #[serde(default)]
    pub compound: Compound,
    /// Race position at the end of the lap
    pub position: Option<u32>,
    #[serde(default)]
    pub pit_in: bool,
    #[serde(default)]
    pub pit_out: bool,
    /// Lap time deleted by race control (track limits etc.)
    #[serde(default)]
    pub deleted: bool,
}

impl Lap {
    pub fn is_in_or_out_lap(&self) -> bool {
        self.pit_in || self.pit_out
    }
}

/// Car data sample within a lap
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct TelemetrySample {
    /// Meters traveled from the start line this lap
    pub distance_m: f64,
    /// Seconds since the start of the lap
    pub time_s: f64,
    #[serde(default)]
    pub speed_kph: f64,
    /// Throttle use, 0 to 100
    #[serde(default)]
    pub throttle_pct: f64,
    #[serde(default)]
    pub brake: bool,
    #[serde(default)]
    pub gear: u8,
}

/// Telemetry table for a (driver, lap) pair
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct LapTelemetry {
    pub driver: String,
    pub lap_number: u32,
    pub samples: Vec<TelemetrySample>,
}

/// Classification status as reported by the provider
///
/// The provider reports free text ("Finished", "+1 Lap", "Engine", "Disqualified"...), which
/// is parsed into the variants below and written back unchanged.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum ResultStatus {
    Finished,
    /// Classified but lapped by the leader
    Lapped { laps: u32 },
    Retired { reason: String },
    Disqualified,
    #[default]
    Unknown,
}

impl ResultStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, ResultStatus::Finished)
    }
}

impl From<String> for ResultStatus {
    fn from(value: String) -> Self {
        let status = value.trim();
        if status.is_empty() {
            return ResultStatus::Unknown;
        }
        if status.eq_ignore_ascii_case("finished") {
            return ResultStatus::Finished;
        }
        if status.eq_ignore_ascii_case("disqualified") || status.eq_ignore_ascii_case("dsq") {
            return ResultStatus::Disqualified;
        }
        if let Some(rest) = status.strip_prefix('+') {
            let mut words = rest.split_whitespace();
            if let (Some(count), Some(unit)) = (words.next(), words.next()) {
                if unit.to_ascii_lowercase().starts_with("lap") {
                    if let Ok(laps) = count.parse::<u32>() {
                        return ResultStatus::Lapped { laps };
                    }
                }
            }
        }
        ResultStatus::Retired {
            reason: status.to_string(),
        }
    }
}

impl From<ResultStatus> for String {
    fn from(value: ResultStatus) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultStatus::Finished => write!(f, "Finished"),
            ResultStatus::Lapped { laps: 1 } => write!(f, "+1 Lap"),
            ResultStatus::Lapped { laps } => write!(f, "+{laps} Laps"),
            ResultStatus::Retired { reason } => write!(f, "{reason}"),
            ResultStatus::Disqualified => write!(f, "Disqualified"),
            ResultStatus::Unknown => Ok(()),
        }
    }
}

/// One row of the official classification
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ResultRow {
    /// Driver abbreviation (e.g., "VER")
    pub driver: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub team_name: String,
    /// Provider display color, hex with or without a leading '#'
    pub team_color: Option<String>,
    /// Finishing or qualifying position, absent when not classified
    pub position: Option<u32>,
    /// Starting position, 0 or absent for pit lane starts
    pub grid_position: Option<u32>,
    #[serde(default)]
    pub status: ResultStatus,
    pub points: Option<f64>,
    pub q1_s: Option<f64>,
    pub q2_s: Option<f64>,
    pub q3_s: Option<f64>,
}

/// Weather station sample
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct WeatherSample {
    /// Seconds since the start of the session
    pub time_s: f64,
    pub air_temp_c: f64,
    pub track_temp_c: f64,
    #[serde(default)]
    pub humidity_pct: f64,
    #[serde(default)]
    pub rainfall: bool,
}

/// Fully loaded post-session data
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Session {
    pub key: SessionKey,
    #[serde(default)]
    pub laps: Vec<Lap>,
    #[serde(default)]
    pub telemetry: Vec<LapTelemetry>,
    #[serde(default)]
    pub results: Vec<ResultRow>,
    #[serde(default)]
    pub weather: Vec<WeatherSample>,
    pub track: Option<TrackGeometry>,
}

impl Session {
    pub fn new(key: SessionKey) -> Self {
        Self {
            key,
            laps: Vec::new(),
            telemetry: Vec::new(),
            results: Vec::new(),
            weather: Vec::new(),
            track: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.laps.is_empty() && self.results.is_empty()
    }

    /// Laps of a driver sorted by lap number
    pub fn driver_laps(&self, driver: &str) -> Vec<&Lap> {
        self.laps
            .iter()
            .filter(|lap| lap.driver == driver)
            .sorted_by_key(|lap| lap.lap_number)
            .collect()
    }

    pub fn lap_telemetry(&self, driver: &str, lap_number: u32) -> Option<&LapTelemetry> {
        self.telemetry
            .iter()
            .find(|t| t.driver == driver && t.lap_number == lap_number)
    }

    pub fn result(&self, driver: &str) -> Option<&ResultRow> {
        self.results.iter().find(|r| r.driver == driver)
    }

    /// Drivers in classification order, followed by drivers that only appear in the lap table
    pub fn drivers(&self) -> Vec<&str> {
        self.results
            .iter()
            .map(|r| r.driver.as_str())
            .chain(self.laps.iter().map(|l| l.driver.as_str()))
            .unique()
            .collect()
    }

    pub fn max_lap_number(&self) -> u32 {
        self.laps.iter().map(|l| l.lap_number).max().unwrap_or(0)
    }
}

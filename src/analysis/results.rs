// Display-ready classification rows

use log::debug;
use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::session::{ResultRow, ResultStatus, Session};

/// Format a duration in seconds as `MM:SS.mmm`
pub fn format_lap_time(seconds: f64) -> String {
    let total_ms = (seconds.max(0.) * 1000.).round() as u64;
    let minutes = total_ms / 60_000;
    let remainder_ms = total_ms % 60_000;
    format!(
        "{:02}:{:02}.{:03}",
        minutes,
        remainder_ms / 1000,
        remainder_ms % 1000
    )
}

pub(crate) fn format_optional_lap_time(seconds: Option<f64>, not_set_marker: &str) -> String {
    match seconds {
        Some(seconds) if seconds.is_finite() && seconds >= 0. => format_lap_time(seconds),
        _ => not_set_marker.to_string(),
    }
}

/// Race or sprint classification row
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RaceResult {
    /// Finishing position, or the unclassified marker
    pub position: String,
    pub driver: String,
    pub full_name: String,
    pub team_name: String,
    /// Starting position, or the unclassified marker for pit lane starts
    pub grid_position: String,
    /// `grid - finish`, positive when places were gained
    pub positions_gained: Option<i64>,
    /// Gained/lost column text, with the status appended for drivers without a clean finish
    pub gained_lost: String,
    pub status: String,
    pub points: f64,
}

/// Qualifying classification row
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct QualifyingResult {
    pub position: String,
    pub driver: String,
    pub full_name: String,
    pub team_name: String,
    pub q1: String,
    pub q2: String,
    pub q3: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", content = "rows", rename_all = "snake_case")]
pub enum SessionResults {
    Race(Vec<RaceResult>),
    Qualifying(Vec<QualifyingResult>),
}

impl SessionResults {
    pub fn len(&self) -> usize {
        match self {
            SessionResults::Race(rows) => rows.len(),
            SessionResults::Qualifying(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Turns raw classification rows into display rows
#[derive(Debug, Clone)]
pub struct ResultsProjection {
    unclassified_marker: String,
    not_set_marker: String,
}

impl Default for ResultsProjection {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

impl ResultsProjection {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            unclassified_marker: config.unclassified_marker.clone(),
            not_set_marker: config.not_set_marker.clone(),
        }
    }

    /// Rows in provider classification order, shaped by the session type
    pub fn project(&self, session: &Session) -> SessionResults {
        debug!(
            "Projecting {} result rows for {}",
            session.results.len(),
            session.key
        );
        if session.key.session_type.is_race_like() {
            SessionResults::Race(self.race_results(&session.results))
        } else {
            SessionResults::Qualifying(self.qualifying_results(&session.results))
        }
    }

    pub fn race_results(&self, rows: &[ResultRow]) -> Vec<RaceResult> {
        rows.iter().map(|row| self.race_result(row)).collect()
    }

    pub fn qualifying_results(&self, rows: &[ResultRow]) -> Vec<QualifyingResult> {
        rows.iter()
            .map(|row| QualifyingResult {
                position: self.format_position(row.position),
                driver: row.driver.clone(),
                full_name: row.full_name.clone(),
                team_name: row.team_name.clone(),
                q1: format_optional_lap_time(row.q1_s, &self.not_set_marker),
                q2: format_optional_lap_time(row.q2_s, &self.not_set_marker),
                q3: format_optional_lap_time(row.q3_s, &self.not_set_marker),
            })
            .collect()
    }

    fn race_result(&self, row: &ResultRow) -> RaceResult {
        let grid = row.grid_position.filter(|grid| *grid > 0);
        let positions_gained = grid
            .zip(row.position)
            .map(|(grid, finish)| i64::from(grid) - i64::from(finish));

        let mut gained_lost = positions_gained
            .map(|gained| gained.to_string())
            .unwrap_or_else(|| self.unclassified_marker.clone());
        if !row.status.is_finished() && row.status != ResultStatus::Unknown {
            gained_lost = format!("{} ({})", gained_lost, row.status);
        }

        RaceResult {
            position: self.format_position(row.position),
            driver: row.driver.clone(),
            full_name: row.full_name.clone(),
            team_name: row.team_name.clone(),
            grid_position: self.format_position(grid),
            positions_gained,
            gained_lost,
            status: row.status.to_string(),
            points: row.points.unwrap_or(0.),
        }
    }

    fn format_position(&self, position: Option<u32>) -> String {
        position
            .map(|position| position.to_string())
            .unwrap_or_else(|| self.unclassified_marker.clone())
    }
}

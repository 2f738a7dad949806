// Session analytics: chart-ready projections of the raw session tables
// Every operation borrows the session read-only and degrades to empty output on empty input

pub mod colors;
pub mod lap_filter;
pub mod positions;
pub mod results;
pub mod stints;
pub mod summary;
pub mod telemetry_delta;

use std::fmt;

use serde::Serialize;

use crate::session::Compound;

pub use colors::{DriverColor, DriverColorAssignment, assign_colors, session_colors};
pub use lap_filter::{BestLap, LapFilter, LapTimePoint, best_laps, fastest_lap};
pub use positions::{DriverPositions, PositionPoint, reconstruct_positions};
pub use results::{
    QualifyingResult, RaceResult, ResultsProjection, SessionResults, format_lap_time,
};
pub use stints::{
    DriverStints, Stint, StintBar, StintChart, StintSegmentation, segment_stints, stint_chart,
};
pub use summary::{SessionSummary, WeatherSummary, summarize, summarize_weather};
pub use telemetry_delta::{
    DeltaPoint, TelemetryDelta, TelemetryTrace, align_delta, fastest_lap_delta, fastest_lap_traces,
};

/// Provider data that breaks an assumption of the analysis
///
/// The analysis carries on with a best-effort interpretation and reports what it found next to
/// its result.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityWarning {
    /// Compound changed without the stint index changing, laps were grouped by stint index
    CompoundChangedWithinStint {
        driver: String,
        stint: u32,
        compounds: Vec<Compound>,
    },
    /// Lap has no stint index and is not part of any stint
    MissingStint { driver: String, lap_number: u32 },
    /// Telemetry samples whose distance did not increase were dropped before interpolation
    NonIncreasingDistance {
        driver: String,
        dropped_samples: usize,
    },
}

impl fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataQualityWarning::CompoundChangedWithinStint {
                driver,
                stint,
                compounds,
            } => write!(
                f,
                "{driver}: compound changed within stint {stint} ({compounds:?})"
            ),
            DataQualityWarning::MissingStint { driver, lap_number } => {
                write!(f, "{driver}: lap {lap_number} has no stint index")
            }
            DataQualityWarning::NonIncreasingDistance {
                driver,
                dropped_samples,
            } => write!(
                f,
                "{driver}: dropped {dropped_samples} telemetry samples with non-increasing distance"
            ),
        }
    }
}

// Session overview: size of the tables and weather extremes

use itertools::{Itertools, MinMaxResult};
use serde::Serialize;

use crate::session::{Session, SessionKey, WeatherSample};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct WeatherSummary {
    pub min_air_temp_c: f64,
    pub max_air_temp_c: f64,
    pub min_track_temp_c: f64,
    pub max_track_temp_c: f64,
    pub rainfall: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub key: SessionKey,
    pub drivers: usize,
    pub laps: usize,
    pub max_lap: u32,
    pub telemetry_laps: usize,
    pub has_track_geometry: bool,
    /// None when the provider has no weather samples
    pub weather: Option<WeatherSummary>,
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    match values.filter(|v| v.is_finite()).minmax_by(f64::total_cmp) {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(v) => Some((v, v)),
        MinMaxResult::MinMax(min, max) => Some((min, max)),
    }
}

pub fn summarize_weather(samples: &[WeatherSample]) -> Option<WeatherSummary> {
    let (min_air_temp_c, max_air_temp_c) = min_max(samples.iter().map(|s| s.air_temp_c))?;
    let (min_track_temp_c, max_track_temp_c) = min_max(samples.iter().map(|s| s.track_temp_c))?;
    Some(WeatherSummary {
        min_air_temp_c,
        max_air_temp_c,
        min_track_temp_c,
        max_track_temp_c,
        rainfall: samples.iter().any(|s| s.rainfall),
    })
}

pub fn summarize(session: &Session) -> SessionSummary {
    SessionSummary {
        key: session.key.clone(),
        drivers: session.drivers().len(),
        laps: session.laps.len(),
        max_lap: session.max_lap_number(),
        telemetry_laps: session.telemetry.len(),
        has_track_geometry: session.track.is_some(),
        weather: summarize_weather(&session.weather),
    }
}

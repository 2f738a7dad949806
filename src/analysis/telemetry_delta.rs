// Distance-domain comparison of two laps

use log::{debug, warn};
use serde::Serialize;

use crate::session::{LapTelemetry, Session, TelemetrySample};

use super::DataQualityWarning;
use super::lap_filter::fastest_lap;

/// Time gap at one distance of the reference lap
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct DeltaPoint {
    pub distance_m: f64,
    pub reference_time_s: f64,
    /// Comparison lap time interpolated at `distance_m`
    pub comparison_time_s: f64,
    /// Positive when the comparison driver is behind the reference driver
    pub delta_s: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct TelemetryDelta {
    pub reference_driver: String,
    pub comparison_driver: String,
    /// One point per reference sample, empty when either lap has no samples
    pub points: Vec<DeltaPoint>,
    pub warnings: Vec<DataQualityWarning>,
}

/// Compare two laps on the reference lap's distance axis
///
/// The comparison lap's elapsed time is linearly interpolated at every reference distance and
/// clamped to its first and last sample outside the distance range it covers.
pub fn align_delta(reference: &LapTelemetry, comparison: &LapTelemetry) -> TelemetryDelta {
    let mut delta = TelemetryDelta {
        reference_driver: reference.driver.clone(),
        comparison_driver: comparison.driver.clone(),
        ..TelemetryDelta::default()
    };

    let (axis, dropped_samples) = interpolation_axis(&comparison.samples);
    if dropped_samples > 0 {
        warn!(
            "{}: dropped {} telemetry samples with non-increasing distance",
            comparison.driver, dropped_samples
        );
        delta.warnings.push(DataQualityWarning::NonIncreasingDistance {
            driver: comparison.driver.clone(),
            dropped_samples,
        });
    }

    if reference.samples.is_empty() || axis.is_empty() {
        debug!(
            "No delta between {} ({} samples) and {} ({} usable samples)",
            reference.driver,
            reference.samples.len(),
            comparison.driver,
            axis.len()
        );
        return delta;
    }

    delta.points = reference
        .samples
        .iter()
        .map(|sample| {
            let comparison_time_s = interpolate(&axis, sample.distance_m);
            DeltaPoint {
                distance_m: sample.distance_m,
                reference_time_s: sample.time_s,
                comparison_time_s,
                delta_s: comparison_time_s - sample.time_s,
            }
        })
        .collect();
    debug!(
        "Aligned {} on {} over {} points",
        comparison.driver,
        reference.driver,
        delta.points.len()
    );
    delta
}

/// (distance, time) pairs with strictly increasing distance, and the number of samples dropped
fn interpolation_axis(samples: &[TelemetrySample]) -> (Vec<(f64, f64)>, usize) {
    let mut axis: Vec<(f64, f64)> = Vec::with_capacity(samples.len());
    let mut dropped = 0;
    for sample in samples {
        let increasing = axis
            .last()
            .is_none_or(|(last_distance, _)| sample.distance_m > *last_distance);
        if sample.distance_m.is_finite() && sample.time_s.is_finite() && increasing {
            axis.push((sample.distance_m, sample.time_s));
        } else {
            dropped += 1;
        }
    }
    (axis, dropped)
}

/// Piecewise-linear lookup on a non-empty, strictly increasing axis
fn interpolate(axis: &[(f64, f64)], distance: f64) -> f64 {
    if !distance.is_finite() {
        return f64::NAN;
    }
    let (first_distance, first_time) = axis[0];
    let (last_distance, last_time) = axis[axis.len() - 1];
    if distance <= first_distance {
        return first_time;
    }
    if distance >= last_distance {
        return last_time;
    }

    // first_distance < distance < last_distance, so 0 < upper < len
    let upper = axis.partition_point(|(d, _)| *d < distance);
    let (d1, t1) = axis[upper];
    let (d0, t0) = axis[upper - 1];
    t0 + (t1 - t0) * (distance - d0) / (d1 - d0)
}

/// Fastest lap telemetry of a driver
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TelemetryTrace {
    pub driver: String,
    pub lap_number: u32,
    pub lap_time_s: Option<f64>,
    pub samples: Vec<TelemetrySample>,
}

fn fastest_lap_telemetry<'a>(session: &'a Session, driver: &str) -> Option<&'a LapTelemetry> {
    let lap = fastest_lap(session.driver_laps(driver))?;
    let telemetry = session.lap_telemetry(driver, lap.lap_number);
    if telemetry.is_none() {
        warn!("{}: no telemetry for fastest lap {}", driver, lap.lap_number);
    }
    telemetry
}

/// Speed, throttle and brake traces of the fastest lap of each driver
///
/// At most `max_drivers` drivers are compared, further drivers are ignored. Drivers without a
/// timed lap or without telemetry for it are left out.
pub fn fastest_lap_traces(
    session: &Session,
    drivers: &[String],
    max_drivers: usize,
) -> Vec<TelemetryTrace> {
    if drivers.len() > max_drivers {
        warn!(
            "Comparing the first {} of {} requested drivers",
            max_drivers,
            drivers.len()
        );
    }

    drivers
        .iter()
        .take(max_drivers)
        .filter_map(|driver| {
            let telemetry = fastest_lap_telemetry(session, driver)?;
            let lap_time_s = session
                .driver_laps(driver)
                .into_iter()
                .find(|lap| lap.lap_number == telemetry.lap_number)
                .and_then(|lap| lap.lap_time_s);
            Some(TelemetryTrace {
                driver: driver.clone(),
                lap_number: telemetry.lap_number,
                lap_time_s,
                samples: telemetry.samples.clone(),
            })
        })
        .collect()
}

/// Delta between the fastest laps of two drivers, empty when either lap has no telemetry
pub fn fastest_lap_delta(session: &Session, reference: &str, comparison: &str) -> TelemetryDelta {
    match (
        fastest_lap_telemetry(session, reference),
        fastest_lap_telemetry(session, comparison),
    ) {
        (Some(reference), Some(comparison)) => align_delta(reference, comparison),
        _ => TelemetryDelta {
            reference_driver: reference.to_string(),
            comparison_driver: comparison.to_string(),
            ..TelemetryDelta::default()
        },
    }
}

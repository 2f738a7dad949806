use log::debug;
use serde::Serialize;

use crate::config::DEFAULT_QUICKLAP_THRESHOLD;
use crate::errors::PaddockError;
use crate::session::{Compound, Lap, Session};

use super::results::format_optional_lap_time;

/// Keeps the laps that are representative of a driver's pace
///
/// A lap is representative when it has a time, is neither an in lap nor an out lap, was not
/// deleted, and is no slower than `threshold` times the fastest such lap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LapFilter {
    threshold: f64,
}

impl Default for LapFilter {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_QUICKLAP_THRESHOLD,
        }
    }
}

impl LapFilter {
    pub fn new(threshold: f64) -> Result<Self, PaddockError> {
        if !threshold.is_finite() || threshold <= 1.0 {
            return Err(PaddockError::InvalidThreshold { threshold });
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Representative laps, in input order. Empty when no lap qualifies
    pub fn quick_laps<'a, I>(&self, laps: I) -> Vec<&'a Lap>
    where
        I: IntoIterator<Item = &'a Lap>,
    {
        let candidates = laps
            .into_iter()
            .filter(|lap| is_candidate(lap))
            .collect::<Vec<_>>();

        let Some(fastest) = candidates.iter().filter_map(|lap| lap.lap_time_s).reduce(f64::min)
        else {
            debug!("No timed laps left to filter");
            return Vec::new();
        };

        let limit = fastest * self.threshold;
        let quick_laps = candidates
            .into_iter()
            .filter(|lap| lap.lap_time_s.is_some_and(|time| time <= limit))
            .collect::<Vec<_>>();
        debug!(
            "Kept {} laps within {:.3}s ({}x {:.3}s)",
            quick_laps.len(),
            limit,
            self.threshold,
            fastest
        );
        quick_laps
    }

    /// Lap time scatter series of a driver's representative laps
    pub fn lap_time_series(&self, session: &Session, driver: &str) -> Vec<LapTimePoint> {
        self.quick_laps(session.driver_laps(driver))
            .into_iter()
            .filter_map(|lap| {
                lap.lap_time_s.map(|lap_time_s| LapTimePoint {
                    lap_number: lap.lap_number,
                    lap_time_s,
                    lap_time_min: lap_time_s / 60.,
                    compound: lap.compound,
                })
            })
            .collect()
    }
}

fn has_valid_time(lap: &Lap) -> bool {
    lap.lap_time_s
        .is_some_and(|time| time.is_finite() && time > 0.)
}

fn is_candidate(lap: &Lap) -> bool {
    !lap.deleted && !lap.is_in_or_out_lap() && has_valid_time(lap)
}

/// Fastest lap that has a valid, non-deleted time
pub fn fastest_lap<'a, I>(laps: I) -> Option<&'a Lap>
where
    I: IntoIterator<Item = &'a Lap>,
{
    laps.into_iter()
        .filter(|lap| !lap.deleted && has_valid_time(lap))
        .min_by(|a, b| a.lap_time_s.partial_cmp(&b.lap_time_s).unwrap_or(std::cmp::Ordering::Equal))
}

/// Point of the lap time scatter chart
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LapTimePoint {
    pub lap_number: u32,
    pub lap_time_s: f64,
    pub lap_time_min: f64,
    pub compound: Compound,
}

/// Fastest lap of a driver, formatted for display
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BestLap {
    pub driver: String,
    pub lap_number: Option<u32>,
    pub lap_time_s: Option<f64>,
    /// `MM:SS.mmm`, or the not set marker when the driver has no valid lap
    pub formatted: String,
}

pub fn best_laps(session: &Session, drivers: &[String], not_set_marker: &str) -> Vec<BestLap> {
    drivers
        .iter()
        .map(|driver| {
            let best = fastest_lap(session.driver_laps(driver));
            let lap_time_s = best.and_then(|lap| lap.lap_time_s);
            BestLap {
                driver: driver.clone(),
                lap_number: best.map(|lap| lap.lap_number),
                lap_time_s,
                formatted: format_optional_lap_time(lap_time_s, not_set_marker),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{SessionKey, SessionType};
    use proptest::prelude::*;

    fn lap(lap_number: u32, lap_time_s: Option<f64>) -> Lap {
        Lap {
            driver: "LEC".to_string(),
            lap_number,
            lap_time_s,
            compound: Compound::Medium,
            ..Lap::default()
        }
    }

    fn lap_numbers(laps: &[&Lap]) -> Vec<u32> {
        laps.iter().map(|lap| lap.lap_number).collect()
    }

    #[test]
    fn test_invalid_thresholds_are_rejected() {
        assert!(LapFilter::new(1.0).is_err());
        assert!(LapFilter::new(0.5).is_err());
        assert!(LapFilter::new(f64::NAN).is_err());
        assert!(LapFilter::new(f64::INFINITY).is_err());
        assert_eq!(LapFilter::new(1.07).unwrap(), LapFilter::default());
    }

    #[test]
    fn test_slow_untimed_and_pit_laps_are_excluded() {
        let mut out_lap = lap(1, Some(100.0));
        out_lap.pit_out = true;
        let mut in_lap = lap(5, Some(101.0));
        in_lap.pit_in = true;
        let laps = vec![
            out_lap,
            lap(2, Some(90.0)),
            lap(3, None),
            lap(4, Some(97.0)), // 107.7% of 90
            in_lap,
            lap(6, Some(96.0)),
        ];

        let quick = LapFilter::default().quick_laps(&laps);
        assert_eq!(lap_numbers(&quick), vec![2, 6]);
    }

    #[test]
    fn test_deleted_laps_do_not_set_the_reference() {
        let mut deleted = lap(1, Some(80.0));
        deleted.deleted = true;
        let laps = vec![deleted, lap(2, Some(90.0)), lap(3, Some(92.0))];

        let quick = LapFilter::default().quick_laps(&laps);
        assert_eq!(lap_numbers(&quick), vec![2, 3]);
    }

    #[test]
    fn test_no_timed_laps_is_empty() {
        let laps = vec![lap(1, None), lap(2, None)];
        assert!(LapFilter::default().quick_laps(&laps).is_empty());
        assert!(LapFilter::default().quick_laps(&Vec::<Lap>::new()).is_empty());
    }

    #[test]
    fn test_lap_time_series_and_best_lap() {
        let mut session = Session::new(SessionKey::new(2024, "Test", SessionType::Race));
        session.laps = vec![lap(2, Some(91.5)), lap(1, Some(90.0)), lap(3, Some(120.0))];

        let series = LapFilter::default().lap_time_series(&session, "LEC");
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].lap_number, 1);
        assert_eq!(series[0].lap_time_min, 1.5);
        assert_eq!(series[1].compound, Compound::Medium);

        let best = best_laps(&session, &["LEC".to_string(), "XXX".to_string()], "N/A");
        assert_eq!(best[0].lap_number, Some(1));
        assert_eq!(best[0].formatted, "01:30.000");
        assert_eq!(best[1].lap_time_s, None);
        assert_eq!(best[1].formatted, "N/A");
    }

    fn laps_strategy() -> impl Strategy<Value = Vec<Lap>> {
        prop::collection::vec(
            (prop::option::weighted(0.9, 80.0f64..140.0), any::<bool>(), any::<bool>(), any::<bool>()),
            0..40,
        )
        .prop_map(|entries| {
            entries
                .into_iter()
                .enumerate()
                .map(|(i, (time, pit_in, pit_out, deleted))| Lap {
                    pit_in: pit_in && i % 7 == 0,
                    pit_out: pit_out && i % 5 == 0,
                    deleted: deleted && i % 11 == 0,
                    ..lap(i as u32 + 1, time)
                })
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_quick_laps_monotonic_in_threshold(
            laps in laps_strategy(),
            low in 1.001f64..1.5,
            extra in 0.0f64..1.0,
        ) {
            let narrow = LapFilter::new(low).unwrap().quick_laps(&laps);
            let wide = LapFilter::new(low + extra).unwrap().quick_laps(&laps);
            let wide_numbers = lap_numbers(&wide);
            for lap in narrow {
                prop_assert!(wide_numbers.contains(&lap.lap_number));
            }
        }

        #[test]
        fn prop_quick_laps_always_timed_and_representative(
            laps in laps_strategy(),
            threshold in 1.001f64..2.0,
        ) {
            for lap in LapFilter::new(threshold).unwrap().quick_laps(&laps) {
                prop_assert!(lap.lap_time_s.is_some());
                prop_assert!(!lap.is_in_or_out_lap());
                prop_assert!(!lap.deleted);
            }
        }
    }
}

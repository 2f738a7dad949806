// Lap by lap race positions, starting from the grid

use std::cmp::Reverse;

use itertools::Itertools;
use log::{debug, warn};
use serde::Serialize;

use crate::session::Session;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionPoint {
    /// Lap number, 0 is the starting grid
    pub lap: u32,
    /// Position at the end of the lap, None when the provider did not record one
    pub position: Option<u32>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DriverPositions {
    pub driver: String,
    /// Whether the driver has a final position in the official classification
    pub classified: bool,
    /// Points ordered by lap, starting at lap 0
    pub points: Vec<PositionPoint>,
}

impl DriverPositions {
    fn last_recorded(&self) -> Option<PositionPoint> {
        self.points
            .iter()
            .rev()
            .find(|point| point.position.is_some())
            .copied()
    }
}

/// Position series of every driver of a race or sprint
///
/// Classified drivers come first in finishing order. Drivers without a final position follow,
/// ordered by how far into the race they were last seen and then by their position at that
/// point. Other session types have no position chart and yield an empty result.
pub fn reconstruct_positions(session: &Session) -> Vec<DriverPositions> {
    if !session.key.session_type.is_race_like() {
        debug!("No position chart for session {}", session.key);
        return Vec::new();
    }

    let classified_drivers = session
        .results
        .iter()
        .filter_map(|row| row.position.map(|position| (position, row.driver.as_str())))
        .sorted_by_key(|(position, _)| *position)
        .map(|(_, driver)| driver)
        .collect::<Vec<_>>();

    let mut classified = Vec::new();
    let mut unclassified = Vec::new();
    for driver in session.drivers() {
        let is_classified = classified_drivers.contains(&driver);
        let positions = DriverPositions {
            driver: driver.to_string(),
            classified: is_classified,
            points: driver_positions(session, driver),
        };
        if is_classified {
            classified.push(positions);
        } else {
            unclassified.push(positions);
        }
    }

    classified.sort_by_key(|positions| {
        classified_drivers
            .iter()
            .position(|driver| *driver == positions.driver)
    });
    unclassified.sort_by_key(|positions| {
        let last = positions.last_recorded();
        (
            Reverse(last.map(|point| point.lap)),
            last.and_then(|point| point.position).unwrap_or(u32::MAX),
        )
    });

    debug!(
        "Reconstructed positions for {} classified and {} unclassified drivers",
        classified.len(),
        unclassified.len()
    );
    classified.extend(unclassified);
    classified
}

fn driver_positions(session: &Session, driver: &str) -> Vec<PositionPoint> {
    let laps = session
        .driver_laps(driver)
        .into_iter()
        .filter(|lap| lap.lap_number > 0)
        .collect::<Vec<_>>();

    // Pit lane starters have grid position 0, they start from wherever they were after lap 1
    let grid_position = session
        .result(driver)
        .and_then(|row| row.grid_position)
        .filter(|grid| *grid > 0);
    let start_position = grid_position.or_else(|| {
        laps.iter()
            .find(|lap| lap.lap_number == 1)
            .and_then(|lap| lap.position)
    });
    if start_position.is_none() {
        warn!("{}: no grid position and no position after lap 1", driver);
    }

    std::iter::once(PositionPoint {
        lap: 0,
        position: start_position,
    })
    .chain(laps.iter().map(|lap| PositionPoint {
        lap: lap.lap_number,
        position: lap.position,
    }))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Lap, ResultRow, SessionKey, SessionType};
    use proptest::prelude::*;

    fn result(driver: &str, grid: Option<u32>, position: Option<u32>) -> ResultRow {
        ResultRow {
            driver: driver.to_string(),
            grid_position: grid,
            position,
            ..ResultRow::default()
        }
    }

    fn laps(driver: &str, positions: &[Option<u32>]) -> Vec<Lap> {
        positions
            .iter()
            .enumerate()
            .map(|(i, position)| Lap {
                driver: driver.to_string(),
                lap_number: i as u32 + 1,
                position: *position,
                ..Lap::default()
            })
            .collect()
    }

    fn race(results: Vec<ResultRow>, laps: Vec<Lap>) -> Session {
        let mut session = Session::new(SessionKey::new(2024, "Test", SessionType::Race));
        session.results = results;
        session.laps = laps;
        session
    }

    fn start(positions: &DriverPositions) -> Option<u32> {
        positions.points[0].position
    }

    #[test]
    fn test_grid_is_lap_zero() {
        let session = race(
            vec![result("AAA", Some(3), Some(1)), result("BBB", Some(1), Some(2))],
            [
                laps("AAA", &[Some(2), Some(1)]),
                laps("BBB", &[Some(1), Some(2)]),
            ]
            .concat(),
        );

        let positions = reconstruct_positions(&session);
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0].driver, "AAA");
        assert_eq!(
            positions[0].points,
            vec![
                PositionPoint { lap: 0, position: Some(3) },
                PositionPoint { lap: 1, position: Some(2) },
                PositionPoint { lap: 2, position: Some(1) },
            ]
        );
        assert_eq!(start(&positions[1]), Some(1));
    }

    #[test]
    fn test_pit_lane_start_uses_lap_one() {
        let session = race(
            vec![result("PIT", Some(0), Some(15)), result("MIS", None, Some(16))],
            [
                laps("PIT", &[Some(19), Some(17)]),
                laps("MIS", &[Some(20), Some(18)]),
            ]
            .concat(),
        );

        let positions = reconstruct_positions(&session);
        assert_eq!(start(&positions[0]), Some(19));
        assert_eq!(start(&positions[1]), Some(20));
    }

    #[test]
    fn test_no_start_information_is_unavailable() {
        let session = race(vec![result("NON", None, Some(1))], laps("NON", &[None, Some(1)]));
        let positions = reconstruct_positions(&session);
        assert_eq!(start(&positions[0]), None);
        assert_eq!(positions[0].points.len(), 3);
    }

    #[test]
    fn test_unclassified_drivers_follow_classified() {
        let session = race(
            vec![
                result("EARLY", Some(1), None),
                result("WIN", Some(4), Some(1)),
                result("LATE", Some(2), None),
                result("SECOND", Some(3), Some(2)),
            ],
            [
                laps("EARLY", &[Some(1)]),
                laps("WIN", &[Some(3), Some(2), Some(1)]),
                laps("LATE", &[Some(2), Some(3)]),
                laps("SECOND", &[Some(4), Some(1), Some(2)]),
                laps("GHOST", &[Some(5)]),
            ]
            .concat(),
        );

        let positions = reconstruct_positions(&session);
        let order = positions.iter().map(|p| p.driver.as_str()).collect::<Vec<_>>();
        assert_eq!(order, vec!["WIN", "SECOND", "LATE", "EARLY", "GHOST"]);
        assert!(positions[1].classified);
        assert!(!positions[2].classified);
    }

    #[test]
    fn test_qualifying_has_no_position_chart() {
        let mut session = race(vec![result("AAA", Some(1), Some(1))], laps("AAA", &[Some(1)]));
        session.key.session_type = SessionType::Qualifying;
        assert!(reconstruct_positions(&session).is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_lap_zero_follows_grid_rule(
            grid in prop::option::of(0u32..21),
            lap_positions in prop::collection::vec(prop::option::of(1u32..21), 1..10),
        ) {
            let session = race(vec![result("DRV", grid, Some(1))], laps("DRV", &lap_positions));
            let positions = reconstruct_positions(&session);
            let expected = match grid {
                Some(grid) if grid > 0 => Some(grid),
                _ => lap_positions[0],
            };
            prop_assert_eq!(start(&positions[0]), expected);
            prop_assert_eq!(positions[0].points.len(), lap_positions.len() + 1);
        }
    }
}

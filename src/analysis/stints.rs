// Tyre stint segmentation and the stacked stint chart

use itertools::Itertools;
use log::{debug, warn};
use serde::Serialize;

use crate::session::{Compound, Lap, Session};

use super::DataQualityWarning;

/// Consecutive laps of a driver on one set of tyres
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Stint {
    pub driver: String,
    pub stint: u32,
    pub compound: Compound,
    /// Number of laps in the stint
    pub length: u32,
}

#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct StintSegmentation {
    /// Stints in increasing stint index order
    pub stints: Vec<Stint>,
    pub warnings: Vec<DataQualityWarning>,
}

/// Group a driver's laps into stints by stint index
///
/// Laps of other drivers are ignored. When the compound changes inside a stint index the
/// stint keeps the compound of its first lap and a warning is reported.
pub fn segment_stints<'a, I>(driver: &str, laps: I) -> StintSegmentation
where
    I: IntoIterator<Item = &'a Lap>,
{
    let mut warnings = Vec::new();
    let mut stint_laps = Vec::new();
    for lap in laps.into_iter().filter(|lap| lap.driver == driver) {
        match lap.stint {
            Some(stint) => stint_laps.push((stint, lap)),
            None => {
                warn!("{}: lap {} has no stint index", driver, lap.lap_number);
                warnings.push(DataQualityWarning::MissingStint {
                    driver: driver.to_string(),
                    lap_number: lap.lap_number,
                });
            }
        }
    }
    stint_laps.sort_by_key(|(stint, lap)| (*stint, lap.lap_number));

    let mut stints = Vec::new();
    for (stint, group) in &stint_laps.iter().chunk_by(|(stint, _)| *stint) {
        let group = group.map(|(_, lap)| *lap).collect::<Vec<_>>();
        let compounds = group.iter().map(|lap| lap.compound).unique().collect::<Vec<_>>();
        if compounds.len() > 1 {
            warn!(
                "{}: compound changed within stint {} ({:?})",
                driver, stint, compounds
            );
            warnings.push(DataQualityWarning::CompoundChangedWithinStint {
                driver: driver.to_string(),
                stint,
                compounds: compounds.clone(),
            });
        }
        stints.push(Stint {
            driver: driver.to_string(),
            stint,
            compound: compounds.first().copied().unwrap_or_default(),
            length: group.len() as u32,
        });
    }

    StintSegmentation { stints, warnings }
}

/// Stint drawn as a bar starting where the previous one ended
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StintBar {
    #[serde(flatten)]
    pub stint: Stint,
    /// Laps completed in earlier stints
    pub start: u32,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DriverStints {
    pub driver: String,
    /// Sum of stint lengths, the length of the driver's bar
    pub total_laps: u32,
    pub bars: Vec<StintBar>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct StintChart {
    /// Drivers in finishing order, unclassified drivers last
    pub drivers: Vec<DriverStints>,
    /// Highest lap number of the session, the extent of the lap axis
    pub max_lap: u32,
    pub warnings: Vec<DataQualityWarning>,
}

/// Stacked stint bars for every driver of the session
pub fn stint_chart(session: &Session) -> StintChart {
    let mut chart = StintChart {
        max_lap: session.max_lap_number(),
        ..StintChart::default()
    };

    for driver in finishing_order(session) {
        let segmentation = segment_stints(driver, &session.laps);
        chart.warnings.extend(segmentation.warnings);

        let mut start = 0;
        let bars = segmentation
            .stints
            .into_iter()
            .map(|stint| {
                let bar = StintBar { start, stint };
                start += bar.stint.length;
                bar
            })
            .collect::<Vec<_>>();

        chart.drivers.push(DriverStints {
            driver: driver.to_string(),
            total_laps: start,
            bars,
        });
    }

    debug!(
        "Built stint chart for {} drivers over {} laps",
        chart.drivers.len(),
        chart.max_lap
    );
    chart
}

/// Classified drivers by position, then unclassified drivers, then drivers missing from results
fn finishing_order(session: &Session) -> Vec<&str> {
    session
        .results
        .iter()
        .sorted_by_key(|row| (row.position.is_none(), row.position))
        .map(|row| row.driver.as_str())
        .chain(session.drivers())
        .unique()
        .collect()
}

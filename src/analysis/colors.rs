// Display color per driver, unique within a session

use std::collections::{HashMap, HashSet};

use log::debug;
use serde::Serialize;

use crate::session::Session;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DriverColor {
    pub driver: String,
    /// `#RRGGBB`
    pub color: String,
}

/// Driver colors in assignment order
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct DriverColorAssignment {
    pub colors: Vec<DriverColor>,
}

impl DriverColorAssignment {
    pub fn get(&self, driver: &str) -> Option<&str> {
        self.colors
            .iter()
            .find(|c| c.driver == driver)
            .map(|c| c.color.as_str())
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Uppercase `#RRGGBB` form, so "1e90ff" and "#1E90FF" compare equal
fn normalize_color(color: &str) -> String {
    format!("#{}", color.trim().trim_start_matches('#').to_uppercase())
}

/// Give every driver its palette color unless an earlier driver already holds it
///
/// Drivers are processed in order. A driver whose color is taken, or who has no palette
/// entry, gets `fallback`; the driver that claimed the color first keeps it.
pub fn assign_colors<S: AsRef<str>>(
    drivers: &[S],
    palette: &HashMap<String, String>,
    fallback: &str,
) -> DriverColorAssignment {
    let fallback = normalize_color(fallback);
    let mut used = HashSet::new();
    let mut assignment = DriverColorAssignment::default();

    for driver in drivers {
        let driver = driver.as_ref();
        let mut color = palette
            .get(driver)
            .map(|color| normalize_color(color))
            .unwrap_or_else(|| fallback.clone());
        if used.contains(&color) {
            debug!("{}: color {} already taken, using {}", driver, color, fallback);
            color = fallback.clone();
        }
        used.insert(color.clone());
        assignment.colors.push(DriverColor {
            driver: driver.to_string(),
            color,
        });
    }
    assignment
}

/// Colors for every driver of the session, in classification order, from the team colors
pub fn session_colors(session: &Session, fallback: &str) -> DriverColorAssignment {
    let palette = session
        .results
        .iter()
        .filter_map(|row| {
            row.team_color
                .as_ref()
                .map(|color| (row.driver.clone(), color.clone()))
        })
        .collect::<HashMap<_, _>>();
    assign_colors(&session.drivers(), &palette, fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{ResultRow, SessionKey, SessionType};

    fn palette(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(driver, color)| (driver.to_string(), color.to_string()))
            .collect()
    }

    #[test]
    fn test_second_driver_with_same_color_gets_fallback() {
        let palette = palette(&[("ALO", "#1E90FF"), ("STR", "#1E90FF")]);
        let colors = assign_colors(&["ALO", "STR"], &palette, "#808080");

        assert_eq!(colors.get("ALO"), Some("#1E90FF"));
        assert_eq!(colors.get("STR"), Some("#808080"));
    }

    #[test]
    fn test_collisions_ignore_case_and_hash_prefix() {
        let palette = palette(&[("VER", "3671c6"), ("PER", "#3671C6"), ("HAM", "27F4D2")]);
        let colors = assign_colors(&["VER", "PER", "HAM"], &palette, "808080");

        assert_eq!(colors.get("VER"), Some("#3671C6"));
        assert_eq!(colors.get("PER"), Some("#808080"));
        assert_eq!(colors.get("HAM"), Some("#27F4D2"));
        assert_eq!(colors.len(), 3);
    }

    #[test]
    fn test_driver_without_palette_entry_gets_fallback() {
        let colors = assign_colors(&["NEW"], &HashMap::new(), "#808080");
        assert_eq!(colors.get("NEW"), Some("#808080"));
        assert_eq!(colors.get("OLD"), None);
    }

    #[test]
    fn test_no_drivers() {
        let colors = assign_colors::<&str>(&[], &HashMap::new(), "#808080");
        assert!(colors.is_empty());
    }

    #[test]
    fn test_session_colors_follow_classification() {
        let mut session = Session::new(SessionKey::new(2024, "Test", SessionType::Race));
        session.results = vec![
            ResultRow {
                driver: "LEC".to_string(),
                team_color: Some("E8002D".to_string()),
                ..ResultRow::default()
            },
            ResultRow {
                driver: "SAI".to_string(),
                team_color: Some("E8002D".to_string()),
                ..ResultRow::default()
            },
        ];

        let colors = session_colors(&session, "#808080");
        assert_eq!(colors.colors[0].driver, "LEC");
        assert_eq!(colors.get("LEC"), Some("#E8002D"));
        assert_eq!(colors.get("SAI"), Some("#808080"));
    }
}

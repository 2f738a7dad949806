use std::{
    io::{self, Write},
    path::PathBuf,
};

use log::info;
use paddock::PaddockError;
use serde::Serialize;

/// Print rows as a pretty JSON array, or write them as JSON lines when an output file is given
pub fn emit<T: Serialize>(rows: &[T], output: Option<&PathBuf>) -> Result<(), PaddockError> {
    match output {
        Some(file) => {
            serde_jsonlines::write_json_lines(file, rows)
                .map_err(|e| PaddockError::WriterError { source: e })?;
            info!("Wrote {} rows to {:?}", rows.len(), file);
            Ok(())
        }
        None => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, rows)
                .map_err(|e| PaddockError::OutputSerializeError { source: e })?;
            writeln!(stdout).map_err(|e| PaddockError::WriterError { source: e })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paddock::analysis::{StintChart, TelemetryDelta};
    use paddock::session::SessionKey;
    use paddock::{Session, SessionType};
    use tempfile::TempDir;

    #[test]
    fn test_rows_are_written_as_json_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("colors.jsonl");

        let session = Session::new(SessionKey::new(2024, "Test", SessionType::Race));
        let rows = vec![
            paddock::analysis::session_colors(&session, "#808080"),
            paddock::analysis::assign_colors(
                &["VER"],
                &[("VER".to_string(), "3671C6".to_string())].into(),
                "#808080",
            ),
        ];
        emit(&rows, Some(&path)).unwrap();

        let lines = serde_jsonlines::json_lines::<serde_json::Value, _>(&path)
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["colors"][0]["color"], "#3671C6");
    }

    #[test]
    fn test_whole_chart_and_delta_reach_the_output() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stints.jsonl");

        let chart = StintChart {
            max_lap: 57,
            ..StintChart::default()
        };
        emit(&[chart], Some(&path)).unwrap();
        let lines = serde_jsonlines::json_lines::<serde_json::Value, _>(&path)
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(lines[0]["max_lap"], 57);
        assert!(lines[0]["warnings"].as_array().unwrap().is_empty());

        let path = temp_dir.path().join("delta.jsonl");
        let delta = TelemetryDelta {
            reference_driver: "VER".to_string(),
            comparison_driver: "HAM".to_string(),
            ..TelemetryDelta::default()
        };
        emit(&[delta], Some(&path)).unwrap();
        let lines = serde_jsonlines::json_lines::<serde_json::Value, _>(&path)
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(lines[0]["comparison_driver"], "HAM");
        assert!(lines[0]["warnings"].is_array());
    }

    #[test]
    fn test_unwritable_output_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("out.jsonl");

        assert!(matches!(
            emit(&[1, 2, 3], Some(&path)),
            Err(PaddockError::WriterError { .. })
        ));
    }
}

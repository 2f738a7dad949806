// Error types for paddock

use snafu::Snafu;
use std::io;

#[derive(Debug, Snafu)]
pub enum PaddockError {
    // Errors for the session provider
    #[snafu(display("No session snapshot found at {path}"))]
    SessionNotFound { path: String },
    #[snafu(display("Error reading session snapshot"))]
    SessionLoaderError { source: io::Error },
    #[snafu(display("Error parsing session snapshot"))]
    SessionParseError { source: serde_json::Error },
    #[snafu(display("Session {key} has no laps and no results"))]
    EmptySession { key: String },
    #[snafu(display("Snapshot for {requested} holds session {found}"))]
    SessionKeyMismatch { requested: String, found: String },

    // Analysis parameter errors
    #[snafu(display("Invalid quick lap threshold {threshold}: must be a finite value above 1.0"))]
    InvalidThreshold { threshold: f64 },

    // Config management errors
    #[snafu(display("Could not find application data directory"))]
    NoConfigDir,
    #[snafu(display("Error reading or writing config file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerializeError { source: serde_json::Error },

    // Errors for the output writer
    #[snafu(display("Error writing output file"))]
    WriterError { source: io::Error },
    #[snafu(display("Error serializing output"))]
    OutputSerializeError { source: serde_json::Error },

    // User input validation errors
    #[snafu(display("Invalid user input: {field} - {reason}"))]
    InvalidUserInput { field: String, reason: String },
}

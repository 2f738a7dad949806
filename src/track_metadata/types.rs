// Core data structures for circuit geometry

use serde::{Deserialize, Serialize};

/// Represents a 2D coordinate point in the provider's circuit frame
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Centerline, orientation and corners of a circuit
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct TrackGeometry {
    /// Ordered centerline coordinates in provider units
    pub centerline: Vec<Point2D>,
    /// Rotation in degrees that brings the circuit into its reference orientation
    pub rotation_deg: f64,
    /// Annotated corners
    #[serde(default)]
    pub corners: Vec<CornerAnnotation>,
}

/// Annotation for a specific corner on the track
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct CornerAnnotation {
    /// Corner number as signposted at the circuit
    pub number: u32,
    /// Sub-numbering for corners split into several apexes (e.g., "A" in 1A), empty otherwise
    #[serde(default)]
    pub letter: String,
    /// Apex position in provider units
    pub x: f64,
    pub y: f64,
    /// Direction in degrees in which the label is pushed away from the track
    pub angle_deg: f64,
}

impl CornerAnnotation {
    pub fn new(number: u32, letter: &str, x: f64, y: f64, angle_deg: f64) -> Self {
        Self {
            number,
            letter: letter.to_string(),
            x,
            y,
            angle_deg,
        }
    }

    /// Display label such as "1" or "1A"
    pub fn label(&self) -> String {
        format!("{}{}", self.number, self.letter)
    }

    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

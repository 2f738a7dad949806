// Circuit geometry module
// Provides the circuit data model and its projection into a reference orientation

pub mod projection;
pub mod types;

// Re-export commonly used types
pub use projection::{BoundingBox, ProjectedCorner, ProjectedTrack, TrackProjector, rotate};
pub use types::{CornerAnnotation, Point2D, TrackGeometry};

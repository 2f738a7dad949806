// Library interface for paddock
// This allows integration tests and benches to access internal modules

pub mod analysis;
pub mod config;
pub mod errors;
pub mod session;
pub mod track_metadata;

// Re-export commonly used types
pub use analysis::{DataQualityWarning, LapFilter, ResultsProjection};
pub use config::AnalysisConfig;
pub use errors::PaddockError;
pub use session::{FileSessionProvider, Session, SessionKey, SessionProvider, SessionType};
pub use track_metadata::{CornerAnnotation, TrackGeometry, TrackProjector};

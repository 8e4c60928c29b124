// Radar Core - Computational heart of the technology radar
// Exposes placement, movement classification and freshness decay for the
// surrounding API, sync and rendering layers.

pub mod config;
pub mod distribution;
pub mod freshness;
pub mod model;
pub mod movement;

// Re-export commonly used types
pub use config::RadarConfig;
pub use distribution::{PositionSolver, RingBand};
pub use freshness::FreshnessModel;
pub use model::{
    age_days, group_by_sector, group_logs_by_blip, parse_timestamp, sort_logs_by_created, Blip,
    BlipPosition, MovementState, Position, Quadrant, RadarData, RecordChangeLog, Ring, SectorGroup,
};
pub use movement::{BlipMovement, MovementClassifier};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

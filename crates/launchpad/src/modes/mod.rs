//! Encoder modes shipped with the launchpad bundle.

mod tempo;
mod volume;

pub use tempo::TempoMode;
pub use volume::VolumeMode;

/// Mode names used when wiring the surface.
pub const VOLUME: &str = "Volume";
pub const TEMPO: &str = "Tempo";

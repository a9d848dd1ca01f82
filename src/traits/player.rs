use std::path::Path;

use crate::models::error::RecorderError;

/// External playback transport, polled for progress.
///
/// The recorder never drives playback timing itself; it starts the player
/// on a finalized file and the progress monitor polls `position_ms` /
/// `duration_ms` on a fixed interval.
pub trait AudioPlayer: Send + Sync {
    /// Begin playing the given file from the start.
    fn play_file(&self, path: &Path) -> Result<(), RecorderError>;

    fn pause(&self);

    fn resume(&self);

    fn stop(&self);

    /// Whether the underlying player object still exists. Once this
    /// returns false the progress monitor completes its stream.
    fn is_alive(&self) -> bool;

    fn is_playing(&self) -> bool;

    /// Current position in milliseconds.
    fn position_ms(&self) -> i64;

    /// Total duration in milliseconds, or <= 0 if not yet known.
    fn duration_ms(&self) -> i64;
}

use thiserror::Error;

/// Errors that can occur during recording and playback operations.
///
/// Capture-thread and pipeline errors are caught locally, logged, and
/// surfaced as a terminal `RecorderEvent::Error` on the caller stream —
/// they never unwind across the owning threads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecorderError {
    /// The capture handle failed to open, or the device returned no data
    /// for more than 10 consecutive reads. Some platforms report granted
    /// permission while silently delivering nothing, so the two conditions
    /// are conflated on purpose.
    #[error("capture device unavailable or permission denied")]
    DeviceUnavailable,

    #[error("a recording session is already active")]
    AlreadyRecording,

    #[error("encoding failed: {0}")]
    EncodeFailure(String),

    #[error("output sink I/O failed: {0}")]
    SinkIoFailure(String),

    /// Playback was requested but no completed recording exists.
    #[error("no recorded audio file available")]
    NoActiveFile,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

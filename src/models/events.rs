use std::path::PathBuf;

use super::error::RecorderError;

/// Frame-level event emitted by the capture worker and consumed, in order,
/// by the encode pipeline.
///
/// The `buffer` inside `Frame` is a pooled allocation: ownership transfers
/// to the consumer, which must hand it back via
/// [`BufferPool::release_bytes`](crate::processing::buffer_pool::BufferPool::release_bytes)
/// after use. Forgetting to do so costs pool hits, not memory — the pool
/// regrows on demand.
#[derive(Debug)]
pub enum FrameEvent {
    Started,
    Paused,
    Resumed,
    Frame {
        /// Raw interleaved PCM bytes (little-endian).
        buffer: Vec<u8>,
        /// Number of valid bytes in `buffer`.
        byte_len: usize,
        channel_count: u16,
        /// Accumulated recording duration after this frame.
        duration_ms: u64,
    },
    Stopped,
    MaxDurationReached,
    Error(RecorderError),
}

/// Caller-visible event published on the stream returned by
/// [`Recorder::start_recording`](crate::session::recorder::Recorder::start_recording).
///
/// Terminal events (`Stopped`, `MaxDurationReached`, `Error`) are followed
/// by stream completion: the sender is dropped and the receiver disconnects.
#[derive(Debug, Clone, PartialEq)]
pub enum RecorderEvent {
    Started,
    Paused,
    Resumed,
    Recording { duration_ms: u64 },
    /// Instantaneous loudness in the bounded display range, recomputed per
    /// frame and emitted independently of encode success.
    Volume { level: f64 },
    Stopped { file: PathBuf },
    MaxDurationReached { file: PathBuf },
    Error(RecorderError),
}

impl RecorderEvent {
    /// Whether this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Stopped { .. } | Self::MaxDurationReached { .. } | Self::Error(_)
        )
    }
}

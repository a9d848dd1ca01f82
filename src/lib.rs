//! # audio-recorder-core
//!
//! Streaming voice recorder core library.
//!
//! Captures live audio from a microphone-like device, compresses it
//! incrementally to a compact encoded file while recording is in
//! progress, and exposes lifecycle control (start, pause, resume, stop,
//! time-bounded auto-stop) together with live telemetry (elapsed
//! duration, instantaneous loudness). Platform capture backends, the
//! concrete codec, and the playback transport plug in behind the traits
//! in `traits/`.
//!
//! ## Architecture
//!
//! ```text
//! audio-recorder-core (this crate)
//! ├── traits/       ← CaptureDevice/Factory, StreamingCodec/Factory, AudioPlayer
//! ├── models/       ← RecorderError, RecorderState, CaptureConfig, events, results
//! ├── processing/   ← BufferPool, PCM conversion, loudness metering
//! ├── session/      ← state machine, capture worker, encode pipeline, playback monitor
//! └── storage/      ← encoded file sink, metadata sidecar
//! ```
//!
//! Data flow: device → capture worker (pooled raw frames) → encode
//! pipeline (loudness + encode + write) → caller event stream. The two
//! long-lived threads communicate only through an ordered frame channel;
//! buffers cross it via pool-mediated ownership transfer.

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::config::{CaptureConfig, ChannelLayout, ENCODER_QUALITY};
pub use models::error::RecorderError;
pub use models::events::{FrameEvent, RecorderEvent};
pub use models::recording_result::{RecordingMetadata, RecordingResult};
pub use models::state::RecorderState;
pub use processing::buffer_pool::BufferPool;
pub use session::playback::{PlaybackProgressMonitor, PLAYBACK_POSITION_IDLE};
pub use session::recorder::{Recorder, RecorderContext};
pub use session::state_machine::RecordingStateMachine;
pub use storage::sink::EncodedFileSink;
pub use traits::capture_device::{CaptureDevice, CaptureDeviceFactory, EffectKind};
pub use traits::codec::{CodecFactory, StreamingCodec};
pub use traits::player::AudioPlayer;

use std::sync::Arc;

use crossbeam_channel::Receiver;

use crate::models::config::CaptureConfig;
use crate::models::error::RecorderError;
use crate::models::events::RecorderEvent;
use crate::models::recording_result::RecordingResult;
use crate::models::state::RecorderState;
use crate::processing::buffer_pool::BufferPool;
use crate::session::playback::PlaybackProgressMonitor;
use crate::session::state_machine::RecordingStateMachine;
use crate::traits::capture_device::CaptureDeviceFactory;
use crate::traits::codec::CodecFactory;
use crate::traits::player::AudioPlayer;

/// Process-wide resources with an explicit lifecycle: created with the
/// recorder, drained on `destroy()`. Passed by reference to the
/// components that need them rather than living in ambient globals.
pub struct RecorderContext {
    pub pool: Arc<BufferPool>,
}

impl RecorderContext {
    fn new() -> Self {
        Self {
            pool: Arc::new(BufferPool::new()),
        }
    }

    /// Release retained resources. Only called with no active session.
    fn teardown(&self) {
        self.pool.clear_all();
    }
}

/// Public entry point: recording lifecycle plus playback of the last
/// completed recording.
///
/// All operations are internally synchronized; calling them from
/// arbitrary threads is safe. Control operations are idempotent and
/// their effects are observed on the event stream returned by
/// [`start_recording`](Self::start_recording).
pub struct Recorder {
    context: RecorderContext,
    machine: RecordingStateMachine,
    player: Arc<dyn AudioPlayer>,
}

impl Recorder {
    pub fn new(
        device_factory: Arc<dyn CaptureDeviceFactory>,
        codec_factory: Arc<dyn CodecFactory>,
        player: Arc<dyn AudioPlayer>,
    ) -> Self {
        let context = RecorderContext::new();
        let machine = RecordingStateMachine::new(
            device_factory,
            codec_factory,
            Arc::clone(&context.pool),
        );
        Self {
            context,
            machine,
            player,
        }
    }

    /// Start recording with default configuration, capped at
    /// `max_duration_ms`. Stops playback and preempts any session already
    /// in flight (its stream observes `Stopped` first).
    pub fn start_recording(
        &self,
        max_duration_ms: u64,
    ) -> Result<Receiver<RecorderEvent>, RecorderError> {
        self.start_recording_with(CaptureConfig::new(max_duration_ms))
    }

    /// Start recording with full configuration control.
    pub fn start_recording_with(
        &self,
        config: CaptureConfig,
    ) -> Result<Receiver<RecorderEvent>, RecorderError> {
        self.stop_play();
        self.machine.start(config)
    }

    /// Pause the active session. Idempotent; no-op while not recording.
    pub fn pause_recording(&self) {
        self.machine.pause();
    }

    /// Resume a paused session. Idempotent; stops playback first.
    pub fn resume_recording(&self) {
        self.stop_play();
        self.machine.resume();
    }

    /// Stop the active session and finalize the output file. Idempotent;
    /// the terminal `Stopped` event carries the file reference.
    pub fn stop_recording(&self) {
        self.machine.stop();
    }

    pub fn is_recording(&self) -> bool {
        self.machine.is_recording()
    }

    /// The process-wide resource context backing this recorder.
    pub fn context(&self) -> &RecorderContext {
        &self.context
    }

    pub fn state(&self) -> RecorderState {
        self.machine.state()
    }

    /// Result of the most recently finalized recording, if any.
    pub fn last_recording(&self) -> Option<RecordingResult> {
        self.machine.last_result()
    }

    /// Play back the last completed recording, emitting
    /// `(position_ms, duration_ms)` every `period_ms` starting 300 ms
    /// after subscription. Pauses any active recording first.
    pub fn play(&self, period_ms: u64) -> Result<Receiver<(i64, i64)>, RecorderError> {
        self.pause_recording();
        let result = self
            .machine
            .last_result()
            .ok_or(RecorderError::NoActiveFile)?;
        self.player.play_file(&result.file_path)?;
        Ok(PlaybackProgressMonitor::spawn(
            Arc::clone(&self.player),
            period_ms,
        ))
    }

    pub fn is_playing(&self) -> bool {
        self.player.is_playing()
    }

    pub fn pause_play(&self) {
        self.player.pause();
    }

    /// Resume playback; recording stays paused while audio plays.
    pub fn resume_play(&self) {
        self.pause_recording();
        self.player.resume();
    }

    pub fn stop_play(&self) {
        self.player.stop();
    }

    /// Release everything: playback, the active session, and pooled
    /// buffers. Safe to call multiple times.
    pub fn destroy(&self) {
        self.stop_play();
        self.machine.destroy();
        self.context.teardown();
    }
}

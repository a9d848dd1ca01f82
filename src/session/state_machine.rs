use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;

use crate::models::config::CaptureConfig;
use crate::models::error::RecorderError;
use crate::models::events::{FrameEvent, RecorderEvent};
use crate::models::recording_result::RecordingResult;
use crate::models::state::RecorderState;
use crate::processing::buffer_pool::BufferPool;
use crate::session::capture_worker::CaptureWorker;
use crate::session::encode_pipeline::EncodePipeline;
use crate::session::SessionShared;
use crate::traits::capture_device::CaptureDeviceFactory;
use crate::traits::codec::CodecFactory;

/// Threads and channel endpoint owned by one in-flight session.
struct ActiveSession {
    frame_tx: Sender<FrameEvent>,
    worker: Option<JoinHandle<()>>,
    pipeline: Option<JoinHandle<()>>,
}

/// Arbitrates the recording lifecycle.
///
/// Every transition request goes through one mutex-guarded gate, so
/// concurrent `start`/`pause`/`resume`/`stop` calls from arbitrary
/// threads serialize into no-ops or well-defined transitions — never a
/// race. At most one session is active at a time; starting over an
/// active session synchronously drains and releases it first.
pub struct RecordingStateMachine {
    gate: Mutex<Option<ActiveSession>>,
    shared: Arc<SessionShared>,
    session_config: Mutex<Option<CaptureConfig>>,
    device_factory: Arc<dyn CaptureDeviceFactory>,
    codec_factory: Arc<dyn CodecFactory>,
    pool: Arc<BufferPool>,
}

impl RecordingStateMachine {
    pub fn new(
        device_factory: Arc<dyn CaptureDeviceFactory>,
        codec_factory: Arc<dyn CodecFactory>,
        pool: Arc<BufferPool>,
    ) -> Self {
        Self {
            gate: Mutex::new(None),
            shared: Arc::new(SessionShared::new()),
            session_config: Mutex::new(None),
            device_factory,
            codec_factory,
            pool,
        }
    }

    /// Start a new session, preempting any active one.
    ///
    /// Returns the caller-visible event stream. On failure the machine is
    /// left `Idle`, never half-started.
    pub fn start(&self, mut config: CaptureConfig) -> Result<Receiver<RecorderEvent>, RecorderError> {
        let mut gate = self.gate.lock();
        self.stop_locked(&mut gate);

        if self.shared.state().is_active() {
            return Err(RecorderError::AlreadyRecording);
        }

        let floor = self.device_factory.min_frame_size(
            config.sample_rate,
            config.channels.channel_count(),
            config.bit_depth,
        );
        config.apply_frame_floor(floor);
        config.validate().map_err(RecorderError::InvalidConfig)?;

        self.shared.reset_for_start();
        *self.session_config.lock() = Some(config.clone());

        let (frame_tx, frame_rx) = unbounded();
        let (event_tx, event_rx) = unbounded();

        let pipeline = EncodePipeline::new(
            config.clone(),
            Arc::clone(&self.codec_factory),
            Arc::clone(&self.shared),
            Arc::clone(&self.pool),
            frame_rx,
            event_tx,
        );
        let pipeline_handle = thread::Builder::new()
            .name("encode-pipeline".into())
            .spawn(move || pipeline.run())
            .expect("failed to spawn encode pipeline thread");

        let worker_handle = self.spawn_worker(config, frame_tx.clone());

        *gate = Some(ActiveSession {
            frame_tx,
            worker: Some(worker_handle),
            pipeline: Some(pipeline_handle),
        });

        log::info!("recording session started");
        Ok(event_rx)
    }

    /// Pause the active session. No-op unless currently recording.
    pub fn pause(&self) {
        let gate = self.gate.lock();
        if gate.is_none() {
            return;
        }
        if self.shared.is_recording() && !self.shared.is_paused() {
            log::info!("pausing recording");
            self.shared.set_flags(false, true);
            // The worker observes the flags at the top of its loop,
            // releases the device, and emits Paused.
        }
    }

    /// Resume a paused session: a fresh worker re-opens the device.
    /// No-op unless currently paused.
    pub fn resume(&self) {
        let mut gate = self.gate.lock();
        let Some(session) = gate.as_mut() else {
            return;
        };
        if !self.shared.is_paused() {
            return;
        }

        // The previous worker has parked; reap it before respawning.
        if let Some(handle) = session.worker.take() {
            let _ = handle.join();
        }

        let Some(config) = self.session_config.lock().clone() else {
            return;
        };
        log::info!("resuming recording");
        self.shared.set_flags(true, false);
        let handle = self.spawn_worker(config, session.frame_tx.clone());
        session.worker = Some(handle);
    }

    /// Stop the active session and drain it synchronously. Idempotent:
    /// stopping while idle or already stopped is a no-op.
    pub fn stop(&self) {
        let mut gate = self.gate.lock();
        self.stop_locked(&mut gate);
    }

    pub fn is_recording(&self) -> bool {
        self.shared.is_recording()
    }

    pub fn state(&self) -> RecorderState {
        self.shared.state()
    }

    pub fn last_result(&self) -> Option<RecordingResult> {
        self.shared.last_result()
    }

    /// Tear down any active session. Safe to call repeatedly.
    pub fn destroy(&self) {
        self.stop();
    }

    fn stop_locked(&self, gate: &mut Option<ActiveSession>) {
        let Some(mut session) = gate.take() else {
            return;
        };

        let was_paused = self.shared.is_paused();
        // A session whose pipeline already failed terminally has cleared
        // flags and a terminal state; reaping its threads must not move
        // the machine back to Stopping.
        let was_active = (self.shared.is_recording() || was_paused)
            && !self.shared.state().is_terminal();

        if was_active {
            self.shared.set_state(RecorderState::Stopping);
            self.shared.set_flags(false, false);
        }

        // The in-flight blocking read completes before the worker sees
        // the cleared flag; the join is bounded by hardware read latency.
        if let Some(handle) = session.worker.take() {
            let _ = handle.join();
        }

        // Stop while paused: the worker is parked, so the terminal event
        // is injected directly — capture is not restarted for this.
        if was_paused {
            let _ = session.frame_tx.send(FrameEvent::Stopped);
        }

        drop(session.frame_tx);
        if let Some(handle) = session.pipeline.take() {
            let _ = handle.join();
        }
    }

    fn spawn_worker(&self, config: CaptureConfig, frame_tx: Sender<FrameEvent>) -> JoinHandle<()> {
        let worker = CaptureWorker::new(
            config,
            Arc::clone(&self.device_factory),
            Arc::clone(&self.shared),
            Arc::clone(&self.pool),
            frame_tx,
        );
        thread::Builder::new()
            .name("capture-worker".into())
            .spawn(move || worker.run())
            .expect("failed to spawn capture thread")
    }
}

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::models::recording_result::RecordingResult;
use crate::models::state::RecorderState;

pub mod capture_worker;
pub mod encode_pipeline;
pub mod playback;
pub mod recorder;
pub mod state_machine;

/// State shared between the state machine, the capture thread, and the
/// encode pipeline.
///
/// The atomics are the cooperative cancellation flags the capture loop
/// polls at the top of each iteration; `duration_ms` accumulates across
/// pause/resume within one session and resets on start.
pub(crate) struct SessionShared {
    state: Mutex<RecorderState>,
    recording: AtomicBool,
    paused: AtomicBool,
    duration_ms: AtomicU64,
    last_result: Mutex<Option<RecordingResult>>,
}

impl SessionShared {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(RecorderState::Idle),
            recording: AtomicBool::new(false),
            paused: AtomicBool::new(false),
            duration_ms: AtomicU64::new(0),
            last_result: Mutex::new(None),
        }
    }

    pub(crate) fn state(&self) -> RecorderState {
        self.state.lock().clone()
    }

    pub(crate) fn set_state(&self, state: RecorderState) {
        *self.state.lock() = state;
    }

    pub(crate) fn is_recording(&self) -> bool {
        self.recording.load(Ordering::SeqCst)
    }

    pub(crate) fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    pub(crate) fn duration_ms(&self) -> u64 {
        self.duration_ms.load(Ordering::SeqCst)
    }

    /// Accumulate one read's worth of audio, returning the new total.
    pub(crate) fn add_duration(&self, read_ms: u64) -> u64 {
        self.duration_ms.fetch_add(read_ms, Ordering::SeqCst) + read_ms
    }

    pub(crate) fn set_flags(&self, recording: bool, paused: bool) {
        self.recording.store(recording, Ordering::SeqCst);
        self.paused.store(paused, Ordering::SeqCst);
    }

    /// Prepare for a fresh session: zero the accumulated duration, clear
    /// the previous result, raise the recording flag.
    pub(crate) fn reset_for_start(&self) {
        self.duration_ms.store(0, Ordering::SeqCst);
        *self.last_result.lock() = None;
        self.set_flags(true, false);
        self.set_state(RecorderState::Starting);
    }

    pub(crate) fn last_result(&self) -> Option<RecordingResult> {
        self.last_result.lock().clone()
    }

    pub(crate) fn set_last_result(&self, result: RecordingResult) {
        *self.last_result.lock() = Some(result);
    }
}

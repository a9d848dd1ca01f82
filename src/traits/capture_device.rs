use crate::models::config::CaptureConfig;
use crate::models::error::RecorderError;

/// Audio conditioning effects a capture device may support.
///
/// Each is enabled and released independently and best-effort: a failure
/// on one must not abort the others or the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    NoiseSuppressor,
    EchoCanceler,
    AutoGain,
}

impl EffectKind {
    /// All effect kinds, in enable order.
    pub const ALL: [EffectKind; 3] = [
        EffectKind::NoiseSuppressor,
        EffectKind::EchoCanceler,
        EffectKind::AutoGain,
    ];
}

/// An open hardware capture handle.
///
/// `read` blocks until the device delivers data, bounded by the platform's
/// own timeout behavior. It is only ever called from the dedicated capture
/// thread. `Ok(0)` means the device returned no data — the caller treats
/// repeated empty reads as a permission/device failure.
pub trait CaptureDevice: Send {
    /// Read raw interleaved PCM bytes into `buf`, returning the count read.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, RecorderError>;

    /// Enable one conditioning effect. Best-effort.
    fn enable_effect(&mut self, kind: EffectKind) -> Result<(), RecorderError>;

    /// Release one conditioning effect. Best-effort.
    fn release_effect(&mut self, kind: EffectKind) -> Result<(), RecorderError>;

    /// Release the hardware handle. Called exactly once per open handle,
    /// on every exit path.
    fn close(&mut self);
}

/// Opens capture devices for recording sessions.
///
/// Implemented by platform backends; test code supplies deterministic
/// stubs implementing the same interface.
pub trait CaptureDeviceFactory: Send + Sync {
    /// Open a capture handle configured per `config`.
    ///
    /// Open failure surfaces as `DeviceUnavailable`; there is no automatic
    /// retry — the caller must request a new start.
    fn open(&self, config: &CaptureConfig) -> Result<Box<dyn CaptureDevice>, RecorderError>;

    /// Minimum capture buffer size in bytes the platform will accept for
    /// this format. The session's frame size never goes below this floor.
    fn min_frame_size(&self, sample_rate: u32, channels: u16, bit_depth: u16) -> usize;
}

use std::path::PathBuf;

/// Fixed encoder quality setting passed to the codec session.
pub const ENCODER_QUALITY: u32 = 2;

/// Input channel layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelLayout {
    Mono,
    Stereo,
}

impl ChannelLayout {
    pub fn channel_count(&self) -> u16 {
        match self {
            Self::Mono => 1,
            Self::Stereo => 2,
        }
    }
}

/// Immutable configuration for one recording session.
///
/// Computed once when the session starts; the effective frame size is the
/// larger of the requested size and the platform's minimum buffer floor
/// (see `CaptureDeviceFactory::min_frame_size`).
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Sample rate in Hz (default: 44100).
    pub sample_rate: u32,

    /// Channel layout (default: mono).
    pub channels: ChannelLayout,

    /// Sample bit depth (default: 16). Valid values: 8, 16.
    pub bit_depth: u16,

    /// Capture read size in bytes. Each capture-loop iteration reads at
    /// most this many bytes into one pooled buffer.
    pub frame_size: usize,

    /// Maximum recording duration in milliseconds; the session transitions
    /// to `MaxDurationReached` once the accumulated duration hits it.
    pub max_duration_ms: u64,

    /// Directory where recording files are written (created on demand).
    pub output_dir: PathBuf,

    /// Enable best-effort audio conditioning effects on the capture device
    /// (noise suppression, echo cancellation, auto gain).
    pub enable_effects: bool,
}

impl CaptureConfig {
    /// Configuration for a session capped at `max_duration_ms`, with every
    /// other field at its default. The default frame size covers 100 ms of
    /// audio at the configured rate.
    pub fn new(max_duration_ms: u64) -> Self {
        let mut config = Self {
            sample_rate: 44_100,
            channels: ChannelLayout::Mono,
            bit_depth: 16,
            frame_size: 0,
            max_duration_ms,
            output_dir: PathBuf::from("recordings"),
            enable_effects: true,
        };
        config.frame_size = (config.byte_rate() / 10) as usize;
        config
    }

    /// Raw PCM byte rate: `sample_rate × bit_depth/8 × channels`.
    pub fn byte_rate(&self) -> u64 {
        self.sample_rate as u64 * (self.bit_depth as u64 / 8) * self.channels.channel_count() as u64
    }

    /// Encoder output bitrate in kbps: 32 for 16 kHz input, 128 otherwise.
    pub fn bitrate_kbps(&self) -> u32 {
        if self.sample_rate == 16_000 {
            32
        } else {
            128
        }
    }

    /// Clamp the frame size up to the platform floor reported by the
    /// device factory.
    pub fn apply_frame_floor(&mut self, min_frame_size: usize) {
        self.frame_size = self.frame_size.max(min_frame_size);
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate == 0 {
            return Err("sample rate must be positive".into());
        }
        if ![8, 16].contains(&self.bit_depth) {
            return Err(format!("unsupported bit depth: {}", self.bit_depth));
        }
        if self.frame_size == 0 {
            return Err("frame size must be positive".into());
        }
        if self.max_duration_ms == 0 {
            return Err("max duration must be positive".into());
        }
        Ok(())
    }
}

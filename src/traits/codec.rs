use crate::models::config::CaptureConfig;
use crate::models::error::RecorderError;

/// A stateful streaming codec session.
///
/// Consumes PCM frames incrementally and must see them in arrival order;
/// out-of-order chunks corrupt the stream. `flush` is called exactly once
/// at end-of-stream to emit trailing buffered output, then `close` exactly
/// once to release the session.
pub trait StreamingCodec: Send {
    /// Encode one frame of PCM samples into `out`, returning the number of
    /// encoded bytes produced (possibly 0 while the codec buffers).
    ///
    /// Mono input passes the same slice as both channels.
    fn encode(
        &mut self,
        left: &[i16],
        right: &[i16],
        out: &mut [u8],
    ) -> Result<usize, RecorderError>;

    /// Emit any residual buffered output into `out`.
    fn flush(&mut self, out: &mut [u8]) -> Result<usize, RecorderError>;

    /// Release the codec session.
    fn close(&mut self);

    /// Worst-case encoded size for a frame of `sample_count` input samples,
    /// used to size the pooled output buffer.
    fn max_output_size(&self, sample_count: usize) -> usize {
        7200 + (sample_count as f64 * 2.0 * 1.25).ceil() as usize
    }
}

/// Opens codec sessions configured for a recording session's format.
pub trait CodecFactory: Send + Sync {
    fn open(&self, config: &CaptureConfig) -> Result<Box<dyn StreamingCodec>, RecorderError>;
}

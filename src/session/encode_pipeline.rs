use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};

use crate::models::config::CaptureConfig;
use crate::models::error::RecorderError;
use crate::models::events::{FrameEvent, RecorderEvent};
use crate::models::state::RecorderState;
use crate::processing::buffer_pool::BufferPool;
use crate::processing::{loudness, pcm};
use crate::session::SessionShared;
use crate::storage::sink::EncodedFileSink;
use crate::traits::codec::{CodecFactory, StreamingCodec};

/// How a session ended, from the pipeline's point of view.
enum Outcome {
    Stopped,
    MaxDurationReached,
    Failed(RecorderError),
}

/// Single consumer of the frame channel.
///
/// Runs on its own thread, decoupled from the capture loop, and preserves
/// arrival order — the codec is a stateful stream and cannot accept
/// out-of-order chunks. Owns the codec session and the output sink for
/// the whole session; the finalize sequence (codec flush → codec close →
/// sink finalize) runs exactly once no matter which terminal path fires,
/// and a failure in one step never skips the rest.
pub(crate) struct EncodePipeline {
    config: CaptureConfig,
    codec_factory: Arc<dyn CodecFactory>,
    shared: Arc<SessionShared>,
    pool: Arc<BufferPool>,
    frames: Receiver<FrameEvent>,
    events: Sender<RecorderEvent>,
}

impl EncodePipeline {
    pub(crate) fn new(
        config: CaptureConfig,
        codec_factory: Arc<dyn CodecFactory>,
        shared: Arc<SessionShared>,
        pool: Arc<BufferPool>,
        frames: Receiver<FrameEvent>,
        events: Sender<RecorderEvent>,
    ) -> Self {
        Self {
            config,
            codec_factory,
            shared,
            pool,
            frames,
            events,
        }
    }

    pub(crate) fn run(self) {
        let mut codec: Option<Box<dyn StreamingCodec>> = None;
        let mut sink: Option<EncodedFileSink> = None;

        loop {
            let event = match self.frames.recv() {
                Ok(event) => event,
                // All senders gone without a terminal event; treat as stop.
                Err(_) => {
                    if sink.is_some() {
                        self.finish(codec, sink, Outcome::Stopped);
                    }
                    return;
                }
            };

            match event {
                FrameEvent::Started => {
                    let opened = EncodedFileSink::create(&self.config.output_dir)
                        .and_then(|s| Ok((s, self.codec_factory.open(&self.config)?)));
                    match opened {
                        Ok((s, c)) => {
                            sink = Some(s);
                            codec = Some(c);
                            self.emit(RecorderEvent::Started);
                        }
                        Err(e) => {
                            log::error!("failed to open recording session: {}", e);
                            self.finish(codec, sink, Outcome::Failed(e));
                            return;
                        }
                    }
                }
                FrameEvent::Resumed => self.emit(RecorderEvent::Resumed),
                FrameEvent::Paused => self.emit(RecorderEvent::Paused),
                FrameEvent::Frame {
                    buffer,
                    byte_len,
                    channel_count,
                    duration_ms,
                } => {
                    self.emit(RecorderEvent::Recording { duration_ms });
                    let result = match (codec.as_deref_mut(), sink.as_mut()) {
                        (Some(codec), Some(sink)) => {
                            self.process_frame(&buffer[..byte_len], channel_count, codec, sink)
                        }
                        // Frames arriving before the session opened are
                        // dropped; nothing to encode into yet.
                        _ => Ok(()),
                    };
                    self.pool.release_bytes(buffer);
                    if let Err(e) = result {
                        log::error!("frame processing failed: {}", e);
                        self.finish(codec, sink, Outcome::Failed(e));
                        return;
                    }
                }
                FrameEvent::Stopped => {
                    self.finish(codec, sink, Outcome::Stopped);
                    return;
                }
                FrameEvent::MaxDurationReached => {
                    self.finish(codec, sink, Outcome::MaxDurationReached);
                    return;
                }
                FrameEvent::Error(e) => {
                    self.finish(codec, sink, Outcome::Failed(e));
                    return;
                }
            }
        }
    }

    /// Loudness, encode, and append for one raw frame. Every pooled
    /// buffer acquired here is released before returning.
    fn process_frame(
        &self,
        bytes: &[u8],
        channel_count: u16,
        codec: &mut dyn StreamingCodec,
        sink: &mut EncodedFileSink,
    ) -> Result<(), RecorderError> {
        let mut samples = self.pool.acquire_samples(self.config.frame_size / 2);
        let count = pcm::bytes_to_samples(bytes, &mut samples);

        // Telemetry goes out before (and regardless of) the encode.
        let level = loudness::level(&samples[..count]);
        self.emit(RecorderEvent::Volume { level });

        let mut out = self.pool.acquire_bytes(codec.max_output_size(count));
        let encoded = if channel_count == 2 {
            let frames = count / 2;
            let mut left = self.pool.acquire_samples(frames);
            let mut right = self.pool.acquire_samples(frames);
            let split = pcm::split_stereo(&samples[..count], &mut left, &mut right);
            let result = codec.encode(&left[..split], &right[..split], &mut out);
            self.pool.release_samples(left);
            self.pool.release_samples(right);
            result
        } else {
            codec.encode(&samples[..count], &samples[..count], &mut out)
        };
        self.pool.release_samples(samples);

        let written = match encoded {
            Ok(n) => {
                if n > 0 {
                    sink.append(&out[..n])
                } else {
                    Ok(())
                }
            }
            Err(e) => Err(e),
        };
        self.pool.release_bytes(out);
        written
    }

    /// Terminal sequence: flush residual codec output, close the codec,
    /// finalize the sink, publish the result, emit the terminal event.
    /// Each step is guarded so a failure in one never skips the next.
    fn finish(
        &self,
        mut codec: Option<Box<dyn StreamingCodec>>,
        mut sink: Option<EncodedFileSink>,
        outcome: Outcome,
    ) {
        let session_opened = sink.is_some();

        // A terminal outcome originating here (encode or sink failure)
        // must also stop the capture loop: the worker only releases the
        // hardware handle once the flags clear. Redundant on the paths
        // where the worker already cleared them.
        self.shared.set_flags(false, false);

        if let Some(codec) = codec.as_deref_mut() {
            let mut out = self.pool.acquire_bytes(codec.max_output_size(0));
            match codec.flush(&mut out) {
                Ok(n) if n > 0 => {
                    if let Some(sink) = sink.as_mut() {
                        if let Err(e) = sink.append(&out[..n]) {
                            log::error!("failed to append flushed output: {}", e);
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => log::error!("codec flush failed: {}", e),
            }
            self.pool.release_bytes(out);
            codec.close();
        }
        drop(codec);

        let mut result = None;
        let mut sink_error = None;
        if let Some(mut sink) = sink.take() {
            match sink.finalize(self.shared.duration_ms(), &self.config) {
                Ok(r) => result = Some(r),
                Err(e) => {
                    log::error!("sink finalize failed: {}", e);
                    sink_error = Some(e);
                }
            }
        }

        if let Some(result) = &result {
            self.shared.set_last_result(result.clone());
        }

        let outcome = match (outcome, sink_error) {
            (Outcome::Failed(e), _) => Outcome::Failed(e),
            (_, Some(e)) => Outcome::Failed(e),
            (outcome, None) => outcome,
        };

        match outcome {
            Outcome::Stopped => {
                self.shared.set_state(RecorderState::Stopped);
                if let Some(result) = result {
                    self.emit(RecorderEvent::Stopped {
                        file: result.file_path,
                    });
                }
            }
            Outcome::MaxDurationReached => {
                self.shared.set_state(RecorderState::MaxDurationReached);
                if let Some(result) = result {
                    self.emit(RecorderEvent::MaxDurationReached {
                        file: result.file_path,
                    });
                }
            }
            Outcome::Failed(e) => {
                // A start that never initialized anything leaves the
                // machine idle rather than in a half-started error state.
                if session_opened {
                    self.shared.set_state(RecorderState::Error);
                } else {
                    self.shared.set_state(RecorderState::Idle);
                }
                self.emit(RecorderEvent::Error(e));
            }
        }
        // Dropping `self.events` here completes the caller stream.
    }

    fn emit(&self, event: RecorderEvent) {
        if let Err(e) = self.events.send(event) {
            log::debug!("event stream closed: {}", e);
        }
    }
}

use std::sync::Arc;

use crossbeam_channel::Sender;

use crate::models::config::CaptureConfig;
use crate::models::error::RecorderError;
use crate::models::events::FrameEvent;
use crate::models::state::RecorderState;
use crate::processing::buffer_pool::BufferPool;
use crate::session::SessionShared;
use crate::traits::capture_device::{CaptureDevice, CaptureDeviceFactory, EffectKind};

/// Empty reads tolerated before the device is declared unavailable.
///
/// Some platforms report recording permission as granted while delivering
/// no data at all; after this many reads in a row with nothing returned
/// the two cases are treated the same.
const MAX_EMPTY_READS: u32 = 10;

/// Dedicated blocking read loop over one capture handle.
///
/// One worker runs per `Recording` span: it is spawned on start and on
/// every resume, and exits when the cancellation flags clear, the max
/// duration is hit, or the device fails. The handle is released on every
/// exit path before any terminal event is emitted.
pub(crate) struct CaptureWorker {
    config: CaptureConfig,
    factory: Arc<dyn CaptureDeviceFactory>,
    shared: Arc<SessionShared>,
    pool: Arc<BufferPool>,
    frames: Sender<FrameEvent>,
}

impl CaptureWorker {
    pub(crate) fn new(
        config: CaptureConfig,
        factory: Arc<dyn CaptureDeviceFactory>,
        shared: Arc<SessionShared>,
        pool: Arc<BufferPool>,
        frames: Sender<FrameEvent>,
    ) -> Self {
        Self {
            config,
            factory,
            shared,
            pool,
            frames,
        }
    }

    pub(crate) fn run(self) {
        let mut device = match self.factory.open(&self.config) {
            Ok(device) => device,
            Err(e) => {
                log::error!("failed to open capture device: {}", e);
                self.fail();
                return;
            }
        };

        if self.config.enable_effects {
            enable_effects(device.as_mut());
        }

        if self.shared.duration_ms() == 0 {
            self.send(FrameEvent::Started);
        } else {
            self.send(FrameEvent::Resumed);
        }
        self.shared.set_state(RecorderState::Recording {
            duration_ms: self.shared.duration_ms(),
        });

        let byte_rate = self.config.byte_rate();
        let channel_count = self.config.channels.channel_count();
        let mut warmed_up = false;
        let mut empty_reads: u32 = 0;

        while self.shared.is_recording() {
            let mut buffer = self.pool.acquire_bytes(self.config.frame_size);
            let read = device.read(&mut buffer);

            // The first read after opening carries startup artifacts
            // (clicks, stale driver data); drop it unconditionally.
            if !warmed_up {
                warmed_up = true;
                self.pool.release_bytes(buffer);
                continue;
            }

            match read {
                Ok(n) if n > 0 => {
                    empty_reads = 0;
                    let read_ms = 1000 * n as u64 / byte_rate;
                    let duration_ms = self.shared.add_duration(read_ms);
                    self.shared
                        .set_state(RecorderState::Recording { duration_ms });
                    self.send(FrameEvent::Frame {
                        buffer,
                        byte_len: n,
                        channel_count,
                        duration_ms,
                    });
                }
                Ok(_) => {
                    self.pool.release_bytes(buffer);
                    empty_reads += 1;
                    if empty_reads > MAX_EMPTY_READS {
                        log::error!(
                            "no audio data after {} consecutive reads, treating as missing permission",
                            empty_reads
                        );
                        release_device(&self.config, device.as_mut());
                        self.fail();
                        return;
                    }
                }
                Err(e) => {
                    log::warn!("capture read failed: {}", e);
                    self.pool.release_bytes(buffer);
                    empty_reads += 1;
                    if empty_reads > MAX_EMPTY_READS {
                        release_device(&self.config, device.as_mut());
                        self.fail();
                        return;
                    }
                }
            }

            if self.shared.duration_ms() >= self.config.max_duration_ms {
                self.shared.set_flags(false, false);
                release_device(&self.config, device.as_mut());
                self.send(FrameEvent::MaxDurationReached);
                return;
            }
        }

        // Cooperative exit: pause or stop requested.
        release_device(&self.config, device.as_mut());
        if self.shared.is_paused() {
            self.shared.set_state(RecorderState::Paused {
                duration_ms: self.shared.duration_ms(),
            });
            self.send(FrameEvent::Paused);
        } else {
            self.send(FrameEvent::Stopped);
        }
    }

    /// Device/permission failure: clear the flags and hand the terminal
    /// error to the pipeline. No automatic retry.
    fn fail(&self) {
        self.shared.set_flags(false, false);
        self.send(FrameEvent::Error(RecorderError::DeviceUnavailable));
    }

    fn send(&self, event: FrameEvent) {
        // The pipeline may already have finalized on its own terminal
        // path; a disconnected channel is not an error here.
        if let Err(e) = self.frames.send(event) {
            log::debug!("frame channel closed: {}", e);
        }
    }
}

/// Enable the audio conditioning effects, each independently best-effort.
fn enable_effects(device: &mut dyn CaptureDevice) {
    for kind in EffectKind::ALL {
        match device.enable_effect(kind) {
            Ok(()) => log::info!("enabled {:?}", kind),
            Err(e) => log::warn!("failed to enable {:?}: {}", kind, e),
        }
    }
}

/// Release effects and the hardware handle. A failure releasing one
/// effect must not skip the others or the handle itself.
fn release_device(config: &CaptureConfig, device: &mut dyn CaptureDevice) {
    if config.enable_effects {
        for kind in EffectKind::ALL {
            if let Err(e) = device.release_effect(kind) {
                log::warn!("failed to release {:?}: {}", kind, e);
            }
        }
    }
    device.close();
}

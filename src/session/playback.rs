use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver};

use crate::traits::player::AudioPlayer;

/// Position value emitted while the player is alive but not playing, so
/// a UI can distinguish paused-but-alive from absent.
pub const PLAYBACK_POSITION_IDLE: i64 = -2;

/// Delay before the first progress poll after subscription.
const FIRST_POLL_DELAY_MS: u64 = 300;

/// Polls an external player's position on a fixed interval and
/// republishes `(position_ms, duration_ms)` progress pairs.
///
/// The stream completes (the sender is dropped) when the player
/// disappears or the receiver is dropped; it never errors.
pub struct PlaybackProgressMonitor;

impl PlaybackProgressMonitor {
    pub fn spawn(player: Arc<dyn AudioPlayer>, period_ms: u64) -> Receiver<(i64, i64)> {
        let (tx, rx) = unbounded();

        thread::Builder::new()
            .name("playback-monitor".into())
            .spawn(move || {
                thread::sleep(Duration::from_millis(FIRST_POLL_DELAY_MS));
                let mut duration_ms: i64 = 0;
                loop {
                    if !player.is_alive() {
                        log::debug!("player gone, completing progress stream");
                        break;
                    }
                    if duration_ms <= 0 {
                        duration_ms = player.duration_ms();
                    }
                    let position = if player.is_playing() {
                        player.position_ms()
                    } else {
                        PLAYBACK_POSITION_IDLE
                    };
                    if tx.send((position, duration_ms)).is_err() {
                        break;
                    }
                    thread::sleep(Duration::from_millis(period_ms));
                }
            })
            .expect("failed to spawn playback monitor thread");

        rx
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::models::error::RecorderError;

    #[derive(Default)]
    struct StubPlayer {
        alive: AtomicBool,
        playing: AtomicBool,
        position: AtomicI64,
        duration: AtomicI64,
    }

    impl AudioPlayer for StubPlayer {
        fn play_file(&self, _path: &std::path::Path) -> Result<(), RecorderError> {
            Ok(())
        }
        fn pause(&self) {}
        fn resume(&self) {}
        fn stop(&self) {}
        fn is_alive(&self) -> bool {
            self.alive.load(Ordering::SeqCst)
        }
        fn is_playing(&self) -> bool {
            self.playing.load(Ordering::SeqCst)
        }
        fn position_ms(&self) -> i64 {
            self.position.fetch_add(10, Ordering::SeqCst)
        }
        fn duration_ms(&self) -> i64 {
            self.duration.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn emits_progress_while_playing() {
        let player = Arc::new(StubPlayer::default());
        player.alive.store(true, Ordering::SeqCst);
        player.playing.store(true, Ordering::SeqCst);
        player.duration.store(5000, Ordering::SeqCst);

        let rx = PlaybackProgressMonitor::spawn(player.clone(), 10);

        let (pos, dur) = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(pos >= 0);
        assert_eq!(dur, 5000);

        let (pos2, _) = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(pos2 > pos);

        player.alive.store(false, Ordering::SeqCst);
        // Drain until completion
        while rx.recv_timeout(Duration::from_secs(2)).is_ok() {}
    }

    #[test]
    fn idle_player_emits_sentinel_position() {
        let player = Arc::new(StubPlayer::default());
        player.alive.store(true, Ordering::SeqCst);
        player.playing.store(false, Ordering::SeqCst);
        player.duration.store(3000, Ordering::SeqCst);

        let rx = PlaybackProgressMonitor::spawn(player.clone(), 10);

        let (pos, dur) = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(pos, PLAYBACK_POSITION_IDLE);
        assert_eq!(dur, 3000);

        player.alive.store(false, Ordering::SeqCst);
    }

    #[test]
    fn dead_player_completes_stream() {
        let player = Arc::new(StubPlayer::default());
        // alive = false from the start

        let rx = PlaybackProgressMonitor::spawn(player, 10);

        assert!(rx.recv_timeout(Duration::from_secs(2)).is_err());
    }
}

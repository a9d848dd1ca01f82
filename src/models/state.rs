/// Recording session state machine.
///
/// State transitions:
/// ```text
/// idle → starting → recording ⇄ paused
///                       ↓          ↓
///                   stopping → stopped
///                       ↓
///          max_duration_reached / error
/// ```
///
/// `Stopped`, `MaxDurationReached`, and `Error` are terminal: the capture
/// handle and encoder session have been released by the time the machine
/// reaches any of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Starting,
    Recording { duration_ms: u64 },
    Paused { duration_ms: u64 },
    Stopping,
    Stopped,
    MaxDurationReached,
    Error,
}

impl RecorderState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording { .. })
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, Self::Paused { .. })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped | Self::MaxDurationReached | Self::Error)
    }

    /// Whether a session currently holds resources (anything between
    /// `Starting` and the terminal states).
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Self::Starting | Self::Recording { .. } | Self::Paused { .. } | Self::Stopping
        )
    }

    /// Returns the accumulated duration if the state tracks one.
    pub fn duration_ms(&self) -> Option<u64> {
        match self {
            Self::Recording { duration_ms } | Self::Paused { duration_ms } => Some(*duration_ms),
            _ => None,
        }
    }
}

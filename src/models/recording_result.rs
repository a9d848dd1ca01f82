use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Result produced when a session reaches a terminal state with a
/// finalized output file.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingResult {
    pub file_path: PathBuf,
    pub duration_ms: u64,
    pub metadata: RecordingMetadata,
    pub checksum: String,
}

/// Metadata stored alongside a recording as a JSON sidecar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingMetadata {
    pub id: String,
    pub duration_ms: u64,
    pub file_path: String,
    pub checksum: String,
    pub created_at: String,
    pub sample_rate: u32,
    pub channels: u16,
    pub bitrate_kbps: u32,
}

impl RecordingMetadata {
    pub fn new(
        duration_ms: u64,
        file_path: &str,
        checksum: &str,
        sample_rate: u32,
        channels: u16,
        bitrate_kbps: u32,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            duration_ms,
            file_path: file_path.to_string(),
            checksum: checksum.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            sample_rate,
            channels,
            bitrate_kbps,
        }
    }
}

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::models::error::RecorderError;
use crate::models::recording_result::RecordingMetadata;

/// Where the sidecar for a recording lives: `1234.mp3` →
/// `1234.metadata.json`, always next to the recording itself.
pub fn sidecar_path(recording_path: &Path) -> PathBuf {
    recording_path.with_extension("metadata.json")
}

/// Persist the metadata sidecar for a finalized recording.
pub fn write_metadata(
    metadata: &RecordingMetadata,
    recording_path: &Path,
) -> Result<(), RecorderError> {
    let path = sidecar_path(recording_path);
    let file = File::create(&path)
        .map_err(|e| RecorderError::SinkIoFailure(format!("sidecar create {}: {}", path.display(), e)))?;
    serde_json::to_writer_pretty(&file, metadata)
        .map_err(|e| RecorderError::SinkIoFailure(format!("sidecar encode: {}", e)))
}

/// Load the metadata sidecar for a recording, if one was written.
pub fn read_metadata(recording_path: &Path) -> Result<RecordingMetadata, RecorderError> {
    let path = sidecar_path(recording_path);
    let file = File::open(&path)
        .map_err(|e| RecorderError::SinkIoFailure(format!("sidecar open {}: {}", path.display(), e)))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| RecorderError::SinkIoFailure(format!("sidecar decode: {}", e)))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn temp_file_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("audio_recorder_test_{}", name))
    }

    #[test]
    fn sidecar_lives_next_to_recording() {
        let sidecar = sidecar_path(Path::new("recordings/1700000000000.mp3"));
        assert_eq!(
            sidecar,
            Path::new("recordings/1700000000000.metadata.json")
        );
    }

    #[test]
    fn sidecar_round_trip() {
        let recording = temp_file_path("sidecar.mp3");
        let metadata = RecordingMetadata::new(1234, "a/b.mp3", "abc123", 44_100, 1, 128);

        write_metadata(&metadata, &recording).unwrap();
        let loaded = read_metadata(&recording).unwrap();

        assert_eq!(loaded, metadata);

        fs::remove_file(sidecar_path(&recording)).ok();
    }

    #[test]
    fn read_missing_sidecar_fails() {
        let recording = temp_file_path("missing.mp3");
        assert!(read_metadata(&recording).is_err());
    }
}

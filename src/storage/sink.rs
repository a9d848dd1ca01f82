use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::models::config::CaptureConfig;
use crate::models::error::RecorderError;
use crate::models::recording_result::{RecordingMetadata, RecordingResult};
use crate::storage::metadata;

/// File extension for encoded recordings.
const RECORDING_EXT: &str = "mp3";

/// Incremental writer for the compressed output stream.
///
/// One sink per session. Encoded bytes are appended as the pipeline
/// produces them — the recording is never buffered entirely in memory.
/// `finalize` runs exactly once: it flushes, computes the SHA-256
/// checksum, and writes the metadata sidecar. Only ever accessed from
/// the pipeline thread.
pub struct EncodedFileSink {
    file_path: PathBuf,
    file: Option<BufWriter<File>>,
    total_bytes_written: u64,
}

impl EncodedFileSink {
    /// Create the recordings directory on demand and open a new output
    /// file named by the session start timestamp.
    pub fn create(output_dir: &Path) -> Result<Self, RecorderError> {
        fs::create_dir_all(output_dir)
            .map_err(|e| RecorderError::SinkIoFailure(format!("failed to create directory: {}", e)))?;

        let name = format!("{}.{}", chrono::Utc::now().timestamp_millis(), RECORDING_EXT);
        let file_path = output_dir.join(name);
        let file = File::create(&file_path)
            .map_err(|e| RecorderError::SinkIoFailure(format!("failed to create file: {}", e)))?;

        Ok(Self {
            file_path,
            file: Some(BufWriter::new(file)),
            total_bytes_written: 0,
        })
    }

    /// Append encoded bytes to the output stream.
    pub fn append(&mut self, data: &[u8]) -> Result<(), RecorderError> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| RecorderError::SinkIoFailure("sink is not open for writing".into()))?;
        file.write_all(data)
            .map_err(|e| RecorderError::SinkIoFailure(format!("write failed: {}", e)))?;
        self.total_bytes_written += data.len() as u64;
        Ok(())
    }

    /// Flush and close the file, compute its checksum, and write the
    /// metadata sidecar. The sink cannot be written after this.
    pub fn finalize(
        &mut self,
        duration_ms: u64,
        config: &CaptureConfig,
    ) -> Result<RecordingResult, RecorderError> {
        let mut file = self
            .file
            .take()
            .ok_or_else(|| RecorderError::SinkIoFailure("sink already finalized".into()))?;
        file.flush()
            .map_err(|e| RecorderError::SinkIoFailure(format!("flush failed: {}", e)))?;
        drop(file);

        let checksum = sha256_file(&self.file_path)?;
        let metadata = RecordingMetadata::new(
            duration_ms,
            &self.file_path.to_string_lossy(),
            &checksum,
            config.sample_rate,
            config.channels.channel_count(),
            config.bitrate_kbps(),
        );
        if let Err(e) = metadata::write_metadata(&metadata, &self.file_path) {
            // The recording itself is intact; the sidecar is best-effort.
            log::warn!("failed to write metadata sidecar: {}", e);
        }

        Ok(RecordingResult {
            file_path: self.file_path.clone(),
            duration_ms,
            metadata,
            checksum,
        })
    }

    /// Total encoded bytes written so far.
    pub fn bytes_written(&self) -> u64 {
        self.total_bytes_written
    }

    /// Path of the output file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

/// Compute the SHA-256 hex digest of a file without loading it whole.
fn sha256_file(path: &Path) -> Result<String, RecorderError> {
    let mut file = File::open(path)
        .map_err(|e| RecorderError::SinkIoFailure(format!("failed to open file for checksum: {}", e)))?;
    let mut hasher = Sha256::new();
    let mut chunk = [0u8; 8192];
    loop {
        let n = file
            .read(&mut chunk)
            .map_err(|e| RecorderError::SinkIoFailure(format!("failed to read file for checksum: {}", e)))?;
        if n == 0 {
            break;
        }
        hasher.update(&chunk[..n]);
    }
    Ok(hex_encode(&hasher.finalize()))
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("audio_recorder_sink_{}", name))
    }

    #[test]
    fn create_append_finalize() {
        let dir = temp_dir("basic");
        let config = CaptureConfig::new(10_000);

        let mut sink = EncodedFileSink::create(&dir).unwrap();
        sink.append(&[1, 2, 3, 4]).unwrap();
        sink.append(&[5, 6]).unwrap();
        assert_eq!(sink.bytes_written(), 6);

        let result = sink.finalize(1500, &config).unwrap();
        assert_eq!(result.duration_ms, 1500);
        assert!(!result.checksum.is_empty());

        let data = fs::read(&result.file_path).unwrap();
        assert_eq!(data, vec![1, 2, 3, 4, 5, 6]);

        // Sidecar written next to the recording
        let loaded = metadata::read_metadata(&result.file_path).unwrap();
        assert_eq!(loaded.checksum, result.checksum);
        assert_eq!(loaded.sample_rate, 44_100);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn append_after_finalize_fails() {
        let dir = temp_dir("closed");
        let config = CaptureConfig::new(10_000);

        let mut sink = EncodedFileSink::create(&dir).unwrap();
        sink.append(&[0xFF]).unwrap();
        sink.finalize(100, &config).unwrap();

        assert!(sink.append(&[0xAA]).is_err());
        assert!(sink.finalize(100, &config).is_err());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn creates_recordings_directory_on_demand() {
        let dir = temp_dir("nested").join("a").join("b");
        assert!(!dir.exists());

        let sink = EncodedFileSink::create(&dir).unwrap();
        assert!(dir.exists());
        assert!(sink.file_path().starts_with(&dir));

        fs::remove_dir_all(temp_dir("nested")).ok();
    }

    #[test]
    fn file_named_by_timestamp() {
        let dir = temp_dir("named");
        let sink = EncodedFileSink::create(&dir).unwrap();

        let stem = sink
            .file_path()
            .file_stem()
            .unwrap()
            .to_string_lossy()
            .to_string();
        assert!(stem.parse::<i64>().is_ok(), "stem not a timestamp: {}", stem);
        assert_eq!(sink.file_path().extension().unwrap(), "mp3");

        fs::remove_dir_all(&dir).ok();
    }
}
